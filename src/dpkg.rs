// src/dpkg.rs

//! dpkg-deb collaborator
//!
//! The converter never parses `.deb` archives itself. Everything that
//! touches the package file goes through the `PackageExtractor` trait,
//! implemented here on top of the `dpkg-deb` command-line tool and in
//! tests by fakes.

use crate::error::{Error, Result};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Capability interface over the external package tool
///
/// `verify` must be free of side effects. `unpack` must populate `dest`
/// with a `DEBIAN/` metadata subtree and the package payload at the
/// directory's top level. Both calls are synchronous and blocking.
pub trait PackageExtractor {
    /// Structural validity check against the package file
    fn verify(&self, package: &Path) -> Result<()>;

    /// Fully unpack control metadata and payload into `dest`
    fn unpack(&self, package: &Path, dest: &Path) -> Result<()>;
}

/// Production extractor backed by `dpkg-deb`
#[derive(Debug, Clone, Copy, Default)]
pub struct DpkgDeb;

impl DpkgDeb {
    /// Run a read-only dpkg-deb query against the package
    fn query(&self, flag: &str, package: &Path) -> Result<()> {
        debug!("Running dpkg-deb {} {}", flag, package.display());

        let output = Command::new("dpkg-deb")
            .arg(flag)
            .arg(package)
            .output()
            .map_err(|e| {
                Error::InvalidPackage(format!(
                    "failed to run dpkg-deb: {}. Is dpkg installed?",
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(Error::InvalidPackage(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(())
    }
}

impl PackageExtractor for DpkgDeb {
    fn verify(&self, package: &Path) -> Result<()> {
        // Both the info and the contents query must succeed for the
        // package to count as structurally valid.
        self.query("--info", package)?;
        self.query("--contents", package)?;
        Ok(())
    }

    fn unpack(&self, package: &Path, dest: &Path) -> Result<()> {
        debug!("Extracting {} to {}", package.display(), dest.display());

        let output = Command::new("dpkg-deb")
            .arg("-R")
            .arg(package)
            .arg(dest)
            .output()
            .map_err(|e| Error::ExtractionFailed(format!("failed to run dpkg-deb: {}", e)))?;

        if !output.status.success() {
            return Err(Error::ExtractionFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(())
    }
}

/// Check if dpkg-deb is available on this system
pub fn is_dpkg_deb_available() -> bool {
    Command::new("dpkg-deb")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_dpkg_deb_available() {
        // This test just ensures the probe runs without panic
        let _ = is_dpkg_deb_available();
    }

    #[test]
    fn test_verify_rejects_garbage() {
        if !is_dpkg_deb_available() {
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.deb");
        std::fs::write(&path, b"this is not an ar archive").unwrap();

        let result = DpkgDeb.verify(&path);
        assert!(matches!(result, Err(Error::InvalidPackage(_))));
    }

    #[test]
    fn test_unpack_rejects_garbage() {
        if !is_dpkg_deb_available() {
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.deb");
        std::fs::write(&path, b"this is not an ar archive").unwrap();

        let dest = tempfile::tempdir().unwrap();
        let result = DpkgDeb.unpack(&path, dest.path());
        assert!(matches!(result, Err(Error::ExtractionFailed(_))));
    }
}
