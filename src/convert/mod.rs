// src/convert/mod.rs

//! The deb-to-APG conversion pipeline
//!
//! Five strictly sequential stages over a temporary staging tree:
//! validate, extract, restructure, synthesize records, package. Each stage
//! depends on the filesystem state the previous stage left behind, so no
//! stage may run concurrently with another for the same job. Separate jobs
//! are independent: each owns a uniquely-named staging directory.
//!
//! The staging directory is held in a `TempDir` guard owned by the driver,
//! so it is removed on every exit path, success or failure.

mod archive;
mod checksum;
mod layout;
mod metadata;

pub use archive::{CHECKSUMS_FILE, METADATA_FILE};
pub use checksum::ChecksumMap;
pub use metadata::{CONTROL_FILES, CONVERTER_AUTHOR, CONVERTER_NAME, PackageMetadata};

use crate::dpkg::PackageExtractor;
use crate::error::{Error, Result};
use crate::progress::ProgressReporter;
use std::fmt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// Name of the control-metadata subtree dpkg-deb leaves at the staging root
pub const CONTROL_DIR: &str = "DEBIAN";

/// Name of the archive-root directory created during restructuring
pub const ARCHIVE_ROOT: &str = "apg";

/// Name of the payload directory under the archive root
pub const DATA_DIR: &str = "data";

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Extracting,
    Restructuring,
    Synthesizing,
    Packaging,
}

impl Stage {
    /// Number of stages a conversion runs through
    pub const COUNT: u64 = 5;

    /// Progress message announced when the stage starts
    pub fn message(&self) -> &'static str {
        match self {
            Self::Validating => "Validating DEB package",
            Self::Extracting => "Extracting DEB package",
            Self::Restructuring => "Creating APG structure",
            Self::Synthesizing => "Generating metadata and checksums",
            Self::Packaging => "Creating APG archive",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Extracting => "extracting",
            Self::Restructuring => "restructuring",
            Self::Synthesizing => "synthesizing",
            Self::Packaging => "packaging",
        };
        write!(f, "{}", name)
    }
}

/// What a finished conversion hands back to the caller
#[derive(Debug, Clone, Copy)]
pub struct ConversionReport {
    /// Final archive size in bytes
    pub archive_size: u64,
    /// Number of payload files checksummed
    pub payload_files: usize,
}

/// Drives the conversion pipeline
///
/// Generic over the extractor so the pipeline can be exercised without a
/// real `dpkg-deb` on the system.
pub struct Converter<E> {
    extractor: E,
    staging_parent: Option<PathBuf>,
}

impl<E: PackageExtractor> Converter<E> {
    pub fn new(extractor: E) -> Self {
        Self {
            extractor,
            staging_parent: None,
        }
    }

    /// Allocate staging directories under `dir` instead of the system
    /// temporary directory
    pub fn with_staging_parent(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_parent = Some(dir.into());
        self
    }

    /// Convert the `.deb` at `input` into an APG archive at `output`
    ///
    /// The staging directory is gone by the time this returns, whether the
    /// conversion succeeded or failed.
    pub fn convert(
        &self,
        input: &Path,
        output: &Path,
        progress: &dyn ProgressReporter,
    ) -> Result<ConversionReport> {
        let result = self.run(input, output, progress);

        match &result {
            Ok(report) => progress.finish(&format!(
                "Created {} ({} bytes)",
                output.display(),
                report.archive_size
            )),
            Err(err) => progress.fail(&err.to_string()),
        }

        result
    }

    fn run(
        &self,
        input: &Path,
        output: &Path,
        progress: &dyn ProgressReporter,
    ) -> Result<ConversionReport> {
        progress.step(Stage::Validating.message());
        self.validate(input)?;

        progress.step(Stage::Extracting.message());
        let staging = self.extract(input)?;
        debug!("Staging directory: {}", staging.path().display());

        progress.step(Stage::Restructuring.message());
        let root = layout::restructure(staging.path())?;

        progress.step(Stage::Synthesizing.message());
        let record = metadata::synthesize(&staging.path().join(CONTROL_DIR))?;
        let checksums = checksum::collect(&root.join(DATA_DIR))?;
        let payload_files = checksums.len();

        progress.step(Stage::Packaging.message());
        archive::write_records(&root, &record, &checksums)?;
        let archive_size = archive::pack(&root, output)?;

        info!(
            "Converted {} to {} ({} payload files, {} bytes)",
            input.display(),
            output.display(),
            payload_files,
            archive_size
        );

        Ok(ConversionReport {
            archive_size,
            payload_files,
        })
    }

    /// Check the input path and run the external structural check
    ///
    /// No side effects: nothing has been allocated when this fails.
    fn validate(&self, input: &Path) -> Result<()> {
        if !input.exists() {
            return Err(Error::InvalidInput(format!(
                "{} does not exist",
                input.display()
            )));
        }

        if input.extension().and_then(|e| e.to_str()) != Some("deb") {
            return Err(Error::InvalidInput(format!(
                "{} is not a .deb package",
                input.display()
            )));
        }

        self.extractor.verify(input)
    }

    /// Allocate the staging directory and unpack the package into it
    ///
    /// If unpacking fails, dropping the `TempDir` guard removes the
    /// half-populated tree before the error reaches the caller.
    fn extract(&self, input: &Path) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("debtoapg-");

        let staging = match &self.staging_parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(|e| Error::io("failed to create staging directory", e))?;

        self.extractor.unpack(input, staging.path())?;
        Ok(staging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentProgress;

    /// Extractor that must never be reached
    struct UnreachableExtractor;

    impl PackageExtractor for UnreachableExtractor {
        fn verify(&self, _package: &Path) -> Result<()> {
            panic!("verify must not be called");
        }

        fn unpack(&self, _package: &Path, _dest: &Path) -> Result<()> {
            panic!("unpack must not be called");
        }
    }

    #[test]
    fn test_nonexistent_input_is_invalid() {
        let converter = Converter::new(UnreachableExtractor);
        let out = std::env::temp_dir().join("out.apg");

        let err = converter
            .convert(Path::new("/no/such/file.deb"), &out, &SilentProgress::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_wrong_extension_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("foo.txt");
        std::fs::write(&input, b"not a package").unwrap();

        let converter = Converter::new(UnreachableExtractor);
        let out = dir.path().join("out.apg");

        let err = converter
            .convert(&input, &out, &SilentProgress::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_invalid_input_creates_no_staging() {
        let dir = tempfile::tempdir().unwrap();
        let staging_parent = dir.path().join("staging");
        std::fs::create_dir(&staging_parent).unwrap();

        let converter =
            Converter::new(UnreachableExtractor).with_staging_parent(&staging_parent);
        let out = dir.path().join("out.apg");

        let result = converter.convert(Path::new("/no/such/file.deb"), &out, &SilentProgress::new());
        assert!(result.is_err());
        assert_eq!(std::fs::read_dir(&staging_parent).unwrap().count(), 0);
    }

    #[test]
    fn test_extraction_failure_removes_staging() {
        struct FailingUnpack;

        impl PackageExtractor for FailingUnpack {
            fn verify(&self, _package: &Path) -> Result<()> {
                Ok(())
            }

            fn unpack(&self, _package: &Path, _dest: &Path) -> Result<()> {
                Err(Error::ExtractionFailed("tool exploded".to_string()))
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sample.deb");
        std::fs::write(&input, b"pretend package").unwrap();

        let staging_parent = dir.path().join("staging");
        std::fs::create_dir(&staging_parent).unwrap();

        let converter = Converter::new(FailingUnpack).with_staging_parent(&staging_parent);
        let out = dir.path().join("out.apg");

        let err = converter
            .convert(&input, &out, &SilentProgress::new())
            .unwrap_err();
        assert!(matches!(err, Error::ExtractionFailed(_)));
        assert_eq!(std::fs::read_dir(&staging_parent).unwrap().count(), 0);
    }

    #[test]
    fn test_stage_messages_are_distinct() {
        let stages = [
            Stage::Validating,
            Stage::Extracting,
            Stage::Restructuring,
            Stage::Synthesizing,
            Stage::Packaging,
        ];
        assert_eq!(stages.len() as u64, Stage::COUNT);

        for (i, a) in stages.iter().enumerate() {
            for b in &stages[i + 1..] {
                assert_ne!(a.message(), b.message());
            }
        }
    }
}
