// src/convert/layout.rs

//! Staging-tree restructuring
//!
//! Reshapes the extracted tree into the APG layout: an `apg/` root with
//! the payload moved under `apg/data/`. The `DEBIAN/` subtree stays at the
//! staging root, still addressable for metadata synthesis but outside the
//! tree that gets packaged.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{ARCHIVE_ROOT, CONTROL_DIR, DATA_DIR};

/// Create the APG layout under `staging` and move the payload into `data/`
///
/// Every top-level staging entry except the control subtree and the
/// archive root itself is treated as payload. The entries are moved, not
/// copied. Runs exactly once per job; re-invocation is not supported.
pub fn restructure(staging: &Path) -> Result<PathBuf> {
    let root = staging.join(ARCHIVE_ROOT);
    let data = root.join(DATA_DIR);
    fs::create_dir_all(&data)
        .map_err(|e| Error::io(format!("failed to create {}", data.display()), e))?;

    let entries = fs::read_dir(staging)
        .map_err(|e| Error::io(format!("failed to read {}", staging.display()), e))?;

    for entry in entries {
        let entry =
            entry.map_err(|e| Error::io(format!("failed to read {}", staging.display()), e))?;
        let name = entry.file_name();
        if name == CONTROL_DIR || name == ARCHIVE_ROOT {
            continue;
        }

        let dest = data.join(&name);
        debug!(
            "Moving {} to {}",
            entry.path().display(),
            dest.display()
        );
        fs::rename(entry.path(), &dest).map_err(|e| {
            Error::io(format!("failed to move {} into data", entry.path().display()), e)
        })?;
    }

    Ok(root)
}
