// src/convert/archive.rs

//! APG packaging
//!
//! Serializes the metadata and checksum records next to `data/`, then
//! streams the whole archive root into a single xz-compressed tarball.
//! Paths inside the tarball are relative to the archive root, not to the
//! staging directory.

use super::checksum::ChecksumMap;
use super::metadata::PackageMetadata;
use crate::error::{Error, Result};
use std::fs::{self, File};
use std::path::Path;
use tar::Builder as TarBuilder;
use tracing::debug;
use xz2::write::XzEncoder;

/// File name of the serialized metadata record
pub const METADATA_FILE: &str = "metadata.json";

/// File name of the serialized checksum map
pub const CHECKSUMS_FILE: &str = "checksums.json";

// xz default preset
const XZ_LEVEL: u32 = 6;

/// Write `metadata.json` and `checksums.json` at the archive root
pub fn write_records(
    root: &Path,
    metadata: &PackageMetadata,
    checksums: &ChecksumMap,
) -> Result<()> {
    let metadata_json = serde_json::to_string_pretty(metadata).map_err(|e| Error::Serialize {
        what: "metadata record",
        source: e,
    })?;
    fs::write(root.join(METADATA_FILE), metadata_json)
        .map_err(|e| Error::io("failed to write metadata record", e))?;

    let checksums_json = serde_json::to_string_pretty(checksums).map_err(|e| Error::Serialize {
        what: "checksum map",
        source: e,
    })?;
    fs::write(root.join(CHECKSUMS_FILE), checksums_json)
        .map_err(|e| Error::io("failed to write checksum map", e))?;

    Ok(())
}

/// Stream the archive root into a tar.xz at `output`
///
/// Returns the final archive size in bytes.
pub fn pack(root: &Path, output: &Path) -> Result<u64> {
    let file = File::create(output)
        .map_err(|e| Error::io(format!("failed to create {}", output.display()), e))?;
    let encoder = XzEncoder::new(file, XZ_LEVEL);
    let mut builder = TarBuilder::new(encoder);

    let entries =
        fs::read_dir(root).map_err(|e| Error::io(format!("failed to read {}", root.display()), e))?;

    for entry in entries {
        let entry =
            entry.map_err(|e| Error::io(format!("failed to read {}", root.display()), e))?;
        let path = entry.path();
        let name = entry.file_name();
        debug!("Archiving {}", path.display());

        if path.is_dir() {
            builder
                .append_dir_all(&name, &path)
                .map_err(|e| Error::io(format!("failed to archive {}", path.display()), e))?;
        } else {
            builder
                .append_path_with_name(&path, &name)
                .map_err(|e| Error::io(format!("failed to archive {}", path.display()), e))?;
        }
    }

    let encoder = builder
        .into_inner()
        .map_err(|e| Error::io("failed to finish tar stream", e))?;
    encoder
        .finish()
        .map_err(|e| Error::io("failed to finish xz stream", e))?;

    let size = fs::metadata(output)
        .map_err(|e| Error::io(format!("failed to stat {}", output.display()), e))?
        .len();
    Ok(size)
}
