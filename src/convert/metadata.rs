// src/convert/metadata.rs

//! Metadata record synthesis
//!
//! Builds the `metadata.json` record from the Debian control files plus
//! fixed converter stamp fields. A control-derived field is present only
//! if the file existed in the source package; its text is carried over
//! verbatim.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Control files copied into the metadata record, in the order they are
/// checked
pub const CONTROL_FILES: [&str; 7] = [
    "control", "preinst", "postinst", "prerm", "postrm", "triggers", "conffiles",
];

/// Converter identity stamped into every record
pub const CONVERTER_NAME: &str = "debtoapg";

/// Author stamped into every record
pub const CONVERTER_AUTHOR: &str = "AnmiTaliDev";

/// The APG metadata record
///
/// Serialized as a flat JSON object: the stamp fields plus one string
/// field per control file that existed in the source package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMetadata {
    /// Conversion timestamp (UTC, ISO-8601)
    pub created: DateTime<Utc>,
    /// Converter identity
    pub converter: String,
    /// Converter version
    pub converter_version: String,
    /// Converter author
    pub author: String,
    /// Verbatim control-file contents, keyed by file name
    #[serde(flatten)]
    pub control_files: BTreeMap<String, String>,
}

/// Build the metadata record from the control subtree
pub fn synthesize(control_dir: &Path) -> Result<PackageMetadata> {
    let mut control_files = BTreeMap::new();

    for name in CONTROL_FILES {
        let path = control_dir.join(name);
        if !path.exists() {
            continue;
        }

        let text = fs::read_to_string(&path)
            .map_err(|e| Error::io(format!("failed to read control file {}", path.display()), e))?;
        debug!("Captured control file {}", name);
        control_files.insert(name.to_string(), text);
    }

    Ok(PackageMetadata {
        created: Utc::now(),
        converter: CONVERTER_NAME.to_string(),
        converter_version: env!("CARGO_PKG_VERSION").to_string(),
        author: CONVERTER_AUTHOR.to_string(),
        control_files,
    })
}
