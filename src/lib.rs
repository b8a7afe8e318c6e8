// src/lib.rs

//! debtoapg
//!
//! Converts Debian (`.deb`) packages into APG archives: a tar.xz container
//! whose root holds the package payload under `data/`, a `metadata.json`
//! record synthesized from the Debian control files, and a
//! `checksums.json` map with a SHA-256 digest for every payload file.
//!
//! # Architecture
//!
//! - Extraction is delegated to `dpkg-deb` behind a narrow trait; the
//!   pipeline itself only validates, restructures, synthesizes records,
//!   and packages
//! - Each conversion owns a uniquely-named temporary staging directory,
//!   removed on every exit path
//! - Progress is a job-local reporter value, never process-wide state

pub mod convert;
pub mod dpkg;
mod error;
pub mod hash;
pub mod progress;

pub use convert::{ConversionReport, Converter, PackageMetadata, Stage};
pub use dpkg::{DpkgDeb, PackageExtractor, is_dpkg_deb_available};
pub use error::{Error, Result};
pub use progress::{CliProgress, LogProgress, ProgressReporter, SilentProgress};
