// src/convert/checksum.rs

//! Payload checksum pass
//!
//! Walks the `data/` tree and records a SHA-256 digest for every regular
//! file, keyed by its forward-slash path relative to `data/`. Directories
//! get no entry. Symlinks that resolve to files are hashed once, under
//! their own relative path.

use crate::error::{Error, Result};
use crate::hash;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Map of payload-relative path to hex SHA-256 digest
pub type ChecksumMap = BTreeMap<String, String>;

/// Compute digests for every file under `data_dir`
pub fn collect(data_dir: &Path) -> Result<ChecksumMap> {
    let mut checksums = ChecksumMap::new();

    for entry in WalkDir::new(data_dir) {
        let entry = entry.map_err(|e| {
            let context = format!("failed to walk {}", data_dir.display());
            match e.into_io_error() {
                Some(source) => Error::io(context, source),
                None => Error::io(context, io::Error::other("filesystem loop")),
            }
        })?;

        if !is_payload_file(&entry) {
            continue;
        }

        let key = relative_key(entry.path(), data_dir);
        let digest = hash::sha256_file(entry.path())
            .map_err(|e| Error::io(format!("failed to hash {}", entry.path().display()), e))?;
        debug!("{} {}", digest, key);
        checksums.insert(key, digest);
    }

    Ok(checksums)
}

/// Regular files, plus symlinks whose target is a file
fn is_payload_file(entry: &walkdir::DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    entry.path_is_symlink() && entry.path().is_file()
}

/// Forward-slash path of `path` relative to `base`
fn relative_key(path: &Path, base: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(base: &Path, rel: &str, bytes: &[u8]) {
        let path = base.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_single_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "usr/bin/x", b"hello world");

        let checksums = collect(dir.path()).unwrap();
        assert_eq!(checksums.len(), 1);
        assert_eq!(
            checksums.get("usr/bin/x").map(String::as_str),
            Some("b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9")
        );
    }

    #[test]
    fn test_every_file_exactly_once_no_directories() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "usr/bin/tool", b"a");
        write(dir.path(), "usr/share/doc/README", b"b");
        write(dir.path(), "etc/tool.conf", b"c");
        fs::create_dir_all(dir.path().join("var/empty")).unwrap();

        let checksums = collect(dir.path()).unwrap();

        let mut keys: Vec<_> = checksums.keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["etc/tool.conf", "usr/bin/tool", "usr/share/doc/README"]
        );
    }

    #[test]
    fn test_digest_matches_file_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = vec![0x5au8; 100_000];
        write(dir.path(), "opt/blob.bin", &bytes);

        let checksums = collect(dir.path()).unwrap();
        assert_eq!(
            checksums.get("opt/blob.bin").map(String::as_str),
            Some(hash::sha256(&bytes).as_str())
        );
    }

    #[test]
    fn test_empty_tree_gives_empty_map() {
        let dir = tempfile::tempdir().unwrap();
        let checksums = collect(dir.path()).unwrap();
        assert!(checksums.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_file_is_hashed_once() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "usr/bin/real", b"binary");
        std::os::unix::fs::symlink(
            dir.path().join("usr/bin/real"),
            dir.path().join("usr/bin/alias"),
        )
        .unwrap();

        let checksums = collect(dir.path()).unwrap();
        assert_eq!(checksums.len(), 2);
        assert_eq!(
            checksums.get("usr/bin/alias"),
            checksums.get("usr/bin/real")
        );
    }

    #[test]
    fn test_relative_key_uses_forward_slashes() {
        let base = Path::new("/tmp/stage/data");
        let key = relative_key(&base.join("usr").join("bin").join("x"), base);
        assert_eq!(key, "usr/bin/x");
    }
}
