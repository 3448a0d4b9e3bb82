//! Content-hash deduplication for image datasets
//!
//! Duplicates are detected on full file content, so only byte-identical
//! copies match; re-encoded or resized variants do not.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use md5::{Digest, Md5};

type ContentHash = [u8; 16];

fn file_digest(path: &Path) -> std::io::Result<ContentHash> {
    let bytes = fs::read(path)?;
    let mut hasher = Md5::new();
    hasher.update(&bytes);
    Ok(hasher.finalize().into())
}

/// Report every path in `candidates` whose content already appeared earlier
/// in `candidates`. The first occurrence is kept, later copies are returned
/// in input order.
pub fn find_duplicates<P: AsRef<Path>>(candidates: &[P]) -> Vec<PathBuf> {
    find_duplicates_against::<P, &Path>(candidates, &[])
}

/// Like [`find_duplicates`], but content already present in `reference`
/// also marks a candidate as duplicate.
///
/// Files that cannot be read are skipped: they contribute nothing to the
/// reference set and never appear in the result.
pub fn find_duplicates_against<P, Q>(candidates: &[P], reference: &[Q]) -> Vec<PathBuf>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let mut seen: HashSet<ContentHash> = HashSet::new();

    for path in reference {
        let path = path.as_ref();
        match file_digest(path) {
            Ok(digest) => {
                seen.insert(digest);
            }
            Err(e) => log::warn!("skipping unreadable reference file {}: {e}", path.display()),
        }
    }

    let mut duplicates = Vec::new();
    for path in candidates {
        let path = path.as_ref();
        match file_digest(path) {
            Ok(digest) => {
                if !seen.insert(digest) {
                    duplicates.push(path.to_path_buf());
                }
            }
            Err(e) => log::warn!("skipping unreadable file {}: {e}", path.display()),
        }
    }
    duplicates
}
