//! Archive extractor.
//!
//! Opens one container, materializes its entries under a destination root in
//! stored order, and removes the consumed container file. Entry names are
//! resolved through [`naming::resolve_within`]; a name that would land outside
//! the destination fails the extraction instead of being written.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use zip::ZipArchive;

use super::{ARCHIVE_EXTENSION, COPY_BUFFER_LEN, naming};
use crate::error::ArchiveError;

/// Extract one container into `dest_root`, then delete the container.
///
/// Entries are written in stored order. Directory entries are created
/// idempotently; file entries overwrite whatever is already at their
/// destination. A mid-extraction failure leaves already-written entries on
/// disk. Concurrent extractions of the same container must be serialized by
/// the caller.
pub fn extract(container: &Path, dest_root: &Path) -> Result<(), ArchiveError> {
    if !dest_root.is_dir() {
        return Err(ArchiveError::not_found(dest_root));
    }

    let file = File::open(container).map_err(|e| ArchiveError::corrupt(container, e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| ArchiveError::corrupt(container, e))?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| ArchiveError::corrupt(container, e))?;
        let name = entry.name().to_owned();

        let Some(out_path) = naming::resolve_within(dest_root, &name) else {
            return Err(ArchiveError::corrupt(
                container,
                format!("entry escapes destination: {name}"),
            ));
        };

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = File::create(&out_path)?;
        let mut buf = [0u8; COPY_BUFFER_LEN];
        loop {
            // A read failure here is an unreadable payload (corrupt data);
            // a write failure is ordinary destination IO.
            let n = entry
                .read(&mut buf)
                .map_err(|e| ArchiveError::corrupt(container, format!("entry {name}: {e}")))?;
            if n == 0 {
                break;
            }
            out.write_all(&buf[..n])?;
        }
    }

    drop(archive);
    fs::remove_file(container)?;
    Ok(())
}

/// Route-style batch extraction: for each name under `root`, silently skip
/// anything that is missing or does not end in `.zip`, extract the rest into
/// `root` itself. Returns how many containers were actually consumed.
pub fn extract_batch(root: &Path, names: &[String]) -> Result<usize, ArchiveError> {
    if !root.is_dir() {
        return Err(ArchiveError::not_found(root));
    }

    let mut extracted = 0;
    for name in names {
        if !name.ends_with(ARCHIVE_EXTENSION) {
            continue;
        }
        let container = root.join(name);
        if !container.is_file() {
            continue;
        }
        extract(&container, root)?;
        extracted += 1;
    }

    Ok(extracted)
}

/// List entry names in stored order without extracting anything.
pub fn list(container: &Path) -> Result<Vec<String>, ArchiveError> {
    let file = File::open(container).map_err(|e| ArchiveError::corrupt(container, e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| ArchiveError::corrupt(container, e))?;

    let mut names = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive
            .by_index_raw(index)
            .map_err(|e| ArchiveError::corrupt(container, e))?;
        names.push(entry.name().to_owned());
    }
    Ok(names)
}
