//! Archive builder.
//!
//! Walks a caller-selected set of entries under a root directory and writes a
//! single deflate-compressed zip container next to them. The container is
//! staged through a temp file in the root and only renamed into place once
//! every entry has been written, so a failed build never leaves a partial
//! archive behind.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{Read, Seek, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::result::ZipError;
use zip::write::{SimpleFileOptions, ZipWriter};

use super::{COPY_BUFFER_LEN, naming};
use crate::error::ArchiveError;

/// Build a container from `entries` (relative names under `root`).
///
/// Selected entries that no longer exist are skipped, not errors: the caller's
/// selection may be stale. Directories are walked iteratively and every
/// descendant file becomes its own entry, named with `/`-joined relative
/// paths. Returns the archive file name, `<root base name>_archive.zip`,
/// written inside `root`.
///
/// Concurrent builds targeting the same root must be serialized by the caller;
/// no locking is performed here.
pub fn build(root: &Path, entries: &[String]) -> Result<String, ArchiveError> {
    if !root.is_dir() {
        return Err(ArchiveError::not_found(root));
    }
    if entries.is_empty() {
        return Err(ArchiveError::InvalidArgument(
            "no entries selected".to_string(),
        ));
    }
    for name in entries {
        naming::validate_entry_name(name)?;
    }

    let archive_name = naming::archive_file_name(root);

    // Stage in the same directory so the final rename stays on one filesystem.
    let staged = NamedTempFile::with_prefix_in(".zippack-", root)?;
    let mut writer = ZipWriter::new(staged);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    // Duplicate selections are wasteful, not erroneous: only the first
    // occurrence of an entry name is written.
    let mut written: HashSet<String> = HashSet::new();

    for name in entries {
        let source = root.join(name);
        let meta = match fs::metadata(&source) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e.into()),
        };

        if meta.is_dir() {
            append_tree(&mut writer, &source, name, options, &mut written)?;
        } else {
            append_file(&mut writer, &source, name, options, &mut written)?;
        }
    }

    let staged = writer.finish().map_err(zip_write_err)?;
    staged
        .persist(root.join(&archive_name))
        .map_err(|e| ArchiveError::Io(e.error))?;

    Ok(archive_name)
}

/// Append one regular file as a deflated entry, streaming its bytes through a
/// bounded buffer. Names already written are skipped.
fn append_file<W: Write + Seek>(
    writer: &mut ZipWriter<W>,
    source: &Path,
    entry_name: &str,
    options: SimpleFileOptions,
    written: &mut HashSet<String>,
) -> Result<(), ArchiveError> {
    if !written.insert(entry_name.to_string()) {
        return Ok(());
    }

    let mut input = File::open(source)?;
    writer.start_file(entry_name, options).map_err(zip_write_err)?;

    let mut buf = [0u8; COPY_BUFFER_LEN];
    loop {
        let n = input.read(&mut buf)?;
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n])?;
    }

    Ok(())
}

/// Append a directory tree. Every directory gets an explicit trailing-slash
/// entry (empty directories survive a round trip) and every file under it a
/// deflated entry named `parent/child/...`.
fn append_tree<W: Write + Seek>(
    writer: &mut ZipWriter<W>,
    source: &Path,
    entry_name: &str,
    options: SimpleFileOptions,
    written: &mut HashSet<String>,
) -> Result<(), ArchiveError> {
    append_directory(writer, entry_name, options, written)?;

    for step in WalkDir::new(source)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = step.map_err(walk_err)?;
        let rel = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| ArchiveError::Io(std::io::Error::other("walk left the selection root")))?;
        let child_name = naming::child_entry_name(entry_name, rel);

        if entry.file_type().is_dir() {
            append_directory(writer, &child_name, options, written)?;
        } else {
            append_file(writer, entry.path(), &child_name, options, written)?;
        }
    }

    Ok(())
}

/// Record a directory entry unless its name was already written.
fn append_directory<W: Write + Seek>(
    writer: &mut ZipWriter<W>,
    entry_name: &str,
    options: SimpleFileOptions,
    written: &mut HashSet<String>,
) -> Result<(), ArchiveError> {
    if !written.insert(entry_name.to_string()) {
        return Ok(());
    }
    writer.add_directory(entry_name, options).map_err(zip_write_err)
}

fn zip_write_err(e: ZipError) -> ArchiveError {
    match e {
        ZipError::Io(io) => ArchiveError::Io(io),
        other => ArchiveError::Io(std::io::Error::other(other)),
    }
}

fn walk_err(e: walkdir::Error) -> ArchiveError {
    let msg = e.to_string();
    ArchiveError::Io(
        e.into_io_error()
            .unwrap_or_else(|| std::io::Error::other(msg)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive;
    use tempfile::tempdir;

    fn entry_names(archive_path: &Path) -> Vec<String> {
        archive::list(archive_path).unwrap()
    }

    #[test]
    fn test_empty_selection_is_rejected_and_writes_nothing() {
        let temp = tempdir().unwrap();

        let err = build(temp.path(), &[]).unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidArgument(_)));

        // No archive and no leftover staging file.
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_root_is_rejected() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("gone");

        let err = build(&missing, &["x".to_string()]).unwrap_err();
        assert!(matches!(err, ArchiveError::NotFound { .. }));
    }

    #[test]
    fn test_malformed_entry_name_is_rejected_and_writes_nothing() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("ok.txt"), "ok").unwrap();

        let err = build(temp.path(), &["../escape".to_string()]).unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidArgument(_)));
        assert!(!temp.path().join(naming::archive_file_name(temp.path())).exists());
    }

    #[test]
    fn test_stale_entries_are_skipped() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("exists.txt"), "still here").unwrap();

        let name = build(
            temp.path(),
            &["exists.txt".to_string(), "missing.txt".to_string()],
        )
        .unwrap();

        let names = entry_names(&temp.path().join(&name));
        assert_eq!(names, vec!["exists.txt".to_string()]);
    }

    #[test]
    fn test_archive_name_derives_from_root_base_name() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("world");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("level.dat"), "data").unwrap();

        let name = build(&root, &["level.dat".to_string()]).unwrap();
        assert_eq!(name, "world_archive.zip");
        assert!(root.join("world_archive.zip").exists());
    }

    #[test]
    fn test_nested_directory_entry_names() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("dirA/dirB")).unwrap();
        fs::write(temp.path().join("dirA/dirB/file.txt"), "nested").unwrap();

        let name = build(temp.path(), &["dirA".to_string()]).unwrap();
        let names = entry_names(&temp.path().join(&name));

        assert!(names.contains(&"dirA/dirB/file.txt".to_string()));
        // Directory records carry a trailing slash.
        assert!(names.contains(&"dirA/".to_string()));
        assert!(names.contains(&"dirA/dirB/".to_string()));
    }

    #[test]
    fn test_duplicate_selection_is_wasteful_not_erroneous() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();

        let name = build(
            temp.path(),
            &["a.txt".to_string(), "a.txt".to_string()],
        )
        .unwrap();

        // Only the first occurrence lands in the container.
        let names = entry_names(&temp.path().join(&name));
        assert_eq!(names, vec!["a.txt".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_build_leaves_no_archive_or_staging_file() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("data")).unwrap();
        fs::write(temp.path().join("data/ok.txt"), "ok").unwrap();
        // A dangling symlink makes the walk fail partway through the tree.
        std::os::unix::fs::symlink("no-such-target", temp.path().join("data/dangling")).unwrap();

        let err = build(temp.path(), &["data".to_string()]).unwrap_err();
        assert!(matches!(err, ArchiveError::Io(_)));

        // No archive appears and the staging temp file is cleaned up.
        let leftovers: Vec<String> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|n| n != "data")
            .collect();
        assert!(leftovers.is_empty(), "unexpected leftovers: {leftovers:?}");
    }

    #[test]
    fn test_duplicate_directory_selection_is_tolerated() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("logs")).unwrap();
        fs::write(temp.path().join("logs/latest.log"), "[INFO] up").unwrap();

        let name = build(
            temp.path(),
            &["logs".to_string(), "logs".to_string()],
        )
        .unwrap();

        let names = entry_names(&temp.path().join(&name));
        assert_eq!(
            names,
            vec!["logs/".to_string(), "logs/latest.log".to_string()]
        );
    }
}
