//! Entry naming and path containment helpers.
//!
//! Container entry names are always `/`-separated relative paths, no matter
//! which platform produced or consumes the archive. Everything that turns an
//! entry name back into a filesystem path goes through [`resolve_within`] so
//! that a hostile name cannot escape the destination root.

use std::path::{Component, Path, PathBuf};

use crate::error::ArchiveError;

/// Deterministic container file name for a selection root:
/// the root's base name suffixed with `_archive.zip`.
pub fn archive_file_name(root: &Path) -> String {
    let base = root
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "archive".to_string());
    format!("{}{}", base, super::ARCHIVE_SUFFIX)
}

/// Join a child's base name onto its parent's entry name with a `/`.
pub fn child_entry_name(parent: &str, child: &Path) -> String {
    let mut name = String::from(parent);
    for comp in child.components() {
        name.push('/');
        name.push_str(&comp.as_os_str().to_string_lossy());
    }
    name
}

/// Validate a caller-supplied selection name.
///
/// Selection names are relative paths under the root; empty names, absolute
/// paths, and `..` segments are malformed input, not stale state.
pub fn validate_entry_name(name: &str) -> Result<(), ArchiveError> {
    if name.is_empty() {
        return Err(ArchiveError::InvalidArgument(
            "empty entry name in selection".to_string(),
        ));
    }

    let path = Path::new(name);
    if path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, Component::Prefix(_) | Component::RootDir | Component::ParentDir))
    {
        return Err(ArchiveError::InvalidArgument(format!(
            "entry name must be relative without '..': {name}"
        )));
    }

    Ok(())
}

/// Lexically normalize a path (no filesystem access). `.` segments drop out
/// and `..` pops the previous normal segment, so containment can be checked
/// without resolving symlinks.
fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    let mut rooted = false;

    for comp in path.components() {
        match comp {
            Component::Prefix(p) => {
                out.clear();
                out.push(p.as_os_str());
                rooted = true;
            }
            Component::RootDir => {
                out.push(Component::RootDir.as_os_str());
                rooted = true;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = out
                    .components()
                    .next_back()
                    .is_some_and(|last| matches!(last, Component::Normal(_)));
                if popped {
                    out.pop();
                } else if !rooted {
                    out.push("..");
                }
            }
            Component::Normal(seg) => out.push(seg),
        }
    }

    out
}

/// Resolve a container entry name to a destination path, enforcing that the
/// result stays under `dest_root`. Returns `None` for names that would land
/// outside the destination (absolute names, `..` escapes, drive prefixes).
pub fn resolve_within(dest_root: &Path, entry_name: &str) -> Option<PathBuf> {
    let rel = Path::new(entry_name);
    if rel.as_os_str().is_empty()
        || rel
            .components()
            .any(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
    {
        return None;
    }

    let candidate = normalize_lexical(&dest_root.join(rel));
    let root = normalize_lexical(dest_root);
    candidate.strip_prefix(&root).ok()?;
    Some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_file_name() {
        assert_eq!(archive_file_name(Path::new("/srv/world")), "world_archive.zip");
        assert_eq!(archive_file_name(Path::new("plugins")), "plugins_archive.zip");
    }

    #[test]
    fn test_child_entry_name_uses_forward_slashes() {
        assert_eq!(
            child_entry_name("dirA", Path::new("dirB").join("file.txt").as_path()),
            "dirA/dirB/file.txt"
        );
        assert_eq!(child_entry_name("logs", Path::new("latest.log")), "logs/latest.log");
    }

    #[test]
    fn test_validate_entry_name() {
        assert!(validate_entry_name("config/server.properties").is_ok());
        assert!(validate_entry_name("file.txt").is_ok());
        assert!(validate_entry_name("").is_err());
        assert!(validate_entry_name("/etc/passwd").is_err());
        assert!(validate_entry_name("../sibling").is_err());
        assert!(validate_entry_name("ok/../../escape").is_err());
    }

    #[test]
    fn test_normalize_lexical() {
        assert_eq!(normalize_lexical(Path::new("/a/b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize_lexical(Path::new("/a/./b")), PathBuf::from("/a/b"));
        assert_eq!(normalize_lexical(Path::new("../x")), PathBuf::from("../x"));
        assert_eq!(normalize_lexical(Path::new("/a/../../b")), PathBuf::from("/b"));
    }

    #[test]
    fn test_resolve_within_accepts_nested_names() {
        let dest = Path::new("/srv/world");
        assert_eq!(
            resolve_within(dest, "region/r.0.0.mca"),
            Some(PathBuf::from("/srv/world/region/r.0.0.mca"))
        );
    }

    #[test]
    fn test_resolve_within_rejects_escapes() {
        let dest = Path::new("/srv/world");
        assert_eq!(resolve_within(dest, "../evil.txt"), None);
        assert_eq!(resolve_within(dest, "a/../../evil.txt"), None);
        assert_eq!(resolve_within(dest, "/abs/evil.txt"), None);
        assert_eq!(resolve_within(dest, ""), None);
    }

    #[test]
    fn test_resolve_within_normalizes_inner_dots() {
        let dest = Path::new("/srv/world");
        assert_eq!(
            resolve_within(dest, "a/./b/../c.txt"),
            Some(PathBuf::from("/srv/world/a/c.txt"))
        );
    }
}
