//! Selection-based zip archiving for server-side file managers
//!
//! A file-manager backend lets a user select files and folders inside a
//! managed directory, bundle them into a zip archive, and later unpack such
//! archives in place. This crate is that archive subsystem: the transport
//! layer (HTTP routes, request parsing) stays outside and only hands in
//! paths and relative entry names.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use zippack::{build, extract_batch};
//!
//! fn main() -> Result<(), zippack::ArchiveError> {
//!     // Bundle two selected entries; produces "world_archive.zip" in the root.
//!     let root = Path::new("/srv/world");
//!     let name = build(root, &["level.dat".to_string(), "region".to_string()])?;
//!     println!("created {name}");
//!
//!     // Unpack it again; non-.zip names in the batch are skipped silently.
//!     extract_batch(root, &[name])?;
//!     Ok(())
//! }
//! ```
//!
//! # Guarantees
//!
//! - Entry names inside a container always use `/` separators.
//! - Round trip is lossless: building a tree and extracting the result into a
//!   fresh directory reproduces relative names and byte contents exactly.
//! - Extraction refuses entries whose resolved path would escape the
//!   destination root.
//! - A failed build leaves no partial archive; the container is staged in a
//!   temp file and renamed into place on success.

pub mod archive;
pub mod error;
pub mod output;

pub use archive::{ARCHIVE_EXTENSION, ARCHIVE_SUFFIX, build, extract, extract_batch, list};
pub use error::ArchiveError;
