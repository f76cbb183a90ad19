//! Selection-based zip container build and extraction.
//!
//! Two independent halves share nothing but the entry-naming convention:
//!
//! - [`build`]: walk selected entries under a root, write one deflated
//!   container next to them.
//! - [`extract`]: unpack a container into a destination root, then delete
//!   the consumed container file.
//!
//! Both operations are synchronous and blocking; they are meant to run on a
//! request-handling thread serving one caller at a time.

mod builder;
mod extractor;
pub mod naming;

pub use builder::build;
pub use extractor::{extract, extract_batch, list};

/// Container file name suffix: `<root base name>_archive.zip`.
pub const ARCHIVE_SUFFIX: &str = "_archive.zip";

/// Extension a batch-extraction candidate must carry to be opened at all.
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// Streaming copy buffer size, both directions.
pub(crate) const COPY_BUFFER_LEN: usize = 8 * 1024;
