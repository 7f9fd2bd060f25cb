//! Read-only markdown store for omn.
//!
//! The [`Storage`] trait exposes just what the site needs from a docs tree:
//! directory listings, file reads, modification times and glob matching.
//!
//! - [`FsStorage`] reads a directory on the local filesystem
//! - [`MockStorage`] keeps everything in memory (behind the `mock` feature)
//!
//! All paths passed to a storage are slash-separated and relative to its root.
//! The empty string names the root itself.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use omn_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("docs"));
//! for entry in storage.list("frontend")? {
//!     println!("{} {:?}", entry.name, entry.kind);
//! }
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Entry, EntryKind, Storage, StorageError, StorageErrorKind, is_hidden};
