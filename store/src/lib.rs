//! Keyed JSON-array file stores.
//!
//! Each store is bound to one file holding a single JSON array. Every
//! element is an object with a designated key field; the store supports
//! append, lookup and erase by that key, plus a SHA-256 fingerprint of the
//! raw file bytes so callers can assert that a failed operation left the
//! file untouched.
//!
//! ## File format
//!
//! ```text
//! [
//!   { "<key field>": "...", ... },
//!   ...
//! ]
//! ```
//!
//! An absent or empty file reads as an empty array. A file with any other
//! content that does not decode is an integrity failure, reported on every
//! read as [`StoreError::Decode`].
//!
//! Handles hold no in-memory copy: every operation re-reads the file, so
//! two handles bound to the same path always agree. There is no file
//! locking; concurrent processes sharing a file are not supported.

mod error;
mod fingerprint;
mod json_store;

pub use error::StoreError;
pub use fingerprint::{EMPTY_FINGERPRINT, fingerprint_bytes, fingerprint_file};
pub use json_store::{KeyedJsonStore, KeyedRecord};

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
