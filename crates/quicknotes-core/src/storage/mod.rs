//! Storage layer
//!
//! Best-effort persistence of the note sequence to a single JSON snapshot
//! file, rewritten wholesale after every change and read once at start-up.

pub mod error;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use persistence::SnapshotPersistence;
