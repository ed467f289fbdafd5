//! Quicknotes Core Library
//!
//! This crate provides the core functionality for Quicknotes, a small
//! note-taking service: an ordered collection of short text notes with
//! integer ids, kept in memory and mirrored to a JSON snapshot file.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut store = NoteStore::open_with_config(&config);
//!
//! let note = store.add(Some("Groceries"), Some("Milk, eggs"))?;
//! let notes = store.list();
//! ```
//!
//! # Modules
//!
//! - `store`: The note collection manager (main entry point)
//! - `models`: The `Note` record and request payloads
//! - `error`: Validation and not-found errors
//! - `storage`: Snapshot persistence
//! - `config`: Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod store;

pub use config::Config;
pub use error::{NoteError, NoteResult, ValidationError};
pub use models::{Note, NoteChanges, NewNote, TIMESTAMP_FORMAT};
pub use storage::{SnapshotPersistence, StorageError, StorageResult};
pub use store::{NoteStore, PersistenceStatus};
