//! Note collection manager
//!
//! The `NoteStore` owns the authoritative, ordered list of notes, assigns ids,
//! validates input and keeps the snapshot file up to date.
//!
//! ## Persistence
//!
//! Every successful add, update or delete rewrites the snapshot. Saving is
//! best-effort: a failure is logged and recorded in `PersistenceStatus` but
//! never undoes the in-memory change and never reaches the caller.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = NoteStore::open(SnapshotPersistence::new("notes_data.json"));
//!
//! let note = store.add(Some("Groceries"), Some("Milk, eggs"))?;
//! store.update(note.id, None, Some("Milk, eggs, bread"))?;
//! store.delete(note.id)?;
//! ```

use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{NoteError, NoteResult, ValidationError};
use crate::models::{local_now, Note};
use crate::storage::SnapshotPersistence;

/// Source of note timestamps
pub type Clock = Box<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Outcome of the most recent snapshot read or write
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistenceStatus {
    /// Snapshot file, if the store is file-backed
    pub snapshot_path: Option<PathBuf>,
    /// Message of the last failed load or save; cleared by the next successful save
    pub last_error: Option<String>,
    /// When the snapshot was last written successfully
    pub last_saved: Option<NaiveDateTime>,
}

impl PersistenceStatus {
    pub fn is_healthy(&self) -> bool {
        self.last_error.is_none()
    }
}

/// In-memory note collection with best-effort snapshot persistence
pub struct NoteStore {
    notes: Vec<Note>,
    next_id: u64,
    persistence: Option<SnapshotPersistence>,
    status: PersistenceStatus,
    clock: Clock,
}

impl NoteStore {
    /// Create an empty store that is never written to disk
    pub fn in_memory() -> Self {
        Self {
            notes: Vec::new(),
            next_id: 1,
            persistence: None,
            status: PersistenceStatus::default(),
            clock: Box::new(local_now),
        }
    }

    /// Open a file-backed store, hydrating it from the snapshot if possible
    ///
    /// A missing, unreadable or unparseable snapshot yields an empty store.
    pub fn open(persistence: SnapshotPersistence) -> Self {
        let mut store = Self::in_memory();
        store.status.snapshot_path = Some(persistence.path().to_path_buf());

        match persistence.load() {
            Ok(Some(notes)) => {
                if let Err(e) = store.hydrate(notes) {
                    warn!(error = %e, "Ignoring unusable snapshot, starting empty");
                    store.status.last_error = Some(e.to_string());
                }
            }
            Ok(None) => {
                debug!(path = %persistence.path().display(), "No snapshot found, starting empty");
            }
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable snapshot, starting empty");
                store.status.last_error = Some(e.to_string());
            }
        }

        store.persistence = Some(persistence);
        store
    }

    /// Open the store at the configured snapshot path
    pub fn open_with_config(config: &Config) -> Self {
        Self::open(SnapshotPersistence::from_config(config))
    }

    /// Replace the timestamp source
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> NaiveDateTime + Send + Sync + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    fn hydrate(&mut self, notes: Vec<Note>) -> NoteResult<()> {
        self.next_id = match notes.iter().map(|n| n.id).max() {
            Some(max) => max.checked_add(1).ok_or(NoteError::IdsExhausted)?,
            None => 1,
        };
        self.notes = notes;
        info!(
            count = self.notes.len(),
            next_id = self.next_id,
            "Restored notes from snapshot"
        );
        Ok(())
    }

    // ==================== Queries ====================

    /// All notes in insertion order
    pub fn list(&self) -> &[Note] {
        &self.notes
    }

    /// Id the next created note will receive
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn persistence_status(&self) -> &PersistenceStatus {
        &self.status
    }

    // ==================== Mutations ====================

    /// Create a note
    ///
    /// Both fields must be present and non-blank after trimming.
    pub fn add(&mut self, title: Option<&str>, content: Option<&str>) -> NoteResult<Note> {
        let (Some(title), Some(content)) = (title, content) else {
            return Err(ValidationError::MissingFields.into());
        };

        let (Some(title), Some(content)) = (non_blank(title), non_blank(content)) else {
            return Err(ValidationError::EmptyFields.into());
        };

        let following = self.next_id.checked_add(1).ok_or(NoteError::IdsExhausted)?;
        let note = Note::new(self.next_id, title, content, (self.clock)());
        self.next_id = following;
        self.notes.push(note.clone());

        info!(id = note.id, "Created note");
        self.persist();
        Ok(note)
    }

    /// Change a note's title and/or content
    ///
    /// Fields that are absent or blank are left as they are. The timestamp is
    /// refreshed whenever the note exists, even if nothing else changed.
    pub fn update(
        &mut self,
        id: u64,
        title: Option<&str>,
        content: Option<&str>,
    ) -> NoteResult<Note> {
        let now = (self.clock)();
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(NoteError::NotFound { id })?;

        if let Some(title) = title.and_then(non_blank) {
            note.title = title.to_string();
        }
        if let Some(content) = content.and_then(non_blank) {
            note.content = content.to_string();
        }
        note.timestamp = now;

        let updated = note.clone();
        info!(id, "Updated note");
        self.persist();
        Ok(updated)
    }

    /// Remove a note, returning it as it was
    pub fn delete(&mut self, id: u64) -> NoteResult<Note> {
        let index = self
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or(NoteError::NotFound { id })?;

        let removed = self.notes.remove(index);
        info!(id, "Deleted note");
        self.persist();
        Ok(removed)
    }

    /// Write the snapshot, recording rather than returning any failure
    fn persist(&mut self) {
        let Some(persistence) = self.persistence.as_ref() else {
            return;
        };

        match persistence.save(&self.notes) {
            Ok(()) => {
                self.status.last_error = None;
                self.status.last_saved = Some((self.clock)());
            }
            Err(e) => {
                warn!(
                    error = %e,
                    recoverable = e.is_recoverable(),
                    suggestion = e.recovery_suggestion().unwrap_or(""),
                    "Failed to save notes snapshot; keeping in-memory state"
                );
                self.status.last_error = Some(e.to_string());
            }
        }
    }
}

impl Default for NoteStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Trimmed value, or `None` if nothing but whitespace
fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use std::fs;
    use std::sync::atomic::{AtomicI64, Ordering};
    use tempfile::TempDir;

    /// Clock that advances one second per reading
    fn ticking_clock() -> impl Fn() -> NaiveDateTime + Send + Sync + 'static {
        let ticks = AtomicI64::new(0);
        let base = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        move || base + Duration::seconds(ticks.fetch_add(1, Ordering::SeqCst))
    }

    fn test_store() -> NoteStore {
        NoteStore::in_memory().with_clock(ticking_clock())
    }

    fn file_store(temp_dir: &TempDir) -> NoteStore {
        NoteStore::open(SnapshotPersistence::new(
            temp_dir.path().join("notes_data.json"),
        ))
        .with_clock(ticking_clock())
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = NoteStore::in_memory();
        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1);
        assert!(store.persistence_status().snapshot_path.is_none());
    }

    #[test]
    fn test_add_assigns_increasing_ids() {
        let mut store = test_store();

        let ids: Vec<u64> = (0..5)
            .map(|i| {
                store
                    .add(Some(&format!("title {}", i)), Some("body"))
                    .unwrap()
                    .id
            })
            .collect();

        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(store.next_id(), 6);
    }

    #[test]
    fn test_add_trims_fields() {
        let mut store = test_store();

        let note = store.add(Some(" hi "), Some(" there ")).unwrap();
        assert_eq!(note.title, "hi");
        assert_eq!(note.content, "there");
        assert_eq!(store.list()[0], note);
    }

    #[test]
    fn test_add_rejects_blank_fields() {
        let mut store = test_store();

        assert_eq!(
            store.add(Some(" "), Some("x")).unwrap_err(),
            NoteError::Validation(ValidationError::EmptyFields)
        );
        assert_eq!(
            store.add(Some("x"), Some(" ")).unwrap_err(),
            NoteError::Validation(ValidationError::EmptyFields)
        );
        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1);
    }

    #[test]
    fn test_add_rejects_missing_fields() {
        let mut store = test_store();

        assert_eq!(
            store.add(None, Some("x")).unwrap_err(),
            NoteError::Validation(ValidationError::MissingFields)
        );
        assert_eq!(
            store.add(Some("x"), None).unwrap_err(),
            NoteError::Validation(ValidationError::MissingFields)
        );
        // Missing wins over blank
        assert_eq!(
            store.add(Some(" "), None).unwrap_err(),
            NoteError::Validation(ValidationError::MissingFields)
        );
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let mut store = test_store();
        store.add(Some("b"), Some("1")).unwrap();
        store.add(Some("a"), Some("2")).unwrap();
        store.add(Some("c"), Some("3")).unwrap();

        let titles: Vec<&str> = store.list().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_deleted_id_is_never_reused() {
        let mut store = test_store();

        let first = store.add(Some("Groceries"), Some("Milk, eggs")).unwrap();
        assert_eq!(first.id, 1);

        let deleted = store.delete(1).unwrap();
        assert_eq!(deleted, first);
        assert!(store.list().is_empty());

        let second = store.add(Some("Second"), Some("x")).unwrap();
        assert_eq!(second.id, 2);
    }

    #[test]
    fn test_update_replaces_given_fields() {
        let mut store = test_store();
        let note = store.add(Some("Title"), Some("Body")).unwrap();

        let updated = store.update(note.id, Some("  New title "), None).unwrap();
        assert_eq!(updated.title, "New title");
        assert_eq!(updated.content, "Body");

        let updated = store.update(note.id, None, Some("New body")).unwrap();
        assert_eq!(updated.title, "New title");
        assert_eq!(updated.content, "New body");
        assert_eq!(store.list()[0], updated);
    }

    #[test]
    fn test_update_without_fields_only_refreshes_timestamp() {
        let mut store = test_store();
        let note = store.add(Some("Title"), Some("Body")).unwrap();

        let updated = store.update(note.id, None, None).unwrap();
        assert_eq!(updated.id, note.id);
        assert_eq!(updated.title, note.title);
        assert_eq!(updated.content, note.content);
        assert!(updated.timestamp > note.timestamp);

        let blank = store.update(note.id, Some("   "), Some("")).unwrap();
        assert_eq!(blank.title, "Title");
        assert_eq!(blank.content, "Body");
        assert!(blank.timestamp > updated.timestamp);
    }

    #[test]
    fn test_update_unknown_id_leaves_store_unmodified() {
        let mut store = test_store();
        store.add(Some("Title"), Some("Body")).unwrap();
        let before = store.list().to_vec();

        let err = store.update(99, Some("x"), Some("y")).unwrap_err();
        assert_eq!(err, NoteError::NotFound { id: 99 });
        assert_eq!(store.list(), before.as_slice());
        assert_eq!(store.next_id(), 2);
    }

    #[test]
    fn test_delete_unknown_id() {
        let mut store = test_store();
        assert!(store.delete(1).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_preserves_order_of_rest() {
        let mut store = test_store();
        for title in ["a", "b", "c", "d"] {
            store.add(Some(title), Some("x")).unwrap();
        }

        store.delete(2).unwrap();

        let ids: Vec<u64> = store.list().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn test_mutations_write_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes_data.json");
        let mut store = file_store(&temp_dir);

        store.add(Some("One"), Some("1")).unwrap();
        store.add(Some("Two"), Some("2")).unwrap();
        store.update(1, Some("Uno"), None).unwrap();
        store.delete(2).unwrap();

        let on_disk = SnapshotPersistence::new(&path).load().unwrap().unwrap();
        assert_eq!(on_disk, store.list());
        assert_eq!(on_disk[0].title, "Uno");

        let status = store.persistence_status();
        assert!(status.is_healthy());
        assert!(status.last_saved.is_some());
        assert_eq!(status.snapshot_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_round_trip_through_snapshot() {
        let temp_dir = TempDir::new().unwrap();

        let original = {
            let mut store = file_store(&temp_dir);
            store.add(Some("First"), Some("a")).unwrap();
            store.add(Some("Second"), Some("b")).unwrap();
            store.add(Some("Third"), Some("c")).unwrap();
            store.delete(3).unwrap();
            store.update(1, None, Some("changed")).unwrap();
            store.list().to_vec()
        };

        let reopened = file_store(&temp_dir);
        assert_eq!(reopened.list(), original.as_slice());
        assert_eq!(reopened.next_id(), 3);
    }

    #[test]
    fn test_hydrate_uses_max_id() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes_data.json");
        fs::write(
            &path,
            r#"[
                {"id": 7, "title": "a", "content": "b", "timestamp": "2024-01-01 10:00:00"},
                {"id": 3, "title": "c", "content": "d", "timestamp": "2024-01-01 11:00:00"}
            ]"#,
        )
        .unwrap();

        let mut store = NoteStore::open(SnapshotPersistence::new(&path));
        assert_eq!(store.len(), 2);
        assert_eq!(store.next_id(), 8);
        assert_eq!(store.add(Some("new"), Some("x")).unwrap().id, 8);
    }

    #[test]
    fn test_snapshot_with_largest_id_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes_data.json");
        fs::write(
            &path,
            r#"[{"id": 18446744073709551615, "title": "a", "content": "b", "timestamp": "2024-01-01 10:00:00"}]"#,
        )
        .unwrap();

        let mut store = NoteStore::open(SnapshotPersistence::new(&path));
        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1);
        assert!(!store.persistence_status().is_healthy());
        assert_eq!(store.add(Some("new"), Some("x")).unwrap().id, 1);
    }

    #[test]
    fn test_add_fails_when_ids_run_out() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes_data.json");
        fs::write(
            &path,
            r#"[{"id": 18446744073709551614, "title": "a", "content": "b", "timestamp": "2024-01-01 10:00:00"}]"#,
        )
        .unwrap();

        let mut store = NoteStore::open(SnapshotPersistence::new(&path));
        assert_eq!(store.len(), 1);
        assert_eq!(store.next_id(), u64::MAX);

        assert_eq!(
            store.add(Some("new"), Some("x")).unwrap_err(),
            NoteError::IdsExhausted
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.next_id(), u64::MAX);
    }

    #[test]
    fn test_empty_snapshot_starts_at_one() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes_data.json");
        fs::write(&path, "[]").unwrap();

        let store = NoteStore::open(SnapshotPersistence::new(&path));
        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1);
        assert!(store.persistence_status().is_healthy());
    }

    #[test]
    fn test_corrupt_snapshot_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes_data.json");
        fs::write(&path, "definitely not json").unwrap();

        let mut store = NoteStore::open(SnapshotPersistence::new(&path));
        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1);
        assert!(!store.persistence_status().is_healthy());

        // The next successful save overwrites the bad file and clears the error
        store.add(Some("fresh"), Some("start")).unwrap();
        assert!(store.persistence_status().is_healthy());
        assert_eq!(
            SnapshotPersistence::new(&path).load().unwrap().unwrap().len(),
            1
        );
    }

    #[test]
    fn test_save_failure_keeps_mutation() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let mut store = NoteStore::open(SnapshotPersistence::new(blocker.join("notes.json")))
            .with_clock(ticking_clock());

        let note = store.add(Some("kept"), Some("in memory")).unwrap();
        assert_eq!(store.list(), &[note]);

        let status = store.persistence_status();
        assert!(!status.is_healthy());
        assert!(status.last_saved.is_none());
    }
}
