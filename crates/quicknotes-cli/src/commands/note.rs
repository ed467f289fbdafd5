//! Note command handlers
//!
//! Every command talks to a running server through [`NotesClient`].

use anyhow::{bail, Context, Result};

use quicknotes_core::{Note, NoteChanges};

use crate::client::NotesClient;
use crate::editor::{confirm, content_template, edit_text};
use crate::output::Output;

/// Longest title the CLI will submit
pub const MAX_TITLE_CHARS: usize = 100;
/// Longest content the CLI will submit
pub const MAX_CONTENT_CHARS: usize = 500;

/// List all notes
pub async fn list(client: &NotesClient, output: &Output) -> Result<()> {
    let notes = client.list().await?;
    output.print_notes(&notes);
    Ok(())
}

/// Create a note, opening the editor when no content is given
pub async fn add(
    client: &NotesClient,
    title: String,
    content: Option<String>,
    output: &Output,
) -> Result<()> {
    check_length("Title", &title, MAX_TITLE_CHARS)?;

    let content = match content {
        Some(c) => c,
        None => edit_text(&content_template(&title)).context("Failed to edit note")?,
    };
    check_length("Content", &content, MAX_CONTENT_CHARS)?;

    let note = client.create(&title, &content).await?;
    output.print_saved("Created", &note);
    Ok(())
}

/// Change a note's title and/or content
///
/// With neither flag, the current content is opened in the editor.
pub async fn edit(
    client: &NotesClient,
    id: u64,
    title: Option<String>,
    content: Option<String>,
    output: &Output,
) -> Result<()> {
    let changes = if title.is_none() && content.is_none() {
        let current = find_note(client, id).await?;
        let edited = edit_text(&current.content).context("Failed to edit note")?;
        NoteChanges {
            title: None,
            content: unless_unchanged(edited, &current.content),
        }
    } else {
        NoteChanges { title, content }
    };

    if changes.is_empty() {
        output.success(&format!("No changes to note {}", id));
        return Ok(());
    }

    if let Some(title) = &changes.title {
        check_length("Title", title, MAX_TITLE_CHARS)?;
    }
    if let Some(content) = &changes.content {
        check_length("Content", content, MAX_CONTENT_CHARS)?;
    }

    let note = client.update(id, &changes).await?;
    output.print_saved("Updated", &note);
    Ok(())
}

/// Delete a note, asking first in interactive mode unless `yes` is set
pub async fn delete(client: &NotesClient, id: u64, yes: bool, output: &Output) -> Result<()> {
    if output.should_prompt() && !yes {
        let note = find_note(client, id).await?;
        println!("Delete note {}: {}", note.id, note.title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let deleted = client.delete(id).await?;

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "message": crate::server::DELETED_MESSAGE,
                "deleted_note": deleted
            })
        );
    } else if output.is_quiet() {
        println!("{}", deleted.id);
    } else {
        output.success(&format!("Deleted note {}: {}", deleted.id, deleted.title));
    }

    Ok(())
}

async fn find_note(client: &NotesClient, id: u64) -> Result<Note> {
    client
        .list()
        .await?
        .into_iter()
        .find(|note| note.id == id)
        .ok_or_else(|| anyhow::anyhow!("Note not found"))
}

/// Editor output, or `None` if it is blank or the same as before
fn unless_unchanged(edited: String, current: &str) -> Option<String> {
    let trimmed = edited.trim();
    (!trimmed.is_empty() && trimmed != current.trim()).then(|| trimmed.to_string())
}

/// Reject text longer than `max` characters, counted after trimming
fn check_length(field: &str, value: &str, max: usize) -> Result<()> {
    let len = value.trim().chars().count();
    if len > max {
        bail!("{} is too long ({} characters, max {})", field, len, max);
    }
    Ok(())
}
