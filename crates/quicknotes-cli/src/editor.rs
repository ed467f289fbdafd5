//! Interactive input
//!
//! Opens $EDITOR for note content and asks yes/no questions.

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::Command;

/// Lines starting with this marker are stripped from edited text
const COMMENT_MARKER: &str = "#";

/// Open `initial_content` in the user's editor and return the edited text
///
/// Comment lines are removed and the result is trimmed.
pub fn edit_text(initial_content: &str) -> Result<String> {
    let editor = find_editor();

    let temp_path = env::temp_dir().join(format!("quicknotes_edit_{}.txt", std::process::id()));

    fs::write(&temp_path, initial_content)
        .with_context(|| format!("Failed to create temp file: {:?}", temp_path))?;

    let status = Command::new(&editor)
        .arg(&temp_path)
        .status()
        .with_context(|| format!("Failed to run editor: {}", editor));

    let edited = match status {
        Ok(status) if status.success() => fs::read_to_string(&temp_path)
            .with_context(|| format!("Failed to read edited file: {:?}", temp_path)),
        Ok(_) => Err(anyhow::anyhow!(
            "Editor '{}' exited with non-zero status. Set $EDITOR to a working editor.",
            editor
        )),
        Err(e) => Err(e),
    };

    let _ = fs::remove_file(&temp_path);
    Ok(strip_comments(&edited?))
}

/// $VISUAL, then $EDITOR, then vi
fn find_editor() -> String {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "vi".to_string())
}

fn strip_comments(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with(COMMENT_MARKER))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Template shown when writing a new note's content
pub fn content_template(title: &str) -> String {
    format!(
        "{marker} Content for note: {title}\n{marker} Lines starting with '{marker}' are ignored.\n\n",
        marker = COMMENT_MARKER,
        title = title
    )
}

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        bail!("No answer given");
    }

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
