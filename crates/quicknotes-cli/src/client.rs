//! HTTP client for a running Quicknotes server

use anyhow::{bail, Context, Result};
use quicknotes_core::{NewNote, Note, NoteChanges};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::server::{DeleteResponse, ErrorBody};

pub struct NotesClient {
    http: reqwest::Client,
    base_url: String,
}

impl NotesClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// All notes, in the server's insertion order
    pub async fn list(&self) -> Result<Vec<Note>> {
        self.send(self.http.get(self.url("/notes"))).await
    }

    pub async fn create(&self, title: &str, content: &str) -> Result<Note> {
        let body = NewNote {
            title: Some(title.to_string()),
            content: Some(content.to_string()),
        };
        self.send(self.http.post(self.url("/notes")).json(&body))
            .await
    }

    pub async fn update(&self, id: u64, changes: &NoteChanges) -> Result<Note> {
        self.send(
            self.http
                .put(self.url(&format!("/notes/{}", id)))
                .json(changes),
        )
        .await
    }

    /// Delete a note, returning it as it was
    pub async fn delete(&self, id: u64) -> Result<Note> {
        let response: DeleteResponse = self
            .send(self.http.delete(self.url(&format!("/notes/{}", id))))
            .await?;
        Ok(response.deleted_note)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.with_context(|| {
            format!(
                "Could not reach the Quicknotes server at {}. Is `quicknotes serve` running?",
                self.base_url
            )
        })?;
        decode(response).await
    }
}

/// Decode a success body, or turn an `{"error": ...}` body into an error
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .context("Failed to decode server response");
    }

    match response.json::<ErrorBody>().await {
        Ok(body) => bail!(body.error),
        Err(_) => bail!("Server returned {}", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{router, AppState};
    use quicknotes_core::NoteStore;
    use tokio::net::TcpListener;

    async fn spawn_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(AppState::new(NoteStore::in_memory()));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = NotesClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/notes"), "http://localhost:5000/notes");
    }

    #[tokio::test]
    async fn test_crud_against_server() {
        let client = NotesClient::new(spawn_server().await);

        assert!(client.list().await.unwrap().is_empty());

        let note = client.create("Groceries", "Milk, eggs").await.unwrap();
        assert_eq!(note.id, 1);

        let changes = NoteChanges {
            title: None,
            content: Some("Milk, eggs, bread".to_string()),
        };
        let updated = client.update(note.id, &changes).await.unwrap();
        assert_eq!(updated.title, "Groceries");
        assert_eq!(updated.content, "Milk, eggs, bread");

        let deleted = client.delete(note.id).await.unwrap();
        assert_eq!(deleted, updated);
        assert!(client.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_errors_become_messages() {
        let client = NotesClient::new(spawn_server().await);

        let err = client.create("  ", "x").await.unwrap_err();
        assert_eq!(err.to_string(), "Title and content cannot be empty");

        let err = client.delete(42).await.unwrap_err();
        assert_eq!(err.to_string(), "Note not found");
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = NotesClient::new(format!("http://{}", addr));
        let err = client.list().await.unwrap_err();
        assert!(err.to_string().contains("Could not reach"));
    }
}
