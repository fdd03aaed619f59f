//! Typed HTTP client for the NoteHub API.

use super::NotesTransport;
use crate::config::NotehubConfig;
use crate::error::{NotehubError, Result};
use crate::model::{ListParams, NewNote, Note, NotesPage};
use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub struct HttpTransport {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str, token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotehubError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        })
    }

    /// Builds a transport from config; fails when no token is configured.
    pub fn from_config(config: &NotehubConfig) -> Result<Self> {
        let token = config.require_token()?;
        Self::new(&config.base_url, token, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn note_url(&self, id: &str) -> String {
        note_url(&self.base_url, id)
    }
}

fn note_url(base_url: &str, id: &str) -> String {
    format!("{}/{}", base_url, urlencoding::encode(id))
}

/// Maps a non-2xx response onto the error taxonomy.
fn status_error(status: u16, target: &str, body: String) -> NotehubError {
    if status == 404 {
        return NotehubError::NotFound(target.to_string());
    }

    let message = if body.trim().is_empty() {
        reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("request failed")
            .to_string()
    } else {
        body
    };
    NotehubError::Http { status, message }
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response, target: &str) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(status_error(status.as_u16(), target, body));
    }

    resp.json::<T>()
        .await
        .map_err(|e| NotehubError::Decode(format!("{}: {}", target, e)))
}

fn network_error(action: &str, e: reqwest::Error) -> NotehubError {
    NotehubError::Network(format!("{} failed: {}", action, e))
}

#[async_trait]
impl NotesTransport for HttpTransport {
    async fn list_notes(&self, params: &ListParams) -> Result<NotesPage> {
        debug!(
            "GET {} page={} perPage={} search={:?}",
            self.base_url, params.page, params.per_page, params.search
        );
        let resp = self
            .client
            .get(&self.base_url)
            .bearer_auth(&self.token)
            .query(params)
            .send()
            .await
            .map_err(|e| network_error("List notes", e))?;

        read_json(resp, "notes").await
    }

    async fn create_note(&self, note: &NewNote) -> Result<Note> {
        debug!("POST {} title={:?}", self.base_url, note.title);
        let resp = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.token)
            .json(note)
            .send()
            .await
            .map_err(|e| network_error("Create note", e))?;

        read_json(resp, "new note").await
    }

    async fn delete_note(&self, id: &str) -> Result<Note> {
        let url = self.note_url(id);
        debug!("DELETE {}", url);
        let resp = self
            .client
            .delete(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| network_error("Delete note", e))?;

        read_json(resp, id).await
    }
}
