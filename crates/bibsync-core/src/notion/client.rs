//! Blocking Notion HTTP client

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

use super::payload::{self, BodyError};
use super::{Directory, PageFields, PageId};
use crate::config::NotionConfig;
use crate::error::{LookupError, RemoteError};

/// Failure of a single HTTP exchange
enum CallError {
    Transport(String),
    Body(String),
}

impl From<CallError> for LookupError {
    fn from(e: CallError) -> Self {
        match e {
            CallError::Transport(message) => LookupError::Transport(message),
            CallError::Body(message) => LookupError::MalformedResponse(message),
        }
    }
}

impl From<CallError> for RemoteError {
    fn from(e: CallError) -> Self {
        match e {
            CallError::Transport(message) => RemoteError::Transport(message),
            CallError::Body(message) => RemoteError::MalformedResponse(message),
        }
    }
}

/// Client for one Notion database
pub struct NotionClient {
    client: Client,
    config: NotionConfig,
}

impl NotionClient {
    pub fn new(config: NotionConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("bibsync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base.trim_end_matches('/'), path)
    }

    /// Send `body` and return the response text of a success status
    fn call(&self, method: Method, url: &str, body: &Value) -> Result<String, CallError> {
        debug!("{} {}", method, url);

        let response = self
            .client
            .request(method, url)
            .bearer_auth(&self.config.token)
            .header("Accept", "application/json")
            .header("Notion-Version", &self.config.notion_version)
            .json(body)
            .send()
            .map_err(|e| CallError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| CallError::Body(format!("Unreadable body: {}", e)))?;

        if !status.is_success() {
            return Err(CallError::Transport(payload::describe_error(
                status.as_u16(),
                &text,
            )));
        }

        Ok(text)
    }
}

impl Directory for NotionClient {
    fn find_page(&self, reference_id: &str) -> Result<PageId, LookupError> {
        let url = self.url(&format!("databases/{}/query", self.config.database_id));
        let result = self
            .call(Method::POST, &url, &payload::query_body(reference_id))
            .map_err(LookupError::from)
            .and_then(|text| {
                payload::parse_query_response(&text).map_err(|e| match e {
                    BodyError::Empty => LookupError::NotFound,
                    BodyError::Malformed(message) => LookupError::MalformedResponse(message),
                })
            });

        match &result {
            Ok(page) => debug!("Found page {} for '{}'", page, reference_id),
            Err(LookupError::NotFound) => debug!("No page for '{}'", reference_id),
            Err(e) => warn!("Querying Notion for '{}' failed: {}", reference_id, e),
        }

        result
    }

    fn insert_page(&self, fields: &PageFields) -> Result<PageId, RemoteError> {
        let url = self.url("pages");
        let body = payload::create_body(&self.config.database_id, fields);
        let text = self.call(Method::POST, &url, &body)?;

        payload::parse_page_response(&text).map_err(|e| match e {
            BodyError::Malformed(message) => RemoteError::MalformedResponse(message),
            BodyError::Empty => RemoteError::MalformedResponse("Empty page response".to_string()),
        })
    }

    fn overwrite_page(&self, page: &PageId, fields: &PageFields) -> Result<(), RemoteError> {
        let url = self.url(&format!("pages/{}", page));
        self.call(Method::PATCH, &url, &payload::update_body(fields))?;
        Ok(())
    }
}
