//! HTTP board storage client.
//!
//! Thin wrapper over `GET {base}/boards/{id}` and `PATCH {base}/boards/{id}`.
//! The id is sent as a single percent-encoded path segment.
//! Response classification lives in `parse_board` for testability.

use std::time::Duration;

use canvas::LayoutDocument;
use reqwest::{StatusCode, Url};
use tracing::debug;

use super::{Board, BoardId, BoardStore, StoreError};
use crate::config::Config;

pub struct HttpBoardStore {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(serde::Serialize)]
struct LayoutPatch<'a> {
    canvas_layout: &'a LayoutDocument,
}

impl HttpBoardStore {
    /// Build a client using the configured base URL, token and timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ClientBuild`] when the TLS backend cannot be initialized.
    pub fn new(config: &Config) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| StoreError::ClientBuild(e.to_string()))?;
        Ok(Self::with_client(http, &config.api_base_url, config.api_token.clone()))
    }

    /// Wrap an existing client.
    #[must_use]
    pub fn with_client(http: reqwest::Client, base_url: &str, token: Option<String>) -> Self {
        Self { http, base_url: base_url.trim_end_matches('/').to_owned(), token }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn board_url(&self, board_id: &BoardId) -> Result<Url, StoreError> {
        let invalid = || StoreError::InvalidUrl { url: self.base_url.clone() };
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut().map_err(|()| invalid())?.pop_if_empty().push("boards").push(&board_id.to_string());
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder, board_id: &BoardId) -> Result<Board, StoreError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(board_id = %board_id, status = status.as_u16(), bytes = body.len(), "storage response");
        parse_board(status, &body, board_id)
    }
}

#[async_trait::async_trait]
impl BoardStore for HttpBoardStore {
    async fn get_board(&self, board_id: &BoardId) -> Result<Board, StoreError> {
        let request = self.http.get(self.board_url(board_id)?);
        self.send(request, board_id).await
    }

    async fn update_canvas_layout(&self, board_id: &BoardId, layout: &LayoutDocument) -> Result<Board, StoreError> {
        let request = self.http.patch(self.board_url(board_id)?).json(&LayoutPatch { canvas_layout: layout });
        self.send(request, board_id).await
    }
}

fn parse_board(status: StatusCode, body: &str, board_id: &BoardId) -> Result<Board, StoreError> {
    if status == StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound { board_id: board_id.clone() });
    }
    if !status.is_success() {
        return Err(StoreError::Status { status: status.as_u16(), body: body.to_owned() });
    }
    serde_json::from_str(body).map_err(|e| StoreError::Decode(e.to_string()))
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
