//! API client for the tutorials REST backend.
//!
//! One method per REST action. Reads deserialize JSON into models;
//! writes only check the response status, since the cache re-fetches
//! affected queries afterwards instead of consuming mutation bodies.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::models::{NewTutorial, Tutorial};

use super::ApiError;

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the tutorials backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client rooted at `base_url` (e.g.
    /// `http://localhost:8080/api`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    /// Issue a write and discard the body once the status checks out.
    async fn send_write<B: Serialize>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<()> {
        let mut request = self.client.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send {} request to {}", method, url))?;

        Self::check_response(response).await?;
        debug!(%method, url, "Write request succeeded");
        Ok(())
    }

    // ===== Reads =====

    /// GET /tutorials - fetch the full collection
    pub async fn fetch_tutorials(&self) -> Result<Vec<Tutorial>> {
        self.get_json(&self.url("/tutorials")).await
    }

    /// GET /tutorials/:id - fetch a single record
    pub async fn fetch_tutorial(&self, id: i64) -> Result<Tutorial> {
        self.get_json(&self.url(&format!("/tutorials/{}", id))).await
    }

    /// GET /tutorials/published - fetch only published records
    pub async fn fetch_published(&self) -> Result<Vec<Tutorial>> {
        self.get_json(&self.url("/tutorials/published")).await
    }

    /// GET /tutorials?title= - server-side title search.
    /// The list view filters client-side; this endpoint is part of the
    /// API surface but currently has no caller in the UI.
    #[allow(dead_code)]
    pub async fn fetch_by_title(&self, title: &str) -> Result<Vec<Tutorial>> {
        let url = self.url("/tutorials");
        let response = self
            .client
            .get(&url)
            .query(&[("title", title)])
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    // ===== Writes =====

    /// POST /tutorials - create a record; the server assigns the id
    pub async fn create_tutorial(&self, tutorial: &NewTutorial) -> Result<()> {
        self.send_write(reqwest::Method::POST, &self.url("/tutorials"), Some(tutorial))
            .await
    }

    /// PUT /tutorials/:id - replace a record with a full payload
    pub async fn update_tutorial(&self, tutorial: &Tutorial) -> Result<()> {
        self.send_write(
            reqwest::Method::PUT,
            &self.url(&format!("/tutorials/{}", tutorial.id)),
            Some(tutorial),
        )
        .await
    }

    /// DELETE /tutorials/:id - delete a single record
    pub async fn delete_tutorial(&self, id: i64) -> Result<()> {
        self.send_write::<()>(
            reqwest::Method::DELETE,
            &self.url(&format!("/tutorials/{}", id)),
            None,
        )
        .await
    }

    /// DELETE /tutorials - delete the whole collection
    pub async fn delete_all(&self) -> Result<()> {
        self.send_write::<()>(reqwest::Method::DELETE, &self.url("/tutorials"), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let api = ApiClient::new("http://localhost:8080/api").expect("client");
        assert_eq!(
            api.url("/tutorials/5"),
            "http://localhost:8080/api/tutorials/5"
        );
    }

    #[test]
    fn test_trailing_slashes_stripped_from_base() {
        let api = ApiClient::new("http://localhost:8080/api///").expect("client");
        assert_eq!(api.url("/tutorials"), "http://localhost:8080/api/tutorials");
    }
}
