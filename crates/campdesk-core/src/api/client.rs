//! API client for the camp management REST API.
//!
//! This module provides the `ApiClient` struct for making agenda, camp and
//! reference-data requests. Every call is made once; failures are returned to
//! the caller, never retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::models::{
    AgendaItem, AgendaPayload, Camp, Clinician, Envelope, Location, SessionDraft, StaffMember,
};

use super::{AgendaApi, ApiError};

// ============================================================================
// Constants
// ============================================================================

/// Default API origin when no configuration is present.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Body of the copy-to-days request.
#[derive(Debug, Serialize)]
struct CopyRequest<'a> {
    days: &'a [u32],
}

/// API client for the camp API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client for the given origin, e.g. `https://camp.example.org`
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn camp_url(&self, camp_id: i64, path: &str) -> String {
        if path.is_empty() {
            format!("{}/api/camps/{}", self.base_url, camp_id)
        } else {
            format!("{}/api/camps/{}/{}", self.base_url, camp_id, path)
        }
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(ref token) = self.token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::InvalidResponse(format!("Invalid token header: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        debug!(%method, url = url, "Sending request");
        let mut request = self
            .client
            .request(method, url)
            .headers(self.auth_headers()?);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Self::check_response(response).await
    }

    async fn parse<T: DeserializeOwned>(url: &str, response: reqwest::Response) -> Result<T, ApiError> {
        let text = response.text().await?;
        let envelope: Envelope<T> = serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", url, e))
        })?;
        Ok(envelope.into_inner())
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self.send::<()>(Method::GET, url, None).await?;
        Self::parse(url, response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::POST, url, Some(body)).await?;
        Self::parse(url, response).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::PUT, url, Some(body)).await?;
        Self::parse(url, response).await
    }
}

#[async_trait]
impl AgendaApi for ApiClient {
    async fn fetch_agenda(&self, camp_id: i64) -> Result<AgendaPayload, ApiError> {
        self.get(&self.camp_url(camp_id, "agenda")).await
    }

    async fn fetch_agenda_export(&self, camp_id: i64) -> Result<AgendaPayload, ApiError> {
        self.get(&self.camp_url(camp_id, "agenda/export")).await
    }

    async fn create_session(
        &self,
        camp_id: i64,
        draft: &SessionDraft,
    ) -> Result<AgendaItem, ApiError> {
        self.post(&self.camp_url(camp_id, "agenda"), draft).await
    }

    async fn update_session(
        &self,
        camp_id: i64,
        session_id: i64,
        draft: &SessionDraft,
    ) -> Result<AgendaItem, ApiError> {
        let url = self.camp_url(camp_id, &format!("agenda/{}", session_id));
        self.put(&url, &draft.update_body()).await
    }

    async fn delete_session(&self, camp_id: i64, session_id: i64) -> Result<(), ApiError> {
        let url = self.camp_url(camp_id, &format!("agenda/{}", session_id));
        self.send::<()>(Method::DELETE, &url, None).await?;
        Ok(())
    }

    async fn copy_session(
        &self,
        camp_id: i64,
        session_id: i64,
        days: &[u32],
    ) -> Result<(), ApiError> {
        let url = self.camp_url(camp_id, &format!("agenda/{}/copy", session_id));
        self.send(Method::POST, &url, Some(&CopyRequest { days }))
            .await?;
        Ok(())
    }

    async fn fetch_camp(&self, camp_id: i64) -> Result<Camp, ApiError> {
        self.get(&self.camp_url(camp_id, "")).await
    }

    async fn fetch_clinicians(&self, camp_id: i64) -> Result<Vec<Clinician>, ApiError> {
        self.get(&self.camp_url(camp_id, "clinicians")).await
    }

    async fn fetch_locations(&self, camp_id: i64) -> Result<Vec<Location>, ApiError> {
        self.get(&self.camp_url(camp_id, "locations")).await
    }

    async fn fetch_staff(&self, camp_id: i64) -> Result<Vec<StaffMember>, ApiError> {
        self.get(&self.camp_url(camp_id, "staff")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camp_urls() {
        let client = ApiClient::new("https://camp.example.org/").unwrap();
        assert_eq!(client.base_url(), "https://camp.example.org");
        assert_eq!(
            client.camp_url(12, "agenda"),
            "https://camp.example.org/api/camps/12/agenda"
        );
        assert_eq!(client.camp_url(12, ""), "https://camp.example.org/api/camps/12");
        assert_eq!(
            client.camp_url(12, "agenda/5/copy"),
            "https://camp.example.org/api/camps/12/agenda/5/copy"
        );
    }

    #[test]
    fn test_auth_headers_include_bearer_token() {
        let mut client = ApiClient::new(DEFAULT_BASE_URL).unwrap();
        client.set_token("abc123".to_string());
        let headers = client.auth_headers().unwrap();
        assert_eq!(headers[header::AUTHORIZATION], "Bearer abc123");
    }

    #[test]
    fn test_copy_request_body() {
        let body = serde_json::to_value(CopyRequest { days: &[2, 3] }).unwrap();
        assert_eq!(body, serde_json::json!({ "days": [2, 3] }));
    }
}
