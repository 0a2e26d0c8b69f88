//! HTTP plumbing shared by every endpoint: base url joining, the `Authorization`
//! header, status classification and JSON decoding.

use crate::api::error::ApiError;
use crate::config::ClientConfig;
use crate::types::user::Acknowledgement;
use log::{debug, warn};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::RwLock;

/// Thin typed wrapper around the flood-alert REST API.
///
/// Holds the bearer token for the current session. Every request built through
/// this client carries `Authorization: Token <token>` while a token is set.
#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .gzip(true)
            .build()
            .map_err(|e| ApiError::RequestBuild(config.base_url.clone(), e))?;
        Ok(Self {
            http,
            config,
            token: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Replaces the token attached to subsequent requests. `None` detaches it.
    pub fn set_token(&self, token: Option<String>) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = token;
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Starts a request to `path` (relative to the base url) with the auth header applied.
    /// Returns the absolute url alongside the builder for error reporting.
    pub(crate) fn request(&self, method: Method, path: &str) -> (String, RequestBuilder) {
        let url = self.config.endpoint(path);
        let mut builder = self.http.request(method, &url);
        if let Some(token) = self.token() {
            builder = builder.header(AUTHORIZATION, format!("Token {token}"));
        }
        (url, builder)
    }

    /// Sends the request and returns the status and raw body of a successful response.
    pub(crate) async fn execute(
        &self,
        url: &str,
        builder: RequestBuilder,
    ) -> Result<(StatusCode, Vec<u8>), ApiError> {
        debug!("Requesting {}", url);
        let response = builder.send().await.map_err(|e| {
            warn!("Request to {} failed: {}", url, e);
            ApiError::from_transport(url.to_string(), e)
        })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::from_transport(url.to_string(), e))?;

        if !status.is_success() {
            let error = ApiError::from_response(url.to_string(), status, &body);
            warn!("HTTP {} from {}: {}", status, url, error);
            return Err(error);
        }
        Ok((status, body.to_vec()))
    }

    /// Sends the request and decodes a JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        url: &str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let (_, body) = self.execute(url, builder).await?;
        decode(url, &body)
    }

    /// Sends the request and reads an optional acknowledgement body.
    pub(crate) async fn send_ack(
        &self,
        url: &str,
        builder: RequestBuilder,
    ) -> Result<Acknowledgement, ApiError> {
        let (_, body) = self.execute(url, builder).await?;
        Ok(decode_ack(&body))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let (url, builder) = self.request(Method::GET, path);
        self.send_json(&url, builder).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let (url, builder) = self.request(Method::POST, path);
        self.send_json(&url, builder.json(body)).await
    }

    pub(crate) async fn post_ack<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Acknowledgement, ApiError> {
        let (url, builder) = self.request(Method::POST, path);
        self.send_ack(&url, builder.json(body)).await
    }

    pub(crate) async fn get_ack(&self, path: &str) -> Result<Acknowledgement, ApiError> {
        let (url, builder) = self.request(Method::GET, path);
        self.send_ack(&url, builder).await
    }
}

pub(crate) fn decode<T: DeserializeOwned>(url: &str, body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::Decode {
        url: url.to_string(),
        source: e,
    })
}

/// Acknowledgement bodies are informational; anything unparsable counts as an empty ack.
pub(crate) fn decode_ack(body: &[u8]) -> Acknowledgement {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Acknowledgement::default();
    }
    serde_json::from_slice(body).unwrap_or_else(|_| Acknowledgement {
        detail: Some(String::from_utf8_lossy(body).trim().to_string()),
    })
}
