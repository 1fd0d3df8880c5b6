//! Shared HTTP plumbing for the REST clients
//!
//! Both the audio list backend and the external ticketing service speak
//! JSON over REST with the same error body convention, so one thin client
//! wrapper covers them.

use crate::error::{ClientError, ClientResult};
use callscribe_core::config::{BackendConfig, TicketApiConfig};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client bound to one service base URL
#[derive(Debug, Clone)]
pub struct Backend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl Backend {
    /// Create a client with the default 30s/5s timeouts
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeouts(base_url, Duration::from_secs(30), Duration::from_secs(5))
    }

    /// Create a client with explicit request and connect timeouts
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_timeouts(
        base_url: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Create a client for the audio list backend from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_backend_config(config: &BackendConfig) -> ClientResult<Self> {
        Self::with_timeouts(
            &config.url,
            Duration::from_secs(config.timeout_secs),
            Duration::from_secs(config.connect_timeout_secs),
        )
    }

    /// Create a client for the ticketing service from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_ticket_config(config: &TicketApiConfig) -> ClientResult<Self> {
        Self::with_timeouts(
            &config.url,
            Duration::from_secs(config.timeout_secs),
            Duration::from_secs(5),
        )
    }

    /// Attach a bearer token to every subsequent request
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Base URL without its trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let mut builder = self.client.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.header(reqwest::header::AUTHORIZATION, authorization_value(token));
        }
        builder
    }

    /// GET a JSON resource
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// undecodable body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(Method::GET, path).send().await?;
        Self::decode(response).await
    }

    /// GET a JSON resource with query parameters
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// undecodable body.
    pub async fn get_with_query<Q, T>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(Method::GET, path).query(query).send().await?;
        Self::decode(response).await
    }

    /// POST a JSON body and decode the JSON response
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// undecodable body.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::decode(response).await
    }

    /// POST a JSON body with query parameters and decode the JSON response
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// undecodable body.
    pub async fn post_with_query<Q, B, T>(&self, path: &str, query: &Q, body: &B) -> ClientResult<T>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::POST, path)
            .query(query)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// POST a JSON body and discard whatever comes back
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn post_discard<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<()> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::check(response).await.map(|_| ())
    }

    /// PATCH a JSON body and decode the JSON response
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// undecodable body.
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(Method::PATCH, path).json(body).send().await?;
        Self::decode(response).await
    }

    /// PUT a JSON body and decode the JSON response
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// undecodable body.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(Method::PUT, path).json(body).send().await?;
        Self::decode(response).await
    }

    /// DELETE a resource, ignoring any response body
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let response = self.request(Method::DELETE, path).send().await?;
        Self::check(response).await.map(|_| ())
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn check(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::api(
            status.as_u16(),
            normalize_error_message(status, &body),
        ))
    }
}

/// Authorization header value with the backend's lowercase bearer scheme
///
/// Tokens already carrying a capitalized scheme pass through untouched.
fn authorization_value(token: &str) -> String {
    if token.starts_with("Bearer ") {
        token.to_string()
    } else {
        format!("bearer {token}")
    }
}

/// Pick the most useful message out of an error response
///
/// Preference order: the server supplied `error` or `message` body field,
/// the HTTP status reason, a generic fallback carrying the status code.
fn normalize_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(message) = value.get(key).and_then(serde_json::Value::as_str)
                && !message.trim().is_empty()
            {
                return message.to_string();
            }
        }
    }

    status.canonical_reason().map_or_else(
        || format!("Request failed with status {}", status.as_u16()),
        ToString::to_string,
    )
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_authorization_value_uses_lowercase_scheme() {
        assert_eq!(authorization_value("abc123"), "bearer abc123");
    }

    #[test]
    fn test_authorization_value_keeps_explicit_scheme() {
        assert_eq!(authorization_value("Bearer abc123"), "Bearer abc123");
    }

    #[test]
    fn test_normalize_prefers_error_field() {
        let message = normalize_error_message(
            StatusCode::CONFLICT,
            r#"{"error": "Lista duplicada", "message": "other"}"#,
        );
        assert_eq!(message, "Lista duplicada");
    }

    #[test]
    fn test_normalize_falls_back_to_message_field() {
        let message =
            normalize_error_message(StatusCode::BAD_REQUEST, r#"{"message": "Campo inválido"}"#);
        assert_eq!(message, "Campo inválido");
    }

    #[test]
    fn test_normalize_ignores_blank_server_message() {
        let message = normalize_error_message(StatusCode::BAD_GATEWAY, r#"{"error": "  "}"#);
        assert_eq!(message, "Bad Gateway");
    }

    #[test]
    fn test_normalize_falls_back_to_status_reason() {
        let message = normalize_error_message(StatusCode::NOT_FOUND, "<html>nope</html>");
        assert_eq!(message, "Not Found");
    }

    #[test]
    fn test_normalize_handles_unknown_status() {
        let status = StatusCode::from_u16(599).unwrap();
        let message = normalize_error_message(status, "");
        assert_eq!(message, "Request failed with status 599");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let backend = Backend::new("https://api.example.com/").unwrap();
        assert_eq!(backend.base_url(), "https://api.example.com");
    }

    #[test]
    fn test_with_token_is_chainable() {
        let backend = Backend::new("https://api.example.com")
            .unwrap()
            .with_token("tok");
        assert_eq!(backend.base_url(), "https://api.example.com");
    }
}
