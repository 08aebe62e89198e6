//! HTTP request gateway for the SmartDoc backend.
//!
//! Wraps every network call the client makes: attaches headers, decodes
//! JSON, normalizes failures into [`ApiError`], and implements the
//! versioned-then-legacy endpoint fallback policy.

use std::future::Future;

use reqwest::{
    Client, Method,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Serialize, de::DeserializeOwned};
use smartdoc_core::endpoints::Endpoints;

use crate::error::{ApiError, ApiResult};

/// Gateway to the SmartDoc backend.
///
/// Holds the resolved endpoint roots and, when the user has logged in, the
/// bearer token attached to every request. Cloning is cheap; the underlying
/// reqwest client is shared.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    endpoints: Endpoints,
    token: Option<String>,
}

impl ApiClient {
    /// Creates a gateway against the given endpoint roots.
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            http: Client::new(),
            endpoints,
            token: None,
        }
    }

    /// Attaches a bearer token to all subsequent requests.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Replaces or clears the bearer token.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Issues one request and decodes the JSON response.
    ///
    /// Attaches `Content-Type: application/json` and, when authenticated,
    /// the bearer token. A non-success status fails with
    /// [`ApiError::Http`] carrying the status code and the response body
    /// text; anything that prevents a decoded response fails with
    /// [`ApiError::Transport`]. No timeout is enforced here.
    pub(crate) async fn request<T, B>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        if self.endpoints.debug {
            tracing::debug!("[API] Request: {} {}", method, url);
        }

        let mut builder = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = &self.token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(ApiError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(ApiError::Http {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let data = response
            .json::<T>()
            .await
            .map_err(|err| ApiError::transport(format!("Failed to decode response: {err}")))?;

        if self.endpoints.debug {
            tracing::debug!("[API] Response: {} {}", status, url);
        }

        Ok(data)
    }
}

/// Attempts the versioned operation first, falling back to legacy.
///
/// Any rejection of the versioned attempt triggers the fallback. When both
/// fail, the **legacy** failure is surfaced to the caller; the versioned
/// failure is logged at warn level and otherwise discarded, so callers
/// cannot distinguish "both down" from "only legacy down".
///
/// When `prefer_v1` is false the versioned attempt is skipped entirely.
/// This is a static, caller-configured bypass; there is no failure-count
/// tripping and no cool-down.
pub async fn try_v1_then_legacy<T, V, L, FutV, FutL>(
    operation: &str,
    prefer_v1: bool,
    v1: V,
    legacy: L,
) -> ApiResult<T>
where
    V: FnOnce() -> FutV,
    L: FnOnce() -> FutL,
    FutV: Future<Output = ApiResult<T>>,
    FutL: Future<Output = ApiResult<T>>,
{
    if !prefer_v1 {
        tracing::debug!("[API] {}: using legacy endpoint by configuration", operation);
        return legacy().await;
    }

    match v1().await {
        Ok(value) => {
            tracing::debug!("[API] {}: used v1 endpoint", operation);
            Ok(value)
        }
        Err(v1_error) => {
            tracing::warn!(
                "[API] {}: v1 endpoint failed, falling back to legacy: {}",
                operation,
                v1_error
            );
            match legacy().await {
                Ok(value) => {
                    tracing::debug!("[API] {}: used legacy endpoint", operation);
                    Ok(value)
                }
                Err(legacy_error) => {
                    tracing::warn!("[API] {}: both v1 and legacy endpoints failed", operation);
                    Err(legacy_error)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_fallback_returns_legacy_value_when_v1_fails() {
        let result = try_v1_then_legacy(
            "test",
            true,
            || async { Err::<&str, _>(ApiError::transport("connection refused")) },
            || async { Ok("X") },
        )
        .await;
        assert_eq!(result.unwrap(), "X");
    }

    #[tokio::test]
    async fn test_fallback_skips_legacy_when_v1_succeeds() {
        let legacy_called = Cell::new(false);
        let result = try_v1_then_legacy(
            "test",
            true,
            || async { Ok("v1") },
            || async {
                legacy_called.set(true);
                Ok("legacy")
            },
        )
        .await;
        assert_eq!(result.unwrap(), "v1");
        assert!(!legacy_called.get());
    }

    #[tokio::test]
    async fn test_fallback_surfaces_legacy_error_when_both_fail() {
        let result: ApiResult<&str> = try_v1_then_legacy(
            "test",
            true,
            || async {
                Err(ApiError::Http {
                    status: 500,
                    body: "v1 down".into(),
                })
            },
            || async {
                Err(ApiError::Http {
                    status: 503,
                    body: "legacy down".into(),
                })
            },
        )
        .await;
        match result {
            Err(ApiError::Http { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "legacy down");
            }
            other => panic!("Expected legacy Http error, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_prefer_v1_false_skips_versioned_attempt() {
        let v1_called = Cell::new(false);
        let result = try_v1_then_legacy(
            "test",
            false,
            || async {
                v1_called.set(true);
                Ok("v1")
            },
            || async { Ok("legacy") },
        )
        .await;
        assert_eq!(result.unwrap(), "legacy");
        assert!(!v1_called.get());
    }
}
