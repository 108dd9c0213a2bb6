//! HTTP implementation of [`CatalogApi`] for the Siigo-style REST API.
//!
//! - `POST {base}/auth` with `{"username", "access_key"}` → `access_token`
//! - `GET {base}/v1/products?page=N&page_size=M` with the token in
//!   `Authorization`
//!
//! Every request carries the `Partner-Id` header. Auth calls and page calls
//! have separate timeouts; a stuck remote is bounded by them, never by
//! cancellation.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::api::{AuthError, AuthToken, CatalogApi, FetchError};

#[derive(Debug, Clone)]
pub struct HttpCatalogApi {
    http: reqwest::Client,
    base_url: String,
    partner_id: String,
    auth_timeout: Duration,
    fetch_timeout: Duration,
}

impl HttpCatalogApi {
    pub fn new(
        base_url: impl Into<String>,
        partner_id: impl Into<String>,
        auth_timeout: Duration,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            partner_id: partner_id.into(),
            auth_timeout,
            fetch_timeout,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    access_token: Option<String>,
}

#[async_trait::async_trait]
impl CatalogApi for HttpCatalogApi {
    fn name(&self) -> &'static str {
        "siigo"
    }

    async fn authenticate(&self, principal: &str, secret: &str) -> Result<AuthToken, AuthError> {
        let resp = self
            .http
            .post(self.url("auth"))
            .header("Partner-Id", &self.partner_id)
            .timeout(self.auth_timeout)
            .json(&serde_json::json!({
                "username": principal,
                "access_key": secret,
            }))
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: AuthResponse = resp
            .json()
            .await
            .map_err(|e| AuthError::Transport(format!("auth response decode failed: {e}")))?;

        match body.access_token {
            Some(t) if !t.trim().is_empty() => Ok(AuthToken::new(t)),
            _ => Err(AuthError::MissingToken),
        }
    }

    async fn list_products(
        &self,
        token: &AuthToken,
        page: u32,
        page_size: usize,
    ) -> Result<Value, FetchError> {
        let resp = self
            .http
            .get(self.url("v1/products"))
            .header("Authorization", token.as_str())
            .header("Partner-Id", &self.partner_id)
            .timeout(self.fetch_timeout)
            .query(&[("page", page.to_string()), ("page_size", page_size.to_string())])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(FetchError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_join_tolerates_trailing_slash() {
        let api = HttpCatalogApi::new(
            "https://api.example.test/",
            "Partner",
            Duration::from_secs(1),
            Duration::from_secs(1),
        );
        assert_eq!(api.url("v1/products"), "https://api.example.test/v1/products");
    }
}
