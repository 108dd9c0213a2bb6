//! Remote inventory API boundary.
//!
//! Defines the token type, the two error taxonomies and the [`CatalogApi`]
//! trait. Concrete transports live in `http.rs`; tests script their own.

use std::fmt;

use serde_json::Value;

/// A product record exactly as the remote API returned it.
///
/// Shapes vary between API versions, so nothing is assumed beyond "JSON".
pub type RawRecord = Value;

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// Opaque session token returned by [`CatalogApi::authenticate`].
///
/// **Redacted in `Debug` output.**
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<REDACTED>)")
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Authentication failures. Fatal to the session: the user must log in again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The API answered with a non-success status.
    Rejected { status: u16, message: String },
    /// Timeout, DNS, connection reset, TLS failure.
    Transport(String),
    /// A success response that carried no usable token.
    MissingToken,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Rejected { status, message } => {
                write!(f, "authentication rejected: {status} - {message}")
            }
            AuthError::Transport(msg) => write!(f, "authentication connection error: {msg}"),
            AuthError::MissingToken => {
                write!(f, "authentication succeeded but no access_token was returned")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// Catalog retrieval failures. Fatal to that refresh attempt; no partial
/// catalog is ever returned alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The API answered a page request with a non-success status.
    Http { status: u16, message: String },
    /// Timeout, DNS, connection reset, TLS failure.
    Transport(String),
    /// A success response whose body was not JSON.
    Decode(String),
    /// Pagination never produced a short page.
    TooManyPages(u32),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Http { status, message } => {
                write!(f, "error fetching products: {status} - {message}")
            }
            FetchError::Transport(msg) => write!(f, "connection error fetching products: {msg}"),
            FetchError::Decode(msg) => write!(f, "product page decode error: {msg}"),
            FetchError::TooManyPages(n) => {
                write!(f, "product pagination did not terminate after {n} pages")
            }
        }
    }
}

impl std::error::Error for FetchError {}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Remote inventory API contract.
///
/// Object-safe so callers can hold a `Box<dyn CatalogApi>`.
#[async_trait::async_trait]
pub trait CatalogApi: Send + Sync {
    /// Human-readable name identifying this backend (e.g. `"siigo"`).
    fn name(&self) -> &'static str;

    /// Exchange a principal and the shared secret for a session token.
    async fn authenticate(&self, principal: &str, secret: &str) -> Result<AuthToken, AuthError>;

    /// Fetch one page of the product listing (1-based `page`).
    ///
    /// Returns the decoded response body untouched; it may be a bare list or
    /// an object wrapping the list. See [`crate::fetcher::page_items`].
    async fn list_products(
        &self,
        token: &AuthToken,
        page: u32,
        page_size: usize,
    ) -> Result<Value, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_debug_is_redacted() {
        let t = AuthToken::new("eyJhbGciOi.secret");
        assert_eq!(format!("{t:?}"), "AuthToken(<REDACTED>)");
        assert_eq!(t.as_str(), "eyJhbGciOi.secret");
    }

    #[test]
    fn fetch_error_display_carries_status_and_message() {
        let err = FetchError::Http {
            status: 429,
            message: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "error fetching products: 429 - rate limited");
    }

    #[test]
    fn auth_error_display_carries_status_and_message() {
        let err = AuthError::Rejected {
            status: 401,
            message: "invalid_user".to_string(),
        };
        assert_eq!(err.to_string(), "authentication rejected: 401 - invalid_user");
    }
}
