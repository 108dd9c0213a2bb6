use std::fmt;

use chrono::Duration;
use imon_catalog::{AuthError, AuthToken, CatalogApi};
use imon_schemas::{MinimumStockRecord, RemoteStockRecord};
use imon_store::{minimum_stock_namespace, CATALOG_NAMESPACE, DEFAULT_MAX_AGE_HOURS};
use tracing::info;

/// Everything one user's session carries between pipeline calls.
///
/// Nothing here is process-global: two sessions never share memory, only the
/// store behind the shared catalog namespace.
pub struct SessionContext {
    pub user: String,
    pub token: AuthToken,
    pub minimum_stock_ns: String,
    pub catalog_ns: String,
    pub catalog_max_age: Duration,
    pub page_size: usize,
    /// Bypass session memory and the shared snapshot on the next check.
    /// Cleared once that check has a catalog.
    pub force_refresh: bool,
    pub(crate) minimum_stock: Option<Vec<MinimumStockRecord>>,
    pub(crate) catalog: Option<Vec<RemoteStockRecord>>,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("user", &self.user)
            .field("token", &self.token)
            .field("minimum_stock_ns", &self.minimum_stock_ns)
            .field("catalog_ns", &self.catalog_ns)
            .field("force_refresh", &self.force_refresh)
            .field(
                "minimum_stock",
                &self.minimum_stock.as_ref().map(|v| v.len()),
            )
            .field("catalog", &self.catalog.as_ref().map(|v| v.len()))
            .finish()
    }
}

impl SessionContext {
    pub fn new(user: impl Into<String>, token: AuthToken) -> Self {
        let user = user.into();
        Self {
            minimum_stock_ns: minimum_stock_namespace(&user),
            catalog_ns: CATALOG_NAMESPACE.to_string(),
            user,
            token,
            catalog_max_age: Duration::hours(DEFAULT_MAX_AGE_HOURS),
            page_size: 100,
            force_refresh: false,
            minimum_stock: None,
            catalog: None,
        }
    }

    pub fn with_catalog_max_age(mut self, max_age: Duration) -> Self {
        self.catalog_max_age = max_age;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn request_refresh(&mut self) {
        self.force_refresh = true;
    }

    pub fn minimum_stock(&self) -> Option<&[MinimumStockRecord]> {
        self.minimum_stock.as_deref()
    }

    pub fn catalog(&self) -> Option<&[RemoteStockRecord]> {
        self.catalog.as_deref()
    }
}

/// Authenticate `user` and open a session.
///
/// The secret is passed through to the API and never stored or logged.
pub async fn login(
    api: &dyn CatalogApi,
    user: &str,
    secret: &str,
) -> Result<SessionContext, AuthError> {
    let token = api.authenticate(user, secret).await?;
    info!(source = api.name(), user, "session opened");
    Ok(SessionContext::new(user, token))
}
