use std::fmt;

use imon_catalog::{AuthError, FetchError};
use imon_upload::MissingColumnsError;

#[derive(Debug)]
pub enum PipelineError {
    Auth(AuthError),
    Fetch(FetchError),
    MissingColumns(MissingColumnsError),
    /// Neither the session nor the store holds a list for this user.
    NoMinimumStockList { user: String },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Auth(e) => write!(f, "{e}"),
            PipelineError::Fetch(e) => write!(f, "{e}"),
            PipelineError::MissingColumns(e) => write!(f, "{e}"),
            PipelineError::NoMinimumStockList { user } => {
                write!(f, "no minimum-stock list uploaded for '{user}'")
            }
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Auth(e) => Some(e),
            PipelineError::Fetch(e) => Some(e),
            PipelineError::MissingColumns(e) => Some(e),
            PipelineError::NoMinimumStockList { .. } => None,
        }
    }
}

impl From<AuthError> for PipelineError {
    fn from(e: AuthError) -> Self {
        PipelineError::Auth(e)
    }
}

impl From<FetchError> for PipelineError {
    fn from(e: FetchError) -> Self {
        PipelineError::Fetch(e)
    }
}

impl From<MissingColumnsError> for PipelineError {
    fn from(e: MissingColumnsError) -> Self {
        PipelineError::MissingColumns(e)
    }
}
