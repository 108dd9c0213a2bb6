//! imon-runtime
//!
//! The check pipeline, driven through an explicit [`SessionContext`]:
//!
//! 1. `login` exchanges credentials for a token and opens a session.
//! 2. `upload_minimum_stock` normalizes a sheet, keeps it in the session and
//!    persists it to the user's namespace.
//! 3. `run_check` resolves the catalog (session memory, then the shared
//!    snapshot if fresh, then a full fetch) and reconciles.
//!
//! Auth and fetch errors abort the operation. Cache failures never do; they
//! come back as warnings on the outcome.

mod error;
mod pipeline;
mod session;

pub use error::PipelineError;
pub use pipeline::{
    load_minimum_stock, run_check, upload_minimum_stock, CatalogSource, CheckOutcome,
    UploadOutcome,
};
pub use session::{login, SessionContext};
