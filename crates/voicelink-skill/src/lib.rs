//! Voice intent routing.
//!
//! Maps an inbound voice-platform envelope to one of a fixed set of
//! handlers (launch, query, help, cancel/stop, session-end) and builds the
//! spoken response. Handlers return `Result`; a single terminal conversion
//! step turns any error into the localized spoken error phrase, so nothing
//! ever escapes past the router boundary to the platform.

mod config;
mod router;
mod session;

pub use config::SkillConfig;
pub use router::{SkillRouter, QUERY_INTENT};
pub use session::{SessionState, SessionStore};

use thiserror::Error;

/// Classified handler failures, all absorbed at the router boundary.
#[derive(Debug, Error)]
pub enum SkillError {
    #[error("no account-linking token from the platform or debug configuration")]
    MissingAccountLink,

    #[error("missing or empty {0:?} slot")]
    MissingSlot(&'static str),

    #[error("unrecognized intent {0:?}")]
    UnknownIntent(String),

    #[error("unrecognized request type")]
    UnknownRequest,
}
