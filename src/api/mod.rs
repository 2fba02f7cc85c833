//! Catalog API access
//!
//! - `xtream`: client for Xtream-style `player_api.php` servers
//! - `requests`: in-flight request bookkeeping so late responses for a
//!   superseded selection are dropped

pub mod requests;
pub mod xtream;

use thiserror::Error;

use crate::models::CatalogKind;

pub use requests::{CatalogPayload, CatalogRequest, CatalogResponse, RequestTicket, RequestTracker};
pub use xtream::{normalize_host, stream_url, XtreamClient, MIN_SEARCH_LENGTH};

/// Catalog API error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Bad credentials or expired account; shown to the user as-is
    #[error("{0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server returned HTTP {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("{0} has no detail endpoint")]
    UnsupportedKind(CatalogKind),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Network(e.to_string())
    }
}

impl ApiError {
    /// Whether the error came from the network or server rather than the account
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Status(_))
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth(_))
    }
}
