//! Politeia gateway - the remote side of the proposal inventory
//!
//! `RemoteGateway` is the seam between the inventory core and the
//! politeiawww server. `PoliteiaClient` is the HTTP implementation; tests
//! substitute an in-memory gateway.

mod client;
mod error_codes;
mod token;
mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use client::PoliteiaClient;
pub use error_codes::{ErrorReply, ErrorStatusCode};
pub use token::{is_full_token, validate_token, TOKEN_PREFIX_LEN};
pub use types::*;

use crate::error::AppError;
use async_trait::async_trait;

/// Authenticated request/response exchange with a politeiawww server.
///
/// `fetch_version` must be the first call of a session: it establishes the
/// anti-forgery token and session cookie that the batch (POST) routes need.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn fetch_version(&self) -> Result<ServerVersion, AppError>;

    async fn fetch_policy(&self) -> Result<ServerPolicy, AppError>;

    async fn fetch_inventory(&self) -> Result<TokenInventory, AppError>;

    /// Proposal bodies (without file payloads) for up to
    /// `proposallistpagesize` tokens.
    async fn fetch_proposal_batch(&self, tokens: &[String]) -> Result<Vec<Proposal>, AppError>;

    async fn fetch_vote_summary_batch(
        &self,
        tokens: &[String],
    ) -> Result<BatchVoteSummaryReply, AppError>;

    /// Full proposal, optionally at a specific version. Accepts a full token
    /// or its 7 character prefix.
    async fn fetch_proposal_details(
        &self,
        token: &str,
        version: Option<&str>,
    ) -> Result<Proposal, AppError>;

    async fn fetch_comments(&self, token: &str) -> Result<CommentsReply, AppError>;
}
