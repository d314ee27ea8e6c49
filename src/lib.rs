//! Proposal inventory - browse a politeiawww proposal catalogue by lifecycle
//! category, one page at a time.
//!
//! The library core is [`inventory::ProposalInventory`]; [`routes`] exposes
//! it as a read-only JSON API.

pub mod config;
pub mod error;
pub mod inventory;
pub mod models;
pub mod politeia;
pub mod routes;
pub mod state;

pub use error::{ApiResult, AppError};
pub use inventory::{Category, ProposalInventory, ProposalRecord, ResultBatch};
pub use politeia::{PoliteiaClient, RemoteGateway};
