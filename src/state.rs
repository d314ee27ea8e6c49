//! Application state management
//!
//! Contains shared state accessible across all handlers.

use crate::config::PagingConfig;
use crate::inventory::ProposalInventory;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// The server-lifetime inventory session; its cursors are shared by all
    /// clients of this service
    pub inventory: ProposalInventory,

    /// Page size bounds for the next-page route
    pub paging: PagingConfig,
}

impl AppState {
    pub fn new(inventory: ProposalInventory, paging: PagingConfig) -> Self {
        Self { inventory, paging }
    }
}

/// Type alias for shared application state
pub type SharedState = Arc<AppState>;
