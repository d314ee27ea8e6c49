//! In-memory gateway for tests

use super::*;
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub(crate) fn proposal(token: &str) -> Proposal {
    Proposal {
        name: format!("Proposal {}", token),
        version: "1".to_string(),
        censorship_record: CensorshipRecord {
            token: token.to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub(crate) fn summary(end_height: u64) -> VoteSummary {
    VoteSummary {
        status: PropVoteStatus::Finished,
        end_height,
        quorum_percentage: 20,
        pass_percentage: 60,
        ..Default::default()
    }
}

pub(crate) fn tokens(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Scripted gateway with call counters.
///
/// Proposal batches answer with every known requested token, in request
/// order; unknown tokens are left out like the server does.
#[derive(Default)]
pub(crate) struct MockGateway {
    pub inventory: TokenInventory,
    pub proposals: HashMap<String, Proposal>,
    pub summaries: HashMap<String, VoteSummary>,
    pub page_size: usize,
    pub comments: CommentsReply,
    pub inventory_delay: Option<Duration>,
    pub batch_delay: Option<Duration>,
    pub reverse_batches: bool,

    pub inventory_failures: AtomicUsize,
    pub fail_proposals: AtomicBool,
    pub fail_summaries: AtomicBool,

    pub version_calls: AtomicUsize,
    pub policy_calls: AtomicUsize,
    pub inventory_calls: AtomicUsize,
    pub batch_calls: AtomicUsize,
    /// Proposal batches that ran to the end
    pub batch_completions: AtomicUsize,
    pub summary_calls: AtomicUsize,
    pub details_calls: AtomicUsize,
    pub batch_requests: Mutex<Vec<Vec<String>>>,
}

impl MockGateway {
    /// Gateway whose server knows a body for every catalogued token and a
    /// vote summary for every token in a summary-carrying category.
    pub fn with_inventory(inventory: TokenInventory) -> Self {
        let mut gateway = MockGateway {
            page_size: 20,
            ..Default::default()
        };
        let all = inventory
            .pre
            .iter()
            .chain(&inventory.active)
            .chain(&inventory.approved)
            .chain(&inventory.rejected)
            .chain(&inventory.abandoned);
        for token in all {
            gateway.proposals.insert(token.clone(), proposal(token));
        }
        let voted = inventory
            .active
            .iter()
            .chain(&inventory.approved)
            .chain(&inventory.rejected);
        for (i, token) in voted.enumerate() {
            gateway.summaries.insert(token.clone(), summary(1000 + i as u64));
        }
        gateway.inventory = inventory;
        gateway
    }

    pub fn active(names: &[&str]) -> Self {
        Self::with_inventory(TokenInventory {
            active: tokens(names),
            ..Default::default()
        })
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

fn unavailable(what: &str) -> AppError {
    AppError::RemoteUnavailable(format!("mock {} failure", what))
}

#[async_trait]
impl RemoteGateway for MockGateway {
    async fn fetch_version(&self) -> Result<ServerVersion, AppError> {
        self.version_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ServerVersion {
            version: 1,
            route: "/v1".to_string(),
            ..Default::default()
        })
    }

    async fn fetch_policy(&self) -> Result<ServerPolicy, AppError> {
        self.policy_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ServerPolicy {
            proposal_list_page_size: self.page_size,
        })
    }

    async fn fetch_inventory(&self) -> Result<TokenInventory, AppError> {
        self.inventory_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.inventory_delay {
            tokio::time::sleep(delay).await;
        }
        let failures = self.inventory_failures.load(Ordering::SeqCst);
        if failures > 0 {
            self.inventory_failures.store(failures - 1, Ordering::SeqCst);
            return Err(unavailable("inventory"));
        }
        Ok(self.inventory.clone())
    }

    async fn fetch_proposal_batch(&self, tokens: &[String]) -> Result<Vec<Proposal>, AppError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        self.batch_requests
            .lock()
            .unwrap()
            .push(tokens.to_vec());
        if let Some(delay) = self.batch_delay {
            tokio::time::sleep(delay).await;
        }
        self.batch_completions.fetch_add(1, Ordering::SeqCst);
        if self.fail_proposals.load(Ordering::SeqCst) {
            return Err(unavailable("proposal batch"));
        }
        let mut found: Vec<Proposal> = tokens
            .iter()
            .filter_map(|t| self.proposals.get(t).cloned())
            .collect();
        if self.reverse_batches {
            found.reverse();
        }
        Ok(found)
    }

    async fn fetch_vote_summary_batch(
        &self,
        tokens: &[String],
    ) -> Result<BatchVoteSummaryReply, AppError> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_summaries.load(Ordering::SeqCst) {
            return Err(unavailable("vote summary"));
        }
        let summaries = tokens
            .iter()
            .filter_map(|t| self.summaries.get(t).map(|s| (t.clone(), s.clone())))
            .collect();
        Ok(BatchVoteSummaryReply {
            summaries,
            best_block: 999,
        })
    }

    async fn fetch_proposal_details(
        &self,
        token: &str,
        _version: Option<&str>,
    ) -> Result<Proposal, AppError> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_proposals.load(Ordering::SeqCst) {
            return Err(unavailable("proposal details"));
        }
        self.proposals
            .get(token)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("resource not found: /proposals/{}", token)))
    }

    async fn fetch_comments(&self, token: &str) -> Result<CommentsReply, AppError> {
        if !self.proposals.contains_key(token) {
            return Err(AppError::NotFound(format!(
                "resource not found: /proposals/{}/comments",
                token
            )));
        }
        Ok(self.comments.clone())
    }
}
