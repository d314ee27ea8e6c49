//! Concurrent proposal + vote summary retrieval
//!
//! Both halves of a fetch run as their own tasks and are always joined
//! before returning. A failure in either half fails the whole fetch; no
//! partial page is ever produced.

use super::batch::ProposalRecord;
use crate::error::AppError;
use crate::politeia::{BatchVoteSummaryReply, Proposal, RemoteGateway};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, warn};

pub struct DualFetcher {
    gateway: Arc<dyn RemoteGateway>,
}

impl DualFetcher {
    pub fn new(gateway: Arc<dyn RemoteGateway>) -> Self {
        Self { gateway }
    }

    /// Fetch and merge records for `tokens`, at most `max_batch` tokens per
    /// round trip. Output follows the order of the proposal batch replies.
    pub async fn fetch(
        &self,
        tokens: &[String],
        include_vote_summary: bool,
        max_batch: usize,
    ) -> Result<Vec<ProposalRecord>, AppError> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut records = Vec::with_capacity(tokens.len());
        for chunk in tokens.chunks(max_batch.max(1)) {
            let merged = self.fetch_chunk(chunk.to_vec(), include_vote_summary).await?;
            records.extend(merged);
        }
        Ok(records)
    }

    async fn fetch_chunk(
        &self,
        tokens: Vec<String>,
        include_vote_summary: bool,
    ) -> Result<Vec<ProposalRecord>, AppError> {
        debug!(
            tokens = tokens.len(),
            include_vote_summary, "Dispatching proposal batch"
        );
        let tokens = Arc::new(tokens);

        let proposals = {
            let gateway = self.gateway.clone();
            let tokens = tokens.clone();
            ScopedTask::spawn(async move { gateway.fetch_proposal_batch(&tokens).await })
        };
        let summaries = include_vote_summary.then(|| {
            let gateway = self.gateway.clone();
            let tokens = tokens.clone();
            ScopedTask::spawn(async move { gateway.fetch_vote_summary_batch(&tokens).await })
        });

        let (proposals, summaries) = tokio::join!(proposals, async move {
            match summaries {
                Some(task) => Some(task.await),
                None => None,
            }
        });

        let proposals = joined(proposals, "proposal batch");
        let summaries = summaries.map(|s| joined(s, "vote summary batch")).transpose();
        match (proposals, summaries) {
            (Ok(proposals), Ok(summaries)) => Ok(merge(proposals, summaries)),
            (Err(e), _) | (_, Err(e)) => {
                warn!(tokens = tokens.len(), error = %e, "Proposal batch fetch failed");
                Err(e)
            }
        }
    }

    /// Fetch one proposal (optionally at `version`) with its vote summary.
    pub async fn fetch_one(
        &self,
        token: &str,
        version: Option<&str>,
        include_vote_summary: bool,
    ) -> Result<ProposalRecord, AppError> {
        let details = {
            let gateway = self.gateway.clone();
            let token = token.to_string();
            let version = version.map(str::to_string);
            ScopedTask::spawn(async move {
                gateway
                    .fetch_proposal_details(&token, version.as_deref())
                    .await
            })
        };
        let summaries = include_vote_summary.then(|| {
            let gateway = self.gateway.clone();
            let tokens = vec![token.to_string()];
            ScopedTask::spawn(async move { gateway.fetch_vote_summary_batch(&tokens).await })
        });

        let (details, summaries) = tokio::join!(details, async move {
            match summaries {
                Some(task) => Some(task.await),
                None => None,
            }
        });

        let proposal = joined(details, "proposal details")?;
        let summaries = summaries
            .map(|s| joined(s, "vote summary batch"))
            .transpose()?;

        let mut records = merge(vec![proposal], summaries);
        records
            .pop()
            .ok_or_else(|| AppError::Internal("merge dropped a proposal".to_string()))
    }
}

/// A spawned sub-fetch that is aborted if its caller goes away before
/// joining it.
struct ScopedTask<T>(JoinHandle<T>);

impl<T: Send + 'static> ScopedTask<T> {
    fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self(tokio::spawn(future))
    }
}

impl<T> Future for ScopedTask<T> {
    type Output = Result<T, JoinError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx)
    }
}

impl<T> Drop for ScopedTask<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Flatten a joined task result; an aborted or panicked task counts as the
/// remote being unavailable.
fn joined<T>(result: Result<Result<T, AppError>, JoinError>, what: &str) -> Result<T, AppError> {
    result.unwrap_or_else(|e| {
        Err(AppError::RemoteUnavailable(format!(
            "{} task did not complete: {}",
            what, e
        )))
    })
}

/// Attach each proposal's vote summary by censorship token.
///
/// Proposals without a summary are kept with none attached.
pub fn merge(
    proposals: Vec<Proposal>,
    summaries: Option<BatchVoteSummaryReply>,
) -> Vec<ProposalRecord> {
    let summaries = summaries.map(|reply| reply.summaries).unwrap_or_default();
    proposals
        .into_iter()
        .map(|proposal| {
            let vote_summary = summaries.get(proposal.token()).cloned();
            ProposalRecord {
                proposal,
                vote_summary,
            }
        })
        .collect()
}
