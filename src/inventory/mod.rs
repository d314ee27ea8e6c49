//! Proposal inventory - lazily paginated, lifecycle-partitioned proposals
//!
//! A `ProposalInventory` is one session against a politeiawww server. It
//! performs the version handshake once, builds the token catalogue once,
//! and hands out consecutive pages per category. Each page is fetched
//! (bodies plus vote summaries) before its category cursor advances.

mod batch;
mod catalogue;
mod category;
mod cursor;
mod fetcher;

pub use batch::{ProposalRecord, ResultBatch};
pub use catalogue::{Catalogue, CatalogueCache, CategoryCounts};
pub use category::{Category, CategoryPolicy, OrderingKey};
pub use cursor::{CategoryCursor, PendingTokens};
pub use fetcher::{merge, DualFetcher};

use crate::error::AppError;
use crate::politeia::{CommentsReply, RemoteGateway, ServerPolicy, ServerVersion};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Server identity and limits learned during the handshake.
#[derive(Debug, Clone)]
pub struct Handshake {
    pub version: ServerVersion,
    pub policy: ServerPolicy,
}

/// Size and read position of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStatus {
    pub category: Category,
    pub count: usize,
    pub position: usize,
    pub has_vote_summary: bool,
}

/// Proposal inventory session
pub struct ProposalInventory {
    gateway: Arc<dyn RemoteGateway>,
    handshake: OnceCell<Handshake>,
    catalogue: CatalogueCache,
    cursor: CategoryCursor,
    fetcher: DualFetcher,
}

impl ProposalInventory {
    pub fn new(gateway: Arc<dyn RemoteGateway>) -> Self {
        Self {
            fetcher: DualFetcher::new(gateway.clone()),
            gateway,
            handshake: OnceCell::new(),
            catalogue: CatalogueCache::new(),
            cursor: CategoryCursor::new(),
        }
    }

    async fn handshake(&self) -> Result<&Handshake, AppError> {
        self.handshake
            .get_or_try_init(|| async {
                let version = self.gateway.fetch_version().await?;
                let policy = self.gateway.fetch_policy().await?;
                info!(
                    version = version.version,
                    route = %version.route,
                    testnet = version.test_net,
                    page_size = policy.proposal_list_page_size,
                    "Politeiawww session established"
                );
                Ok::<_, AppError>(Handshake { version, policy })
            })
            .await
    }

    pub async fn version(&self) -> Result<ServerVersion, AppError> {
        Ok(self.handshake().await?.version.clone())
    }

    pub async fn policy(&self) -> Result<ServerPolicy, AppError> {
        Ok(self.handshake().await?.policy.clone())
    }

    /// The session catalogue, built on first use.
    pub async fn catalogue(&self) -> Result<Arc<Catalogue>, AppError> {
        self.handshake().await?;
        self.catalogue.get_catalogue(self.gateway.as_ref()).await
    }

    pub async fn count(&self, category: Category) -> Result<usize, AppError> {
        Ok(self.catalogue().await?.count(category))
    }

    pub async fn counts(&self) -> Result<CategoryCounts, AppError> {
        Ok(self.catalogue().await?.counts())
    }

    /// Tokens of `category` already handed out.
    pub fn position(&self, category: Category) -> usize {
        self.cursor.position(category)
    }

    pub async fn categories(&self) -> Result<Vec<CategoryStatus>, AppError> {
        let catalogue = self.catalogue().await?;
        let mut statuses = Vec::with_capacity(Category::COUNT);
        for category in Category::ALL {
            statuses.push(CategoryStatus {
                category,
                count: catalogue.count(category),
                position: self.cursor.position(category),
                has_vote_summary: category.has_vote_summary(),
            });
        }
        Ok(statuses)
    }

    /// Load the next `n` proposals of `category`.
    ///
    /// Returns an exhausted batch once the category has been fully read.
    /// On error the category position is left where it was, so the same
    /// page can be requested again.
    pub async fn load(&self, category: Category, n: usize) -> Result<ResultBatch, AppError> {
        let max_batch = self.handshake().await?.policy.proposal_list_page_size;
        let catalogue = self.catalogue.get_catalogue(self.gateway.as_ref()).await?;

        let pending = self.cursor.tokens_to_load(&catalogue, category, n).await;
        if pending.is_exhausted() {
            debug!(%category, "Category exhausted");
            return Ok(ResultBatch::exhausted(category, pending.commit()));
        }

        let result = self
            .fetcher
            .fetch(pending.tokens(), category.has_vote_summary(), max_batch)
            .await;

        match result {
            Ok(records) => {
                let position = pending.commit();
                info!(
                    %category,
                    requested = n,
                    returned = records.len(),
                    position,
                    "Loaded proposal page"
                );
                Ok(ResultBatch::new(category, records, position))
            }
            Err(e) => {
                warn!(%category, requested = n, error = %e, "Proposal page failed; position unchanged");
                Err(e)
            }
        }
    }

    pub async fn load_pre_vote(&self, n: usize) -> Result<ResultBatch, AppError> {
        self.load(Category::PreVote, n).await
    }

    pub async fn load_active(&self, n: usize) -> Result<ResultBatch, AppError> {
        self.load(Category::Active, n).await
    }

    pub async fn load_approved(&self, n: usize) -> Result<ResultBatch, AppError> {
        self.load(Category::Approved, n).await
    }

    pub async fn load_rejected(&self, n: usize) -> Result<ResultBatch, AppError> {
        self.load(Category::Rejected, n).await
    }

    pub async fn load_abandoned(&self, n: usize) -> Result<ResultBatch, AppError> {
        self.load(Category::Abandoned, n).await
    }

    /// A single proposal by full token or prefix, optionally at `version`.
    ///
    /// The vote summary is included when the catalogue lists the token in a
    /// category that carries one. Cursors are not touched.
    pub async fn proposal(
        &self,
        token: &str,
        version: Option<&str>,
    ) -> Result<ProposalRecord, AppError> {
        let catalogue = self.catalogue().await?;
        let (token, include_vote_summary) = match catalogue.locate(token) {
            Some((category, full)) => (full, category.has_vote_summary()),
            None => (token, false),
        };
        self.fetcher
            .fetch_one(token, version, include_vote_summary)
            .await
    }

    pub async fn comments(&self, token: &str) -> Result<CommentsReply, AppError> {
        self.handshake().await?;
        self.gateway.fetch_comments(token).await
    }
}
