//! Token catalogue and its one-shot cache
//!
//! The catalogue is fetched once per session and never refreshed: a
//! long-lived session does not observe server-side inventory changes.

use super::category::Category;
use crate::error::AppError;
use crate::politeia::{RemoteGateway, TokenInventory};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

/// Categorized, server-ordered censorship tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalogue {
    tokens: [Vec<String>; Category::COUNT],
}

impl Catalogue {
    pub fn tokens(&self, category: Category) -> &[String] {
        &self.tokens[category.index()]
    }

    pub fn count(&self, category: Category) -> usize {
        self.tokens[category.index()].len()
    }

    pub fn counts(&self) -> CategoryCounts {
        CategoryCounts {
            pre_vote: self.count(Category::PreVote),
            active: self.count(Category::Active),
            approved: self.count(Category::Approved),
            rejected: self.count(Category::Rejected),
            abandoned: self.count(Category::Abandoned),
        }
    }

    /// Category and full token for a full token or a token prefix.
    pub fn locate(&self, token: &str) -> Option<(Category, &str)> {
        if token.is_empty() {
            return None;
        }
        Category::ALL.into_iter().find_map(|c| {
            self.tokens(c)
                .iter()
                .find(|t| t.starts_with(token))
                .map(|t| (c, t.as_str()))
        })
    }
}

impl From<TokenInventory> for Catalogue {
    fn from(inv: TokenInventory) -> Self {
        Self {
            tokens: [inv.pre, inv.active, inv.approved, inv.rejected, inv.abandoned],
        }
    }
}

/// Number of proposals per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCounts {
    pub pre_vote: usize,
    pub active: usize,
    pub approved: usize,
    pub rejected: usize,
    pub abandoned: usize,
}

/// Lazily built, memoized catalogue.
///
/// Concurrent first callers share a single inventory fetch. A failed build
/// leaves the cache empty so the next call retries.
pub struct CatalogueCache {
    cell: OnceCell<Arc<Catalogue>>,
}

impl CatalogueCache {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    pub fn is_built(&self) -> bool {
        self.cell.initialized()
    }

    /// Memoized catalogue, fetching the inventory on first use.
    pub async fn get_catalogue(&self, gateway: &dyn RemoteGateway) -> Result<Arc<Catalogue>, AppError> {
        self.cell
            .get_or_try_init(|| async {
                let catalogue = Catalogue::from(gateway.fetch_inventory().await?);
                let counts = catalogue.counts();
                info!(
                    pre_vote = counts.pre_vote,
                    active = counts.active,
                    approved = counts.approved,
                    rejected = counts.rejected,
                    abandoned = counts.abandoned,
                    "Proposal catalogue built"
                );
                Ok::<_, AppError>(Arc::new(catalogue))
            })
            .await
            .cloned()
    }
}

impl Default for CatalogueCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::politeia::mock::{tokens, MockGateway};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn inventory() -> TokenInventory {
        TokenInventory {
            pre: tokens(&["p1"]),
            active: tokens(&["a1", "a2"]),
            approved: tokens(&["ap1"]),
            rejected: vec![],
            abandoned: tokens(&["ab1", "ab2", "ab3"]),
        }
    }

    #[test]
    fn test_catalogue_preserves_server_order() {
        let catalogue = Catalogue::from(inventory());
        assert_eq!(catalogue.tokens(Category::Abandoned), &tokens(&["ab1", "ab2", "ab3"])[..]);
        assert_eq!(
            catalogue.counts(),
            CategoryCounts {
                pre_vote: 1,
                active: 2,
                approved: 1,
                rejected: 0,
                abandoned: 3,
            }
        );
    }

    #[test]
    fn test_locate() {
        let catalogue = Catalogue::from(inventory());
        assert_eq!(catalogue.locate("a2"), Some((Category::Active, "a2")));
        assert_eq!(catalogue.locate("ab3"), Some((Category::Abandoned, "ab3")));
        assert_eq!(catalogue.locate("zz"), None);
        assert_eq!(catalogue.locate(""), None);
    }

    #[test]
    fn test_locate_resolves_prefix() {
        let catalogue = Catalogue::from(TokenInventory {
            approved: vec!["27f87171d98b7923a1bd2bee6affed929fa2d2a6e178b5c80a9971a92a5c7f50".to_string()],
            ..Default::default()
        });
        let (category, full) = catalogue.locate("27f8717").unwrap();
        assert_eq!(category, Category::Approved);
        assert_eq!(full.len(), 64);
    }

    #[tokio::test]
    async fn test_sequential_calls_fetch_once() {
        let gateway = MockGateway::with_inventory(inventory());
        let cache = CatalogueCache::new();
        assert!(!cache.is_built());

        let first = cache.get_catalogue(&gateway).await.unwrap();
        let second = cache.get_catalogue(&gateway).await.unwrap();

        assert!(cache.is_built());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(MockGateway::calls(&gateway.inventory_calls), 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_access_fetches_once() {
        let mut gateway = MockGateway::with_inventory(inventory());
        gateway.inventory_delay = Some(Duration::from_millis(20));
        let gateway = Arc::new(gateway);
        let cache = Arc::new(CatalogueCache::new());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let gateway = gateway.clone();
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                cache.get_catalogue(gateway.as_ref()).await.map(|c| c.count(Category::Active))
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), 2);
        }

        assert_eq!(MockGateway::calls(&gateway.inventory_calls), 1);
    }

    #[tokio::test]
    async fn test_failed_build_is_not_cached() {
        let gateway = MockGateway::with_inventory(inventory());
        gateway.inventory_failures.store(1, std::sync::atomic::Ordering::SeqCst);
        let cache = CatalogueCache::new();

        let err = cache.get_catalogue(&gateway).await.unwrap_err();
        assert!(matches!(err, AppError::RemoteUnavailable(_)));
        assert!(!cache.is_built());

        let catalogue = cache.get_catalogue(&gateway).await.unwrap();
        assert_eq!(catalogue.count(Category::PreVote), 1);
        assert_eq!(MockGateway::calls(&gateway.inventory_calls), 2);
    }
}
