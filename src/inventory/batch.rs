//! Merged proposal records and the resettable page that carries them

use super::category::Category;
use crate::politeia::{Proposal, VoteSummary};
use serde::Serialize;

/// A proposal body joined with its vote summary, keyed by censorship token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRecord {
    pub proposal: Proposal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_summary: Option<VoteSummary>,
}

impl ProposalRecord {
    pub fn token(&self) -> &str {
        self.proposal.token()
    }
}

/// One page of records from a category.
///
/// The batch is its own cursor: `next` walks the records front to back and
/// `reset` rewinds without going back to the server. An exhausted batch is
/// empty and tells the caller the category has nothing left.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultBatch {
    category: Category,
    records: Vec<ProposalRecord>,
    exhausted: bool,
    /// Category position after this page was committed
    position: usize,
    #[serde(skip)]
    cursor: usize,
}

impl ResultBatch {
    pub fn new(category: Category, records: Vec<ProposalRecord>, position: usize) -> Self {
        Self {
            category,
            records,
            exhausted: false,
            position,
            cursor: 0,
        }
    }

    pub fn exhausted(category: Category, position: usize) -> Self {
        Self {
            category,
            records: Vec::new(),
            exhausted: true,
            position,
            cursor: 0,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records not yet returned by `next`.
    pub fn remaining(&self) -> usize {
        self.records.len() - self.cursor
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn records(&self) -> &[ProposalRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ProposalRecord> {
        self.records
    }
}

impl Iterator for ResultBatch {
    type Item = ProposalRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<'a> IntoIterator for &'a ResultBatch {
    type Item = &'a ProposalRecord;
    type IntoIter = std::slice::Iter<'a, ProposalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::politeia::mock::{proposal, summary};
    use pretty_assertions::assert_eq;

    fn batch() -> ResultBatch {
        let records = ["t1", "t2", "t3"]
            .iter()
            .map(|t| ProposalRecord {
                proposal: proposal(t),
                vote_summary: Some(summary(100)),
            })
            .collect();
        ResultBatch::new(Category::Active, records, 3)
    }

    fn tokens(batch: &mut ResultBatch) -> Vec<String> {
        batch.by_ref().map(|r| r.token().to_string()).collect()
    }

    #[test]
    fn test_iterates_in_order_and_ends() {
        let mut batch = batch();
        assert_eq!(batch.remaining(), 3);
        assert_eq!(tokens(&mut batch), vec!["t1", "t2", "t3"]);
        assert_eq!(batch.remaining(), 0);
        assert!(batch.next().is_none());
        assert!(batch.next().is_none());
    }

    #[test]
    fn test_reset_rewinds_the_same_page() {
        let mut batch = batch();
        let first = batch.next().unwrap();
        batch.next();
        batch.reset();
        assert_eq!(batch.remaining(), 3);
        assert_eq!(batch.next().unwrap(), first);
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn test_borrowed_iteration_leaves_cursor_alone() {
        let mut batch = batch();
        batch.next();
        let seen: Vec<&str> = (&batch).into_iter().map(ProposalRecord::token).collect();
        assert_eq!(seen, vec!["t1", "t2", "t3"]);
        assert_eq!(batch.remaining(), 2);
    }

    #[test]
    fn test_exhausted_batch() {
        let mut batch = ResultBatch::exhausted(Category::Rejected, 7);
        assert!(batch.is_exhausted());
        assert!(batch.is_empty());
        assert_eq!(batch.position(), 7);
        assert!(batch.next().is_none());
    }

    #[test]
    fn test_serializes_without_cursor() {
        let mut batch = batch();
        batch.next();
        let value = serde_json::to_value(&batch).unwrap();
        assert_eq!(value["category"], "active");
        assert_eq!(value["exhausted"], false);
        assert_eq!(value["records"].as_array().unwrap().len(), 3);
        assert!(value.get("cursor").is_none());
        assert_eq!(value["records"][0]["voteSummary"]["endheight"], 100);
    }
}
