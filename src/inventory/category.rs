//! Proposal lifecycle categories and their fixed policy table

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of five mutually exclusive lifecycle stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    PreVote,
    Active,
    Approved,
    Rejected,
    Abandoned,
}

/// How the server orders a category's tokens (always descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingKey {
    RecordTimestamp,
    VoteEndHeight,
}

/// Static per-category policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryPolicy {
    pub has_vote_summary: bool,
    pub ordering: OrderingKey,
}

const POLICIES: [CategoryPolicy; Category::COUNT] = [
    // pre-vote
    CategoryPolicy { has_vote_summary: false, ordering: OrderingKey::RecordTimestamp },
    // active
    CategoryPolicy { has_vote_summary: true, ordering: OrderingKey::VoteEndHeight },
    // approved
    CategoryPolicy { has_vote_summary: true, ordering: OrderingKey::VoteEndHeight },
    // rejected
    CategoryPolicy { has_vote_summary: true, ordering: OrderingKey::VoteEndHeight },
    // abandoned
    CategoryPolicy { has_vote_summary: false, ordering: OrderingKey::RecordTimestamp },
];

impl Category {
    pub const COUNT: usize = 5;

    /// All categories in numeric id order.
    pub const ALL: [Category; Category::COUNT] = [
        Category::PreVote,
        Category::Active,
        Category::Approved,
        Category::Rejected,
        Category::Abandoned,
    ];

    /// Numeric id (0 = pre-vote .. 4 = abandoned)
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn policy(self) -> CategoryPolicy {
        POLICIES[self as usize]
    }

    /// Whether pages of this category carry vote summaries.
    pub const fn has_vote_summary(self) -> bool {
        self.policy().has_vote_summary
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Category::PreVote => "pre-vote",
            Category::Active => "active",
            Category::Approved => "approved",
            Category::Rejected => "rejected",
            Category::Abandoned => "abandoned",
        }
    }
}

impl TryFrom<i64> for Category {
    type Error = AppError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        usize::try_from(id)
            .ok()
            .and_then(|i| Category::ALL.get(i).copied())
            .ok_or_else(|| AppError::InvalidCategory(id.to_string()))
    }
}

impl FromStr for Category {
    type Err = AppError;

    /// Accepts a name (`pre-vote`, `prevote`, `pre`, `active`, ...) or a
    /// numeric id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pre-vote" | "prevote" | "pre_vote" | "pre" => Ok(Category::PreVote),
            "active" => Ok(Category::Active),
            "approved" => Ok(Category::Approved),
            "rejected" => Ok(Category::Rejected),
            "abandoned" => Ok(Category::Abandoned),
            other => other
                .parse::<i64>()
                .map_err(|_| AppError::InvalidCategory(s.to_string()))
                .and_then(Category::try_from),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
