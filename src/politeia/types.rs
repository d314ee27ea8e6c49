//! politeiawww v1 wire types
//!
//! Field names follow the server's lowercase JSON keys. Every field the
//! server may omit carries `#[serde(default)]` so partial replies decode.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Decode an explicit `null` (the server's nil slice or map) as empty.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reply of `GET /version`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerVersion {
    pub version: u32,
    #[serde(default)]
    pub route: String,
    #[serde(default, rename = "pubkey")]
    pub public_key: String,
    #[serde(default, rename = "testnet")]
    pub test_net: bool,
    #[serde(default)]
    pub mode: String,
}

/// Reply of `GET /policy`; maxima the client must observe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerPolicy {
    #[serde(rename = "proposallistpagesize")]
    pub proposal_list_page_size: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalFile {
    pub name: String,
    pub mime: String,
    pub digest: String,
    #[serde(default)]
    pub payload: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "linkto")]
    pub link_to: String,
    #[serde(default, rename = "linkby")]
    pub link_by: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CensorshipRecord {
    pub token: String,
    #[serde(default)]
    pub merkle: String,
    #[serde(default)]
    pub signature: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOption {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub bits: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOptionResult {
    pub option: VoteOption,
    #[serde(rename = "votesreceived")]
    pub votes_received: u64,
}

/// Proposal vote status codes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum PropVoteStatus {
    #[default]
    Invalid,
    /// Vote has not been authorized by the author
    NotAuthorized,
    /// Vote has been authorized by the author
    Authorized,
    Started,
    Finished,
    DoesntExist,
    Unknown(u32),
}

impl From<u32> for PropVoteStatus {
    fn from(code: u32) -> Self {
        match code {
            0 => PropVoteStatus::Invalid,
            1 => PropVoteStatus::NotAuthorized,
            2 => PropVoteStatus::Authorized,
            3 => PropVoteStatus::Started,
            4 => PropVoteStatus::Finished,
            5 => PropVoteStatus::DoesntExist,
            other => PropVoteStatus::Unknown(other),
        }
    }
}

impl From<PropVoteStatus> for u32 {
    fn from(status: PropVoteStatus) -> Self {
        match status {
            PropVoteStatus::Invalid => 0,
            PropVoteStatus::NotAuthorized => 1,
            PropVoteStatus::Authorized => 2,
            PropVoteStatus::Started => 3,
            PropVoteStatus::Finished => 4,
            PropVoteStatus::DoesntExist => 5,
            PropVoteStatus::Unknown(other) => other,
        }
    }
}

/// Per-proposal vote status as embedded in proposal bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteStatus {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub status: PropVoteStatus,
    #[serde(default, rename = "totalvotes")]
    pub total_votes: u64,
    #[serde(default, rename = "optionsresult", deserialize_with = "null_as_default")]
    pub options_result: Vec<VoteOptionResult>,
    #[serde(default, rename = "endheight")]
    pub end_height: String,
    #[serde(default, rename = "bestblock")]
    pub best_block: String,
    #[serde(default, rename = "numofeligiblevotes")]
    pub num_of_eligible_votes: u64,
    #[serde(default, rename = "quorumpercentage")]
    pub quorum_percentage: u32,
    #[serde(default, rename = "passpercentage")]
    pub pass_percentage: u32,
}

/// Proposal body as returned by the batch and details routes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub name: String,
    #[serde(default)]
    pub state: u32,
    #[serde(default)]
    pub status: u32,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default, rename = "userid")]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, rename = "publickey")]
    pub public_key: String,
    #[serde(default)]
    pub signature: String,
    #[serde(default, rename = "numcomments")]
    pub num_comments: u32,
    #[serde(default)]
    pub version: String,
    #[serde(default, rename = "publishedat")]
    pub published_at: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<ProposalFile>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Vec<ProposalMetadata>,
    #[serde(rename = "censorshiprecord")]
    pub censorship_record: CensorshipRecord,
    #[serde(default, rename = "votestatus")]
    pub vote_status: VoteStatus,
}

impl Proposal {
    /// The censorship token this proposal is keyed by.
    pub fn token(&self) -> &str {
        &self.censorship_record.token
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProposalsReply {
    #[serde(default, deserialize_with = "null_as_default")]
    pub proposals: Vec<Proposal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProposalDetailsReply {
    pub proposal: Proposal,
}

/// Reply of `GET /proposals/tokeninventory`.
///
/// Pre and abandoned are sorted by record timestamp, active, approved and
/// rejected by voting period end height; all descending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInventory {
    #[serde(default, deserialize_with = "null_as_default")]
    pub pre: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub active: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub approved: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rejected: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub abandoned: Vec<String>,
}

/// Body of both batch POST routes.
#[derive(Debug, Clone, Serialize)]
pub struct BatchTokensRequest<'a> {
    pub tokens: &'a [String],
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSummary {
    #[serde(default)]
    pub status: PropVoteStatus,
    #[serde(default)]
    pub approved: bool,
    #[serde(default, rename = "type")]
    pub vote_type: u32,
    #[serde(default, rename = "eligibletickets")]
    pub eligible_tickets: u64,
    #[serde(default)]
    pub duration: u64,
    #[serde(default, rename = "endheight")]
    pub end_height: u64,
    #[serde(default, rename = "quorumpercentage")]
    pub quorum_percentage: u32,
    #[serde(default, rename = "passpercentage")]
    pub pass_percentage: u32,
    #[serde(default, rename = "optionsresult", deserialize_with = "null_as_default")]
    pub options_result: Vec<VoteOptionResult>,
}

/// Reply of `POST /proposals/batchvotesummary`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchVoteSummaryReply {
    #[serde(default, deserialize_with = "null_as_default")]
    pub summaries: HashMap<String, VoteSummary>,
    #[serde(default, rename = "bestblock")]
    pub best_block: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub token: String,
    #[serde(default, rename = "parentid")]
    pub parent_id: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub signature: String,
    #[serde(default, rename = "publickey")]
    pub public_key: String,
    #[serde(default, rename = "commentid")]
    pub comment_id: String,
    #[serde(default)]
    pub receipt: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default, rename = "resultvotes")]
    pub result_votes: i64,
    #[serde(default)]
    pub upvotes: u64,
    #[serde(default)]
    pub downvotes: u64,
    #[serde(default)]
    pub censored: bool,
    #[serde(default, rename = "userid")]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
}

/// Reply of `GET /proposals/{token}/comments`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentsReply {
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Vec<Comment>,
    #[serde(default, rename = "accesstime")]
    pub access_time: i64,
}
