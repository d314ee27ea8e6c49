//! politeiawww error status codes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric error status reported in `errorcode` of a failed request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorStatusCode(pub u32);

/// Human readable text per error status code, indexed by code.
const DESCRIPTIONS: &[&str] = &[
    "invalid error status",
    "invalid password",
    "malformed email",
    "invalid verification token",
    "expired verification token",
    "missing proposal files",
    "proposal not found",
    "duplicate proposal files",
    "invalid proposal title",
    "maximum markdown files exceeded",
    "maximum image files exceeded",
    "maximum markdown file size exceeded",
    "maximum image file size exceeded",
    "malformed password",
    "comment not found",
    "invalid filename",
    "invalid file digest",
    "invalid base64 file content",
    "invalid MIME type detected for file",
    "unsupported MIME type for file",
    "invalid proposal status",
    "invalid public key",
    "no active public key",
    "invalid signature",
    "invalid input",
    "invalid signing key",
    "maximum comment length exceeded",
    "user not found",
    "wrong proposal status",
    "user not logged in",
    "user hasn't paid paywall",
    "user cannot change the status of his own proposal",
    "malformed username",
    "duplicate username",
    "verification token not yet expired",
    "cannot verify payment at this time",
    "public key already taken by another user",
    "invalid proposal vote status",
    "user locked due to too many login attempts",
    "no proposal credits",
    "invalid user edit action",
    "user action is not allowed",
    "wrong proposal vote status",
    "cannot vote on proposal comment",
    "status change message cannot be blank",
    "censor comment reason cannot be blank",
    "cannot censor comment",
    "user is not the proposal author",
    "vote has not been authorized",
    "vote has already been authorized",
    "invalid authorize vote action",
    "user account is deactivated",
    "invalid proposal vote option bits",
    "invalid proposal vote parameters",
    "email address is not verified",
    "invalid user UUID",
    "invalid like comment action",
    "invalid proposal censorship token",
    "email address is already verified",
    "no changes found in proposal",
    "maximum proposals exceeded",
    "duplicate comment",
    "invalid login credentials",
    "comment is censored",
    "invalid proposal version",
];

impl ErrorStatusCode {
    pub const PROPOSAL_NOT_FOUND: ErrorStatusCode = ErrorStatusCode(6);
    pub const INVALID_CENSORSHIP_TOKEN: ErrorStatusCode = ErrorStatusCode(57);

    pub fn description(&self) -> &'static str {
        DESCRIPTIONS
            .get(self.0 as usize)
            .copied()
            .unwrap_or("unknown error")
    }
}

impl fmt::Display for ErrorStatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body of a 400/500 reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorReply {
    #[serde(rename = "errorcode")]
    pub code: ErrorStatusCode,
    #[serde(default, rename = "errorcontext", deserialize_with = "super::types::null_as_default")]
    pub context: Vec<String>,
}
