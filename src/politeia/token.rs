//! Censorship token validation

use crate::error::{validation_error, AppError};
use once_cell::sync::Lazy;
use regex::Regex;

/// Length of the short token prefix the details route accepts.
pub const TOKEN_PREFIX_LEN: usize = 7;

static FULL_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-f]{64}$").expect("valid token regex"));
static TOKEN_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-f]{7}$").expect("valid prefix regex"));

/// True for a full 64 character hex censorship token.
pub fn is_full_token(token: &str) -> bool {
    FULL_TOKEN.is_match(token)
}

/// Accepts a full token or its 7 character prefix.
pub fn validate_token(token: &str) -> Result<(), AppError> {
    if is_full_token(token) || TOKEN_PREFIX.is_match(token) {
        Ok(())
    } else {
        Err(validation_error(format!(
            "'{}' is not a censorship token (expected 64 hex characters or a {} character prefix)",
            token, TOKEN_PREFIX_LEN
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "27f87171d98b7923a1bd2bee6affed929fa2d2a6e178b5c80a9971a92a5c7f50";

    #[test]
    fn test_full_token_and_prefix_accepted() {
        assert!(is_full_token(TOKEN));
        assert!(validate_token(TOKEN).is_ok());
        assert!(validate_token(&TOKEN[..TOKEN_PREFIX_LEN]).is_ok());
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        assert!(validate_token("").is_err());
        assert!(validate_token("27f8717").is_ok());
        assert!(validate_token("27F8717").is_err());
        assert!(validate_token("27f871").is_err());
        assert!(validate_token(&TOKEN[..TOKEN_PREFIX_LEN + 1]).is_err());
        assert!(validate_token("../../version").is_err());
    }
}
