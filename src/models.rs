//! Request and response DTOs for the HTTP surface

use crate::config::PagingConfig;
use crate::error::{validation_error, AppError};
use crate::inventory::CategoryStatus;
use crate::politeia::{ServerPolicy, ServerVersion};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Generic success response
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub data: Option<T>,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

/// `?n=` of the next-page route
#[derive(Debug, Default, Deserialize)]
pub struct NextPageQuery {
    pub n: Option<usize>,
}

impl NextPageQuery {
    /// Requested page size, defaulted and bounded by `paging`.
    pub fn page_size(&self, paging: &PagingConfig) -> Result<usize, AppError> {
        let n = self.n.unwrap_or(paging.default_page_size);
        if n > paging.max_page_size {
            return Err(validation_error(format!(
                "n must be at most {}, got {}",
                paging.max_page_size, n
            )));
        }
        Ok(n)
    }
}

/// `?version=` of the proposal details route
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProposalQuery {
    #[validate(length(min = 1, max = 10, message = "Version must be between 1 and 10 characters"))]
    #[validate(custom(function = "validate_version"))]
    pub version: Option<String>,
}

fn validate_version(version: &str) -> Result<(), validator::ValidationError> {
    if !version.bytes().all(|b| b.is_ascii_digit()) {
        let mut err = validator::ValidationError::new("invalid_version");
        err.message = Some("Proposal version must be a positive integer".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub server: ServerVersion,
    pub policy: ServerPolicy,
}

#[derive(Debug, Serialize)]
pub struct CategoryList {
    pub categories: Vec<CategoryStatus>,
}
