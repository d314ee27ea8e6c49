//! Proposal inventory route handlers

use crate::error::{validation_error, ApiResult};
use crate::inventory::{Category, ProposalRecord, ResultBatch};
use crate::models::{CategoryList, NextPageQuery, ProposalQuery, ServerInfo, SuccessResponse};
use crate::politeia::{validate_token, CommentsReply};
use crate::state::SharedState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::debug;
use validator::Validate;

/// Server version and policy
pub async fn server_info(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<ServerInfo>>> {
    let info = ServerInfo {
        server: state.inventory.version().await?,
        policy: state.inventory.policy().await?,
    };
    Ok(Json(SuccessResponse::with_data("Server information", info)))
}

/// Size and read position of every category
pub async fn list_categories(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<CategoryList>>> {
    let categories = state.inventory.categories().await?;
    Ok(Json(SuccessResponse::with_data(
        "Proposal categories",
        CategoryList { categories },
    )))
}

/// Next page of a category
pub async fn next_page(
    State(state): State<SharedState>,
    Path(category): Path<String>,
    Query(query): Query<NextPageQuery>,
) -> ApiResult<Json<SuccessResponse<ResultBatch>>> {
    let category: Category = category.parse()?;
    let n = query.page_size(&state.paging)?;
    debug!(%category, n, "Next page requested");

    let batch = state.inventory.load(category, n).await?;
    let message = if batch.is_exhausted() {
        format!("No more {} proposals", category)
    } else {
        format!("Loaded {} {} proposals", batch.len(), category)
    };
    Ok(Json(SuccessResponse::with_data(message, batch)))
}

/// One proposal with its vote summary
pub async fn get_proposal(
    State(state): State<SharedState>,
    Path(token): Path<String>,
    Query(query): Query<ProposalQuery>,
) -> ApiResult<Json<SuccessResponse<ProposalRecord>>> {
    validate_token(&token)?;
    query.validate().map_err(|e| validation_error(e.to_string()))?;

    let record = state
        .inventory
        .proposal(&token, query.version.as_deref())
        .await?;
    Ok(Json(SuccessResponse::with_data("Proposal retrieved", record)))
}

/// Comments of one proposal
pub async fn get_comments(
    State(state): State<SharedState>,
    Path(token): Path<String>,
) -> ApiResult<Json<SuccessResponse<CommentsReply>>> {
    validate_token(&token)?;

    let comments = state.inventory.comments(&token).await?;
    Ok(Json(SuccessResponse::with_data(
        format!("{} comments", comments.comments.len()),
        comments,
    )))
}
