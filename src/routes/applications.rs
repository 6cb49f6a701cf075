use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{ApplicationListing, NewApplication, UNOWNED};
use crate::state::AppState;
use crate::utils::json::{required_text, JsonBody};
use crate::utils::query::QueryParams;

use super::{parse_id, parse_owner, MessageResponse};

#[derive(Deserialize)]
pub struct OwnerQuery {
    pub user_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateApplicationRequest {
    #[serde(default)]
    pub name: Option<String>,
}

pub async fn list_applications(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<OwnerQuery>,
) -> AppResult<Json<Vec<ApplicationListing>>> {
    let owner = parse_owner(query.user_id.as_deref())
        .ok_or_else(|| AppError::bad_request("user_id must be an integer"))?;

    let listings = state
        .store()
        .list_applications(owner)
        .await
        .map_err(|err| AppError::store("failed to fetch applications", err))?;

    Ok(Json(listings))
}

pub async fn create_application(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<OwnerQuery>,
    JsonBody(payload): JsonBody<CreateApplicationRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let name = required_text(payload.name)
        .ok_or_else(|| AppError::bad_request("invalid input or missing 'name'"))?;
    let owner = parse_owner(query.user_id.as_deref())
        .ok_or_else(|| AppError::bad_request("user_id must be an integer"))?;

    state
        .store()
        .create_application(NewApplication {
            name,
            user_id: owner,
        })
        .await
        .map_err(|err| AppError::store("failed to add application", err))?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Application added")),
    ))
}

/// Removes an application once the caller is confirmed as its owner. A failed
/// lookup is answered exactly like a mismatched owner.
pub async fn delete_application(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    QueryParams(query): QueryParams<OwnerQuery>,
) -> AppResult<Json<MessageResponse>> {
    let not_owner = || AppError::forbidden("not allowed to remove this application");

    let id = parse_id(&raw_id).ok_or_else(not_owner)?;
    let owner = parse_owner(query.user_id.as_deref()).ok_or_else(not_owner)?;

    match state.store().find_owned_application(id, owner).await {
        Ok(Some(found)) if found != UNOWNED => {}
        Ok(_) => return Err(not_owner()),
        Err(err) => {
            warn!(application_id = id, error = %err, "ownership lookup failed");
            return Err(not_owner());
        }
    }

    state
        .store()
        .delete_application(id)
        .await
        .map_err(|err| AppError::store("failed to remove application", err))?;

    info!(application_id = id, owner, "application removed");
    Ok(Json(MessageResponse::new("Application removed")))
}
