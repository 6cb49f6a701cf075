use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::NewDocument;
use crate::state::AppState;
use crate::utils::json::{required_text, JsonBody};
use crate::utils::query::QueryParams;

use super::{parse_id, MessageResponse};

#[derive(Deserialize)]
pub struct DocumentQuery {
    pub application_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateDocumentRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Inserts a document under `application_id` without checking that the
/// application exists; any foreign key the schema declares decides.
pub async fn create_document(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<DocumentQuery>,
    JsonBody(payload): JsonBody<CreateDocumentRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let missing = || AppError::bad_request("invalid input or missing 'application_id' or 'name'");

    let raw_application_id = required_text(query.application_id).ok_or_else(missing)?;
    let name = required_text(payload.name).ok_or_else(missing)?;
    let application_id = parse_id(&raw_application_id)
        .ok_or_else(|| AppError::bad_request("application_id must be an integer"))?;

    state
        .store()
        .create_document(NewDocument {
            application_id,
            name,
        })
        .await
        .map_err(|err| AppError::store("failed to add document", err))?;

    Ok((StatusCode::CREATED, Json(MessageResponse::new("Document added"))))
}

pub async fn delete_document(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let Some(id) = parse_id(&raw_id) else {
        debug!(%raw_id, "document id matches no row");
        return Ok(Json(MessageResponse::new("Document removed")));
    };

    state
        .store()
        .delete_document(id)
        .await
        .map_err(|err| AppError::store("failed to remove document", err))?;

    Ok(Json(MessageResponse::new("Document removed")))
}
