use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::NewUser;
use crate::state::AppState;
use crate::utils::json::{required_text, JsonBody};

#[derive(Deserialize)]
pub struct StoreUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Serialize)]
pub struct StoreUserResponse {
    pub message: &'static str,
    pub user_id: i32,
}

pub async fn store_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<StoreUserRequest>,
) -> AppResult<Json<StoreUserResponse>> {
    let (Some(name), Some(email), Some(photo)) = (
        required_text(payload.name),
        required_text(payload.email),
        required_text(payload.photo),
    ) else {
        return Err(AppError::bad_request(
            "invalid input or missing 'name', 'email' or 'photo'",
        ));
    };

    let user_id = state
        .store()
        .upsert_user(NewUser { name, email, photo })
        .await
        .map_err(|err| AppError::store("failed to store user", err))?;

    info!(user_id, "user stored");
    Ok(Json(StoreUserResponse {
        message: "User stored",
        user_id,
    }))
}
