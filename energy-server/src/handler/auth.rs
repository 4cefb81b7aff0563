use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};
use log::warn;
use serde::Deserialize;

use crate::{
    auth::Credentials,
    handler::{ApiError, ApiResult, MessageBody},
    state::AppState,
};

pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[derive(Deserialize)]
struct CredentialsRequest {
    username: Option<String>,
    password: Option<String>,
}

fn credentials(payload: Result<Json<CredentialsRequest>, JsonRejection>) -> ApiResult<Credentials> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected auth payload: {rejection}");
        ApiError::new(StatusCode::BAD_REQUEST, "Invalid request body")
    })?;
    Ok(Credentials::new(request.username, request.password)?)
}

async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageBody>)> {
    let credentials = credentials(payload)?;
    state.auth.register(credentials).await?;
    Ok((
        StatusCode::CREATED,
        MessageBody::new("User registered successfully"),
    ))
}

async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<Json<MessageBody>> {
    let credentials = credentials(payload)?;
    state.auth.login(credentials).await?;
    Ok(MessageBody::new("Login successful"))
}
