use axum::{
    extract::State,
    http::{header, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    error::AppError,
    extractors::{AppJson, AppPath},
    state::AppState,
    users::dto::{CreateUserRequest, UpdateUserRequest, UserResponse},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state.users.find_all().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<UserResponse>), AppError> {
    payload.validate()?;
    let user = state.users.create(payload.into()).await?;
    info!(user_id = user.id, "user created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/users/{}", user.id))],
        Json(user.into()),
    ))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<UserResponse>, AppError> {
    match state.users.find_by_id(id).await? {
        Some(user) => Ok(Json(user.into())),
        None => {
            warn!(user_id = id, "user not found");
            Err(AppError::user_not_found(id))
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;
    match state.users.update(id, payload.into()).await? {
        Some(user) => {
            info!(user_id = id, "user updated");
            Ok(Json(user.into()))
        }
        None => {
            warn!(user_id = id, "update of unknown user");
            Err(AppError::user_not_found(id))
        }
    }
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    if state.users.delete(id).await? {
        info!(user_id = id, "user deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        warn!(user_id = id, "delete of unknown user");
        Err(AppError::user_not_found(id))
    }
}
