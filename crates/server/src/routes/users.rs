use axum::{
    extract::{rejection::{FormRejection, JsonRejection, PathRejection}, Path, State},
    http::StatusCode,
    Form, Json,
};
use models::{
    codec,
    user::{LoginResult, User, UserLogin, UserRegister},
};
use serde_json::Value;

use crate::errors::JsonApiError;
use crate::routes::record_id;
use crate::state::AppState;

#[utoipa::path(post, path = "/signup", tag = "Users", request_body = crate::openapi::UserRegisterDoc,
    responses((status = 201, description = "Registered", body = crate::openapi::UserDoc), (status = 409, description = "Conflict"), (status = 422, description = "Validation Error")))]
pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), JsonApiError> {
    let Json(value) = body?;
    let input: UserRegister = codec::decode(value)?;
    let user = state.users.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(post, path = "/login", tag = "Users",
    request_body(content = crate::openapi::LoginFormDoc, content_type = "application/x-www-form-urlencoded"),
    responses((status = 200, description = "Login attempted; see `success`", body = crate::openapi::LoginResultDoc)))]
pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<UserLogin>, FormRejection>,
) -> Result<Json<LoginResult>, JsonApiError> {
    let Form(input) = form?;
    let result = state.users.authenticate(&input.email, &input.password).await?;
    Ok(Json(result))
}

#[utoipa::path(get, path = "/users", tag = "Users",
    responses((status = 200, description = "All users", body = [crate::openapi::UserDoc])))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, JsonApiError> {
    Ok(Json(state.users.list().await?))
}

#[utoipa::path(get, path = "/users/{user_id}", tag = "Users",
    params(("user_id" = String, Path, description = "User id")),
    responses((status = 200, description = "User", body = crate::openapi::UserDoc), (status = 404, description = "Not Found")))]
pub async fn show_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<User>, JsonApiError> {
    let id = record_id("user", path?)?;
    Ok(Json(state.users.get(&id).await?))
}

#[utoipa::path(put, path = "/users/{user_id}/update", tag = "Users",
    params(("user_id" = String, Path, description = "User id")),
    request_body = crate::openapi::UserDoc,
    responses((status = 200, description = "Updated user", body = crate::openapi::UserDoc), (status = 404, description = "Not Found"), (status = 409, description = "Conflict")))]
pub async fn update_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<User>, JsonApiError> {
    let id = record_id("user", path?)?;
    let Json(value) = body?;
    let user: User = codec::decode(value)?;
    Ok(Json(state.users.update(&id, user).await?))
}

#[utoipa::path(delete, path = "/users/{user_id}/delete", tag = "Users",
    params(("user_id" = String, Path, description = "User id")),
    responses((status = 200, description = "Deleted user", body = crate::openapi::UserDoc), (status = 404, description = "Not Found")))]
pub async fn delete_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<User>, JsonApiError> {
    let id = record_id("user", path?)?;
    Ok(Json(state.users.delete(&id).await?))
}
