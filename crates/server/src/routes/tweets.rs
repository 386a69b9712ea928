use axum::{
    extract::{rejection::{FormRejection, JsonRejection, PathRejection}, Path, State},
    http::StatusCode,
    Form, Json,
};
use models::{
    codec,
    tweet::{NewTweet, Tweet, TweetContent},
};
use serde_json::Value;

use crate::errors::JsonApiError;
use crate::routes::record_id;
use crate::state::AppState;

#[utoipa::path(get, path = "/", tag = "Tweets",
    responses((status = 200, description = "All tweets", body = [crate::openapi::TweetDoc])))]
pub async fn home(State(state): State<AppState>) -> Result<Json<Vec<Tweet>>, JsonApiError> {
    Ok(Json(state.tweets.list().await?))
}

#[utoipa::path(post, path = "/post", tag = "Tweets", request_body = crate::openapi::TweetDoc,
    responses((status = 201, description = "Posted", body = crate::openapi::TweetDoc), (status = 409, description = "Conflict"), (status = 422, description = "Validation Error")))]
pub async fn post_tweet(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Tweet>), JsonApiError> {
    let Json(value) = body?;
    let input: NewTweet = codec::decode(value)?;
    let tweet = state.tweets.post(input).await?;
    Ok((StatusCode::CREATED, Json(tweet)))
}

#[utoipa::path(get, path = "/tweets/{tweet_id}", tag = "Tweets",
    params(("tweet_id" = String, Path, description = "Tweet id")),
    responses((status = 200, description = "Tweet", body = crate::openapi::TweetDoc), (status = 404, description = "Not Found")))]
pub async fn show_tweet(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Tweet>, JsonApiError> {
    let id = record_id("tweet", path?)?;
    Ok(Json(state.tweets.get(&id).await?))
}

#[utoipa::path(put, path = "/tweets/{tweet_id}/update", tag = "Tweets",
    params(("tweet_id" = String, Path, description = "Tweet id")),
    request_body(content = crate::openapi::ContentFormDoc, content_type = "application/x-www-form-urlencoded"),
    responses((status = 200, description = "Updated tweet", body = crate::openapi::TweetDoc), (status = 404, description = "Not Found")))]
pub async fn update_tweet(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    form: Result<Form<TweetContent>, FormRejection>,
) -> Result<Json<Tweet>, JsonApiError> {
    let id = record_id("tweet", path?)?;
    let Form(input) = form?;
    Ok(Json(state.tweets.update_content(&id, input.content).await?))
}

#[utoipa::path(delete, path = "/tweets/{tweet_id}/delete", tag = "Tweets",
    params(("tweet_id" = String, Path, description = "Tweet id")),
    responses((status = 200, description = "Deleted tweet", body = crate::openapi::TweetDoc), (status = 404, description = "Not Found")))]
pub async fn delete_tweet(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Tweet>, JsonApiError> {
    let id = record_id("tweet", path?)?;
    Ok(Json(state.tweets.delete(&id).await?))
}
