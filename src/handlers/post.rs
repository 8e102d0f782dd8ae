// src/handlers/post.rs

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::post::{NewPost, Post, PostRequest, PostResponse},
};

const SELECT_COLUMNS: &str = "id, author, content, image_url, created_date, modified_date";

/// Unwraps the optional JSON body, rejecting requests that carry none.
fn require_body(body: Option<Json<PostRequest>>) -> Result<PostRequest, AppError> {
    let Json(payload) = body.ok_or_else(|| {
        AppError::BadRequest("request body is required".to_string())
    })?;
    Ok(payload)
}

/// Create a new post.
pub async fn create_post(
    State(pool): State<SqlitePool>,
    body: Option<Json<PostRequest>>,
) -> Result<impl IntoResponse, AppError> {
    // 1. Validate payload
    let payload = require_body(body)?;
    payload
        .validate()
        .map_err(|msg| AppError::BadRequest(msg.to_string()))?;

    // 2. Build the entity from the normalized fields
    let (author, content, image_url) = payload.normalized();
    let new_post = NewPost::new(author, content, image_url);

    // 3. Insert and read back the stored row
    let post = sqlx::query_as::<_, Post>(&format!(
        "INSERT INTO posts (author, content, image_url, created_date) \
         VALUES (?1, ?2, ?3, ?4) \
         RETURNING {SELECT_COLUMNS}"
    ))
    .bind(&new_post.author)
    .bind(&new_post.content)
    .bind(&new_post.image_url)
    .bind(new_post.created_date)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create post: {:?}", e);
        AppError::from(e)
    })?;

    let location = format!("/api/posts/{}", post.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(PostResponse::from(post)),
    ))
}

/// List all posts. Order is whatever the store returns.
pub async fn list_posts(
    State(pool): State<SqlitePool>,
) -> Result<impl IntoResponse, AppError> {
    let posts = sqlx::query_as::<_, Post>(&format!("SELECT {SELECT_COLUMNS} FROM posts"))
        .fetch_all(&pool)
        .await?;

    let responses: Vec<PostResponse> = posts.into_iter().map(PostResponse::from).collect();
    Ok(Json(responses))
}

/// Get a single post by ID.
pub async fn get_post(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let post = fetch_post(&pool, id)
        .await?
        .ok_or(AppError::NotFound("post not found".to_string()))?;

    Ok(Json(PostResponse::from(post)))
}

/// Update an existing post. Validation failures are reported before the
/// existence check, matching the create path.
pub async fn update_post(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    body: Option<Json<PostRequest>>,
) -> Result<impl IntoResponse, AppError> {
    let payload = require_body(body)?;
    payload
        .validate()
        .map_err(|msg| AppError::BadRequest(msg.to_string()))?;

    let mut post = fetch_post(&pool, id)
        .await?
        .ok_or(AppError::NotFound("post not found".to_string()))?;

    let (author, content, image_url) = payload.normalized();
    post.apply_update(author, content, image_url);

    let saved = sqlx::query_as::<_, Post>(&format!(
        "UPDATE posts \
         SET author = ?1, content = ?2, image_url = ?3, modified_date = ?4 \
         WHERE id = ?5 \
         RETURNING {SELECT_COLUMNS}"
    ))
    .bind(&post.author)
    .bind(&post.content)
    .bind(&post.image_url)
    .bind(post.modified_date)
    .bind(post.id)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to update post {}: {:?}", id, e);
        AppError::from(e)
    })?;

    Ok(Json(PostResponse::from(saved)))
}

/// Delete a post. Deleting an id that no longer exists is a 404, not a
/// silent success.
pub async fn delete_post(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM posts WHERE id = ?1")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("post not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_post(pool: &SqlitePool, id: i64) -> Result<Option<Post>, AppError> {
    let post = sqlx::query_as::<_, Post>(&format!(
        "SELECT {SELECT_COLUMNS} FROM posts WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}
