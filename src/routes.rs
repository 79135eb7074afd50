use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Deserialize;

use crate::{
    AppState,
    entities::{bot_user, movie},
    error::{AppError, AppResult, StoreError},
    models::{CatalogStatus, MovieEdit, MoviePage, NewMovie, NewUser, Resolution, UserProfile},
    titles::{clean_title, extract_title},
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/movies", get(list_movies).post(create_movie))
        .route("/movies/{title}", get(show_movie).patch(update_movie).delete(delete_movie))
        .route("/movies/{title}/files/{resolution}", put(set_file))
        .route("/status", get(status))
        .route("/users", post(register_user))
        .route("/users/{user_id}", get(show_user).put(observe_user))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    page: Option<u64>,
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ListQuery>,
) -> AppResult<Json<MoviePage>> {
    let page = state
        .catalog
        .list_page(q.page.unwrap_or(1), state.config.movie_list_page_size)
        .await?;
    Ok(Json(page))
}

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    title: Option<String>,
    /// Name of an uploaded file; used to derive the title when none is given.
    file_name: Option<String>,
    poster_url: Option<String>,
    file_480p: Option<String>,
    file_720p: Option<String>,
    file_1080p: Option<String>,
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateMovieRequest>,
) -> AppResult<(StatusCode, Json<movie::Model>)> {
    let raw = match (req.title, req.file_name) {
        (Some(title), _) => title,
        (None, Some(file_name)) => extract_title(&file_name),
        (None, None) => return Err(AppError::bad_request("title or file_name is required")),
    };
    let title = required_title(&raw)?;
    tracing::info!(title = %title, "adding movie");

    let movie = state
        .catalog
        .create_movie(NewMovie {
            title,
            poster_url: req.poster_url,
            file_480p: req.file_480p,
            file_720p: req.file_720p,
            file_1080p: req.file_1080p,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn show_movie(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> AppResult<Json<movie::Model>> {
    Ok(Json(lookup(&state, &title).await?))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
    Json(mut edit): Json<MovieEdit>,
) -> AppResult<Json<movie::Model>> {
    let movie = lookup(&state, &title).await?;

    if let Some(new_title) = &edit.title {
        let new_title = required_title(new_title)?;
        tracing::info!(from = %movie.title, to = %new_title, "renaming movie");
        edit.title = Some(new_title);
    }

    Ok(Json(state.catalog.edit_movie(movie.id, edit).await?))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> AppResult<StatusCode> {
    let movie = lookup(&state, &title).await?;
    state.catalog.delete_movie(movie.id).await?;
    tracing::info!(title = %movie.title, "movie deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct SetFileRequest {
    file_id: Option<String>,
}

pub async fn set_file(
    State(state): State<Arc<AppState>>,
    Path((title, resolution)): Path<(String, String)>,
    Json(req): Json<SetFileRequest>,
) -> AppResult<Json<movie::Model>> {
    let resolution: Resolution = resolution.parse().map_err(AppError::bad_request)?;
    let movie = lookup(&state, &title).await?;
    let movie = state.catalog.set_file(movie.id, resolution, req.file_id).await?;
    tracing::info!(
        title = %movie.title,
        resolution = %resolution,
        present = movie.file(resolution).is_some(),
        "movie file set"
    );
    Ok(Json(movie))
}

pub async fn status(State(state): State<Arc<AppState>>) -> AppResult<Json<CatalogStatus>> {
    Ok(Json(state.catalog.status().await?))
}

pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewUser>,
) -> AppResult<(StatusCode, Json<bot_user::Model>)> {
    let user = state.users.register_user(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn show_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<bot_user::Model>> {
    let user = state.users.get_user(user_id).await?.ok_or(StoreError::UserNotFound(user_id))?;
    Ok(Json(user))
}

pub async fn observe_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(profile): Json<UserProfile>,
) -> AppResult<Json<bot_user::Model>> {
    Ok(Json(state.users.observe_user(user_id, profile).await?))
}

async fn lookup(state: &AppState, raw_title: &str) -> AppResult<movie::Model> {
    let title = clean_title(raw_title);
    let movie = state
        .catalog
        .find_by_title(&title)
        .await?
        .ok_or(StoreError::MovieNotFound(title))?;
    Ok(movie)
}

fn required_title(raw: &str) -> AppResult<String> {
    let title = clean_title(raw);
    if title.is_empty() {
        return Err(AppError::bad_request("title is empty after normalization"));
    }
    Ok(title)
}
