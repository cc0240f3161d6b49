use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, instrument};

use super::dto::{AddBookRequest, AddedBookResponse, ReadingListResponse};
use super::repo::ReadingListEntry;
use super::services;
use crate::{auth::AuthUser, state::AppState};

pub fn reading_list_routes() -> Router<AppState> {
    Router::new().route("/reading-list", get(list_books).post(add_book))
}

#[instrument(skip(state))]
pub async fn list_books(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<ReadingListResponse>, (StatusCode, String)> {
    let books = services::list_books(&state.db, &identity).await?;
    Ok(Json(ReadingListResponse {
        username: identity.username,
        books,
    }))
}

#[instrument(skip(state, body))]
pub async fn add_book(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(body): Json<AddBookRequest>,
) -> Result<(StatusCode, Json<AddedBookResponse>), (StatusCode, String)> {
    let entry = services::add_book(&state.db, &identity, &body.title).await?;
    Ok((StatusCode::CREATED, Json(added_book_response(entry)?)))
}

fn added_book_response(entry: ReadingListEntry) -> Result<AddedBookResponse, (StatusCode, String)> {
    let added_at = OffsetDateTime::from_unix_timestamp(entry.added_at).map_err(|e| {
        error!(error = %e, entry_id = entry.id, added_at = entry.added_at, "stored timestamp out of range");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
    })?;

    Ok(AddedBookResponse {
        id: entry.id,
        title: entry.book_title,
        added_at,
    })
}
