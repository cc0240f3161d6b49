use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Deserialize)]
pub struct AddBookRequest {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct AddedBookResponse {
    pub id: i64,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub added_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct ReadingListResponse {
    pub username: String,
    pub books: Vec<String>,
}
