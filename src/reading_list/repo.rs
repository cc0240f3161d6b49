use sqlx::{FromRow, SqlitePool};

use crate::error::StoreResult;

#[derive(Debug, Clone, FromRow)]
pub struct ReadingListEntry {
    pub id: i64,
    pub username: String,
    pub book_title: String,
    pub added_at: i64,
}

pub async fn insert(db: &SqlitePool, username: &str, book_title: &str) -> StoreResult<ReadingListEntry> {
    let entry = sqlx::query_as::<_, ReadingListEntry>(
        r#"
        INSERT INTO reading_list (username, book_title)
        VALUES (?1, ?2)
        RETURNING id, username, book_title, added_at
        "#,
    )
    .bind(username)
    .bind(book_title)
    .fetch_one(db)
    .await?;
    Ok(entry)
}

/// Entries for one user, oldest first.
pub async fn list_by_user(db: &SqlitePool, username: &str) -> StoreResult<Vec<ReadingListEntry>> {
    let rows = sqlx::query_as::<_, ReadingListEntry>(
        r#"
        SELECT id, username, book_title, added_at
          FROM reading_list
         WHERE username = ?1
         ORDER BY id ASC
        "#,
    )
    .bind(username)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
