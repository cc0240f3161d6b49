use sqlx::SqlitePool;
use tracing::{info, instrument, warn};

use super::repo::{self, ReadingListEntry};
use crate::auth::SessionIdentity;
use crate::error::{StoreError, StoreResult};

/// Appends `title` to the user's list. Duplicates are kept.
#[instrument(skip(db))]
pub async fn add_book(
    db: &SqlitePool,
    identity: &SessionIdentity,
    title: &str,
) -> StoreResult<ReadingListEntry> {
    let title = title.trim();
    if title.is_empty() {
        warn!(username = %identity.username, "empty book title");
        return Err(StoreError::EmptyTitle);
    }

    let entry = repo::insert(db, &identity.username, title).await?;
    info!(username = %entry.username, entry_id = entry.id, "book added");
    Ok(entry)
}

#[instrument(skip(db))]
pub async fn list_books(db: &SqlitePool, identity: &SessionIdentity) -> StoreResult<Vec<String>> {
    let titles = repo::list_by_user(db, &identity.username)
        .await?
        .into_iter()
        .map(|e| e.book_title)
        .collect();
    Ok(titles)
}
