use sqlx::SqlitePool;
use tracing::{info, instrument, warn};

use crate::auth::{
    password::{hash_password, verify_password},
    repo_types::{SessionIdentity, User},
};
use crate::error::{StoreError, StoreResult};

#[instrument(skip(db, password))]
pub async fn register(db: &SqlitePool, username: &str, password: &str) -> StoreResult<User> {
    let hash = hash_password(password)?;
    match User::insert(db, username, &hash).await {
        Ok(user) => {
            info!(username = %user.username, "user registered");
            Ok(user)
        }
        Err(StoreError::DuplicateUsername) => {
            warn!(%username, "username already registered");
            Err(StoreError::DuplicateUsername)
        }
        Err(e) => Err(e),
    }
}

/// Unknown usernames and wrong passwords produce the same error.
#[instrument(skip(db, password))]
pub async fn authenticate(
    db: &SqlitePool,
    username: &str,
    password: &str,
) -> StoreResult<SessionIdentity> {
    let Some(user) = User::find_by_username(db, username).await? else {
        warn!(%username, "login unknown username");
        return Err(StoreError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(%username, "login invalid password");
        return Err(StoreError::InvalidCredentials);
    }

    info!(%username, "user logged in");
    Ok(SessionIdentity::new(user.username))
}
