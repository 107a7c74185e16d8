//! Access rules for STASH.
//!
//! Identity resolution from a bearer token, plus the read/ownership checks
//! applied to file entities. The checks are pure functions over the entity
//! and the acting identity.

use tracing::debug;

use crate::auth::Sessions;
use crate::file::FileEntity;
use crate::user::UserRepository;
use crate::{Result, StashError};

/// Resolve the acting user from a request token.
///
/// Fails with `Unauthorized` when the token is absent, does not resolve to
/// a session, or the resolved user no longer exists.
pub async fn authenticate(
    sessions: &Sessions,
    users: &UserRepository<'_>,
    token: Option<&str>,
) -> Result<i64> {
    let token = token.ok_or_else(|| StashError::Unauthorized("missing token".to_string()))?;

    let user_id = sessions
        .resolve(token)
        .await?
        .ok_or_else(|| StashError::Unauthorized("invalid or expired token".to_string()))?;

    if users.get_by_id(user_id).await?.is_none() {
        debug!(user_id, "session resolved to a missing user");
        return Err(StashError::Unauthorized("unknown user".to_string()));
    }

    Ok(user_id)
}

/// Whether `user_id` may read `file`.
///
/// True iff the file is public or the requester is its owner. An anonymous
/// request can only read public files.
pub fn can_read(file: &FileEntity, user_id: Option<i64>) -> bool {
    file.is_public || user_id == Some(file.user_id)
}

/// Require that `user_id` owns `file`.
pub fn require_owner(file: &FileEntity, user_id: i64) -> Result<()> {
    if file.user_id == user_id {
        Ok(())
    } else {
        Err(StashError::Unauthorized("not the owner".to_string()))
    }
}
