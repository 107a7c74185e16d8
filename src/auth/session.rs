//! Token sessions for STASH.
//!
//! A session is a binding from an opaque bearer token to a user id, held in
//! the key-value store under an `auth_` key with a fixed TTL. Expiry is the
//! store's job; nothing here re-checks timestamps. A user may hold any
//! number of concurrent sessions.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::store::KeyValueStore;
use crate::Result;

/// Session lifetime: 24 hours.
pub const SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// Key prefix for session entries.
const KEY_PREFIX: &str = "auth_";

/// Session manager over the key-value store.
#[derive(Clone)]
pub struct Sessions {
    kv: Arc<dyn KeyValueStore>,
}

impl Sessions {
    /// Create a session manager on the given store handle.
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Create a session for a user and return the bearer token.
    ///
    /// Tokens are UUID v4 (122 bits of randomness); no collision retry is
    /// attempted.
    pub async fn create(&self, user_id: i64) -> Result<String> {
        let token = Uuid::new_v4().to_string();
        self.kv
            .set(&Self::key(&token), &user_id.to_string(), SESSION_TTL_SECS)
            .await?;
        info!(user_id, "session created");
        Ok(token)
    }

    /// Resolve a token to a user id, or `None` if absent or expired.
    pub async fn resolve(&self, token: &str) -> Result<Option<i64>> {
        let value = self.kv.get(&Self::key(token)).await?;
        Ok(value.and_then(|v| v.parse().ok()))
    }

    /// Revoke a session. Revoking an unknown token is not an error.
    pub async fn revoke(&self, token: &str) -> Result<()> {
        self.kv.del(&Self::key(token)).await?;
        debug!("session revoked");
        Ok(())
    }

    fn key(token: &str) -> String {
        format!("{KEY_PREFIX}{token}")
    }
}
