use super::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Uuid, SqlitePool};
use std::fmt;
use tracing::debug;

#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug, Deserialize, Serialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_string(&self) -> String {
        self.0.hyphenated().to_string()
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct InternalSession {
    pub id: SessionId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

pub async fn save_session(
    pool: &SqlitePool,
    user_id: UserId,
    now: DateTime<Utc>,
) -> Result<InternalSession, sqlx::Error> {
    debug!(%user_id, "Save new session for user");
    let session = InternalSession {
        id: SessionId::new(),
        user_id,
        created_at: now,
    };
    sqlx::query("INSERT INTO sessions (id, user_id, created_at) VALUES (?, ?, ?)")
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.created_at)
        .execute(pool)
        .await?;
    Ok(session)
}

/// Returns whether a session was removed.
pub async fn delete_session(pool: &SqlitePool, session_id: SessionId) -> Result<bool, sqlx::Error> {
    debug!(%session_id, "Delete session");
    let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(session_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
