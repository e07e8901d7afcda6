use super::session::SessionId;
use serde::{Deserialize, Serialize};
use sqlx::{types::Uuid, SqlitePool};
use std::fmt;
use tracing::debug;

#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug, Deserialize, Serialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct InternalUser {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
}

pub async fn user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<InternalUser>, sqlx::Error> {
    debug!(username, "Get user by username");
    sqlx::query_as::<_, InternalUser>(
        "SELECT id, username, password_hash, is_admin FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn user_by_session(
    pool: &SqlitePool,
    session_id: SessionId,
) -> Result<Option<InternalUser>, sqlx::Error> {
    debug!(%session_id, "Get user by session");
    sqlx::query_as::<_, InternalUser>(
        r#"
        SELECT u.id, u.username, u.password_hash, u.is_admin
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.id = ?
        "#,
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await
}

/// Fails with a unique violation when the username is taken.
pub async fn insert_user(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    is_admin: bool,
) -> Result<InternalUser, sqlx::Error> {
    let user = InternalUser {
        id: UserId::new(),
        username: username.to_owned(),
        password_hash: password_hash.to_owned(),
        is_admin,
    };
    debug!(user_id = %user.id, username, is_admin, "Insert user");
    sqlx::query("INSERT INTO users (id, username, password_hash, is_admin) VALUES (?, ?, ?, ?)")
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .execute(pool)
        .await?;
    Ok(user)
}

pub async fn admin_exists(pool: &SqlitePool) -> Result<bool, sqlx::Error> {
    let admin: Option<(UserId,)> = sqlx::query_as("SELECT id FROM users WHERE is_admin = TRUE LIMIT 1")
        .fetch_optional(pool)
        .await?;
    Ok(admin.is_some())
}
