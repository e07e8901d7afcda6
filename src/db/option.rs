use super::poll::PollId;
use serde::{Deserialize, Serialize};
use sqlx::{types::Uuid, SqlitePool};
use std::fmt;
use tracing::{debug, instrument};

#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug, Deserialize, Serialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct OptionId(pub Uuid);

impl OptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, PartialEq, Debug, sqlx::FromRow)]
pub struct InternalOption {
    pub id: OptionId,
    pub poll_id: PollId,
    pub text: String,
    /// Creation order within the poll, starting at 0
    pub position: i64,
}

#[derive(Clone, PartialEq, Debug, sqlx::FromRow)]
pub struct OptionCount {
    pub option_id: OptionId,
    pub option_text: String,
    pub votes: i64,
}

#[instrument(skip(pool))]
pub async fn options_for_poll(
    pool: &SqlitePool,
    poll_id: PollId,
) -> Result<Vec<InternalOption>, sqlx::Error> {
    debug!("Retrieving options");
    sqlx::query_as::<_, InternalOption>(
        "SELECT id, poll_id, text, position FROM options WHERE poll_id = ? ORDER BY position",
    )
    .bind(poll_id)
    .fetch_all(pool)
    .await
}

pub async fn option_by_id(
    pool: &SqlitePool,
    option_id: OptionId,
) -> Result<Option<InternalOption>, sqlx::Error> {
    debug!(%option_id, "Retrieving option by id");
    sqlx::query_as::<_, InternalOption>(
        "SELECT id, poll_id, text, position FROM options WHERE id = ?",
    )
    .bind(option_id)
    .fetch_optional(pool)
    .await
}

/// Vote count for every option of the poll in creation order, zero counts included.
#[instrument(skip(pool))]
pub async fn vote_counts(pool: &SqlitePool, poll_id: PollId) -> Result<Vec<OptionCount>, sqlx::Error> {
    debug!("Counting votes per option");
    sqlx::query_as::<_, OptionCount>(
        r#"
        SELECT o.id AS option_id, o.text AS option_text, COUNT(v.id) AS votes
        FROM options o
        LEFT JOIN votes v ON v.option_id = o.id
        WHERE o.poll_id = ?
        GROUP BY o.id, o.text, o.position
        ORDER BY o.position
        "#,
    )
    .bind(poll_id)
    .fetch_all(pool)
    .await
}
