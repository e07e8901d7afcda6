use super::option::{InternalOption, OptionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Uuid, SqlitePool};
use std::fmt;
use tracing::debug;

#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug, Deserialize, Serialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct PollId(pub Uuid);

impl PollId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PollId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Derived from the active flag and the expiry, never stored.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollStatus {
    Active,
    Inactive,
    Expired,
}

#[derive(Clone, PartialEq, Debug, sqlx::FromRow)]
pub struct InternalPoll {
    pub id: PollId,
    pub question: String,
    pub created_at: DateTime<Utc>,
    pub expiry: Option<DateTime<Utc>>,
    pub active: bool,
}

/// The one definition of expiry: an expiry is set and lies before `now`.
pub fn is_expired(poll: &InternalPoll, now: DateTime<Utc>) -> bool {
    matches!(poll.expiry, Some(expiry) if expiry < now)
}

impl InternalPoll {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        is_expired(self, now)
    }

    /// Expired wins over the active flag.
    pub fn status(&self, now: DateTime<Utc>) -> PollStatus {
        if self.is_expired(now) {
            PollStatus::Expired
        } else if self.active {
            PollStatus::Active
        } else {
            PollStatus::Inactive
        }
    }

    pub fn accepts_votes(&self, now: DateTime<Utc>) -> bool {
        self.status(now) == PollStatus::Active
    }
}

/// Already validated poll ready to be written.
#[derive(Clone, Debug)]
pub struct NewPoll {
    pub question: String,
    pub options: Vec<String>,
    pub expiry: Option<DateTime<Utc>>,
    pub active: bool,
}

/// Writes the poll and all of its options in one transaction.
pub async fn insert_poll_with_options(
    pool: &SqlitePool,
    new_poll: NewPoll,
    now: DateTime<Utc>,
) -> Result<(InternalPoll, Vec<InternalOption>), sqlx::Error> {
    let NewPoll {
        question,
        options,
        expiry,
        active,
    } = new_poll;
    let poll = InternalPoll {
        id: PollId::new(),
        question,
        created_at: now,
        expiry,
        active,
    };
    debug!(poll_id = %poll.id, options = options.len(), "Insert poll");

    // Dropping the transaction on an early return rolls it back
    let mut tx = pool.begin().await?;
    sqlx::query("INSERT INTO polls (id, question, created_at, expiry, active) VALUES (?, ?, ?, ?, ?)")
        .bind(poll.id)
        .bind(&poll.question)
        .bind(poll.created_at)
        .bind(poll.expiry)
        .bind(poll.active)
        .execute(&mut *tx)
        .await?;

    let mut inserted = Vec::with_capacity(options.len());
    for (position, text) in options.into_iter().enumerate() {
        let option = InternalOption {
            id: OptionId::new(),
            poll_id: poll.id,
            text,
            position: position as i64,
        };
        sqlx::query("INSERT INTO options (id, poll_id, text, position) VALUES (?, ?, ?, ?)")
            .bind(option.id)
            .bind(option.poll_id)
            .bind(&option.text)
            .bind(option.position)
            .execute(&mut *tx)
            .await?;
        inserted.push(option);
    }
    tx.commit().await?;

    Ok((poll, inserted))
}

pub async fn poll_by_id(pool: &SqlitePool, poll_id: PollId) -> Result<Option<InternalPoll>, sqlx::Error> {
    debug!(%poll_id, "Get poll by id");
    sqlx::query_as::<_, InternalPoll>(
        "SELECT id, question, created_at, expiry, active FROM polls WHERE id = ?",
    )
    .bind(poll_id)
    .fetch_optional(pool)
    .await
}

/// Newest first; polls created within the same instant keep insertion order.
pub async fn list_polls(pool: &SqlitePool, active_only: bool) -> Result<Vec<InternalPoll>, sqlx::Error> {
    debug!(active_only, "List polls");
    let query = if active_only {
        r#"
        SELECT id, question, created_at, expiry, active FROM polls
        WHERE active = TRUE
        ORDER BY created_at DESC, rowid DESC
        "#
    } else {
        r#"
        SELECT id, question, created_at, expiry, active FROM polls
        ORDER BY created_at DESC, rowid DESC
        "#
    };
    sqlx::query_as::<_, InternalPoll>(query).fetch_all(pool).await
}

pub async fn toggle_active(pool: &SqlitePool, poll_id: PollId) -> Result<Option<InternalPoll>, sqlx::Error> {
    debug!(%poll_id, "Toggle poll active flag");
    sqlx::query_as::<_, InternalPoll>(
        r#"
        UPDATE polls SET active = NOT active WHERE id = ?
        RETURNING id, question, created_at, expiry, active
        "#,
    )
    .bind(poll_id)
    .fetch_optional(pool)
    .await
}

/// Options and votes go with the poll through `ON DELETE CASCADE`.
pub async fn delete_poll(pool: &SqlitePool, poll_id: PollId) -> Result<bool, sqlx::Error> {
    debug!(%poll_id, "Delete poll");
    let result = sqlx::query("DELETE FROM polls WHERE id = ?")
        .bind(poll_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
