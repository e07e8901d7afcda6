use super::{option::OptionId, poll::PollId, user::UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Uuid, SqlitePool};
use std::fmt;
use tracing::debug;

#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug, Deserialize, Serialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct VoteId(pub Uuid);

impl VoteId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, PartialEq, Eq, Debug, sqlx::FromRow)]
pub struct InternalVote {
    pub id: VoteId,
    pub user_id: UserId,
    pub poll_id: PollId,
    pub option_id: OptionId,
    pub created_at: DateTime<Utc>,
}

/// A user's vote joined with the poll question and the chosen option.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct VoteSummary {
    pub poll_id: PollId,
    pub poll_question: String,
    pub option_text: String,
    pub voted_at: DateTime<Utc>,
}

/// Plain insert. The unique (user_id, poll_id) constraint rejects a second
/// vote, the composite foreign key rejects an option from another poll.
pub async fn insert_vote(
    pool: &SqlitePool,
    user_id: UserId,
    poll_id: PollId,
    option_id: OptionId,
    now: DateTime<Utc>,
) -> Result<InternalVote, sqlx::Error> {
    let vote = InternalVote {
        id: VoteId::new(),
        user_id,
        poll_id,
        option_id,
        created_at: now,
    };
    debug!(vote_id = %vote.id, %user_id, %poll_id, %option_id, "Insert vote");
    sqlx::query(
        "INSERT INTO votes (id, user_id, poll_id, option_id, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(vote.id)
    .bind(vote.user_id)
    .bind(vote.poll_id)
    .bind(vote.option_id)
    .bind(vote.created_at)
    .execute(pool)
    .await?;
    Ok(vote)
}

pub async fn vote_by_user_and_poll(
    pool: &SqlitePool,
    user_id: UserId,
    poll_id: PollId,
) -> Result<Option<InternalVote>, sqlx::Error> {
    debug!(%user_id, %poll_id, "Get vote by user and poll");
    sqlx::query_as::<_, InternalVote>(
        r#"
        SELECT id, user_id, poll_id, option_id, created_at FROM votes
        WHERE user_id = ? AND poll_id = ?
        "#,
    )
    .bind(user_id)
    .bind(poll_id)
    .fetch_optional(pool)
    .await
}

/// Newest first.
pub async fn votes_for_user(pool: &SqlitePool, user_id: UserId) -> Result<Vec<VoteSummary>, sqlx::Error> {
    debug!(%user_id, "List votes for user");
    sqlx::query_as::<_, VoteSummary>(
        r#"
        SELECT v.poll_id AS poll_id, p.question AS poll_question,
               o.text AS option_text, v.created_at AS voted_at
        FROM votes v
        JOIN polls p ON p.id = v.poll_id
        JOIN options o ON o.id = v.option_id
        WHERE v.user_id = ?
        ORDER BY v.created_at DESC, v.rowid DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn count_for_poll(pool: &SqlitePool, poll_id: PollId) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM votes WHERE poll_id = ?")
        .bind(poll_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
