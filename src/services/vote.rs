use crate::db::{
    self,
    option::OptionId,
    poll::PollId,
    user::UserId,
    vote::{InternalVote, VoteSummary},
};
use crate::error::PollError;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info, instrument, warn};

/// Records one vote for `user_id` in `poll_id`.
///
/// Checks run in order: poll and option exist, option belongs to the poll,
/// poll is open at `now`, the user has not voted yet. The last check only
/// produces a friendlier early error; the unique (user, poll) constraint
/// decides, and its violation is reported as `DuplicateVote` as well.
#[instrument(skip(pool, now))]
pub async fn cast_vote(
    pool: &SqlitePool,
    user_id: UserId,
    poll_id: PollId,
    option_id: OptionId,
    now: DateTime<Utc>,
) -> Result<InternalVote, PollError> {
    debug!("Handling vote");
    let poll = db::poll::poll_by_id(pool, poll_id)
        .await?
        .ok_or(PollError::NotFound("poll"))?;
    let option = db::option::option_by_id(pool, option_id)
        .await?
        .ok_or(PollError::NotFound("option"))?;

    if option.poll_id != poll.id {
        warn!("Option belongs to another poll");
        return Err(PollError::InvalidOption);
    }
    if !poll.accepts_votes(now) {
        warn!(status = ?poll.status(now), "Vote on closed poll");
        return Err(PollError::PollClosed);
    }
    if db::vote::vote_by_user_and_poll(pool, user_id, poll_id)
        .await?
        .is_some()
    {
        warn!("User already voted");
        return Err(PollError::DuplicateVote);
    }

    match db::vote::insert_vote(pool, user_id, poll_id, option_id, now).await {
        Ok(vote) => {
            info!(vote_id = %vote.id, "Vote recorded");
            Ok(vote)
        }
        Err(err) if db::is_unique_violation(&err) => {
            warn!("Lost race against a concurrent vote");
            Err(PollError::DuplicateVote)
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn vote_for(
    pool: &SqlitePool,
    user_id: UserId,
    poll_id: PollId,
) -> Result<Option<InternalVote>, PollError> {
    Ok(db::vote::vote_by_user_and_poll(pool, user_id, poll_id).await?)
}

pub async fn my_votes(pool: &SqlitePool, user_id: UserId) -> Result<Vec<VoteSummary>, PollError> {
    Ok(db::vote::votes_for_user(pool, user_id).await?)
}
