use crate::db::poll::PollId;
use crate::error::PollError;
use crate::extract::{CurrentUser, LoggedIn};
use crate::messages::{
    IncomingVote, OutgoingIndex, OutgoingPoll, OutgoingPollSummary, OutgoingPollView, OutgoingUser,
    OutgoingVote,
};
use crate::services::{poll, vote};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use sqlx::{types::Uuid, SqlitePool};

/// Polls open for voting, newest first.
pub async fn index(
    pool: web::Data<SqlitePool>,
    CurrentUser(user): CurrentUser,
) -> Result<HttpResponse, PollError> {
    let now = Utc::now();
    let polls = poll::list_open_polls(&pool, now).await?;
    Ok(HttpResponse::Ok().json(OutgoingIndex {
        current_user: user.as_ref().map(OutgoingUser::from),
        polls: polls
            .iter()
            .map(|poll| OutgoingPollSummary::new(poll, now))
            .collect(),
    }))
}

pub async fn poll_detail(
    pool: web::Data<SqlitePool>,
    LoggedIn(user): LoggedIn,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PollError> {
    let poll_id = PollId(path.into_inner());
    let now = Utc::now();
    let poll = poll::poll_with_options(&pool, poll_id).await?;
    let already_voted = vote::vote_for(&pool, user.id, poll_id).await?.is_some();
    Ok(HttpResponse::Ok().json(OutgoingPollView {
        expired: poll.poll.is_expired(now),
        poll: OutgoingPoll::new(&poll, now),
        already_voted,
    }))
}

pub async fn cast_vote(
    pool: web::Data<SqlitePool>,
    LoggedIn(user): LoggedIn,
    path: web::Path<Uuid>,
    payload: web::Json<IncomingVote>,
) -> Result<HttpResponse, PollError> {
    let poll_id = PollId(path.into_inner());
    let vote = vote::cast_vote(&pool, user.id, poll_id, payload.option, Utc::now()).await?;
    Ok(HttpResponse::Created().json(OutgoingVote::from(vote)))
}

pub async fn my_votes(
    pool: web::Data<SqlitePool>,
    LoggedIn(user): LoggedIn,
) -> Result<HttpResponse, PollError> {
    let votes = vote::my_votes(&pool, user.id).await?;
    Ok(HttpResponse::Ok().json(votes))
}
