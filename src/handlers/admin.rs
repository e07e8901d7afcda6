use crate::db::poll::PollId;
use crate::error::PollError;
use crate::extract::AdminUser;
use crate::messages::{IncomingPoll, OutgoingPoll, OutgoingPollSummary, OutgoingResults, OutgoingStatus};
use crate::services::{
    poll::{self, CreatePoll},
    results,
};
use actix_web::{http::header, web, HttpResponse};
use chrono::Utc;
use sqlx::{types::Uuid, SqlitePool};

/// Every poll, newest first.
pub async fn dashboard(
    pool: web::Data<SqlitePool>,
    AdminUser(admin): AdminUser,
) -> Result<HttpResponse, PollError> {
    let now = Utc::now();
    let polls = poll::list_polls(&pool, &admin, false).await?;
    let polls: Vec<OutgoingPollSummary> = polls
        .iter()
        .map(|poll| OutgoingPollSummary::new(poll, now))
        .collect();
    Ok(HttpResponse::Ok().json(polls))
}

pub async fn create_poll(
    pool: web::Data<SqlitePool>,
    AdminUser(admin): AdminUser,
    payload: web::Json<IncomingPoll>,
) -> Result<HttpResponse, PollError> {
    let IncomingPoll {
        question,
        options,
        expiry,
        active,
    } = payload.into_inner();
    let expiry = match expiry {
        Some(raw) => poll::parse_expiry(&raw)?,
        None => None,
    };
    let request = CreatePoll {
        question,
        options,
        expiry,
        active,
    };
    let now = Utc::now();
    let created = poll::create_poll(&pool, &admin, request, now).await?;
    Ok(HttpResponse::Created().json(OutgoingPoll::new(&created, now)))
}

pub async fn toggle_poll(
    pool: web::Data<SqlitePool>,
    AdminUser(admin): AdminUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PollError> {
    let poll = poll::toggle_active(&pool, &admin, PollId(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(OutgoingPollSummary::new(&poll, Utc::now())))
}

pub async fn delete_poll(
    pool: web::Data<SqlitePool>,
    AdminUser(admin): AdminUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PollError> {
    poll::delete_poll(&pool, &admin, PollId(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(OutgoingStatus::new("Poll deleted")))
}

pub async fn poll_results(
    pool: web::Data<SqlitePool>,
    AdminUser(admin): AdminUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PollError> {
    let results = results::compute_results(&pool, &admin, PollId(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(OutgoingResults::from(results)))
}

pub async fn export_csv(
    pool: web::Data<SqlitePool>,
    AdminUser(admin): AdminUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PollError> {
    let poll_id = PollId(path.into_inner());
    let csv = results::export_csv(&pool, &admin, poll_id).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={}", results::export_filename(poll_id)),
        ))
        .body(csv))
}
