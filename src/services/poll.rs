use super::auth::Admin;
use crate::db::{
    self,
    option::InternalOption,
    poll::{InternalPoll, NewPoll, PollId},
};
use crate::error::PollError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use sqlx::SqlitePool;
use tracing::{info, instrument, warn};

#[derive(Clone, Debug)]
pub struct PollWithOptions {
    pub poll: InternalPoll,
    pub options: Vec<InternalOption>,
}

/// Poll as submitted by an admin, before validation.
#[derive(Clone, Debug, Default)]
pub struct CreatePoll {
    pub question: String,
    pub options: Vec<String>,
    pub expiry: Option<DateTime<Utc>>,
    pub active: bool,
}

const MIN_OPTIONS: usize = 2;

/// Trims the question and the options and drops blank options.
pub fn validate(request: CreatePoll) -> Result<NewPoll, PollError> {
    let question = request.question.trim().to_owned();
    let options: Vec<String> = request
        .options
        .iter()
        .map(|option| option.trim())
        .filter(|option| !option.is_empty())
        .map(str::to_owned)
        .collect();
    if question.is_empty() || options.len() < MIN_OPTIONS {
        return Err(PollError::validation(
            "Provide a question and at least two options",
        ));
    }
    Ok(NewPoll {
        question,
        options,
        expiry: request.expiry,
        active: request.active,
    })
}

/// Blank means no expiry. Accepts RFC 3339, or a naive date-time the way a
/// datetime picker sends it (`2026-10-18T14:30`), read as UTC. A bare date
/// means midnight.
pub fn parse_expiry(raw: &str) -> Result<Option<DateTime<Utc>>, PollError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(expiry) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(expiry.with_timezone(&Utc)));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| Some(Utc.from_utc_datetime(&naive)))
        .ok_or_else(|| PollError::validation("Invalid expiry format, use ISO-8601"))
}

#[instrument(skip(pool, admin, request), fields(admin_id = %admin.user().id))]
pub async fn create_poll(
    pool: &SqlitePool,
    admin: &Admin,
    request: CreatePoll,
    now: DateTime<Utc>,
) -> Result<PollWithOptions, PollError> {
    let new_poll = validate(request).map_err(|err| {
        warn!(error = %err, "Rejected poll");
        err
    })?;
    let (poll, options) = db::poll::insert_poll_with_options(pool, new_poll, now).await?;
    info!(poll_id = %poll.id, options = options.len(), "Poll created");
    Ok(PollWithOptions { poll, options })
}

/// Every poll when `active_only` is false, newest first.
pub async fn list_polls(
    pool: &SqlitePool,
    _admin: &Admin,
    active_only: bool,
) -> Result<Vec<InternalPoll>, PollError> {
    Ok(db::poll::list_polls(pool, active_only).await?)
}

/// Polls a user can vote in right now.
pub async fn list_open_polls(
    pool: &SqlitePool,
    now: DateTime<Utc>,
) -> Result<Vec<InternalPoll>, PollError> {
    let polls = db::poll::list_polls(pool, true).await?;
    Ok(polls.into_iter().filter(|poll| !poll.is_expired(now)).collect())
}

pub async fn poll_with_options(
    pool: &SqlitePool,
    poll_id: PollId,
) -> Result<PollWithOptions, PollError> {
    let poll = db::poll::poll_by_id(pool, poll_id)
        .await?
        .ok_or(PollError::NotFound("poll"))?;
    let options = db::option::options_for_poll(pool, poll_id).await?;
    Ok(PollWithOptions { poll, options })
}

#[instrument(skip(pool, admin), fields(admin_id = %admin.user().id))]
pub async fn toggle_active(
    pool: &SqlitePool,
    admin: &Admin,
    poll_id: PollId,
) -> Result<InternalPoll, PollError> {
    let poll = db::poll::toggle_active(pool, poll_id)
        .await?
        .ok_or(PollError::NotFound("poll"))?;
    info!(active = poll.active, "Poll status updated");
    Ok(poll)
}

#[instrument(skip(pool, admin), fields(admin_id = %admin.user().id))]
pub async fn delete_poll(pool: &SqlitePool, admin: &Admin, poll_id: PollId) -> Result<(), PollError> {
    if !db::poll::delete_poll(pool, poll_id).await? {
        return Err(PollError::NotFound("poll"));
    }
    info!("Poll deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn request(question: &str, options: &[&str]) -> CreatePoll {
        CreatePoll {
            question: question.to_owned(),
            options: options.iter().map(|o| o.to_string()).collect(),
            expiry: None,
            active: true,
        }
    }

    #[test]
    fn test_validate_trims_and_drops_blank_options() {
        let poll = validate(request("  Best color? ", &[" Red", "", "   ", "Blue "])).unwrap();
        assert_eq!(poll.question, "Best color?");
        assert_eq!(poll.options, vec!["Red", "Blue"]);
    }

    #[test]
    fn test_validate_needs_question_and_two_options() {
        assert!(matches!(
            validate(request("   ", &["Red", "Blue"])),
            Err(PollError::Validation(_))
        ));
        assert!(matches!(
            validate(request("Best color?", &["Red", "  "])),
            Err(PollError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_expiry_formats() {
        assert_eq!(parse_expiry("").unwrap(), None);
        assert_eq!(parse_expiry("   ").unwrap(), None);

        let picker = parse_expiry("2026-10-18T14:30").unwrap().unwrap();
        assert_eq!((picker.year(), picker.month(), picker.day()), (2026, 10, 18));
        assert_eq!((picker.hour(), picker.minute()), (14, 30));

        let with_seconds = parse_expiry("2026-10-18T14:30:15").unwrap().unwrap();
        assert_eq!(with_seconds.second(), 15);

        let offset = parse_expiry("2026-10-18T14:30:00+02:00").unwrap().unwrap();
        assert_eq!(offset.hour(), 12);

        let date_only = parse_expiry("2026-10-18").unwrap().unwrap();
        assert_eq!((date_only.year(), date_only.month(), date_only.day()), (2026, 10, 18));
        assert_eq!((date_only.hour(), date_only.minute(), date_only.second()), (0, 0, 0));
    }

    #[test]
    fn test_parse_expiry_rejects_garbage() {
        assert!(matches!(parse_expiry("next tuesday"), Err(PollError::Validation(_))));
        assert!(matches!(parse_expiry("2026-13-01T10:00"), Err(PollError::Validation(_))));
        assert!(matches!(parse_expiry("2026-02-30"), Err(PollError::Validation(_))));
    }
}
