use crate::db::{
    option::{InternalOption, OptionId},
    poll::{InternalPoll, PollId, PollStatus},
    user::{InternalUser, UserId},
    vote::{InternalVote, VoteId},
};
use crate::services::{poll::PollWithOptions, results::PollResults};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Incoming

#[derive(Serialize, Deserialize)]
pub struct IncomingRegister {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct IncomingLogin {
    pub username: String,
    pub password: String,
}

fn default_active() -> bool {
    true
}

#[derive(Serialize, Deserialize)]
pub struct IncomingPoll {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// ISO-8601, blank or missing for no expiry
    #[serde(default)]
    pub expiry: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Serialize, Deserialize)]
pub struct IncomingVote {
    pub option: OptionId,
}

// Outgoing

#[derive(Serialize, Deserialize)]
pub struct OutgoingStatus {
    pub status: String,
}

impl OutgoingStatus {
    pub fn new(status: &str) -> Self {
        Self {
            status: status.to_owned(),
        }
    }
}

#[derive(Serialize)]
pub struct OutgoingUser {
    pub id: UserId,
    pub username: String,
    pub is_admin: bool,
}

impl From<&InternalUser> for OutgoingUser {
    fn from(user: &InternalUser) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin,
        }
    }
}

#[derive(Serialize)]
pub struct OutgoingLogin {
    pub user: OutgoingUser,
    /// Where a browser client should go next
    pub redirect: &'static str,
}

#[derive(Serialize)]
pub struct OutgoingPollSummary {
    pub id: PollId,
    pub question: String,
    pub created_at: DateTime<Utc>,
    pub expiry: Option<DateTime<Utc>>,
    pub active: bool,
    pub status: PollStatus,
}

impl OutgoingPollSummary {
    pub fn new(poll: &InternalPoll, now: DateTime<Utc>) -> Self {
        Self {
            id: poll.id,
            question: poll.question.clone(),
            created_at: poll.created_at,
            expiry: poll.expiry,
            active: poll.active,
            status: poll.status(now),
        }
    }
}

#[derive(Serialize)]
pub struct OutgoingOption {
    pub id: OptionId,
    pub text: String,
}

impl From<&InternalOption> for OutgoingOption {
    fn from(option: &InternalOption) -> Self {
        Self {
            id: option.id,
            text: option.text.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct OutgoingPoll {
    #[serde(flatten)]
    pub poll: OutgoingPollSummary,
    pub options: Vec<OutgoingOption>,
}

impl OutgoingPoll {
    pub fn new(poll: &PollWithOptions, now: DateTime<Utc>) -> Self {
        Self {
            poll: OutgoingPollSummary::new(&poll.poll, now),
            options: poll.options.iter().map(OutgoingOption::from).collect(),
        }
    }
}

/// A poll as a voter sees it.
#[derive(Serialize)]
pub struct OutgoingPollView {
    #[serde(flatten)]
    pub poll: OutgoingPoll,
    pub expired: bool,
    pub already_voted: bool,
}

#[derive(Serialize)]
pub struct OutgoingIndex {
    pub current_user: Option<OutgoingUser>,
    pub polls: Vec<OutgoingPollSummary>,
}

#[derive(Serialize)]
pub struct OutgoingVote {
    pub id: VoteId,
    pub poll_id: PollId,
    pub option_id: OptionId,
    pub created_at: DateTime<Utc>,
}

impl From<InternalVote> for OutgoingVote {
    fn from(vote: InternalVote) -> Self {
        Self {
            id: vote.id,
            poll_id: vote.poll_id,
            option_id: vote.option_id,
            created_at: vote.created_at,
        }
    }
}

/// Results plus the label/data pair a chart wants.
#[derive(Serialize)]
pub struct OutgoingResults {
    #[serde(flatten)]
    pub results: PollResults,
    pub labels: Vec<String>,
    pub data: Vec<i64>,
}

impl From<PollResults> for OutgoingResults {
    fn from(results: PollResults) -> Self {
        Self {
            labels: results.labels(),
            data: results.data(),
            results,
        }
    }
}
