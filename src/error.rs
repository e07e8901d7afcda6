use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum PollError {
    #[error("{0}")]
    Validation(String),

    #[error("No such {0}")]
    NotFound(&'static str),

    #[error("Invalid option selected")]
    InvalidOption,

    #[error("This poll is closed; you cannot vote")]
    PollClosed,

    #[error("You have already voted in this poll")]
    DuplicateVote,

    #[error("Please login to continue")]
    AuthRequired,

    #[error("Admin access required")]
    AdminRequired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Credential hashing failed: {0}")]
    Credential(argon2::password_hash::Error),

    #[error("Failed to write export: {0}")]
    Export(#[from] csv::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl PollError {
    pub fn validation(message: impl Into<String>) -> Self {
        PollError::Validation(message.into())
    }

    /// Message safe to show to the caller. Internal failures are not spelled out.
    pub fn public_message(&self) -> String {
        match self {
            PollError::Credential(_) | PollError::Export(_) | PollError::Storage(_) => {
                "Something went wrong, please try again".to_owned()
            }
            other => other.to_string(),
        }
    }
}

impl ResponseError for PollError {
    fn status_code(&self) -> StatusCode {
        match self {
            PollError::Validation(_) | PollError::InvalidOption => StatusCode::BAD_REQUEST,
            PollError::AuthRequired | PollError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            PollError::AdminRequired => StatusCode::FORBIDDEN,
            PollError::NotFound(_) => StatusCode::NOT_FOUND,
            PollError::PollClosed | PollError::DuplicateVote | PollError::UsernameTaken => {
                StatusCode::CONFLICT
            }
            PollError::Credential(_) | PollError::Export(_) | PollError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        HttpResponse::build(status).json(json!({ "error": self.public_message() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_are_not_leaked() {
        let err = PollError::Storage(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.public_message().contains("Storage"));
    }

    #[test]
    fn test_business_errors_map_to_client_statuses() {
        assert_eq!(PollError::DuplicateVote.status_code(), StatusCode::CONFLICT);
        assert_eq!(PollError::PollClosed.status_code(), StatusCode::CONFLICT);
        assert_eq!(PollError::InvalidOption.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(PollError::AdminRequired.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(PollError::NotFound("poll").to_string(), "No such poll");
    }
}
