use crate::db::{
    self,
    session::{InternalSession, SessionId},
    user::InternalUser,
};
use crate::error::PollError;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use rand_core::OsRng;
use sqlx::SqlitePool;
use tracing::{info, instrument, warn};

/// Proof that the caller is an administrator. Only `require_admin` hands
/// these out, and every admin-only operation asks for one.
#[derive(Clone, Debug)]
pub struct Admin {
    user: InternalUser,
}

impl Admin {
    pub fn user(&self) -> &InternalUser {
        &self.user
    }
}

pub fn hash_password(password: &str) -> Result<String, PollError> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(PollError::Credential)?;
    Ok(password_hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(password_hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[instrument(skip(pool, password))]
pub async fn register(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<InternalUser, PollError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(PollError::validation("Provide username and password"));
    }
    if db::user::user_by_username(pool, username).await?.is_some() {
        warn!("Registration failed: username taken");
        return Err(PollError::UsernameTaken);
    }

    let password_hash = hash_password(password)?;
    match db::user::insert_user(pool, username, &password_hash, false).await {
        Ok(user) => {
            info!(user_id = %user.id, "User registered");
            Ok(user)
        }
        Err(err) if db::is_unique_violation(&err) => Err(PollError::UsernameTaken),
        Err(err) => Err(err.into()),
    }
}

#[instrument(skip(pool, password))]
pub async fn login(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    now: DateTime<Utc>,
) -> Result<(InternalUser, InternalSession), PollError> {
    let user = db::user::user_by_username(pool, username.trim()).await?;
    let user = match user {
        Some(user) if verify_password(password, &user.password_hash) => user,
        _ => {
            warn!("Login failed");
            return Err(PollError::InvalidCredentials);
        }
    };
    let session = db::session::save_session(pool, user.id, now).await?;
    info!(user_id = %user.id, "User logged in");
    Ok((user, session))
}

/// Logging out of an unknown session is not an error.
pub async fn logout(pool: &SqlitePool, session_id: SessionId) -> Result<(), PollError> {
    if db::session::delete_session(pool, session_id).await? {
        info!(%session_id, "User logged out");
    }
    Ok(())
}

/// Creates the admin account unless some admin already exists.
#[instrument(skip(pool, password))]
pub async fn seed_admin(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Option<InternalUser>, PollError> {
    if db::user::admin_exists(pool).await? {
        return Ok(None);
    }
    let password_hash = hash_password(password)?;
    let admin = db::user::insert_user(pool, username, &password_hash, true).await?;
    info!(user_id = %admin.id, username, "Seeded admin");
    Ok(Some(admin))
}

pub async fn current_user(
    pool: &SqlitePool,
    session_id: Option<SessionId>,
) -> Result<Option<InternalUser>, PollError> {
    match session_id {
        Some(session_id) => Ok(db::user::user_by_session(pool, session_id).await?),
        None => Ok(None),
    }
}

pub fn require_login(user: Option<InternalUser>) -> Result<InternalUser, PollError> {
    user.ok_or(PollError::AuthRequired)
}

pub fn require_admin(user: InternalUser) -> Result<Admin, PollError> {
    if user.is_admin {
        Ok(Admin { user })
    } else {
        warn!(user_id = %user.id, "Admin access denied");
        Err(PollError::AdminRequired)
    }
}
