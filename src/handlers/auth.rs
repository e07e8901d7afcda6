use crate::error::PollError;
use crate::extract::{self, SESSION_COOKIE};
use crate::messages::{IncomingLogin, IncomingRegister, OutgoingLogin, OutgoingStatus, OutgoingUser};
use crate::services::auth;
use actix_web::{cookie::Cookie, web, HttpRequest, HttpResponse};
use chrono::Utc;
use sqlx::SqlitePool;

pub async fn register(
    pool: web::Data<SqlitePool>,
    payload: web::Json<IncomingRegister>,
) -> Result<HttpResponse, PollError> {
    let user = auth::register(&pool, &payload.username, &payload.password).await?;
    Ok(HttpResponse::Created().json(OutgoingUser::from(&user)))
}

pub async fn login(
    pool: web::Data<SqlitePool>,
    payload: web::Json<IncomingLogin>,
) -> Result<HttpResponse, PollError> {
    let (user, session) = auth::login(&pool, &payload.username, &payload.password, Utc::now()).await?;
    let cookie = Cookie::build(SESSION_COOKIE, session.id.as_string())
        .path("/")
        .http_only(true)
        .finish();
    let redirect = if user.is_admin { "/admin" } else { "/" };
    Ok(HttpResponse::Ok().cookie(cookie).json(OutgoingLogin {
        user: OutgoingUser::from(&user),
        redirect,
    }))
}

pub async fn logout(pool: web::Data<SqlitePool>, req: HttpRequest) -> Result<HttpResponse, PollError> {
    if let Some(session_id) = extract::session_id(&req) {
        auth::logout(&pool, session_id).await?;
    }
    let mut removal = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    removal.make_removal();
    Ok(HttpResponse::Ok()
        .cookie(removal)
        .json(OutgoingStatus::new("Logged out")))
}
