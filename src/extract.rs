//! Request-scoped identity. Handlers name what they need in their
//! signature and the gate runs before the handler body does.

use crate::db::session::SessionId;
use crate::db::user::InternalUser;
use crate::services::auth::{self, Admin};
use actix_web::{dev::Payload, web, Error, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use sqlx::{types::Uuid, SqlitePool};

pub const SESSION_COOKIE: &str = "poll_session";

/// Session id from the cookie, if it is present and well formed.
pub fn session_id(req: &HttpRequest) -> Option<SessionId> {
    let cookie = req.cookie(SESSION_COOKIE)?;
    Uuid::parse_str(cookie.value()).ok().map(SessionId)
}

/// Whoever is logged in, or nobody.
pub struct CurrentUser(pub Option<InternalUser>);

/// Rejects anonymous callers with `AuthRequired`.
pub struct LoggedIn(pub InternalUser);

/// Rejects anonymous callers with `AuthRequired` and everyone else who is
/// not an admin with `AdminRequired`.
pub struct AdminUser(pub Admin);

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let pool = web::Data::<SqlitePool>::extract(req);
        let session_id = session_id(req);
        Box::pin(async move {
            let pool = pool.await?;
            let user = auth::current_user(&pool, session_id).await?;
            Ok(CurrentUser(user))
        })
    }
}

impl FromRequest for LoggedIn {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let current = CurrentUser::extract(req);
        Box::pin(async move {
            let CurrentUser(user) = current.await?;
            Ok(LoggedIn(auth::require_login(user)?))
        })
    }
}

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let logged_in = LoggedIn::extract(req);
        Box::pin(async move {
            let LoggedIn(user) = logged_in.await?;
            Ok(AdminUser(auth::require_admin(user)?))
        })
    }
}
