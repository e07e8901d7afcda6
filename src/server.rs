use crate::error::PollError;
use crate::handlers::{admin, auth, poll};
use actix_web::web;
use tracing::debug;

/// Every route of the service. The pool is expected as `web::Data<SqlitePool>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "Rejected request body");
        PollError::validation(format!("Invalid request body: {}", err)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "Rejected path");
        PollError::NotFound("poll").into()
    }))
    .route("/register", web::post().to(auth::register))
    .route("/login", web::post().to(auth::login))
    .route("/logout", web::get().to(auth::logout))
    .route("/", web::get().to(poll::index))
    .route("/my_votes", web::get().to(poll::my_votes))
    .service(
        web::resource("/poll/{poll_id}")
            .route(web::get().to(poll::poll_detail))
            .route(web::post().to(poll::cast_vote)),
    )
    .service(
        web::scope("/admin")
            .route("", web::get().to(admin::dashboard))
            .route("/create", web::post().to(admin::create_poll))
            .route("/toggle/{poll_id}", web::post().to(admin::toggle_poll))
            .route("/delete/{poll_id}", web::post().to(admin::delete_poll))
            .route("/results/{poll_id}", web::get().to(admin::poll_results))
            .route("/export/{poll_id}", web::get().to(admin::export_csv)),
    );
}
