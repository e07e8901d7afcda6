use actix_web::{dev::Service, web, App, HttpServer};
use color_eyre::eyre::{Report, WrapErr};
use dotenv::dotenv;
use poll_server::{config::Config, db, log, server, services, span};
use tracing::info;
use tracing_futures::Instrument;

#[actix_web::main]
async fn main() -> Result<(), Report> {
    dotenv().ok();
    color_eyre::install()?;
    log::init();

    let config = Config::from_env()?;
    let pool = db::new_pool(&config.database_url)
        .await
        .wrap_err_with(|| format!("Failed to open database {}", config.database_url))?;
    db::migrate(&pool)
        .await
        .wrap_err("Failed to run database migrations")?;
    services::auth::seed_admin(&pool, &config.admin_username, &config.admin_password)
        .await
        .wrap_err("Failed to seed admin user")?;

    let pool = web::Data::new(pool);
    info!(address = %config.bind_address, "Starting poll server");

    HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .wrap_fn(|req, srv| {
                let span = span::request_span(&req);
                srv.call(req).instrument(span)
            })
            .configure(server::configure)
    })
    .bind(&config.bind_address)
    .wrap_err_with(|| format!("Failed to bind {}", config.bind_address))?
    .run()
    .await?;

    Ok(())
}
