use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;
use std::sync::Arc;

mod api;
mod auth;
mod config;
mod constants;
mod docs;
mod error;
mod model;
mod repo;
mod routes;
mod setup;
mod sheets;
mod utils;

use config::{Config, SheetsConfig};
use repo::leaves::LeaveRepo;
use repo::settings::SettingsRepo;
use repo::users::UserRepo;
use setup::SheetSetup;
use sheets::client::SheetStore;
use sheets::http::HttpTransport;

use crate::docs::ApiDoc;
use tracing::{error, info};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Leave Management API"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let sheets_config = SheetsConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    let transport = HttpTransport::new(sheets_config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    let store = Arc::new(SheetStore::new(Arc::new(transport)));

    let users = Arc::new(UserRepo::new(store.clone()));
    let settings = Arc::new(SettingsRepo::new(store.clone()));
    let leaves = Arc::new(LeaveRepo::new(store.clone(), settings.clone()));
    let sheet_setup = Arc::new(SheetSetup::new(store.clone()));

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    // Provision missing sheets in the background so startup never blocks on
    // the spreadsheet backend.
    let setup_for_warmup = sheet_setup.clone();
    actix_web::rt::spawn(async move {
        if let Err(e) = setup_for_warmup.initialize().await {
            error!(error = %e, "Sheet setup failed");
        }
    });

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(users.clone()))
            .app_data(Data::new(settings.clone()))
            .app_data(Data::new(leaves.clone()))
            .app_data(Data::new(sheet_setup.clone()))
            .service(index)
            // Configure auth + protected routes with rate limiting
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
