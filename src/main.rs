// main.rs
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::web::JsonConfig;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;

use desa_suntenjaya_backend::auth::ConfigAuthenticator;
use desa_suntenjaya_backend::config::Config;
use desa_suntenjaya_backend::controllers::{self, AppState};
use desa_suntenjaya_backend::db;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("starting up...");

    let config = Config::from_env();
    let store = match db::establish_connection(&config.store).await {
        Ok(store) => store,
        Err(e) => {
            log::error!("Gagal inisialisasi content store: {:?}", e);
            std::process::exit(1);
        }
    };

    let bind_addr = config.bind_addr.clone();
    let state = web::Data::new(AppState {
        authenticator: Arc::new(ConfigAuthenticator::from_config(&config)),
        store,
        config,
    });

    log::info!("listening on {}", bind_addr);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&state.config.cors_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
            .supports_credentials()
            .max_age(3600);

        let json_config = JsonConfig::default()
            .limit(1024 * 1024)
            .error_handler(|err, _req| {
                log::error!("JSON payload error: {}", err);
                actix_web::error::ErrorBadRequest(format!("Payload error: {}", err))
            });

        App::new()
            .app_data(state.clone())
            .app_data(json_config)
            .wrap(cors)
            .wrap(Logger::default())
            .configure(controllers::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
