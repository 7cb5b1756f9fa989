mod chat;
mod config;
mod i18n;
mod model;
mod render;
mod web;

use actix_web::{App, HttpServer, web::Data};
use actix_files as fs;
use anyhow::Context;
use dotenv::dotenv;
use log::{info, warn, error};
use std::sync::Arc;
use tera::Tera;

use config::Config;
use i18n::Language;
use model::{ChatCompletionClient, CompletionGateway};
use web::routes;
use web::session::SessionStore;

// App state structure
struct AppState {
    tera: Tera,
    gateway: Arc<dyn CompletionGateway>,
    sessions: SessionStore,
    default_language: Language,
}

fn load_templates(glob: &str) -> anyhow::Result<Tera> {
    let mut tera = Tera::new(glob).with_context(|| format!("failed to load templates from {}", glob))?;
    tera.autoescape_on(vec![".html"]);
    Ok(tera)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting chat web application");

    let config = Config::from_env();
    info!("Loaded configuration: {:?}", config);
    if !config.has_credential() {
        // The page still loads; each completion call reports the missing key.
        warn!("OPENAI_API_KEY is not set; replies will show an error until it is configured");
    }

    let gateway: Arc<dyn CompletionGateway> = Arc::new(ChatCompletionClient::new(&config));

    // Initialize template engine
    let tera = match load_templates("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            error!("Template parsing error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Create app state
    let app_state = Data::new(AppState {
        tera,
        gateway,
        sessions: SessionStore::new(config.session_idle),
        default_language: config.default_language,
    });

    info!("Listening on {}:{}", config.bind_addr, config.port);

    // Start web server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(routes::configure)
            .service(fs::Files::new("/static", "./static"))
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await
}
