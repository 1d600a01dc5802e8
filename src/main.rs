use std::sync::Arc;

use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use anyhow::Context;
use log::{error, info};

use voice_bot_api::config;
use voice_bot_api::provider::OpenAiFactory;
use voice_bot_api::web::{cors, routes};
use voice_bot_api::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting Voice Bot API");

    // Resolve configuration once; a missing API key stops the process here
    let settings = match config::resolve() {
        Ok(settings) => settings.clone(),
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Models: chat={}, stt={}, tts={}",
        settings.openai_model_chat, settings.openai_model_stt, settings.openai_model_tts
    );
    match &settings.frontend_origin {
        Some(origin) => info!("CORS restricted to {}", origin),
        None => info!("CORS open to all origins"),
    }

    let bind = (settings.host.clone(), settings.port);
    let app_state = Data::new(AppState::new(settings, Arc::new(OpenAiFactory)));

    info!("Listening on {}:{}", bind.0, bind.1);

    // Start web server
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(cors(&app_state.settings))
            .app_data(app_state.clone())
            .configure(routes::configure)
    })
    .bind(&bind)
    .with_context(|| format!("failed to bind {}:{}", bind.0, bind.1))?
    .run()
    .await
    .context("server error")?;

    Ok(())
}
