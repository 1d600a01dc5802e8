use actix_web::web;

use crate::error::ServiceError;
use crate::web::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            web::scope("/api")
                .route("/chat", web::post().to(handlers::chat))
                .service(
                    web::scope("/voice")
                        .route("/stt", web::post().to(handlers::speech_to_text))
                        .route("/tts", web::post().to(handlers::text_to_speech)),
                ),
        )
        .route("/", web::get().to(handlers::index))
        .route("/health", web::get().to(handlers::health_check));
}

// Malformed JSON bodies are rejected as 422 before any handler runs
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ServiceError::Validation(err.to_string()).into())
}
