pub mod handlers;
pub mod models;
pub mod routes;

use actix_cors::Cors;

use crate::config::Settings;

// Any origin unless FRONTEND_ORIGIN names one. With credentials allowed the
// any-origin case echoes the caller's origin rather than sending `*`.
pub fn cors(settings: &Settings) -> Cors {
    let cors = match settings.frontend_origin.as_deref() {
        None | Some("*") => Cors::default().allow_any_origin(),
        Some(origin) => Cors::default().allowed_origin(origin),
    };
    cors.allow_any_method()
        .allow_any_header()
        .supports_credentials()
}
