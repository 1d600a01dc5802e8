use actix_multipart::{Field, Multipart};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder};
use bytes::Bytes;
use futures_util::{stream, TryStreamExt};
use log::info;
use serde_json::json;

use crate::error::ServiceError;
use crate::services;
use crate::web::models::{ChatRequest, ChatResponse, SttResponse, TtsRequest};
use crate::AppState;

pub const DEFAULT_UPLOAD_MIME: &str = "audio/webm";
const UPLOAD_FIELD: &str = "audio";

// Root endpoint
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": "Voice Bot API is running" }))
}

// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

// Chat API endpoint
pub async fn chat(
    data: web::Data<AppState>,
    req: web::Json<ChatRequest>,
) -> Result<HttpResponse, ServiceError> {
    let req = req.into_inner();
    let history = req.history.unwrap_or_default();

    info!("Chat request: {} character(s), {} prior turn(s)", req.message.len(), history.len());

    let reply = services::generate_reply(
        data.provider.as_ref(),
        &data.settings,
        &req.message,
        &history,
    )
    .await?;

    Ok(HttpResponse::Ok().json(ChatResponse { reply }))
}

// Speech-to-text endpoint, takes a multipart audio upload
pub async fn speech_to_text(
    data: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, ServiceError> {
    let (audio, mime_type) = read_upload(&mut payload).await?;

    info!("STT request: {} bytes ({})", audio.len(), mime_type);

    let text =
        services::transcribe_audio(data.provider.as_ref(), &data.settings, audio, &mime_type)
            .await?;

    Ok(HttpResponse::Ok().json(SttResponse { text }))
}

// Text-to-speech endpoint, answers with an inline MP3
pub async fn text_to_speech(
    data: web::Data<AppState>,
    req: web::Json<TtsRequest>,
) -> Result<HttpResponse, ServiceError> {
    info!("TTS request: {} character(s)", req.text.len());

    let audio =
        services::synthesize_speech(data.provider.as_ref(), &data.settings, &req.text).await?;

    let disposition = ContentDisposition {
        disposition: DispositionType::Inline,
        parameters: vec![DispositionParam::Filename("speech.mp3".to_string())],
    };
    let body = stream::once(async move { Ok::<_, actix_web::Error>(Bytes::from(audio)) });

    Ok(HttpResponse::Ok()
        .content_type("audio/mpeg")
        .insert_header(disposition)
        .streaming(body))
}

/// Reads the uploaded audio: the `audio` field, or else the first field that
/// carries a filename. Returns the bytes and the declared content type.
async fn read_upload(payload: &mut Multipart) -> Result<(Vec<u8>, String), ServiceError> {
    while let Some(field) = payload.try_next().await.map_err(invalid_upload)? {
        let is_upload = field.name() == UPLOAD_FIELD
            || field.content_disposition().get_filename().is_some();
        if !is_upload {
            continue;
        }

        let mime_type = field
            .content_type()
            .map(|mime| mime.to_string())
            .unwrap_or_else(|| DEFAULT_UPLOAD_MIME.to_string());
        let audio = read_field(field).await?;
        return Ok((audio, mime_type));
    }

    Err(ServiceError::Validation(format!(
        "multipart request must include an '{}' file field",
        UPLOAD_FIELD
    )))
}

async fn read_field(mut field: Field) -> Result<Vec<u8>, ServiceError> {
    let mut audio = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(invalid_upload)? {
        audio.extend_from_slice(&chunk);
    }
    Ok(audio)
}

fn invalid_upload(err: actix_multipart::MultipartError) -> ServiceError {
    ServiceError::Validation(format!("invalid upload: {}", err))
}
