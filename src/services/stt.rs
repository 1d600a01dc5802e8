use log::{debug, error};
use std::error::Error as _;

use crate::audio::{detect_audio_format, AudioFile};
use crate::config::Settings;
use crate::error::ServiceError;
use crate::provider::ClientFactory;

pub const TRANSCRIPTION_LANGUAGE: &str = "en";

/// Transcribes an uploaded clip. Failures are logged with their full source
/// chain and returned as `STT Error: <message>`.
pub async fn transcribe_audio(
    factory: &dyn ClientFactory,
    settings: &Settings,
    audio: Vec<u8>,
    mime_type: &str,
) -> Result<String, ServiceError> {
    let client = factory.create(settings);
    let (ext, mime_hint) = detect_audio_format(mime_type);
    let file = AudioFile::from_bytes(audio, format!("audio.{}", ext), mime_hint);

    debug!("Transcribing {} ({} bytes, declared {})", file.file_name, file.len(), mime_type);

    match client
        .transcribe(&settings.openai_model_stt, file, TRANSCRIPTION_LANGUAGE)
        .await
    {
        Ok(transcript) => Ok(transcript.into_text()),
        Err(e) => {
            let message = format!("STT Error: {}", e);
            error!("{}", message);
            let mut source = e.source();
            while let Some(cause) = source {
                error!("  caused by: {}", cause);
                source = cause.source();
            }
            Err(ServiceError::Upstream(message))
        }
    }
}
