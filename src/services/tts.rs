use log::{debug, error};

use crate::config::Settings;
use crate::error::ServiceError;
use crate::provider::ClientFactory;

pub const TTS_VOICE: &str = "alloy";

/// Synthesizes `text` to MP3 bytes with the configured voice model.
pub async fn synthesize_speech(
    factory: &dyn ClientFactory,
    settings: &Settings,
    text: &str,
) -> Result<Vec<u8>, ServiceError> {
    let client = factory.create(settings);

    let result = match client
        .synthesize(&settings.openai_model_tts, TTS_VOICE, text)
        .await
    {
        Ok(audio) => audio.into_bytes().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(bytes) => {
            debug!("Synthesized {} bytes of audio", bytes.len());
            Ok(bytes)
        }
        Err(e) => {
            error!("TTS Error: {}", e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fake::{self, Call, FakeFactory};

    #[actix_web::test]
    async fn uses_configured_model_and_alloy_voice() {
        let factory = FakeFactory::default();
        let audio = synthesize_speech(&factory, &fake::settings(), "Thanks for calling")
            .await
            .unwrap();
        assert_eq!(audio, b"ID3fake-mp3".to_vec());
        assert_eq!(
            factory.calls(),
            vec![Call::Synthesize {
                model: "gpt-4o-mini-tts".into(),
                voice: "alloy".into(),
                input: "Thanks for calling".into(),
            }]
        );
    }

    #[actix_web::test]
    async fn streamed_audio_is_collected() {
        let factory = FakeFactory {
            speech: b"ID3-a-much-longer-payload".to_vec(),
            stream_speech: true,
            ..FakeFactory::default()
        };
        let audio = synthesize_speech(&factory, &fake::settings(), "hi").await.unwrap();
        assert_eq!(audio, b"ID3-a-much-longer-payload".to_vec());
    }

    #[actix_web::test]
    async fn failure_message_is_kept() {
        let factory = FakeFactory::failing("voice unavailable");
        let err = synthesize_speech(&factory, &fake::settings(), "hi").await.unwrap_err();
        assert_eq!(err.to_string(), "provider returned 502: voice unavailable");
    }
}
