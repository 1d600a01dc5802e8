mod openai;

pub use openai::{OpenAiClient, OpenAiFactory};

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{BoxStream, StreamExt};
use serde_json::Value;

use crate::audio::AudioFile;
use crate::config::Settings;
use crate::error::ProviderError;
use crate::web::models::ChatTurn;

// Transcription response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcript {
    Json { text: String },
    Raw(String),
}

impl Transcript {
    pub fn from_body(body: String) -> Self {
        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(map)) => match map.get("text") {
                Some(Value::String(text)) => Transcript::Json { text: text.clone() },
                _ => Transcript::Raw(body),
            },
            _ => Transcript::Raw(body),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Transcript::Json { text } => text,
            Transcript::Raw(raw) => raw,
        }
    }
}

pub enum SpeechAudio {
    Bytes(Bytes),
    Stream(BoxStream<'static, Result<Bytes, ProviderError>>),
}

impl SpeechAudio {
    /// Collects the audio into one buffer, draining the stream if there is one.
    pub async fn into_bytes(self) -> Result<Vec<u8>, ProviderError> {
        match self {
            SpeechAudio::Bytes(bytes) => Ok(bytes.to_vec()),
            SpeechAudio::Stream(mut stream) => {
                let mut buf = Vec::new();
                while let Some(chunk) = stream.next().await {
                    buf.extend_from_slice(&chunk?);
                }
                Ok(buf)
            }
        }
    }
}

#[async_trait]
pub trait Provider: Send + Sync {
    /// Returns the content of the first completion choice, if the provider sent one.
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatTurn],
    ) -> Result<Option<String>, ProviderError>;

    async fn transcribe(
        &self,
        model: &str,
        file: AudioFile,
        language: &str,
    ) -> Result<Transcript, ProviderError>;

    async fn synthesize(
        &self,
        model: &str,
        voice: &str,
        input: &str,
    ) -> Result<SpeechAudio, ProviderError>;
}

/// Builds a fresh provider client for every service call. Nothing is pooled
/// or reused between calls.
pub trait ClientFactory: Send + Sync {
    fn create(&self, settings: &Settings) -> Box<dyn Provider>;
}
