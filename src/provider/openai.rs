use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt};
use log::{debug, info};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;

use super::{ClientFactory, Provider, SpeechAudio, Transcript};
use crate::audio::AudioFile;
use crate::config::Settings;
use crate::error::ProviderError;
use crate::web::models::ChatTurn;

// A client for the OpenAI REST API, bound to one API key
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl OpenAiClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            base_url: settings.openai_base_url.clone(),
            api_key: settings.openai_api_key.clone(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    // Turns a non-2xx reply into an error carrying the provider's body text
    async fn check(response: Response) -> Result<Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error response".to_string());
        Err(ProviderError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl Provider for OpenAiClient {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatTurn],
    ) -> Result<Option<String>, ProviderError> {
        let url = self.url("chat/completions");
        let payload = json!({
            "model": model,
            "messages": messages,
        });

        info!("Sending {} message(s) to {} (model: {})", messages.len(), url, model);
        debug!("Payload: {}", payload);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;
        let response = Self::check(response).await?;

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content);

        if let Some(text) = &content {
            info!("Response length: {} characters", text.len());
        }
        Ok(content)
    }

    async fn transcribe(
        &self,
        model: &str,
        file: AudioFile,
        language: &str,
    ) -> Result<Transcript, ProviderError> {
        let url = self.url("audio/transcriptions");
        debug!(
            "Uploading {} ({} bytes, {}) to {}",
            file.file_name,
            file.len(),
            file.mime_type,
            url
        );

        // Only the file name goes upstream; the provider sniffs the format from it
        let file_name = file.file_name.clone();
        let part = Part::bytes(file.into_bytes()).file_name(file_name);

        let form = Form::new()
            .part("file", part)
            .text("model", model.to_string())
            .text("language", language.to_string());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;
        let response = Self::check(response).await?;

        let body = response.text().await?;
        debug!("Transcription response length: {} characters", body.len());
        Ok(Transcript::from_body(body))
    }

    async fn synthesize(
        &self,
        model: &str,
        voice: &str,
        input: &str,
    ) -> Result<SpeechAudio, ProviderError> {
        let url = self.url("audio/speech");
        let payload = json!({
            "model": model,
            "voice": voice,
            "input": input,
        });

        info!("Requesting speech for {} characters (model: {}, voice: {})", input.len(), model, voice);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;
        let response = Self::check(response).await?;

        let stream = response.bytes_stream().map_err(ProviderError::from).boxed();
        Ok(SpeechAudio::Stream(stream))
    }
}

/// Hands out a new [`OpenAiClient`] per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAiFactory;

impl ClientFactory for OpenAiFactory {
    fn create(&self, settings: &Settings) -> Box<dyn Provider> {
        Box::new(OpenAiClient::new(settings))
    }
}
