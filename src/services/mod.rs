pub mod chat;
pub mod stt;
pub mod tts;

pub use chat::generate_reply;
pub use stt::transcribe_audio;
pub use tts::synthesize_speech;

#[cfg(test)]
pub(crate) mod fake {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use bytes::Bytes;

    use crate::audio::AudioFile;
    use crate::config::Settings;
    use crate::error::ProviderError;
    use crate::provider::{ClientFactory, Provider, SpeechAudio, Transcript};
    use crate::web::models::ChatTurn;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Chat { model: String, messages: Vec<ChatTurn> },
        Transcribe { model: String, file_name: String, mime_type: String, data: Vec<u8>, language: String },
        Synthesize { model: String, voice: String, input: String },
    }

    // Records every call and answers from canned values
    #[derive(Clone)]
    pub struct FakeFactory {
        pub calls: Arc<Mutex<Vec<Call>>>,
        pub created: Arc<Mutex<usize>>,
        pub reply: Option<String>,
        pub transcript: Transcript,
        pub speech: Vec<u8>,
        pub stream_speech: bool,
        pub fail_with: Option<String>,
    }

    impl Default for FakeFactory {
        fn default() -> Self {
            Self {
                calls: Arc::default(),
                created: Arc::default(),
                reply: Some("Hi! How can I help?".into()),
                transcript: Transcript::Json { text: "hello world".into() },
                speech: b"ID3fake-mp3".to_vec(),
                stream_speech: false,
                fail_with: None,
            }
        }
    }

    impl FakeFactory {
        pub fn failing(message: &str) -> Self {
            Self { fail_with: Some(message.into()), ..Self::default() }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn created(&self) -> usize {
            *self.created.lock().unwrap()
        }
    }

    impl ClientFactory for FakeFactory {
        fn create(&self, _settings: &Settings) -> Box<dyn Provider> {
            *self.created.lock().unwrap() += 1;
            Box::new(self.clone())
        }
    }

    impl FakeFactory {
        fn outcome(&self) -> Result<(), ProviderError> {
            match &self.fail_with {
                Some(body) => Err(ProviderError::Status { status: 502, body: body.clone() }),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl Provider for FakeFactory {
        async fn chat_completion(
            &self,
            model: &str,
            messages: &[ChatTurn],
        ) -> Result<Option<String>, ProviderError> {
            self.calls.lock().unwrap().push(Call::Chat {
                model: model.into(),
                messages: messages.to_vec(),
            });
            self.outcome()?;
            Ok(self.reply.clone())
        }

        async fn transcribe(
            &self,
            model: &str,
            mut file: AudioFile,
            language: &str,
        ) -> Result<Transcript, ProviderError> {
            let data = file.read_all().map_err(|e| ProviderError::Decode(e.to_string()))?;
            self.calls.lock().unwrap().push(Call::Transcribe {
                model: model.into(),
                file_name: file.file_name.clone(),
                mime_type: file.mime_type.clone(),
                data,
                language: language.into(),
            });
            self.outcome()?;
            Ok(self.transcript.clone())
        }

        async fn synthesize(
            &self,
            model: &str,
            voice: &str,
            input: &str,
        ) -> Result<SpeechAudio, ProviderError> {
            self.calls.lock().unwrap().push(Call::Synthesize {
                model: model.into(),
                voice: voice.into(),
                input: input.into(),
            });
            self.outcome()?;
            if self.stream_speech {
                use futures_util::stream::{self, StreamExt};
                let chunks: Vec<Result<Bytes, ProviderError>> = self
                    .speech
                    .chunks(4)
                    .map(|c| Ok(Bytes::copy_from_slice(c)))
                    .collect();
                Ok(SpeechAudio::Stream(stream::iter(chunks).boxed()))
            } else {
                Ok(SpeechAudio::Bytes(Bytes::from(self.speech.clone())))
            }
        }
    }

    pub fn settings() -> Settings {
        Settings::from_lookup(|key| match key {
            "OPENAI_API_KEY" => Some("sk-test".into()),
            _ => None,
        })
        .unwrap()
    }
}
