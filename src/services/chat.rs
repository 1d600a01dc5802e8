use log::debug;

use crate::config::Settings;
use crate::error::ServiceError;
use crate::provider::ClientFactory;
use crate::web::models::{ChatTurn, Role};

/// Sends the history plus the new user message to the chat model and returns
/// the first completion's text, or an empty string when there is none.
pub async fn generate_reply(
    factory: &dyn ClientFactory,
    settings: &Settings,
    message: &str,
    history: &[ChatTurn],
) -> Result<String, ServiceError> {
    let client = factory.create(settings);

    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.extend_from_slice(history);
    messages.push(ChatTurn {
        role: Role::User,
        content: message.to_string(),
    });

    debug!("Chat turns sent upstream: {}", messages.len());

    let reply = client
        .chat_completion(&settings.openai_model_chat, &messages)
        .await?;
    Ok(reply.unwrap_or_default())
}
