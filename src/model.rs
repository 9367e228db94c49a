//! Followup message handle
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use crate::error::{Result, SlashError};
use crate::http::SlashCommandRequest;
use crate::response::ResponseOptions;
use serde_json::Value;
use serenity::model::channel::Message;
use serenity::model::id::MessageId;

/// A followup message sent through [`crate::SlashContext::send`].
///
/// The decoded [`Message`] is only present when the response was sent with
/// `wait`; without it the platform returns no body and the handle cannot be
/// edited or deleted.
pub struct SlashMessage {
    message: Option<Message>,
    http: SlashCommandRequest,
    interaction_token: String,
}

impl SlashMessage {
    pub(crate) fn from_response(
        data: Option<Value>,
        http: SlashCommandRequest,
        interaction_token: String,
    ) -> Result<Self> {
        let message = data.map(serde_json::from_value).transpose()?;
        Ok(Self {
            message,
            http,
            interaction_token,
        })
    }

    /// The created message, when the response was sent with `wait`
    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    pub fn id(&self) -> Option<MessageId> {
        self.message.as_ref().map(|m| m.id)
    }

    fn require_id(&self, action: &str) -> Result<MessageId> {
        self.id().ok_or_else(|| {
            SlashError::IncorrectFormat(format!(
                "cannot {action} a followup that was sent without `wait`"
            ))
        })
    }

    /// Edit this followup in place, refreshing the stored message
    pub async fn edit(&mut self, options: ResponseOptions) -> Result<()> {
        let message_id = self.require_id("edit")?;
        let body = options.assemble_for_edit()?;
        let data = self
            .http
            .edit_followup(&self.interaction_token, message_id, &body)
            .await?;
        self.message = Some(serde_json::from_value(data)?);
        Ok(())
    }

    /// Delete this followup
    pub async fn delete(&self) -> Result<()> {
        let message_id = self.require_id("delete")?;
        self.http
            .delete_followup(&self.interaction_token, message_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serenity::model::id::ApplicationId;

    fn handle_without_message() -> SlashMessage {
        let http = SlashCommandRequest::with_base_url(
            reqwest::Client::new(),
            ApplicationId(1),
            "http://localhost:1",
        );
        SlashMessage::from_response(None, http, "tok".into()).unwrap()
    }

    #[test]
    fn test_no_body_means_no_message() {
        let handle = handle_without_message();
        assert!(handle.message().is_none());
        assert!(handle.id().is_none());
    }

    #[tokio::test]
    async fn test_delete_without_wait_is_rejected() {
        let handle = handle_without_message();
        let result = handle.delete().await;
        assert!(matches!(result, Err(SlashError::IncorrectFormat(_))));
    }

    #[tokio::test]
    async fn test_edit_without_wait_is_rejected() {
        let mut handle = handle_without_message();
        let result = handle.edit(ResponseOptions::new().content("x")).await;
        assert!(matches!(result, Err(SlashError::IncorrectFormat(_))));
    }
}
