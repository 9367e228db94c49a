//! Interaction endpoint requests
//!
//! Thin wrapper over a shared `reqwest::Client` for the three endpoint
//! families an interaction response touches: the initial callback, followup
//! posts, and followup edits/deletes. Payload shaping happens upstream in
//! [`crate::response`]; this module only moves bodies over the wire and maps
//! non-2xx statuses to typed errors.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Multipart uploads for followups with files
//! - 1.0.0: Initial callback and followup requests

use crate::error::{Result, SlashError};
use crate::response::UploadFile;
use log::debug;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use serenity::model::id::{ApplicationId, InteractionId, MessageId};
use uuid::Uuid;

/// Discord REST base used for interaction endpoints
pub const API_BASE: &str = "https://discord.com/api/v8";

/// Requests against the interaction response endpoints.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct SlashCommandRequest {
    client: reqwest::Client,
    application_id: ApplicationId,
    base_url: String,
}

impl SlashCommandRequest {
    pub fn new(client: reqwest::Client, application_id: ApplicationId) -> Self {
        Self::with_base_url(client, application_id, API_BASE)
    }

    /// Point at a non-default API base (local mock servers in tests)
    pub fn with_base_url(
        client: reqwest::Client,
        application_id: ApplicationId,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            application_id,
            base_url: base_url.into(),
        }
    }

    fn callback_url(&self, interaction_id: InteractionId, token: &str) -> String {
        format!(
            "{}/interactions/{}/{}/callback",
            self.base_url, interaction_id.0, token
        )
    }

    fn followup_url(&self, token: &str, wait: bool) -> String {
        let mut url = format!("{}/webhooks/{}/{}", self.base_url, self.application_id.0, token);
        if wait {
            url.push_str("?wait=true");
        }
        url
    }

    fn message_url(&self, token: &str, message_id: MessageId) -> String {
        format!(
            "{}/webhooks/{}/{}/messages/{}",
            self.base_url, self.application_id.0, token, message_id.0
        )
    }

    /// Send the initial acknowledgment callback for an interaction
    pub async fn post_initial(
        &self,
        interaction_id: InteractionId,
        token: &str,
        body: &Value,
    ) -> Result<()> {
        let request_id = Uuid::new_v4();
        // URLs embed the interaction token, keep them out of logs
        debug!("[{request_id}] POST interaction callback for {}", interaction_id.0);
        let resp = self
            .client
            .post(self.callback_url(interaction_id, token))
            .json(body)
            .send()
            .await?;
        check_status(resp).await?;
        debug!("[{request_id}] callback acknowledged");
        Ok(())
    }

    /// Post a followup message.
    ///
    /// Returns the created message JSON when `wait` is set; the platform
    /// answers 204 with no body otherwise.
    pub async fn post_followup(
        &self,
        token: &str,
        body: &Value,
        wait: bool,
        files: Vec<UploadFile>,
    ) -> Result<Option<Value>> {
        let request_id = Uuid::new_v4();
        debug!(
            "[{request_id}] POST followup (wait={wait}, {} files)",
            files.len()
        );
        let url = self.followup_url(token, wait);
        let resp = if files.is_empty() {
            self.client.post(url).json(body).send().await?
        } else {
            let mut form = Form::new().text("payload_json", body.to_string());
            for (index, file) in files.into_iter().enumerate() {
                form = form.part(
                    format!("file{index}"),
                    Part::bytes(file.bytes).file_name(file.filename),
                );
            }
            self.client.post(url).multipart(form).send().await?
        };
        let resp = check_status(resp).await?;
        if wait {
            let message: Value = resp.json().await?;
            debug!("[{request_id}] followup created: {}", message["id"]);
            Ok(Some(message))
        } else {
            Ok(None)
        }
    }

    /// Edit a previously sent followup, returning the updated message JSON
    pub async fn edit_followup(
        &self,
        token: &str,
        message_id: MessageId,
        body: &Value,
    ) -> Result<Value> {
        let request_id = Uuid::new_v4();
        debug!("[{request_id}] PATCH followup {}", message_id.0);
        let resp = self
            .client
            .patch(self.message_url(token, message_id))
            .json(body)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }

    /// Delete a previously sent followup
    pub async fn delete_followup(&self, token: &str, message_id: MessageId) -> Result<()> {
        let request_id = Uuid::new_v4();
        debug!("[{request_id}] DELETE followup {}", message_id.0);
        let resp = self
            .client
            .delete(self.message_url(token, message_id))
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        let body = resp.text().await.unwrap_or_default();
        Err(SlashError::RequestFailure {
            status: status.as_u16(),
            body,
        })
    }
}
