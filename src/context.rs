//! Per-interaction response context
//!
//! State and operations for answering one slash command invocation: the
//! initial acknowledgment, followup payloads, and correlation of the gateway
//! message that rendered the invocation.
//!
//! - **Version**: 1.3.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.3.0: Split `defer` out of `respond`; `send` no longer needs the
//!   gateway context
//! - 1.2.0: Capture the invoking message via collector when not eating input
//! - 1.1.0: Auto-defer with a warning when `send` runs unacknowledged
//! - 1.0.0: Initial respond/send implementation

use crate::error::Result;
use crate::http::SlashCommandRequest;
use crate::interaction::InteractionPayload;
use crate::model::SlashMessage;
use crate::response::ResponseOptions;
use log::{debug, warn};
use serde_json::json;
use serenity::collector::CollectReply;
use serenity::model::channel::{Message, MessageType};
use serenity::model::id::{ChannelId, CommandId, GuildId, InteractionId, UserId};
use serenity::prelude::Context;
use std::time::Duration;

/// Callback type that swallows the user's input
const CALLBACK_ACKNOWLEDGE: u8 = 2;
/// Deferred callback that keeps the invocation visible
const CALLBACK_ACK_WITH_SOURCE: u8 = 5;

/// How long to wait on the gateway for the message that rendered the
/// invocation before giving up
const INVOKING_MESSAGE_WAIT: Duration = Duration::from_secs(3);

/// Context of one slash command invocation.
///
/// Tracks whether the initial acknowledgment went out and exposes the two
/// response operations, [`Self::respond`] and [`Self::send`]. Guild, channel
/// and author are kept as ids; resolve them through serenity's cache at the
/// call site when richer objects are needed.
pub struct SlashContext {
    /// Gateway message that rendered the invocation, when captured by
    /// [`Self::respond`]
    pub message: Option<Message>,
    pub name: String,
    pub subcommand_name: Option<String>,
    pub subcommand_group: Option<String>,
    pub interaction_id: InteractionId,
    pub command_id: CommandId,
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    pub author_id: UserId,
    token: String,
    http: SlashCommandRequest,
    sent: bool,
}

impl SlashContext {
    /// Build a context from an inbound interaction payload.
    ///
    /// Fails with `IncorrectFormat` when the payload carries neither a guild
    /// member nor a user.
    pub fn new(http: SlashCommandRequest, payload: InteractionPayload) -> Result<Self> {
        let author_id = payload.author_id().ok_or_else(|| {
            crate::error::SlashError::IncorrectFormat(
                "interaction payload has neither `member` nor `user`".into(),
            )
        })?;
        let (subcommand_group, subcommand_name) = payload.data.subcommand();
        Ok(Self {
            message: None,
            name: payload.data.name,
            subcommand_name,
            subcommand_group,
            interaction_id: payload.id,
            command_id: payload.data.id,
            guild_id: payload.guild_id,
            channel_id: payload.channel_id,
            author_id,
            token: payload.token,
            http,
            sent: false,
        })
    }

    /// Whether the initial acknowledgment has been sent
    pub fn has_responded(&self) -> bool {
        self.sent
    }

    /// Send the initial acknowledgment. Call this before [`Self::send`].
    ///
    /// The callback POST runs as a background task. When `eat` is false the
    /// user's invocation stays visible and this waits up to three seconds for
    /// the gateway message that rendered it, storing it in `self.message`;
    /// running out the clock is fine and leaves it `None`.
    pub async fn respond(&mut self, ctx: &Context, eat: bool) -> Result<()> {
        let kind = if eat {
            CALLBACK_ACKNOWLEDGE
        } else {
            CALLBACK_ACK_WITH_SOURCE
        };
        let body = json!({ "type": kind });
        let http = self.http.clone();
        let interaction_id = self.interaction_id;
        let token = self.token.clone();
        let ack = tokio::spawn(async move { http.post_initial(interaction_id, &token, &body).await });
        self.sent = true;
        if !eat {
            self.message = self.await_invoking_message(ctx).await;
        }
        ack.await??;
        Ok(())
    }

    /// Alias of [`Self::respond`]
    pub async fn ack(&mut self, ctx: &Context, eat: bool) -> Result<()> {
        self.respond(ctx, eat).await
    }

    /// Send a deferred acknowledgment without waiting on the gateway for the
    /// invoking message. The `sent` flag flips before the request goes out.
    pub async fn defer(&mut self) -> Result<()> {
        let body = json!({ "type": CALLBACK_ACK_WITH_SOURCE });
        self.sent = true;
        self.http
            .post_initial(self.interaction_id, &self.token, &body)
            .await
    }

    /// Send a followup response for this invocation.
    ///
    /// If [`Self::respond`] was never called, a deferred acknowledgment goes
    /// out first with a warning. When `delete_after` was set on the options
    /// the reply is deleted in the background after the delay; deletion
    /// failures are logged and swallowed.
    pub async fn send(&mut self, options: ResponseOptions) -> Result<SlashMessage> {
        if !self.sent {
            warn!(
                "at command `{}`: it is highly recommended to call `respond` first",
                self.name
            );
            self.defer().await?;
        }
        let assembled = options.assemble()?;
        let data = self
            .http
            .post_followup(&self.token, &assembled.body, assembled.wait, assembled.files)
            .await?;
        let message = SlashMessage::from_response(data, self.http.clone(), self.token.clone())?;
        if let Some(delay) = assembled.delete_after {
            match message.id() {
                Some(message_id) => {
                    let http = self.http.clone();
                    let token = self.token.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        if let Err(e) = http.delete_followup(&token, message_id).await {
                            debug!("delayed delete of {} failed: {e}", message_id.0);
                        }
                    });
                }
                None => warn!("delete_after needs a message id, reply will not be deleted"),
            }
        }
        Ok(message)
    }

    /// Send an ephemeral, content-only followup
    pub async fn send_hidden(&mut self, content: impl Into<String>) -> Result<SlashMessage> {
        self.send(ResponseOptions::new().content(content).hidden(true))
            .await
    }

    /// Wait for the gateway message that rendered this invocation: same
    /// author, same channel, command-invocation kind, content mentioning this
    /// command.
    async fn await_invoking_message(&self, ctx: &Context) -> Option<Message> {
        let mention = format!("</{}:{}>", self.name, self.command_id.0);
        let reply = CollectReply::new(ctx)
            .author_id(self.author_id.0)
            .channel_id(self.channel_id.0)
            .timeout(INVOKING_MESSAGE_WAIT)
            .filter(move |m| {
                m.kind == MessageType::ChatInputCommand && m.content.starts_with(&mention)
            })
            .await;
        reply.map(|m| m.as_ref().clone())
    }
}
