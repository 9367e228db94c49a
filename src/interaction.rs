//! Inbound interaction payload types
//!
//! Typed view over the webhook-style JSON Discord delivers for an
//! application command invocation. Snowflakes arrive as strings on the wire;
//! serenity's id types already accept both encodings.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Add subcommand group extraction
//! - 1.0.0: Initial payload structs

use serde::Deserialize;
use serenity::model::id::{ChannelId, CommandId, GuildId, InteractionId, UserId};

/// Application command option type: subcommand
pub const OPTION_SUB_COMMAND: u8 = 1;
/// Application command option type: subcommand group
pub const OPTION_SUB_COMMAND_GROUP: u8 = 2;

/// A slash command interaction as delivered by the platform
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionPayload {
    pub id: InteractionId,
    pub token: String,
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    /// Present for guild invocations
    pub member: Option<InteractionMember>,
    /// Present for DM invocations
    pub user: Option<InteractionUser>,
    pub data: CommandData,
}

impl InteractionPayload {
    /// Invoking user, from `member.user` in guilds or `user` in DMs
    pub fn author_id(&self) -> Option<UserId> {
        self.member
            .as_ref()
            .map(|m| m.user.id)
            .or_else(|| self.user.as_ref().map(|u| u.id))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionMember {
    pub user: InteractionUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionUser {
    pub id: UserId,
    #[serde(default)]
    pub username: String,
}

/// The `data` object of a command interaction
#[derive(Debug, Clone, Deserialize)]
pub struct CommandData {
    pub id: CommandId,
    pub name: String,
    #[serde(default)]
    pub options: Vec<CommandDataOption>,
}

impl CommandData {
    /// Extract `(subcommand_group, subcommand_name)` from the option tree.
    ///
    /// Commands without subcommands return `(None, None)`; a bare subcommand
    /// returns `(None, Some(name))`; a grouped one returns both.
    pub fn subcommand(&self) -> (Option<String>, Option<String>) {
        match self.options.first() {
            Some(opt) if opt.kind == OPTION_SUB_COMMAND_GROUP => {
                let name = opt
                    .options
                    .first()
                    .filter(|o| o.kind == OPTION_SUB_COMMAND)
                    .map(|o| o.name.clone());
                (Some(opt.name.clone()), name)
            }
            Some(opt) if opt.kind == OPTION_SUB_COMMAND => (None, Some(opt.name.clone())),
            _ => (None, None),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandDataOption {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub options: Vec<CommandDataOption>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}
