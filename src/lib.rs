//! # serenity-slash
//!
//! Slash command interaction response layer for serenity bots: parse the
//! inbound interaction payload, acknowledge it, and send validated followup
//! payloads (content, embeds, files, mentions, ephemeral flag) through the
//! interaction endpoints.
//!
//! ```no_run
//! use serenity_slash::{ResponseOptions, SlashCommandRequest, SlashContext};
//! use serenity::model::id::ApplicationId;
//!
//! # async fn handle(ctx: &serenity::prelude::Context, raw: serde_json::Value) -> serenity_slash::Result<()> {
//! let http = SlashCommandRequest::new(reqwest::Client::new(), ApplicationId(1234));
//! let mut slash = SlashContext::new(http, serde_json::from_value(raw)?)?;
//! slash.respond(ctx, false).await?;
//! slash.send(ResponseOptions::new().content("pong").wait(true)).await?;
//! # Ok(())
//! # }
//! ```

// Per-interaction state and response operations
pub mod context;

// Error types
pub mod error;

// Interaction endpoint requests
pub mod http;

// Inbound payload types
pub mod interaction;

// Followup message handle
pub mod model;

// Outbound payload assembly and validation
pub mod response;

// Re-export commonly used items
pub use context::SlashContext;
pub use error::{Result, SlashError};
pub use http::{SlashCommandRequest, API_BASE};
pub use interaction::{CommandData, CommandDataOption, InteractionPayload};
pub use model::SlashMessage;
pub use response::{ResponseOptions, UploadFile, EPHEMERAL_FLAG, MAX_EMBEDS};
