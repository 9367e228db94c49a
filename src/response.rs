//! Outbound response payload assembly and validation
//!
//! Collapses caller-supplied options (content, embeds, files, mentions,
//! ephemeral flag) into the JSON body plus upload list the interaction
//! endpoints expect, enforcing the mutually-exclusive argument rules before
//! anything leaves the process.
//!
//! - **Version**: 1.3.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.3.0: Hidden responses skip the exclusivity checks and always go out
//! - 1.2.0: delete_after implies wait so the reply carries a message id
//! - 1.1.0: File uploads via multipart payload
//! - 1.0.0: Initial builder with embed/file exclusivity checks

use crate::error::{Result, SlashError};
use log::warn;
use serde_json::{json, Value};
use serenity::builder::{CreateAllowedMentions, CreateEmbed};
use std::collections::HashMap;
use std::time::Duration;

/// Embed cap per message, dictated by the platform
pub const MAX_EMBEDS: usize = 10;
/// Message flag marking a response as ephemeral (author-only)
pub const EPHEMERAL_FLAG: u64 = 64;

/// A file attached to a followup, uploaded as one multipart part
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// Options for a slash command followup response.
///
/// `embed`/`embeds` and `file`/`files` are mutually exclusive pairs, matching
/// the platform's own rules; violations surface as
/// [`SlashError::IncorrectFormat`] when the payload is assembled.
#[derive(Default)]
pub struct ResponseOptions {
    content: String,
    tts: bool,
    embed: Option<CreateEmbed>,
    embeds: Option<Vec<CreateEmbed>>,
    file: Option<UploadFile>,
    files: Option<Vec<UploadFile>>,
    allowed_mentions: Option<CreateAllowedMentions>,
    hidden: bool,
    wait: bool,
    delete_after: Option<Duration>,
}

impl ResponseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Whether the message is spoken via text-to-speech
    pub fn tts(mut self, tts: bool) -> Self {
        self.tts = tts;
        self
    }

    pub fn embed(mut self, embed: CreateEmbed) -> Self {
        self.embed = Some(embed);
        self
    }

    /// Up to [`MAX_EMBEDS`] embeds; exclusive with [`Self::embed`]
    pub fn embeds(mut self, embeds: Vec<CreateEmbed>) -> Self {
        self.embeds = Some(embeds);
        self
    }

    pub fn file(mut self, file: UploadFile) -> Self {
        self.file = Some(file);
        self
    }

    /// Exclusive with [`Self::file`]
    pub fn files(mut self, files: Vec<UploadFile>) -> Self {
        self.files = Some(files);
        self
    }

    pub fn allowed_mentions(mut self, mentions: CreateAllowedMentions) -> Self {
        self.allowed_mentions = Some(mentions);
        self
    }

    /// Ephemeral response, visible only to the invoking user.
    ///
    /// Embeds and files are not supported on hidden responses and are dropped
    /// with a warning.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Ask the platform to return the created message instead of a bare 204
    pub fn wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    /// Delete the reply after the given delay; implies [`Self::wait`]
    pub fn delete_after(mut self, delay: Duration) -> Self {
        self.delete_after = Some(delay);
        self
    }

    /// Validate the option set and shape the wire payload.
    ///
    /// `hidden` short-circuits before the exclusivity checks; everything
    /// beyond the content is dropped with a warning rather than rejected.
    pub(crate) fn assemble(self) -> Result<AssembledResponse> {
        if self.hidden {
            if self.embed.is_some() || self.embeds.is_some() {
                warn!("embeds are not supported on hidden responses, dropping them");
            }
            if self.file.is_some() || self.files.is_some() {
                warn!("files are not supported on hidden responses, dropping them");
            }
            return Ok(AssembledResponse {
                body: json!({ "content": self.content, "flags": EPHEMERAL_FLAG }),
                files: Vec::new(),
                wait: self.wait || self.delete_after.is_some(),
                delete_after: self.delete_after,
            });
        }

        if self.embed.is_some() && self.embeds.is_some() {
            return Err(SlashError::IncorrectFormat(
                "you can't use both `embed` and `embeds`".into(),
            ));
        }
        if self.file.is_some() && self.files.is_some() {
            return Err(SlashError::IncorrectFormat(
                "you can't use both `file` and `files`".into(),
            ));
        }

        let embeds: Vec<CreateEmbed> = self
            .embed
            .map(|e| vec![e])
            .or(self.embeds)
            .unwrap_or_default();
        if embeds.len() > MAX_EMBEDS {
            return Err(SlashError::IncorrectFormat(format!(
                "do not provide more than {MAX_EMBEDS} embeds"
            )));
        }

        let files: Vec<UploadFile> = self
            .file
            .map(|f| vec![f])
            .or(self.files)
            .unwrap_or_default();

        let body = json!({
            "content": self.content,
            "tts": self.tts,
            "embeds": embeds.into_iter().map(|e| builder_map(e.0)).collect::<Vec<_>>(),
            "allowed_mentions": self
                .allowed_mentions
                .map(|m| builder_map(m.0))
                .unwrap_or_else(|| json!({})),
        });

        Ok(AssembledResponse {
            body,
            files,
            wait: self.wait || self.delete_after.is_some(),
            delete_after: self.delete_after,
        })
    }

    /// Shape an edit payload. Files cannot be attached when editing, and the
    /// ephemeral flag of an existing message cannot change.
    pub(crate) fn assemble_for_edit(mut self) -> Result<Value> {
        if self.file.is_some() || self.files.is_some() {
            return Err(SlashError::IncorrectFormat(
                "files cannot be attached when editing a response".into(),
            ));
        }
        if self.hidden {
            warn!("`hidden` has no effect when editing a response, ignoring it");
            self.hidden = false;
        }
        let mut body = self.assemble()?.body;
        if let Value::Object(ref mut map) = body {
            map.remove("tts");
        }
        Ok(body)
    }
}

/// Wire-ready followup: JSON body, multipart uploads, and send behavior
pub(crate) struct AssembledResponse {
    pub(crate) body: Value,
    pub(crate) files: Vec<UploadFile>,
    pub(crate) wait: bool,
    pub(crate) delete_after: Option<Duration>,
}

/// serenity 0.11 builders are maps of `&'static str` keys; fold one into a
/// JSON object for the wire body.
fn builder_map(map: HashMap<&'static str, Value>) -> Value {
    Value::Object(map.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn sample_embed(title: &str) -> CreateEmbed {
        let mut embed = CreateEmbed::default();
        embed.title(title);
        embed.description("hello");
        embed
    }

    #[test]
    fn test_embed_and_embeds_rejected() {
        let result = ResponseOptions::new()
            .embed(sample_embed("a"))
            .embeds(vec![sample_embed("b")])
            .assemble();
        assert!(matches!(result, Err(SlashError::IncorrectFormat(_))));
    }

    #[test]
    fn test_file_and_files_rejected() {
        let result = ResponseOptions::new()
            .file(UploadFile::new("a.txt", vec![1]))
            .files(vec![UploadFile::new("b.txt", vec![2])])
            .assemble();
        assert!(matches!(result, Err(SlashError::IncorrectFormat(_))));
    }

    #[test]
    fn test_embed_cap_enforced() {
        let embeds = (0..11).map(|i| sample_embed(&i.to_string())).collect();
        let result = ResponseOptions::new().embeds(embeds).assemble();
        assert!(matches!(result, Err(SlashError::IncorrectFormat(_))));
    }

    #[test]
    fn test_single_embed_wrapped_into_list() {
        let assembled = ResponseOptions::new()
            .content("hi")
            .embed(sample_embed("only"))
            .assemble()
            .unwrap();
        let embeds = assembled.body["embeds"].as_array().unwrap();
        assert_eq!(embeds.len(), 1);
        assert_eq!(embeds[0]["title"], "only");
        assert_eq!(embeds[0]["description"], "hello");
    }

    #[test]
    fn test_plain_body_shape() {
        let assembled = ResponseOptions::new()
            .content("pong")
            .tts(true)
            .assemble()
            .unwrap();
        assert_eq!(assembled.body["content"], "pong");
        assert_eq!(assembled.body["tts"], true);
        assert_eq!(assembled.body["embeds"], json!([]));
        assert_eq!(assembled.body["allowed_mentions"], json!({}));
        assert!(assembled.body.get("flags").is_none());
        assert!(!assembled.wait);
    }

    #[test]
    fn test_hidden_is_content_and_flag_only() {
        init_logger();
        let assembled = ResponseOptions::new()
            .content("secret")
            .embed(sample_embed("dropped"))
            .file(UploadFile::new("dropped.txt", vec![0]))
            .hidden(true)
            .assemble()
            .unwrap();
        assert_eq!(
            assembled.body,
            json!({ "content": "secret", "flags": EPHEMERAL_FLAG })
        );
        assert!(assembled.files.is_empty());
    }

    #[test]
    fn test_hidden_skips_exclusivity_checks() {
        init_logger();
        // embed+embeds together is normally rejected; a hidden response drops
        // both and still goes out
        let assembled = ResponseOptions::new()
            .content("secret")
            .embed(sample_embed("a"))
            .embeds(vec![sample_embed("b")])
            .file(UploadFile::new("a.txt", vec![1]))
            .files(vec![UploadFile::new("b.txt", vec![2])])
            .hidden(true)
            .assemble()
            .unwrap();
        assert_eq!(
            assembled.body,
            json!({ "content": "secret", "flags": EPHEMERAL_FLAG })
        );
        assert!(assembled.files.is_empty());
    }

    #[test]
    fn test_delete_after_forces_wait() {
        let assembled = ResponseOptions::new()
            .content("going away")
            .delete_after(Duration::from_secs(5))
            .assemble()
            .unwrap();
        assert!(assembled.wait);
        assert_eq!(assembled.delete_after, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_allowed_mentions_serialized() {
        let mut mentions = CreateAllowedMentions::default();
        mentions.empty_parse();
        let assembled = ResponseOptions::new()
            .content("@everyone is safe")
            .allowed_mentions(mentions)
            .assemble()
            .unwrap();
        assert_eq!(assembled.body["allowed_mentions"]["parse"], json!([]));
    }

    #[test]
    fn test_files_carried_through() {
        let assembled = ResponseOptions::new()
            .files(vec![
                UploadFile::new("a.png", vec![1, 2]),
                UploadFile::new("b.png", vec![3]),
            ])
            .assemble()
            .unwrap();
        assert_eq!(assembled.files.len(), 2);
        assert_eq!(assembled.files[0].filename, "a.png");
    }

    #[test]
    fn test_edit_rejects_files() {
        let result = ResponseOptions::new()
            .file(UploadFile::new("a.txt", vec![1]))
            .assemble_for_edit();
        assert!(matches!(result, Err(SlashError::IncorrectFormat(_))));
    }

    #[test]
    fn test_edit_body_has_no_tts_or_flags() {
        init_logger();
        let body = ResponseOptions::new()
            .content("edited")
            .hidden(true)
            .assemble_for_edit()
            .unwrap();
        assert_eq!(body["content"], "edited");
        assert!(body.get("tts").is_none());
        assert!(body.get("flags").is_none());
    }
}
