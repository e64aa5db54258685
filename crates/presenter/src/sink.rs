//! The message capability the presenter renders into.
//!
//! A [`ProgressSink`] is one updatable chat message owned by a single
//! request. The platform adapter implements it; the presenter only ever
//! replaces the whole content, attaches one choice control, or removes it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::regenerate::ChoiceHandle;

/// Full content of the rendered message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    pub content: Option<String>,
    pub card: Option<Card>,
}

impl Message {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            card: None,
        }
    }

    /// A card-only message; any previous text content is cleared.
    pub fn card(card: Card) -> Self {
        Self {
            content: None,
            card: Some(card),
        }
    }
}

/// Structured rich content (an "embed" on most chat platforms).
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub fields: Vec<CardField>,
    pub footer: Option<CardFooter>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Card {
    /// Look up a field value by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardFooter {
    pub text: String,
    pub icon_url: Option<String>,
}

/// One entry of a choice control.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOption {
    pub label: String,
    pub value: String,
}

/// A single-select control shown under the message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoicePrompt {
    pub placeholder: String,
    pub options: Vec<ChoiceOption>,
}

/// Errors reported by a sink implementation.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The platform refused or failed the edit.
    #[error("Message update failed: {0}")]
    Update(String),

    /// The message no longer exists (deleted, or its interaction expired).
    #[error("Message is no longer available")]
    Gone,
}

/// One mutable chat message.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// Replace the entire message content.
    async fn update(&self, message: &Message) -> Result<(), SinkError>;

    /// Show `prompt` under the message. Picks must be forwarded through
    /// `handle`, which accepts at most one.
    async fn attach_choice(&self, prompt: &ChoicePrompt, handle: ChoiceHandle) -> Result<(), SinkError>;

    /// Remove the choice control, if any.
    async fn detach_choice(&self) -> Result<(), SinkError>;
}
