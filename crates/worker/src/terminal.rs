//! A [`ProgressSink`] printing every render to a terminal.

use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use falbot_presenter::{Card, ChoiceHandle, ChoicePrompt, Message, ProgressSink, SinkError};

/// Writes each full render, separated by a rule, to `out`.
pub struct TerminalSink<W> {
    out: Mutex<W>,
}

impl TerminalSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Plain-text rendering of a message.
pub fn render_text(message: &Message) -> String {
    let mut text = String::new();
    if let Some(content) = &message.content {
        text.push_str(content);
    }
    if let Some(card) = &message.card {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&render_card(card));
    }
    text
}

fn render_card(card: &Card) -> String {
    let mut lines = vec![format!("== {} ==", card.title), card.description.clone()];
    lines.extend(
        card.fields
            .iter()
            .map(|field| format!("{}: {}", field.name, field.value)),
    );
    if let Some(footer) = &card.footer {
        lines.push(format!("-- {}", footer.text));
    }
    lines.join("\n")
}

#[async_trait]
impl<W: Write + Send> ProgressSink for TerminalSink<W> {
    async fn update(&self, message: &Message) -> Result<(), SinkError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| SinkError::Update("terminal lock poisoned".into()))?;
        writeln!(out, "----\n{}", render_text(message))
            .and_then(|()| out.flush())
            .map_err(|e| SinkError::Update(e.to_string()))
    }

    async fn attach_choice(&self, prompt: &ChoicePrompt, _handle: ChoiceHandle) -> Result<(), SinkError> {
        tracing::info!(
            placeholder = %prompt.placeholder,
            options = prompt.options.len(),
            "Choice controls are not interactive in the terminal",
        );
        Ok(())
    }

    async fn detach_choice(&self) -> Result<(), SinkError> {
        Ok(())
    }
}
