//! Drives one generation from submission to final render.
//!
//! The presenter owns the request's message: every observation from the
//! poller fully replaces its content. Any failure, remote or local, ends
//! the request with exactly one error render.

use std::sync::Arc;
use std::time::Duration;

use falbot_core::generation::GenerationOptions;
use falbot_queue::poller::{poll_with_interval, POLL_INTERVAL};
use falbot_queue::{ErrorDetail, JobQueue, Progress, QueueError};
use futures::TryStreamExt;
use serde::Deserialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::regenerate::REGENERATE_IDLE_TIMEOUT;
use crate::render;
use crate::sink::{Message, ProgressSink, SinkError};

/// Tunables shared by every request of a process.
#[derive(Debug, Clone)]
pub struct PresenterSettings {
    /// Delay between status polls.
    pub poll_interval: Duration,
    /// How long the regenerate control stays attached when unused.
    pub regenerate_timeout: Duration,
    /// Icon shown next to the result card's footer.
    pub footer_icon_url: Option<String>,
}

impl Default for PresenterSettings {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            regenerate_timeout: REGENERATE_IDLE_TIMEOUT,
            footer_icon_url: None,
        }
    }
}

/// What a successful generation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    pub request_id: String,
    pub image_url: String,
    /// Wall-clock time from submission to completion.
    pub elapsed: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum PresentError {
    #[error(transparent)]
    Queue(#[from] QueueError),

    /// The result payload did not contain a usable image.
    #[error("Malformed result: {0}")]
    MalformedResult(String),

    /// The message could not be updated; nothing more can be shown.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl PresentError {
    /// Payload rendered to the user for this error.
    pub fn detail(&self) -> ErrorDetail {
        match self {
            Self::Queue(e) => e.detail(),
            other => ErrorDetail::message(other.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerationResult {
    #[serde(default)]
    images: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: String,
}

/// Extract the first image URL from a result payload.
fn first_image_url(result: serde_json::Value) -> Result<String, PresentError> {
    let parsed: GenerationResult = serde_json::from_value(result)
        .map_err(|e| PresentError::MalformedResult(e.to_string()))?;
    parsed
        .images
        .into_iter()
        .next()
        .map(|image| image.url)
        .ok_or_else(|| PresentError::MalformedResult("result contains no images".into()))
}

/// Renders one request into one [`ProgressSink`].
pub struct ProgressPresenter {
    sink: Arc<dyn ProgressSink>,
    settings: Arc<PresenterSettings>,
    last_render: Option<Message>,
}

impl ProgressPresenter {
    pub fn new(sink: Arc<dyn ProgressSink>, settings: Arc<PresenterSettings>) -> Self {
        Self {
            sink,
            settings,
            last_render: None,
        }
    }

    /// Submit `options`, render progress until the job is terminal, then
    /// render the result card or the error.
    pub async fn run(
        &mut self,
        queue: &dyn JobQueue,
        options: &GenerationOptions,
        cancel: CancellationToken,
    ) -> Result<GenerationOutcome, PresentError> {
        match self.drive(queue, options, cancel).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.render_failure(&e).await;
                Err(e)
            }
        }
    }

    async fn drive(
        &mut self,
        queue: &dyn JobQueue,
        options: &GenerationOptions,
        cancel: CancellationToken,
    ) -> Result<GenerationOutcome, PresentError> {
        self.render(Message::text(render::RECEIVED)).await?;

        let started = Instant::now();
        let handle = queue.submit(&options.to_payload()).await?;

        let mut iteration: u64 = 0;
        {
            let updates = poll_with_interval(queue, &handle, self.settings.poll_interval, cancel);
            tokio::pin!(updates);

            while let Some(progress) = updates.try_next().await? {
                let content = match progress {
                    Progress::Queued { position } => render::queued(position),
                    Progress::InProgress { logs } => {
                        render::in_progress(iteration, started.elapsed(), &logs)
                    }
                };
                self.render(Message::text(content)).await?;
                iteration += 1;
            }
        }

        let result = queue.result(&handle).await?;
        let image_url = first_image_url(result)?;
        let elapsed = started.elapsed();

        let card = render::completed_card(
            options,
            &image_url,
            elapsed,
            self.settings.footer_icon_url.as_deref(),
        );
        self.render(Message::card(card)).await?;

        tracing::info!(
            request_id = %handle.request_id,
            elapsed_ms = elapsed.as_millis() as u64,
            polls = iteration,
            "Generation completed",
        );

        Ok(GenerationOutcome {
            request_id: handle.request_id,
            image_url,
            elapsed,
        })
    }

    /// Replace the message content, skipping identical consecutive renders.
    async fn render(&mut self, message: Message) -> Result<(), SinkError> {
        if self.last_render.as_ref() == Some(&message) {
            tracing::trace!("Skipping identical render");
            return Ok(());
        }
        self.sink.update(&message).await?;
        self.last_render = Some(message);
        Ok(())
    }

    /// Render the terminal error message. Sink failures are only logged:
    /// the sink is what broke.
    async fn render_failure(&mut self, error: &PresentError) {
        if let PresentError::Sink(e) = error {
            tracing::error!(error = %e, "Lost the progress message");
            return;
        }

        tracing::warn!(error = %error, "Generation failed");
        let message = Message::text(render::failure(&error.detail()));
        if let Err(e) = self.sink.update(&message).await {
            tracing::error!(error = %e, "Failed to render error message");
            return;
        }
        self.last_render = Some(message);
    }
}
