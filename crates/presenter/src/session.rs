//! One user request, from the first render to the last regenerate offer.

use std::sync::Arc;

use falbot_core::generation::GenerationOptions;
use falbot_queue::JobQueue;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::presenter::{PresenterSettings, ProgressPresenter};
use crate::regenerate::offer_regeneration;
use crate::sink::ProgressSink;

/// Runs generations for one interaction.
///
/// Each generation renders into its own sink. After a success the
/// regenerate control is offered on that sink; a pick starts the next
/// generation in the message the pick supplied.
#[derive(Clone)]
pub struct RequestSession {
    queue: Arc<dyn JobQueue>,
    settings: Arc<PresenterSettings>,
    cancel: CancellationToken,
}

impl RequestSession {
    pub fn new(
        queue: Arc<dyn JobQueue>,
        settings: Arc<PresenterSettings>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            queue,
            settings,
            cancel,
        }
    }

    /// Run the session on its own task. Resolves to the number of
    /// generations that completed successfully.
    pub fn spawn(self, sink: Arc<dyn ProgressSink>, options: GenerationOptions) -> JoinHandle<usize> {
        tokio::spawn(self.run(sink, options))
    }

    pub async fn run(self, sink: Arc<dyn ProgressSink>, options: GenerationOptions) -> usize {
        let interaction_id = Uuid::new_v4();
        let mut sink = sink;
        let mut options = options;
        let mut completed = 0;

        loop {
            tracing::info!(
                %interaction_id,
                prompt = %options.prompt,
                style = %options.style,
                mode = %options.mode,
                aspect_ratio = %options.aspect_ratio,
                "Starting generation",
            );

            let mut presenter = ProgressPresenter::new(Arc::clone(&sink), Arc::clone(&self.settings));
            let outcome = presenter
                .run(self.queue.as_ref(), &options, self.cancel.child_token())
                .await;

            if let Err(e) = outcome {
                tracing::debug!(%interaction_id, error = %e, "Session ended with an error");
                break;
            }
            completed += 1;

            if self.cancel.is_cancelled() {
                break;
            }

            let offer = offer_regeneration(
                sink.as_ref(),
                &options,
                self.settings.regenerate_timeout,
                &self.cancel,
            );
            match offer.await {
                Ok(Some(next)) => {
                    sink = next.reply_to;
                    options = next.options;
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(%interaction_id, error = %e, "Could not offer regeneration");
                    break;
                }
            }
        }

        tracing::info!(%interaction_id, completed, "Session finished");
        completed
    }
}
