//! Single-use "regenerate with a different style" affordance.
//!
//! After a completed render a style picker is attached to the message.
//! The first pick wins: the control is removed and the session runs a
//! fresh generation with the substituted style. Later picks, and picks
//! after the idle timeout, are no-ops.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use falbot_core::catalog::{default_styles, style_label, KEEP_STYLE};
use falbot_core::generation::GenerationOptions;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::sink::{ChoiceOption, ChoicePrompt, ProgressSink, SinkError};

/// How long an unused regenerate control stays attached.
pub const REGENERATE_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

pub const CHANGE_STYLE_PLACEHOLDER: &str = "Change style";
pub const KEEP_STYLE_LABEL: &str = "Keep current style";

/// A user's pick, with the message the new generation should render into.
pub struct Pick {
    pub value: String,
    pub reply_to: Arc<dyn ProgressSink>,
}

impl fmt::Debug for Pick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pick").field("value", &self.value).finish_non_exhaustive()
    }
}

/// Adapter-side handle of an attached choice control.
///
/// Cheap to clone; all clones share one slot, so at most one
/// [`pick`](Self::pick) across all of them is ever delivered.
#[derive(Clone)]
pub struct ChoiceHandle {
    slot: Arc<Mutex<Option<oneshot::Sender<Pick>>>>,
}

impl ChoiceHandle {
    /// A fresh handle and the receiver its single pick arrives on.
    pub fn channel() -> (Self, oneshot::Receiver<Pick>) {
        let (tx, rx) = oneshot::channel();
        let handle = Self {
            slot: Arc::new(Mutex::new(Some(tx))),
        };
        (handle, rx)
    }

    /// Forward a pick. Returns `false` if the control was already used or
    /// has expired, in which case nothing happens.
    pub fn pick(&self, value: impl Into<String>, reply_to: Arc<dyn ProgressSink>) -> bool {
        let Some(sender) = self.take() else {
            return false;
        };
        sender
            .send(Pick {
                value: value.into(),
                reply_to,
            })
            .is_ok()
    }

    /// `true` once the control has been used or closed.
    pub fn is_spent(&self) -> bool {
        self.slot.lock().map(|slot| slot.is_none()).unwrap_or(true)
    }

    /// Refuse every future pick.
    pub fn close(&self) {
        drop(self.take());
    }

    fn take(&self) -> Option<oneshot::Sender<Pick>> {
        match self.slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

impl fmt::Debug for ChoiceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChoiceHandle")
            .field("spent", &self.is_spent())
            .finish()
    }
}

/// A follow-up generation requested through the control.
pub struct Regeneration {
    pub options: GenerationOptions,
    pub reply_to: Arc<dyn ProgressSink>,
}

impl fmt::Debug for Regeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Regeneration")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// The style picker: "keep" first, then the default styles.
pub fn style_prompt() -> ChoicePrompt {
    let mut options = vec![ChoiceOption {
        label: KEEP_STYLE_LABEL.to_string(),
        value: KEEP_STYLE.to_string(),
    }];
    options.extend(default_styles().iter().map(|style| ChoiceOption {
        label: style_label(style),
        value: style.to_string(),
    }));

    ChoicePrompt {
        placeholder: CHANGE_STYLE_PLACEHOLDER.to_string(),
        options,
    }
}

/// Style to use for a regeneration: [`KEEP_STYLE`] keeps the current one.
pub fn resolve_style<'a>(picked: &'a str, current: &'a str) -> &'a str {
    if picked == KEEP_STYLE {
        current
    } else {
        picked
    }
}

/// Attach the style picker to `sink` and wait up to `idle_timeout` for a
/// pick.
///
/// The control is detached as soon as it is used, expires, or `cancel`
/// fires. Returns the follow-up request when the user picked a style.
pub async fn offer_regeneration(
    sink: &dyn ProgressSink,
    options: &GenerationOptions,
    idle_timeout: Duration,
    cancel: &CancellationToken,
) -> Result<Option<Regeneration>, SinkError> {
    let (handle, picks) = ChoiceHandle::channel();
    sink.attach_choice(&style_prompt(), handle.clone()).await?;

    let picked = tokio::select! {
        picked = tokio::time::timeout(idle_timeout, picks) => Some(picked),
        _ = cancel.cancelled() => None,
    };
    handle.close();

    if let Err(e) = sink.detach_choice().await {
        tracing::warn!(error = %e, "Failed to detach regenerate control");
    }

    let Some(picked) = picked else {
        tracing::debug!("Regenerate control withdrawn on shutdown");
        return Ok(None);
    };

    match picked {
        Ok(Ok(pick)) => {
            let style = resolve_style(&pick.value, &options.style).to_string();
            tracing::info!(style = %style, "Regenerate picked");
            Ok(Some(Regeneration {
                options: options.clone().with_style(style),
                reply_to: pick.reply_to,
            }))
        }
        Ok(Err(_)) => Ok(None),
        Err(_) => {
            tracing::debug!(
                timeout_secs = idle_timeout.as_secs(),
                "Regenerate control expired",
            );
            Ok(None)
        }
    }
}
