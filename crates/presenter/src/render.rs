//! Text and card builders for each stage of a request.
//!
//! Pure functions: they never touch the sink, so the exact wording can be
//! tested without a runtime.

use std::time::Duration;

use chrono::Utc;
use falbot_core::generation::GenerationOptions;
use falbot_core::logs::{format_logs, wrap_source_code, LogEntry, DEFAULT_MAX_LOG_LINES};
use falbot_queue::ErrorDetail;

use crate::sink::{Card, CardField, CardFooter};

/// Acknowledgement shown before the job is submitted.
pub const RECEIVED: &str = "Your request has been received.";

/// Two-frame "running" indicator, alternated on every poll iteration.
pub const RUNNING_FRAMES: [&str; 2] = ["🏃‍♂️", "🚶"];

pub const CARD_TITLE: &str = "Fooocus Image";
pub const FOOTER_TEXT: &str = "Powered by serverless.fal.ai";
pub const FAILURE_PREAMBLE: &str = "Something went wrong during your request.";

/// Seconds with two decimals, e.g. `12.34s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

/// Message for a job waiting in the queue.
///
/// `position` is the queue's 0-based depth; users see it 1-based.
pub fn queued(position: u32) -> String {
    format!(
        "Your request is in queue. Position: {}",
        u64::from(position) + 1
    )
}

/// Message for a running job.
///
/// `iteration` picks the indicator frame; `elapsed` is measured from
/// submission. The log tail is appended only when it is non-empty.
pub fn in_progress(iteration: u64, elapsed: Duration, logs: &[LogEntry]) -> String {
    let frame = RUNNING_FRAMES[(iteration % 2) as usize];
    let mut message = format!(
        "Your request is in progress {frame} (running for {}).",
        format_elapsed(elapsed)
    );

    let tail = format_logs(logs, DEFAULT_MAX_LOG_LINES);
    if !tail.is_empty() {
        message.push('\n');
        message.push_str(&wrap_source_code(&tail));
    }
    message
}

/// Final card for a generated image.
pub fn completed_card(
    options: &GenerationOptions,
    image_url: &str,
    elapsed: Duration,
    footer_icon_url: Option<&str>,
) -> Card {
    let field = |name: &str, value: String, inline: bool| CardField {
        name: name.to_string(),
        value,
        inline,
    };

    Card {
        title: CARD_TITLE.to_string(),
        description: format!("For the full resolution image, click [here]({image_url})."),
        image_url: Some(image_url.to_string()),
        fields: vec![
            field("Prompt", options.prompt.clone(), false),
            field("Style", options.style.clone(), true),
            field("Time Taken", format_elapsed(elapsed), true),
            field("Mode", options.mode.to_string(), true),
            field("Aspect Ratio", options.aspect_ratio.clone(), true),
        ],
        footer: Some(CardFooter {
            text: FOOTER_TEXT.to_string(),
            icon_url: footer_icon_url.map(str::to_string),
        }),
        timestamp: Some(Utc::now()),
    }
}

/// Terminal error message embedding the pretty-printed payload.
pub fn failure(detail: &ErrorDetail) -> String {
    format!(
        "{FAILURE_PREAMBLE}\n{}",
        wrap_source_code(&detail.to_pretty_string())
    )
}
