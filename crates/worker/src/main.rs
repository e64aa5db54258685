//! `falbot-worker` -- run one Fooocus generation from the command line.
//!
//! Submits the prompt to the fal.ai queue and prints every progress render
//! the chat front-end would show, ending with the result card.
//!
//! ```text
//! falbot-worker <prompt> [style] [mode] [aspect_ratio]
//! ```
//!
//! # Environment variables
//!
//! | Variable               | Required | Default | Description                    |
//! |------------------------|----------|---------|--------------------------------|
//! | `FAL_SECRET`           | yes      | --      | fal.ai API key                 |
//! | `FOOOCUS_BASE_URL`     | no       | fal.ai Fooocus app | Application URL     |
//! | `FALAI_LOGO_URL`       | no       | --      | Result card footer icon        |
//! | `REQUEST_TIMEOUT_SECS` | no       | `30`    | Per-request HTTP timeout       |

mod config;
mod terminal;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use falbot_core::catalog::{FOOOCUS_ASPECT_RATIOS, FOOOCUS_STYLES};
use falbot_core::generation::{GenerationOptions, Performance};
use falbot_presenter::{PresenterSettings, RequestSession};
use falbot_queue::QueueClient;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::BotConfig;
use crate::terminal::TerminalSink;

const USAGE: &str = "usage: falbot-worker <prompt> [style] [mode] [aspect_ratio]";

/// Build generation options from positional arguments.
fn parse_args(args: &[String]) -> anyhow::Result<GenerationOptions> {
    let Some(prompt) = args.first().filter(|p| !p.trim().is_empty()) else {
        bail!(USAGE);
    };
    let mut options = GenerationOptions::new(prompt.as_str());

    if let Some(style) = args.get(1) {
        if !FOOOCUS_STYLES.contains(&style.as_str()) {
            bail!("Unknown style '{style}'");
        }
        options = options.with_style(style.as_str());
    }
    if let Some(mode) = args.get(2) {
        options = options.with_mode(mode.parse::<Performance>()?);
    }
    if let Some(aspect_ratio) = args.get(3) {
        if !FOOOCUS_ASPECT_RATIOS.contains(&aspect_ratio.as_str()) {
            bail!("Unknown aspect ratio '{aspect_ratio}'");
        }
        options = options.with_aspect_ratio(aspect_ratio.as_str());
    }
    if args.len() > 4 {
        bail!(USAGE);
    }

    Ok(options)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "falbot_worker=info,falbot_presenter=info,falbot_queue=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_args(&args)?;
    let config = BotConfig::from_env().context("Failed to load configuration")?;

    tracing::info!(
        app_url = %config.queue.app_url,
        timeout_secs = config.queue.request_timeout.as_secs(),
        "Starting falbot-worker",
    );

    let client = QueueClient::new(&config.queue)?;
    let settings = PresenterSettings {
        footer_icon_url: config.logo_url.clone(),
        // Nobody can pick from a terminal.
        regenerate_timeout: Duration::ZERO,
        ..PresenterSettings::default()
    };

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping after the current poll");
            shutdown.cancel();
        }
    });

    let session = RequestSession::new(Arc::new(client), Arc::new(settings), cancel);
    let completed = session
        .spawn(Arc::new(TerminalSink::stdout()), options)
        .await
        .context("Session task panicked")?;

    if completed == 0 {
        bail!("Generation failed");
    }
    Ok(())
}
