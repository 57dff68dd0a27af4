//! GPT Feedback settings bot binary.
//!
//! Start the bot with:
//! ```bash
//! TELEGRAM_BOT_TOKEN=xxx cargo run -p feedback-telegram
//! ```

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use feedback_completion::{CompletionClient, ReplyGenerator};
use feedback_persistence::{paths, ConfigStore};
use feedback_telegram::{BotState, OperatorRegistry, SessionStore, SettingsBot};

/// Environment variable overriding the completion API base URL.
const API_URL_ENV: &str = "GPT_FEEDBACK_API_URL";

/// GPT Feedback settings bot - manage automatic review replies from Telegram
#[derive(Parser, Debug)]
#[command(name = "gpt-feedback-bot")]
#[command(about = "Telegram settings bot for GPT Feedback review replies")]
struct Args {
    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Local .env.local or .env, if present
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());

    // Initialize logging based on verbosity
    let filter = match args.verbose {
        0 => "feedback_telegram=info,teloxide=warn",
        1 => "feedback_telegram=debug,teloxide=info",
        2 => "feedback_telegram=trace,teloxide=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Storage directory
    if let Err(e) = paths::ensure_storage_dir() {
        tracing::warn!(error = %e, "Failed to create storage directory");
    }
    let dir = paths::storage_dir();
    tracing::info!(dir = %dir.display(), "Using plugin storage");

    let config = ConfigStore::open(&dir);
    let operators = OperatorRegistry::open(&dir)?;
    let sessions = SessionStore::default();

    let client = match std::env::var(API_URL_ENV) {
        Ok(url) => CompletionClient::with_base_url(url)?,
        Err(_) => CompletionClient::new()?,
    };
    let generator = ReplyGenerator::new(Arc::new(client));

    let bot = SettingsBot::new(BotState {
        config,
        sessions,
        operators,
        generator,
        host: None,
    })?;

    println!("\n🤖 GPT Feedback settings bot");
    println!("   Open Telegram and send /start to begin");
    println!("   Press Ctrl+C to stop\n");

    bot.run().await?;

    Ok(())
}
