//! recite - terminal flashcard reviews with a language-model tutor
//!
//! Drives an Anki review session over AnkiConnect, critiques each recall
//! attempt through a chat-completions backend, and plays the card's audio
//! cues while a grade is pending.

mod llm;
mod media;
mod scheduler;
mod session;
mod text;

use clap::Parser;
use llm::{CompletionService, OpenAiService};
use media::RodioPlayer;
use scheduler::AnkiConnectScheduler;
use session::{ReviewSession, StdConsole};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Parser, Debug)]
#[command(
    name = "recite",
    about = "Spaced-repetition reviews with a language-model tutor"
)]
struct Args {
    /// Deck name
    deck: String,

    /// Base URL of the AnkiConnect service
    #[arg(short = 'u', long, default_value = "http://127.0.0.1:8765")]
    base_url: String,

    /// Language the tutor replies in
    #[arg(short, long, default_value = "English")]
    language: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never interleave with the review transcript.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "recite=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let api_key = match std::env::var("OPENAI_API_KEY") {
        Ok(key) => key,
        Err(_) => {
            tracing::error!("OPENAI_API_KEY is not set");
            return ExitCode::FAILURE;
        }
    };
    let model = std::env::var("RECITE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
    let llm_base = std::env::var("OPENAI_BASE_URL").ok();

    let completion = OpenAiService::new(api_key, model, llm_base.as_deref(), HTTP_TIMEOUT);
    tracing::info!(
        model = completion.model_id(),
        scheduler = %args.base_url,
        "collaborators configured"
    );

    let player = match RodioPlayer::new() {
        Ok(player) => player,
        Err(e) => {
            tracing::error!(error = %e, "could not open the audio device");
            return ExitCode::FAILURE;
        }
    };
    let scheduler = AnkiConnectScheduler::new(&args.base_url, Box::new(player), HTTP_TIMEOUT);

    let mut session = ReviewSession::new(scheduler, completion, StdConsole::new(), args.language);
    match session.execute(&args.deck).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_deck_completion() => {
            tracing::info!("deck review finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "review session failed");
            ExitCode::FAILURE
        }
    }
}
