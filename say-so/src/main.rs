use std::io::{self, Read};

use clap::Parser;
use owo_colors::{OwoColorize, Stream};
use tracing_subscriber::EnvFilter;
use voicebox::SpeechRequest;

/// Exit code for a bad request (malformed JSON, missing `text`, ...).
const EXIT_REQUEST_ERROR: i32 = 2;
/// Exit code for an unavailable engine or a failed synthesis.
const EXIT_ENGINE_ERROR: i32 = 1;

/// Single-shot JSON-to-speech CLI
///
/// # Examples
///
/// ```no_run
/// // Speak a request given as the only argument
/// // say-so '{"text":"hello","rate":200,"volume":0.5}'
///
/// // Speak a request from stdin
/// // echo '{"text":"hello"}' | say-so
/// ```
#[derive(Parser)]
#[command(name = "say-so")]
#[command(
    about = "Speak a JSON-encoded utterance through the host text-to-speech engine",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// JSON object with a required `text` key and optional `rate`,
    /// `volume` and `voice` keys (reads from stdin if not provided)
    request: Option<String>,
}

/// Reads the request JSON from stdin with a 10,000 byte limit.
fn read_from_stdin() -> io::Result<String> {
    let mut buffer = String::new();
    let mut handle = io::stdin().take(10_000);
    handle.read_to_string(&mut buffer)?;
    let raw = buffer.trim().to_string();

    if raw.is_empty() {
        report_message("no request provided");
        eprintln!("Usage: say-so '<json>' or echo '<json>' | say-so");
        std::process::exit(EXIT_REQUEST_ERROR);
    }

    Ok(raw)
}

fn report(error: &dyn std::error::Error) {
    report_message(&error.to_string());
    let mut source = error.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}

fn report_message(message: &str) {
    eprintln!(
        "{} {message}",
        "error:".if_supports_color(Stream::Stderr, |text| text.red())
    );
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    let raw = match cli.request {
        Some(raw) => raw,
        None => match read_from_stdin() {
            Ok(raw) => raw,
            Err(error) => {
                report(&error);
                std::process::exit(EXIT_REQUEST_ERROR);
            }
        },
    };

    // Decode before touching the engine: a bad request must not start one.
    let request = match SpeechRequest::from_json(&raw) {
        Ok(request) => request,
        Err(error) => {
            report(&error);
            std::process::exit(EXIT_REQUEST_ERROR);
        }
    };

    let mut engine = match voicebox::detect() {
        Ok(engine) => engine,
        Err(error) => {
            report(&error);
            std::process::exit(EXIT_ENGINE_ERROR);
        }
    };

    if let Err(error) = voicebox::speak(&mut engine, &request).await {
        report(&error);
        std::process::exit(EXIT_ENGINE_ERROR);
    }
}
