use std::fs::File;
use std::sync::Arc;

use clap::Parser;
use mentorchat::core::config::{self, CliOverrides, MentorChatConfig};
use mentorchat::core::notice::LogSink;
use mentorchat::core::session::ChatSession;
use mentorchat::{session_deps, tui};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "mentorchat", about = "Chat with coding mentors in your terminal")]
struct Args {
    /// Mentor to talk to (hitesh, piyush). Skips the picker.
    #[arg(short, long)]
    mentor: Option<String>,

    /// Ask one question, print the reply and exit
    #[arg(short, long)]
    ask: Option<String>,

    /// Start with notification sounds off
    #[arg(long)]
    no_sound: bool,

    /// Gemini model name
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to mentorchat.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("mentorchat.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("{}, falling back to defaults", e);
        MentorChatConfig::default()
    });
    let cli = CliOverrides {
        mentor: args.mentor.clone(),
        model: args.model,
        no_sound: args.no_sound,
    };
    let resolved = config::resolve(&file_config, &cli);

    log::info!(
        "mentorchat starting up (model={}, mentor={}, key set={})",
        resolved.gemini_model,
        resolved.default_mentor,
        resolved.gemini_api_key.is_some()
    );

    match args.ask {
        Some(question) => ask(&resolved, &question).await,
        None => tui::run(resolved, args.mentor.is_some()),
    }
}

/// Headless mode: one question, one answer on stdout.
async fn ask(resolved: &config::ResolvedConfig, question: &str) -> std::io::Result<()> {
    let deps = session_deps(resolved, Arc::new(LogSink));
    let mut session = ChatSession::open_by_id(&resolved.default_mentor, deps)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    session.send(question).await.map_err(std::io::Error::other)?;
    if let Some(reply) = session.state().messages.last() {
        println!("{}", reply.content);
    }
    session.close();
    Ok(())
}
