//! healthdash CLI
//!
//! Command-line front end for the dashboard assistant:
//! - Ask the health chatbot a question
//! - Classify a voice command
//! - Chat interactively with the simulated delays
//! - Inspect the keyword table and generate a config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use healthdash::{
    Assistant, Config, Effect, LogSynthesizer, SpeechError, SpeechSynthesizer, StaticCapabilities,
    StdinRecognizer, TimerEvent, TokioScheduler,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "healthdash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Health dashboard assistant: chatbot and voice commands")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask the health assistant a question
    Ask {
        /// Question text
        query: Vec<String>,
        /// Also show which keywords matched
        #[arg(long)]
        explain: bool,
    },

    /// Classify a command transcript
    Command {
        /// Transcript text
        transcript: Vec<String>,
        /// Wait for the navigation delay and report the navigation
        #[arg(long)]
        wait: bool,
    },

    /// Chat interactively (type /quit to leave)
    Chat,

    /// Listen for one voice command (typed on stdin)
    Listen,

    /// List the keyword table in evaluation order
    Keywords,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default().context("loading config from the default locations")?,
    };

    init_tracing(&config);
    tracing::debug!("healthdash v{}", env!("CARGO_PKG_VERSION"));

    let json = cli.format == "json";

    match cli.command {
        Commands::Ask { query, explain } => {
            let query = query.join(" ");
            let responder = config.assistant.responder()?;
            let reply = responder.explain(&query);

            if json {
                println!("{}", serde_json::to_string_pretty(&reply)?);
            } else {
                println!("{}", reply.text);
                if explain {
                    println!();
                    match &reply.winner {
                        Some(winner) => {
                            println!("Matched: {} (winner: {})", reply.matched.join(", "), winner)
                        }
                        None => println!("Matched: nothing (fallback)"),
                    }
                }
            }
        }

        Commands::Command { transcript, wait } => {
            let (scheduler, mut timers) = TokioScheduler::new();
            let mut assistant =
                Assistant::new(&config, scheduler, Arc::new(StaticCapabilities::all()))?;
            let synthesizer = LogSynthesizer;

            let (outcome, effects) = assistant.command(&transcript.join(" "));
            print_outcome(&outcome, json)?;
            for effect in &effects {
                render(effect, json, &synthesizer)?;
            }

            if wait && outcome.navigation_target.is_some() {
                drain_navigation(&mut assistant, &mut timers, json, &synthesizer).await?;
            }
        }

        Commands::Chat => {
            run_chat(&config, json).await?;
        }

        Commands::Listen => {
            let (scheduler, mut timers) = TokioScheduler::new();
            let mut assistant =
                Assistant::new(&config, scheduler, Arc::new(StaticCapabilities::all()))?;
            let synthesizer = LogSynthesizer;
            let recognizer = StdinRecognizer::new();

            eprintln!("Listening... type a command and press Enter");

            match assistant.listen_command(&recognizer).await {
                Ok(Some((outcome, effects))) => {
                    println!("You said: \"{}\"", outcome.transcript);
                    print_outcome(&outcome, json)?;
                    for effect in &effects {
                        render(effect, json, &synthesizer)?;
                    }
                    if outcome.navigation_target.is_some() {
                        drain_navigation(&mut assistant, &mut timers, json, &synthesizer).await?;
                    }
                }
                Ok(None) => {
                    println!("No speech detected.");
                }
                Err(SpeechError::NotSupported) => {
                    eprintln!(
                        "Not Supported: voice recognition is disabled in this configuration."
                    );
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }

            synthesizer.cancel();
        }

        Commands::Keywords => {
            let responder = config.assistant.responder()?;
            let table = responder.table();

            if json {
                let entries: Vec<_> = table.iter().collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                println!("{:<4} {:<14} {}", "#", "Keyword", "Response");
                println!("{}", "-".repeat(72));
                for (i, entry) in table.iter().enumerate() {
                    println!(
                        "{:<4} {:<14} {}",
                        i + 1,
                        entry.keyword,
                        truncate(&entry.response, 52)
                    );
                }
                println!();
                println!("When several keywords match, the one listed last wins.");
            }
        }

        Commands::Config { output } => {
            let config = healthdash::config::generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("healthdash={}", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run_chat(config: &Config, json: bool) -> anyhow::Result<()> {
    let (scheduler, mut timers) = TokioScheduler::new();
    let mut assistant = Assistant::new(config, scheduler, Arc::new(StaticCapabilities::all()))?;
    let synthesizer = LogSynthesizer;

    for message in assistant.chat().messages() {
        println!("assistant: {}", message.content);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim() == "/quit" {
                    break;
                }
                match assistant.ask(&line) {
                    Ok(_) => eprintln!("(thinking...)"),
                    Err(e) => eprintln!("{}", e),
                }
            }
            Some(event) = timers.recv() => {
                for effect in assistant.dispatch(event) {
                    render(&effect, json, &synthesizer)?;
                }
            }
        }
    }

    // Let a pending reply arrive before exiting
    while assistant.chat().is_loading() {
        match timers.recv().await {
            Some(event) => {
                for effect in assistant.dispatch(event) {
                    render(&effect, json, &synthesizer)?;
                }
            }
            None => break,
        }
    }

    synthesizer.cancel();
    Ok(())
}

async fn drain_navigation(
    assistant: &mut Assistant<TokioScheduler<TimerEvent>>,
    timers: &mut UnboundedReceiver<TimerEvent>,
    json: bool,
    synthesizer: &LogSynthesizer,
) -> anyhow::Result<()> {
    while let Some(event) = timers.recv().await {
        let done = matches!(event, TimerEvent::Navigate { .. });
        for effect in assistant.dispatch(event) {
            render(&effect, json, synthesizer)?;
        }
        if done {
            break;
        }
    }
    Ok(())
}

fn print_outcome(outcome: &healthdash::CommandOutcome, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        println!("{}", outcome.label());
        println!("{}", outcome.feedback_text);
    }
    Ok(())
}

fn render(effect: &Effect, json: bool, synthesizer: &LogSynthesizer) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(effect)?);
        return Ok(());
    }

    match effect {
        Effect::Speak { utterance } => synthesizer.speak(utterance),
        Effect::Navigate { target } => println!("Navigating to {}...", target),
        Effect::Reply { message } => println!("assistant: {}", message.content),
    }
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
