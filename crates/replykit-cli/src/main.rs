//! ReplyKit CLI
//!
//! Classifies a text selection into a reply scenario and prints the result,
//! either as a human-readable line or as the JSON record.

use anyhow::{Context, Result};
use clap::Parser;
use replykit_classifiers::{ClassificationResult, ScenarioDetector};
use std::io::Read;
use tracing::{debug, info};

mod config;

const DEFAULT_LOG_FILTER: &str = "replykit=info";
const VERBOSE_LOG_FILTER: &str = "replykit=debug";

#[derive(Parser, Debug)]
#[command(name = "replykit")]
#[command(about = "Classify a text selection into a reply scenario", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "replykit.yaml")]
    config: String,

    /// Lexicon file path or http(s) URL
    #[arg(short, long, env = "REPLYKIT_LEXICON")]
    lexicon: Option<String>,

    /// Print the full result as JSON
    #[arg(short, long)]
    json: bool,

    /// Append the scenario caption to the text output
    #[arg(short, long)]
    describe: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Text to classify; read from stdin when omitted
    text: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = config::load(&cli.config, cli.lexicon.as_deref())?;
    info!("Lexicon source: {}", config.lexicon_source());

    let detector = ScenarioDetector::from_config(&config)?;

    let text = if cli.text.is_empty() {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read text from stdin")?;
        buf
    } else {
        cli.text.join(" ")
    };
    debug!("Classifying {} chars", text.chars().count());

    let result = detector.detect(&text).await;
    println!("{}", render(&result, cli.json, cli.describe)?);

    Ok(())
}

fn render(result: &ClassificationResult, json: bool, describe: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(result)?);
    }

    let mut line = format!(
        "{} (confidence {:.2}, sentiment {:.1}{})",
        result.label,
        result.confidence,
        result.sentiment,
        if result.is_question { ", question" } else { "" }
    );
    if !result.matched_keywords.is_empty() {
        line.push_str(&format!(" [{}]", result.matched_keywords.join(", ")));
    }
    if describe {
        line.push_str(&format!(" - {}", result.label.description()));
    }
    if let Some(error) = &result.error {
        line.push_str(&format!(" error: {}", error));
    }
    Ok(line)
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new(VERBOSE_LOG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    // stdout carries the result
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
