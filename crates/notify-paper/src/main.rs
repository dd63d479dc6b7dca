use anyhow::{Context, Result};
use clap::Parser;
use shared::{
    build_payload, create_summarizer, select_paper, ArxivClient, CategoryStore, Config,
    SlackClient,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "notify-paper")]
#[command(about = "Fetch the newest arXiv paper by category priority and post it to Slack")]
struct Args {
    /// Path to the category list file
    #[arg(short, long, default_value = "config.json")]
    config_file: PathBuf,

    /// AI backend to use (overrides AI_BACKEND)
    #[arg(short, long)]
    backend: Option<String>,

    /// Target language for the notification (overrides NOTIFY_LANGUAGE)
    #[arg(short, long)]
    language: Option<String>,

    /// Build the message but do not post it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(backend) = args.backend {
        config.backend = backend;
    }
    if let Some(language) = args.language {
        config.language = language;
    }

    // Fail on a bad backend name or a missing destination before
    // touching the network.
    let summarizer = create_summarizer(&config)?;
    if !args.dry_run && config.channels.is_empty() {
        anyhow::bail!(
            "SLACK_CHANNELS is not set; configure at least a default channel \
            (e.g. SLACK_CHANNELS=default:C0123456789)"
        );
    }

    let store = CategoryStore::new(&args.config_file);
    let categories = store.get().context("Failed to load category list")?;

    if categories.is_empty() {
        println!("No categories configured. Nothing to do.");
        return Ok(());
    }

    println!(
        "🔍 Checking {} categories for the newest paper...",
        categories.len()
    );

    let arxiv = ArxivClient::new()?;
    let Some(paper) = select_paper(&arxiv, &categories).await else {
        println!("No paper available in any category. Nothing to do.");
        return Ok(());
    };

    println!("✓ Selected \"{}\" from {}", paper.title, paper.category);

    println!("\n🤖 Summarizing with {}...", summarizer.name());
    let summary = summarizer
        .summarize(&paper, &config.language)
        .await
        .context("Failed to summarize paper")?;
    println!("✓ Summary ready ({} Q&A pairs)", summary.qa_pairs.len());

    let payload = build_payload(&paper, &summary);

    if args.dry_run {
        println!("\n📝 Dry run, not posting. Message content:\n");
        for block in &payload.blocks {
            println!("{}\n", block.text.text);
        }
        return Ok(());
    }

    println!("\n📤 Posting to Slack...");
    let slack = SlackClient::new(config.slack_token.clone(), config.channels.clone())?;
    slack
        .dispatch(&payload, &paper.category)
        .await
        .context("Failed to deliver notification")?;

    println!("✅ Notification sent for {}", paper.id);

    Ok(())
}
