use anyhow::{Context, Result};
use axum::extract::{Form, State};
use axum::routing::post;
use axum::{Json, Router};
use clap::Parser;
use serde::{Deserialize, Serialize};
use shared::{parse_tag_list, CategoryStore};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "serve-commands")]
#[command(about = "Slack slash-command receiver that maintains the arXiv category list")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 5000)]
    port: u16,

    /// Path to the category list file
    #[arg(short, long, default_value = "config.json")]
    config_file: PathBuf,
}

/// The slice of Slack's slash-command form payload we read.
#[derive(Debug, Deserialize)]
struct SlashCommand {
    #[serde(default)]
    text: String,
}

/// Slack renders the `text` of a 200 response back to the user, so every
/// outcome, including a rejected list, answers with status 200.
#[derive(Debug, Serialize)]
struct CommandResponse {
    text: String,
}

const HELP_TEXT: &str = "\
*arXiv notifier commands*

`/set_tags cs.AI, cs.CL, cs.CV` - replace the watched categories, highest priority first

*Common arXiv categories*
• `cs.AI` - Artificial Intelligence
• `cs.CL` - Computation and Language
• `cs.CV` - Computer Vision and Pattern Recognition
• `cs.LG` - Machine Learning
• `cs.NE` - Neural and Evolutionary Computing
• `cs.RO` - Robotics

See <https://arxiv.org/category_taxonomy|the arXiv category taxonomy> for the full list.";

fn build_router(store: Arc<CategoryStore>) -> Router {
    Router::new()
        .route("/slack/set_tags", post(set_tags))
        .route("/slack/help", post(help))
        .with_state(store)
}

async fn set_tags(
    State(store): State<Arc<CategoryStore>>,
    Form(command): Form<SlashCommand>,
) -> Json<CommandResponse> {
    let tags = parse_tag_list(&command.text);

    if tags.is_empty() {
        return Json(CommandResponse {
            text: "⚠️ Please provide the arXiv categories to watch.\nExample: `/set_tags cs.AI, cs.CL, cs.CV`"
                .to_string(),
        });
    }

    match store.set(tags.clone()) {
        Ok(()) => {
            info!(tags = ?tags, "Category list replaced");
            Json(CommandResponse {
                text: format!(
                    "✅ arXiv categories updated!\nCurrent categories: `{}`",
                    tags.join(", ")
                ),
            })
        }
        Err(e) => {
            error!(error = %e, "Failed to replace category list");
            Json(CommandResponse {
                text: format!("❌ Could not update categories: {}", e),
            })
        }
    }
}

async fn help() -> Json<CommandResponse> {
    Json(CommandResponse {
        text: HELP_TEXT.to_string(),
    })
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutting down");
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
    let store = Arc::new(CategoryStore::new(&args.config_file));

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    info!(%addr, config_file = %store.path().display(), "Listening for slash commands");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, build_router(store))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
