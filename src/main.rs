use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use encyclopedian::render::render_article_text;
use encyclopedian::{config, Curator, LoadRequest, Navigator};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Encyclopedian - one encyclopedia article with nine places to go next
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a TOML config file (overrides ENCYCLOPEDIAN_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the view-model as JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a specific article by title
    Title { title: String },
    /// Load a random article
    Random,
    /// Load the best match for a search query
    Search { query: String },
}

impl From<Command> for LoadRequest {
    fn from(c: Command) -> Self {
        match c {
            Command::Title { title } => LoadRequest::Title(title),
            Command::Random => LoadRequest::Random,
            Command::Search { query } => LoadRequest::Search(query),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout is the article
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();

    let args = Args::parse();
    let cfg = config::load(args.config.as_deref())?;
    debug!(
        "Config - api_base={}, max_attempts={}, retry_delay_ms={}, seed={:?}",
        cfg.api_base, cfg.max_attempts, cfg.retry_delay_ms, cfg.seed
    );

    let curator = Curator::from_config(&cfg).context("building wiki client")?;
    let navigator = Navigator::new(Arc::new(curator));

    let request = LoadRequest::from(args.command);
    info!("Loading - request={:?}", request);
    let vm = navigator
        .load(request)
        .await
        .context("could not load an article; try again")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(vm.as_ref())?);
    } else {
        print!("{}", render_article_text(&vm));
    }
    Ok(())
}
