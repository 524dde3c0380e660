use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use podfeed::config::Config;
use podfeed::feed::{build_client, load_podcast, FetchOptions, Normalizer};
use podfeed::server;
use podfeed::util::validate_feed_url;

#[derive(Parser, Debug)]
#[command(name = "podfeed", about = "Podcast RSS feeds as normalized episode JSON")]
struct Args {
    /// Config file (default: ~/.config/podfeed/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a feed once and print the normalized JSON
    Fetch {
        /// Feed URL
        url: String,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Serve the /feed and /podcast endpoints
    Serve {
        /// Listen address, overrides `bind_address` from the config file
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path.or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            tracing::debug!("HOME not set, using default configuration");
            Ok(Config::default())
        }
    }
}

async fn fetch(config: &Config, url: &str, pretty: bool) -> Result<()> {
    // Local invocations may point at private hosts; only the scheme is policed
    let url = validate_feed_url(url, true).context("Invalid feed URL")?;

    let client = build_client(config, true).context("Failed to build HTTP client")?;
    let podcast = load_podcast(
        &client,
        url.as_str(),
        &FetchOptions::from(config),
        &Normalizer::new(config.placeholder_image.clone()),
    )
    .await
    .with_context(|| format!("Failed to load podcast from {url}"))?;

    let json = if pretty {
        serde_json::to_string_pretty(&podcast)?
    } else {
        serde_json::to_string(&podcast)?
    };
    println!("{json}");
    Ok(())
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = load_config(args.config)?;

    match args.command {
        Command::Fetch { url, pretty } => fetch(&config, &url, pretty).await,
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind_address = bind;
            }
            server::run(&config).await.context("Server error")
        }
    }
}
