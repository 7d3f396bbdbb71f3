use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mirror_core::{config_file_path, http_client, load_config, sync_feed, FeedSpec, PageRange};

/// Mirror torrent indexer APIs into local RSS feed files.
#[derive(Debug, Parser)]
#[command(name = "feedmirror", version, about)]
struct Cli {
    /// Feed number to update; omitted or 0 runs every configured feed.
    feed: Option<u32>,

    /// Pages to fetch: a count ("3" = pages 1..=3) or a closed range ("2..5").
    #[arg(long, default_value = "1")]
    pages: PageRange,

    /// Config file path; defaults to ./config.json, then the user config dir.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config_path = config_file_path(cli.config.as_deref())?;
    let config = load_config(&config_path)
        .await
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    let selected: Vec<&FeedSpec> = match cli.feed {
        None | Some(0) => config.feeds.iter().collect(),
        Some(number) => {
            let spec = config
                .feed(number)
                .with_context(|| format!("feed {number} is not configured"))?;
            vec![spec]
        }
    };

    let client = http_client(&config.fetch)?;
    for spec in selected {
        let report = sync_feed(&client, spec, &config.output_dir, cli.pages)
            .await
            .with_context(|| format!("updating feed `{}`", spec.name))?;
        info!(
            feed = %spec.name,
            new = report.new_items,
            duplicates = report.duplicates,
            filtered = report.filtered_out,
            skipped = report.skipped,
            failed_pages = report.pages_failed,
            "run finished"
        );
    }
    Ok(())
}
