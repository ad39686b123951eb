use clap::{Parser, Subcommand};
use eyre::Context;
use std::io::{IsTerminal, Write};
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use youtube_sentiment::{FetchConfig, Fetched, Fetcher};

/// Fetch YouTube comments and video statistics as JSON tables.
///
/// The API key is read from YOUTUBE_API_KEY.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Pause between API calls, in milliseconds. Overrides YOUTUBE_API_DELAY_MS.
    #[arg(long)]
    delay_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Every comment thread on a video, with replies.
    Comments { video_id: String },
    /// Statistics for every upload on a channel.
    Videos { handle: String },
    /// The channel and uploads playlist ids behind a handle.
    Channel { handle: String },
    /// The ids of every upload on a channel.
    VideoIds { handle: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let args = Args::parse();

    let mut config = FetchConfig::from_env().context("load configuration")?;
    if let Some(delay_ms) = args.delay_ms {
        config.delay = Duration::from_millis(delay_ms);
    }
    let fetcher = Fetcher::from_config(config)?;

    let mut stdout = std::io::stdout().lock();
    match args.command {
        Command::Comments { video_id } => {
            let fetched = fetcher.fetch_comments(&video_id).await?;
            warn_if_partial(&fetched);
            serde_json::to_writer_pretty(&mut stdout, &fetched)?;
        }
        Command::Videos { handle } => {
            let channel = fetcher.resolve_channel(&handle).await?;
            let fetched = fetcher.fetch_videos(&channel).await?;
            warn_if_partial(&fetched);
            serde_json::to_writer_pretty(&mut stdout, &fetched)?;
        }
        Command::Channel { handle } => {
            let channel = fetcher.resolve_channel(&handle).await?;
            serde_json::to_writer_pretty(&mut stdout, &channel)?;
        }
        Command::VideoIds { handle } => {
            let channel = fetcher.resolve_channel(&handle).await?;
            let ids = fetcher.uploaded_video_ids(&channel).await;
            if !ids.complete {
                tracing::warn!("upload listing was cut short, some video ids are missing");
            }
            serde_json::to_writer_pretty(&mut stdout, &ids.items)?;
        }
    }
    writeln!(stdout).context("write to stdout")?;

    Ok(())
}

fn warn_if_partial(fetched: &Fetched) {
    if !fetched.complete {
        tracing::warn!(
            rows = fetched.table.len(),
            "id listing was cut short, the table is missing rows"
        );
    }
}
