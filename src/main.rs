use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use yt_transcript_server::cli::{Cli, Commands};
use yt_transcript_server::config::Config;
use yt_transcript_server::extractors::youtube::YoutubeTranscriptFetcher;
use yt_transcript_server::logging;
use yt_transcript_server::server::TranscriptServer;
use yt_transcript_server::transcript::TranscriptService;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, config_path) = match (&cli.command, cli.config.as_deref()) {
        // Writing a fresh config file to a path that does not exist yet
        (Commands::Config { show: false }, Some(path)) if !path.exists() => {
            (Config::default(), None)
        }
        (_, path) => (Config::load(path)?, Config::resolve_path(path)?),
    };

    if let Commands::Serve { host, port, debug } = &cli.command {
        if let Some(host) = host {
            config.server.host = host.clone();
        }
        if let Some(port) = port {
            config.server.port = *port;
        }
        config.server.debug |= *debug;
    }

    logging::init(config.logging.format, config.server.debug || cli.verbose);

    match &config_path {
        Some(path) => tracing::debug!("Loaded configuration from {}", path.display()),
        None => tracing::debug!("Using default configuration"),
    }

    match cli.command {
        Commands::Serve { .. } => {
            let service = build_service(&config)?;
            let server = TranscriptServer::new(config.server.clone(), service);

            tracing::info!(
                "Starting transcript server on {}:{}",
                server.config().host,
                server.config().port
            );

            server.serve().await?;
        }
        Commands::Fetch { video_id } => {
            let service = build_service(&config)?;

            let result = service.lookup(&video_id).await;
            if !result.is_present() {
                tracing::info!("No transcript available for {}", video_id);
            }

            let json = serde_json::to_string_pretty(&result.into_lines())
                .context("Failed to serialize transcript")?;
            println!("{}", json);
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                let path = config.save(cli.config.as_deref())?;
                println!("Configuration written to: {}", path.display());
            }
        }
    }

    Ok(())
}

fn build_service(config: &Config) -> Result<TranscriptService> {
    let fetcher = YoutubeTranscriptFetcher::new(&config.upstream)
        .context("Failed to create YouTube client")?;

    Ok(TranscriptService::new(
        Arc::new(fetcher),
        config.upstream.lookup_timeout(),
    ))
}
