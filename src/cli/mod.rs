use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "transcript-server",
    about = "YouTube Transcript Server - Serve video transcripts as JSON arrays of lines",
    version,
    long_about = "A small HTTP service that looks up the transcript of a YouTube video and returns its lines as a JSON array. Missing, disabled or unreachable transcripts are returned as an empty array."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a YAML config file (defaults to ./config.yaml or the user config dir)
    #[arg(short, long, global = true, value_name = "FILE", env = "TRANSCRIPT_SERVER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to bind
        #[arg(long, env = "TRANSCRIPT_SERVER_HOST")]
        host: Option<String>,

        /// Port to bind
        #[arg(short, long, env = "TRANSCRIPT_SERVER_PORT")]
        port: Option<u16>,

        /// Debug mode: verbose request and lookup logging
        #[arg(long)]
        debug: bool,
    },

    /// Look up a single transcript and print it as JSON
    Fetch {
        /// YouTube video id
        #[arg(value_name = "VIDEO_ID")]
        video_id: String,
    },

    /// Show or write the configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}
