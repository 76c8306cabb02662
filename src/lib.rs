//! YouTube Transcript Server - A small HTTP service returning video transcripts
//!
//! `GET /transcript/{video_id}` answers with the transcript lines as a JSON array.
//! Every failure (no captions, disabled captions, unreachable video, upstream
//! trouble) collapses into an empty array with status 200.

pub mod cli;
pub mod config;
pub mod extractors;
pub mod logging;
pub mod server;
pub mod transcript;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use extractors::{FetchError, FetchErrorKind, TranscriptFetcher, TranscriptRecord};
pub use server::TranscriptServer;
pub use transcript::{TranscriptResult, TranscriptService};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;
