use anyhow::Context;
use async_trait::async_trait;
use yt_transcript_rs::api::YouTubeTranscriptApi;
use yt_transcript_rs::errors::{CouldNotRetrieveTranscript, CouldNotRetrieveTranscriptReason};
use yt_transcript_rs::FetchedTranscript;

use super::{FetchError, TranscriptFetcher, TranscriptRecord};
use crate::config::UpstreamConfig;
use crate::Result;

type FetchResult<T> = std::result::Result<T, FetchError>;

/// YouTube transcript source backed by `yt-transcript-rs`
pub struct YoutubeTranscriptFetcher {
    api: YouTubeTranscriptApi,
    languages: Vec<String>,
    preserve_formatting: bool,
}

impl YoutubeTranscriptFetcher {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .context("Failed to create YouTube transcript client")?;

        Ok(Self {
            api,
            languages: config.languages.clone(),
            preserve_formatting: config.preserve_formatting,
        })
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }
}

#[async_trait]
impl TranscriptFetcher for YoutubeTranscriptFetcher {
    async fn fetch_transcript(&self, video_id: &str) -> FetchResult<Vec<TranscriptRecord>> {
        if looks_like_url(video_id) {
            return Err(FetchError::InvalidVideoId(video_id.to_string()));
        }

        let languages: Vec<&str> = self.languages.iter().map(String::as_str).collect();

        tracing::debug!(video_id, ?languages, "Requesting transcript from YouTube");

        let transcript = self
            .api
            .fetch_transcript(video_id, &languages, self.preserve_formatting)
            .await
            .map_err(|err| fetch_error(video_id, &self.languages, err))?;

        tracing::debug!(
            video_id,
            language = %transcript.language_code,
            generated = transcript.is_generated,
            snippets = transcript.snippets.len(),
            "Fetched transcript"
        );

        Ok(records_from_transcript(transcript))
    }

    fn source_name(&self) -> &'static str {
        "youtube"
    }
}

fn looks_like_url(video_id: &str) -> bool {
    video_id.starts_with("http://") || video_id.starts_with("https://")
}

fn records_from_transcript(transcript: FetchedTranscript) -> Vec<TranscriptRecord> {
    transcript
        .snippets
        .into_iter()
        .map(|snippet| TranscriptRecord::new(snippet.text, snippet.start, snippet.duration))
        .collect()
}

fn fetch_error(video_id: &str, languages: &[String], err: CouldNotRetrieveTranscript) -> FetchError {
    let message = err.to_string();
    from_reason(video_id, languages, err.reason.as_ref(), message)
}

/// Place a library failure reason onto our own error variants.
/// Reasons without a counterpart of their own (blocking, request failures,
/// unparsable pages, translation problems) are kept as `Upstream`.
fn from_reason(
    video_id: &str,
    languages: &[String],
    reason: Option<&CouldNotRetrieveTranscriptReason>,
    message: String,
) -> FetchError {
    let video_id = video_id.to_string();

    match reason {
        Some(CouldNotRetrieveTranscriptReason::NoTranscriptFound { .. }) => {
            FetchError::NoTranscriptFound {
                video_id,
                requested: languages.to_vec(),
            }
        }
        Some(CouldNotRetrieveTranscriptReason::TranscriptsDisabled { .. }) => {
            FetchError::TranscriptsDisabled(video_id)
        }
        Some(CouldNotRetrieveTranscriptReason::VideoUnavailable { .. }) => {
            FetchError::VideoUnavailable {
                video_id,
                reason: message,
            }
        }
        Some(CouldNotRetrieveTranscriptReason::VideoUnplayable { .. }) => {
            FetchError::VideoUnplayable {
                video_id,
                reason: message,
            }
        }
        Some(CouldNotRetrieveTranscriptReason::AgeRestricted { .. }) => {
            FetchError::AgeRestricted(video_id)
        }
        Some(CouldNotRetrieveTranscriptReason::InvalidVideoId { .. }) => {
            FetchError::InvalidVideoId(video_id)
        }
        // The library's reason list is open ended; anything else stays unclassified
        Some(_) | None => FetchError::Upstream { video_id, message },
    }
}
