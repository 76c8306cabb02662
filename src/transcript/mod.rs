//! Transcript lookup: call the upstream source and collapse every outcome
//! into either a list of lines or nothing.
//!
//! Callers never see why a transcript is missing. The reason is only
//! recorded in the logs: `debug` for expected absences (no captions,
//! disabled captions, unreachable video) and `warn` for anything else.

use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use crate::extractors::{FetchError, FetchErrorKind, TranscriptFetcher, TranscriptRecord};

/// Outcome of a lookup as seen by the HTTP layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptResult {
    /// Caption lines in upstream order
    Present(Vec<String>),
    /// No transcript, for whatever reason
    Absent,
}

impl TranscriptResult {
    /// Lines to send to the caller; `Absent` becomes an empty list
    pub fn into_lines(self) -> Vec<String> {
        match self {
            TranscriptResult::Present(lines) => lines,
            TranscriptResult::Absent => Vec::new(),
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, TranscriptResult::Present(_))
    }
}

/// Map an upstream outcome onto a `TranscriptResult`
pub fn classify(
    video_id: &str,
    outcome: Result<Vec<TranscriptRecord>, FetchError>,
) -> TranscriptResult {
    match outcome {
        Ok(records) => {
            TranscriptResult::Present(records.into_iter().map(|record| record.text).collect())
        }
        Err(err) => {
            match err.kind() {
                FetchErrorKind::NoTranscript | FetchErrorKind::VideoUnreachable => {
                    tracing::debug!(video_id = %video_id, kind = %err.kind(), "No transcript available: {}", err);
                }
                FetchErrorKind::Unclassified => {
                    tracing::warn!(video_id = %video_id, error = %err, "Unexpected error while fetching transcript for {}", video_id);
                }
            }
            TranscriptResult::Absent
        }
    }
}

/// Transcript lookups against a single upstream source
pub struct TranscriptService {
    fetcher: Arc<dyn TranscriptFetcher>,
    timeout: Duration,
}

impl TranscriptService {
    pub fn new(fetcher: Arc<dyn TranscriptFetcher>, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }

    pub fn source_name(&self) -> &'static str {
        self.fetcher.source_name()
    }

    /// Look up the default transcript for a video. Never fails.
    pub async fn lookup(&self, video_id: &str) -> TranscriptResult {
        tracing::debug!(video_id = %video_id, source = self.source_name(), "Looking up transcript");

        let outcome = self.fetch_bounded(video_id).await;
        let result = classify(video_id, outcome);

        if let TranscriptResult::Present(lines) = &result {
            tracing::debug!(video_id = %video_id, lines = lines.len(), "Transcript found");
        }

        result
    }

    /// Fetch with the configured timeout, turning panics in the source into errors
    async fn fetch_bounded(&self, video_id: &str) -> Result<Vec<TranscriptRecord>, FetchError> {
        let fetch = AssertUnwindSafe(self.fetcher.fetch_transcript(video_id)).catch_unwind();

        match tokio::time::timeout(self.timeout, fetch).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(panic)) => Err(FetchError::Panicked(panic_message(panic.as_ref()))),
            Err(_) => Err(FetchError::Timeout(self.timeout)),
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
