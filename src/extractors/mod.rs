use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod youtube;

/// A single timed caption record as returned by an upstream source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    /// Caption text
    pub text: String,

    /// Start offset in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

impl TranscriptRecord {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// Coarse grouping of upstream failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The video exists but has no usable caption track
    NoTranscript,
    /// The video itself cannot be reached
    VideoUnreachable,
    /// Anything else: transport, blocking, invalid ids, internal faults
    Unclassified,
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchErrorKind::NoTranscript => write!(f, "no_transcript"),
            FetchErrorKind::VideoUnreachable => write!(f, "video_unreachable"),
            FetchErrorKind::Unclassified => write!(f, "unclassified"),
        }
    }
}

/// Failures reported by a transcript source
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("No transcript found for {video_id} in languages {requested:?}")]
    NoTranscriptFound {
        video_id: String,
        requested: Vec<String>,
    },

    #[error("Transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("Video {video_id} is unavailable: {reason}")]
    VideoUnavailable { video_id: String, reason: String },

    #[error("Video {video_id} is unplayable: {reason}")]
    VideoUnplayable { video_id: String, reason: String },

    #[error("Video {0} is age restricted")]
    AgeRestricted(String),

    #[error("Invalid video id (expected an id, not a URL): {0}")]
    InvalidVideoId(String),

    #[error("Could not retrieve transcript for {video_id}: {message}")]
    Upstream { video_id: String, message: String },

    #[error("Lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transcript source panicked: {0}")]
    Panicked(String),
}

impl FetchError {
    /// Map every variant onto its kind. No wildcard arm: a new variant must be placed explicitly.
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::NoTranscriptFound { .. } | FetchError::TranscriptsDisabled(_) => {
                FetchErrorKind::NoTranscript
            }
            FetchError::VideoUnavailable { .. }
            | FetchError::VideoUnplayable { .. }
            | FetchError::AgeRestricted(_) => FetchErrorKind::VideoUnreachable,
            FetchError::InvalidVideoId(_)
            | FetchError::Upstream { .. }
            | FetchError::Timeout(_)
            | FetchError::Panicked(_) => FetchErrorKind::Unclassified,
        }
    }
}

/// Trait for fetching transcripts from an upstream source
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    /// Fetch the default transcript for a video, records in caption order
    async fn fetch_transcript(
        &self,
        video_id: &str,
    ) -> std::result::Result<Vec<TranscriptRecord>, FetchError>;

    /// Get the name of this source
    fn source_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_groups_content_absence() {
        let err = FetchError::NoTranscriptFound {
            video_id: "abc".into(),
            requested: vec!["en".into()],
        };
        assert_eq!(err.kind(), FetchErrorKind::NoTranscript);
        assert_eq!(
            FetchError::TranscriptsDisabled("abc".into()).kind(),
            FetchErrorKind::NoTranscript
        );
    }

    #[test]
    fn test_kind_groups_unreachable_videos() {
        let unavailable = FetchError::VideoUnavailable {
            video_id: "abc".into(),
            reason: "This video is private".into(),
        };
        assert_eq!(unavailable.kind(), FetchErrorKind::VideoUnreachable);
        assert_eq!(
            FetchError::AgeRestricted("abc".into()).kind(),
            FetchErrorKind::VideoUnreachable
        );
    }

    #[test]
    fn test_kind_unclassified() {
        assert_eq!(
            FetchError::InvalidVideoId("https://youtu.be/abc".into()).kind(),
            FetchErrorKind::Unclassified
        );
        assert_eq!(
            FetchError::Timeout(Duration::from_secs(1)).kind(),
            FetchErrorKind::Unclassified
        );
        assert_eq!(
            FetchError::Upstream {
                video_id: "abc".into(),
                message: "Too many requests".into(),
            }
            .kind(),
            FetchErrorKind::Unclassified
        );
    }
}
