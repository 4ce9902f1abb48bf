//! Error types for sound lookup and playback.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

use crate::category::Category;

#[derive(Debug, Error)]
pub enum SoundError {
    #[error("invalid audio type '{name}' (valid types: {valid})", valid = Category::names().join(", "))]
    InvalidCategory { name: String },

    #[error("no audio files found for '{category}'")]
    NoCandidates { category: Category },

    /// Raised by selection when the caller has no category at hand.
    #[error("no audio files to choose from")]
    EmptySelection,

    #[error(transparent)]
    Playback(#[from] PlaybackError),
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("audio file missing: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("player '{program}' not found")]
    NotFound { program: String },

    #[error("player '{program}' exited with {status}")]
    ExitStatus { program: String, status: ExitStatus },

    #[error("player '{program}' timed out after {secs}s", secs = .timeout.as_secs_f32())]
    Timeout { program: String, timeout: Duration },

    #[error("player '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("all players failed: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    AllFailed(Vec<PlaybackError>),

    #[error("no player commands configured")]
    NoPlayers,
}

impl PlaybackError {
    /// Whether a player chain may move on to its next command after this error.
    pub fn allows_fallback(&self) -> bool {
        matches!(self, PlaybackError::NotFound { .. } | PlaybackError::ExitStatus { .. })
    }
}
