use std::fmt::{Display, Formatter};

/// Result type used by the engine crate.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors produced by engine commands and trim-session operations.
#[derive(Debug)]
pub enum EngineError {
    SourceNotLoaded,
    InvalidTimestamp {
        text: String,
    },
    NothingToExport,
    InvalidRational {
        num: i32,
        den: i32,
    },
    Media(media_ffmpeg::MediaError),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceNotLoaded => write!(f, "no video is loaded"),
            Self::InvalidTimestamp { text } => {
                write!(f, "timestamp is not HH:MM:SS:mmm: {text:?}")
            }
            Self::NothingToExport => {
                write!(f, "removal ranges cover the whole video, nothing to export")
            }
            Self::InvalidRational { num, den } => write!(f, "invalid rational {num}/{den}"),
            Self::Media(err) => write!(f, "media backend error: {err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Media(err) => Some(err),
            _ => None,
        }
    }
}

impl From<media_ffmpeg::MediaError> for EngineError {
    fn from(value: media_ffmpeg::MediaError) -> Self {
        Self::Media(value)
    }
}
