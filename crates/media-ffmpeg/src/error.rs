use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, MediaError>;

/// Error type for probing/decoding/exporting backed by the FFmpeg CLI tools.
#[derive(Debug)]
pub enum MediaError {
    InvalidRational {
        num: i32,
        den: i32,
    },
    InvalidTimestampSeconds(f64),
    MissingVideoStream(PathBuf),
    MissingVideoDimensions(PathBuf),
    MissingFrameRate(PathBuf),
    MissingDuration(PathBuf),
    MissingAudioMetadata(PathBuf),
    InvalidExportRequest {
        reason: &'static str,
    },
    Io {
        context: &'static str,
        source: std::io::Error,
    },
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    Utf8(std::string::FromUtf8Error),
    ProbeJson(serde_json::Error),
    Parse {
        context: &'static str,
        value: String,
    },
    UnexpectedFrameSize {
        expected: usize,
        actual: usize,
    },
}

impl Display for MediaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRational { num, den } => {
                write!(f, "invalid rational {num}/{den}")
            }
            Self::InvalidTimestampSeconds(value) => {
                write!(f, "invalid timestamp seconds: {value}")
            }
            Self::MissingVideoStream(path) => {
                write!(f, "video stream not found: {}", path.display())
            }
            Self::MissingVideoDimensions(path) => {
                write!(f, "video dimensions missing: {}", path.display())
            }
            Self::MissingFrameRate(path) => {
                write!(f, "video frame rate missing: {}", path.display())
            }
            Self::MissingDuration(path) => {
                write!(f, "media duration missing: {}", path.display())
            }
            Self::MissingAudioMetadata(path) => {
                write!(f, "audio metadata missing: {}", path.display())
            }
            Self::InvalidExportRequest { reason } => {
                write!(f, "invalid export request: {reason}")
            }
            Self::Io { context, source } => {
                write!(f, "{context}: {source}")
            }
            Self::CommandFailed {
                command,
                status,
                stderr,
            } => {
                write!(
                    f,
                    "command failed ({status}): {command}; stderr: {}",
                    stderr.trim()
                )
            }
            Self::Utf8(err) => write!(f, "utf8 decode error: {err}"),
            Self::ProbeJson(err) => write!(f, "ffprobe json decode error: {err}"),
            Self::Parse { context, value } => {
                write!(f, "parse error ({context}): {value}")
            }
            Self::UnexpectedFrameSize { expected, actual } => {
                write!(
                    f,
                    "unexpected decoded frame size: expected {expected} bytes, got {actual}"
                )
            }
        }
    }
}

impl std::error::Error for MediaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Utf8(err) => Some(err),
            Self::ProbeJson(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::string::FromUtf8Error> for MediaError {
    fn from(value: std::string::FromUtf8Error) -> Self {
        Self::Utf8(value)
    }
}

impl From<serde_json::Error> for MediaError {
    fn from(value: serde_json::Error) -> Self {
        Self::ProbeJson(value)
    }
}
