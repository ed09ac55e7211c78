//! UI-agnostic trim session engine for the VTrim desktop app.

pub mod api;
pub mod cache;
pub mod error;
pub mod export;
pub mod marks;
pub mod media;
pub mod player;
pub mod session;
pub mod time;
pub mod timestamp;

pub use api::{
    Command, Engine, EngineErrorEvent, EngineErrorKind, Event, SessionSnapshot,
};
pub use error::{EngineError, Result};
pub use export::{ExportPlan, KeepWindow, build_export_plan};
pub use marks::{MarkList, RemovalRange};
pub use media::{AudioInfo, FfmpegMediaBackend, MediaBackend, PreviewFrame, SourceInfo};
pub use player::{PlaybackState, PreviewPlayer};
pub use session::Session;
pub use time::{Rational, TIMELINE_TIME_BASE, rescale, seconds_from_ticks, ticks_from_seconds};
pub use timestamp::parse_timestamp;
