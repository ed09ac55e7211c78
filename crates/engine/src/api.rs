use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::cache::PreviewFrameCache;
use crate::error::{EngineError, Result};
use crate::export::build_export_plan;
use crate::marks::RemovalRange;
use crate::media::{FfmpegMediaBackend, MediaBackend, PreviewFrame};
use crate::session::Session;
use crate::time::{Rational, seconds_from_ticks};
use crate::timestamp::parse_timestamp;

const PREVIEW_CACHE_CAPACITY: usize = 96;

/// Commands accepted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Probes `path` and starts a fresh trim session with a running preview.
    Open { path: PathBuf },
    /// Parses `text` as `HH:MM:SS:mmm` and records the instant: the first of
    /// a pair is pending, the second completes a removal range.
    AddMark { text: String },
    /// Advances the preview by one frame and emits it. No-op while no video
    /// is open or the preview is stopped.
    PreviewTick,
    /// Stops the preview without exporting. The save flow issues this before
    /// prompting for a destination, so a cancelled dialog still leaves the
    /// preview stopped.
    StopPreview,
    /// Stops the preview if needed and renders the trimmed video to `path`.
    Export { path: PathBuf },
}

/// Events emitted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SourceLoaded(SessionSnapshot),
    MarksChanged(SessionSnapshot),
    PreviewFrameReady {
        frame_index: i64,
        t_ticks: i64,
        frame: PreviewFrame,
    },
    PreviewStopped,
    ExportFinished {
        path: PathBuf,
    },
    Error(EngineErrorEvent),
}

/// User-facing error classification emitted as an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineErrorKind {
    InvalidTimestamp,
    NothingToExport,
    Other,
}

impl From<&EngineError> for EngineErrorKind {
    fn from(value: &EngineError) -> Self {
        match value {
            EngineError::InvalidTimestamp { .. } => Self::InvalidTimestamp,
            EngineError::NothingToExport => Self::NothingToExport,
            _ => Self::Other,
        }
    }
}

/// User-facing error payload emitted as an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineErrorEvent {
    pub kind: EngineErrorKind,
    pub message: String,
}

impl EngineErrorEvent {
    pub fn from_error(error: &EngineError) -> Self {
        Self {
            kind: EngineErrorKind::from(error),
            message: error.to_string(),
        }
    }
}

/// Immutable session snapshot consumed by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub path: PathBuf,
    pub duration_ticks: i64,
    pub frame_rate: Rational,
    pub width: u32,
    pub height: u32,
    pub total_frames: i64,
    pub tick_interval_ms: u64,
    pub ranges: Vec<RemovalRange>,
    pub pending_mark_ticks: Option<i64>,
    pub playing: bool,
}

/// Engine implementation for open/mark/preview/export commands.
#[derive(Debug)]
pub struct Engine<M> {
    media: M,
    session: Option<Session>,
    frame_cache: PreviewFrameCache,
}

impl<M> Engine<M>
where
    M: MediaBackend,
{
    /// Creates a new engine with the provided media backend.
    ///
    /// # Example
    /// ```no_run
    /// use engine::{Engine, FfmpegMediaBackend};
    ///
    /// let _engine = Engine::new(FfmpegMediaBackend);
    /// ```
    pub fn new(media: M) -> Self {
        Self {
            media,
            session: None,
            frame_cache: PreviewFrameCache::new(PREVIEW_CACHE_CAPACITY),
        }
    }

    /// Applies one command and returns emitted events.
    pub fn handle_command(&mut self, command: Command) -> Result<Vec<Event>> {
        match command {
            Command::Open { path } => self.open(path),
            Command::AddMark { text } => self.add_mark(&text),
            Command::PreviewTick => self.preview_tick(),
            Command::StopPreview => self.stop_preview(),
            Command::Export { path } => self.export(path),
        }
    }

    fn open(&mut self, path: PathBuf) -> Result<Vec<Event>> {
        let source = self.media.probe(&path)?;
        info!(
            path = ?source.path,
            duration_ticks = source.duration_ticks,
            fps_num = source.frame_rate.num,
            fps_den = source.frame_rate.den,
            "source loaded"
        );

        let session = Session::open(source);
        let snapshot = session.snapshot();
        self.session = Some(session);
        self.frame_cache.clear();

        Ok(vec![Event::SourceLoaded(snapshot)])
    }

    fn add_mark(&mut self, text: &str) -> Result<Vec<Event>> {
        let session = self.session.as_mut().ok_or(EngineError::SourceNotLoaded)?;
        let ticks = parse_timestamp(text)?;
        session.marks.add_instant(ticks);
        info!(
            ticks,
            range_count = session.marks.ranges().len(),
            pending = session.marks.pending_start_ticks().is_some(),
            "mark added"
        );

        Ok(vec![Event::MarksChanged(session.snapshot())])
    }

    fn preview_tick(&mut self) -> Result<Vec<Event>> {
        let Some(session) = self.session.as_mut() else {
            return Ok(Vec::new());
        };
        if !session.player.is_running() {
            return Ok(Vec::new());
        }

        let frame_index = session.player.cursor();
        let t_ticks = session.player.cursor_ticks();

        let frame = match self.frame_cache.get(&session.source.path, frame_index) {
            Some(frame) => {
                debug!(frame_index, "preview cache hit");
                frame
            }
            None => {
                debug!(frame_index, t_ticks, "preview cache miss");
                let decoded = self
                    .media
                    .decode_preview_frame(&session.source, seconds_from_ticks(t_ticks))?;
                self.frame_cache
                    .insert(&session.source.path, frame_index, decoded.clone());
                decoded
            }
        };

        session.player.advance();

        Ok(vec![Event::PreviewFrameReady {
            frame_index,
            t_ticks,
            frame,
        }])
    }

    fn stop_preview(&mut self) -> Result<Vec<Event>> {
        let Some(session) = self.session.as_mut() else {
            return Ok(Vec::new());
        };
        if !session.player.is_running() {
            return Ok(Vec::new());
        }

        session.player.stop();
        Ok(vec![Event::PreviewStopped])
    }

    fn export(&mut self, path: PathBuf) -> Result<Vec<Event>> {
        let session = self.session.as_mut().ok_or(EngineError::SourceNotLoaded)?;
        let mut events = Vec::new();
        if session.player.is_running() {
            session.player.stop();
            events.push(Event::PreviewStopped);
        }

        let outcome = build_export_plan(session, path.clone()).and_then(|plan| {
            info!(
                window_count = plan.keep_windows.len(),
                output = ?plan.output_path,
                "export plan built"
            );
            self.media.export(&plan)
        });

        match outcome {
            Ok(()) => {
                info!(path = ?path, "export finished");
                events.push(Event::ExportFinished { path });
            }
            Err(error) => {
                warn!(%error, "export failed");
                events.push(Event::Error(EngineErrorEvent::from_error(&error)));
            }
        }

        Ok(events)
    }
}

impl Engine<FfmpegMediaBackend> {
    /// Creates an engine wired to the FFmpeg backend.
    pub fn with_ffmpeg() -> Self {
        Self::new(FfmpegMediaBackend)
    }
}
