use tracing::debug;

use crate::time::{Rational, TIMELINE_TIME_BASE, rescale};

/// Preview playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Running,
}

/// Frame-stepping preview player.
///
/// The cursor is a frame index in `[0, total_frames)` advanced once per
/// tick and wrapped at the end. The player owns no timer: the host schedules
/// ticks at [`PreviewPlayer::tick_interval_ms`], which keeps cursor
/// arithmetic testable without a clock or a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewPlayer {
    frame_rate: Rational,
    total_frames: i64,
    cursor: i64,
    state: PlaybackState,
}

impl PreviewPlayer {
    /// Creates a stopped player for a source of the given duration.
    pub fn new(frame_rate: Rational, duration_ticks: i64) -> Self {
        Self {
            frame_rate,
            total_frames: total_frame_count(frame_rate, duration_ticks),
            cursor: 0,
            state: PlaybackState::Stopped,
        }
    }

    /// Starts playback from the first frame.
    pub fn start(&mut self) {
        self.cursor = 0;
        self.state = PlaybackState::Running;
        debug!(total_frames = self.total_frames, "preview started");
    }

    /// Stops playback; the cursor keeps its position.
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        debug!(cursor = self.cursor, "preview stopped");
    }

    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    /// Current frame index.
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn total_frames(&self) -> i64 {
        self.total_frames
    }

    /// Source timestamp of the frame under the cursor, in ticks.
    pub fn cursor_ticks(&self) -> i64 {
        let frame_duration = Rational {
            num: self.frame_rate.den,
            den: self.frame_rate.num,
        };
        rescale(self.cursor, frame_duration, TIMELINE_TIME_BASE)
    }

    /// Milliseconds between preview frames: `round(1000 / fps)`, floored at 1.
    pub fn tick_interval_ms(&self) -> u64 {
        let num = i128::from(self.frame_rate.num);
        let interval = (1_000 * i128::from(self.frame_rate.den) + num / 2) / num;
        interval.max(1) as u64
    }

    /// Advances the cursor one frame, wrapping back to the first frame at
    /// the end of the source.
    pub fn advance(&mut self) {
        self.cursor += 1;
        if self.cursor >= self.total_frames {
            self.cursor = 0;
        }
    }
}

fn total_frame_count(frame_rate: Rational, duration_ticks: i64) -> i64 {
    // floor(duration_seconds * fps)
    let frames = i128::from(duration_ticks.max(0)) * i128::from(frame_rate.num)
        / (i128::from(frame_rate.den) * i128::from(TIMELINE_TIME_BASE.den));
    (frames as i64).max(1)
}
