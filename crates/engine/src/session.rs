use crate::api::SessionSnapshot;
use crate::marks::MarkList;
use crate::media::SourceInfo;
use crate::player::PreviewPlayer;

/// Editing state for one opened video: the probed source facts, the removal
/// marks entered so far, and the preview player. Replaced wholesale when a
/// new video is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub source: SourceInfo,
    pub marks: MarkList,
    pub player: PreviewPlayer,
}

impl Session {
    /// Builds a session for a freshly probed source and starts the preview.
    pub fn open(source: SourceInfo) -> Self {
        let mut player = PreviewPlayer::new(source.frame_rate, source.duration_ticks);
        player.start();

        Self {
            source,
            marks: MarkList::new(),
            player,
        }
    }

    /// Creates an immutable snapshot for the UI.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            path: self.source.path.clone(),
            duration_ticks: self.source.duration_ticks,
            frame_rate: self.source.frame_rate,
            width: self.source.width,
            height: self.source.height,
            total_frames: self.player.total_frames(),
            tick_interval_ms: self.player.tick_interval_ms(),
            ranges: self.marks.ranges().to_vec(),
            pending_mark_ticks: self.marks.pending_start_ticks(),
            playing: self.player.is_running(),
        }
    }
}
