use std::path::PathBuf;

use tracing::warn;

use crate::error::{EngineError, Result};
use crate::marks::{RemovalRange, normalize_ranges};
use crate::media::AudioInfo;
use crate::session::Session;

/// Export plan: the parts of the source that survive trimming, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPlan {
    pub input: PathBuf,
    pub keep_windows: Vec<KeepWindow>,
    pub audio: Option<AudioInfo>,
    pub output_path: PathBuf,
}

/// One `[start, end)` window of the source to keep, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepWindow {
    pub start_ticks: i64,
    pub end_ticks: i64,
}

/// Builds the export plan for the current session.
///
/// Removal ranges are normalized against the source duration and the keep
/// windows are their complement over `[0, duration]`. An empty mark list
/// therefore yields a single window spanning the whole source; marks that
/// cover everything fail with [`EngineError::NothingToExport`].
pub fn build_export_plan(session: &Session, output_path: PathBuf) -> Result<ExportPlan> {
    if session.marks.pending_start_ticks().is_some() {
        warn!("pending removal mark has no end and is ignored by export");
    }

    let duration_ticks = session.source.duration_ticks;
    let normalized = normalize_ranges(session.marks.ranges(), duration_ticks);
    let keep_windows = complement_windows(&normalized, duration_ticks);
    if keep_windows.is_empty() {
        return Err(EngineError::NothingToExport);
    }

    Ok(ExportPlan {
        input: session.source.path.clone(),
        keep_windows,
        audio: session.source.audio,
        output_path,
    })
}

fn complement_windows(removals: &[RemovalRange], duration_ticks: i64) -> Vec<KeepWindow> {
    let mut windows = Vec::with_capacity(removals.len() + 1);
    let mut cursor = 0_i64;
    for removal in removals {
        if removal.start_ticks > cursor {
            windows.push(KeepWindow {
                start_ticks: cursor,
                end_ticks: removal.start_ticks,
            });
        }
        cursor = cursor.max(removal.end_ticks);
    }
    if cursor < duration_ticks {
        windows.push(KeepWindow {
            start_ticks: cursor,
            end_ticks: duration_ticks,
        });
    }

    windows
}
