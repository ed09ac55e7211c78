use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;
use crate::export::ExportPlan;
use crate::time::{Rational, ticks_from_seconds};

/// Raw RGBA preview frame payload handed to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFrame {
    pub width: u32,
    pub height: u32,
    pub bytes: Arc<[u8]>,
}

/// Facts about the opened video, established once by probing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub path: PathBuf,
    pub duration_ticks: i64,
    pub frame_rate: Rational,
    pub width: u32,
    pub height: u32,
    pub audio: Option<AudioInfo>,
}

/// Audio stream parameters reused as export encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioInfo {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Media operations required by the engine.
pub trait MediaBackend {
    /// Probes source facts for open.
    fn probe(&self, path: &Path) -> Result<SourceInfo>;

    /// Decodes one preview frame at-or-after `at_seconds`.
    fn decode_preview_frame(&self, source: &SourceInfo, at_seconds: f64) -> Result<PreviewFrame>;

    /// Renders the export plan into the output file.
    fn export(&self, plan: &ExportPlan) -> Result<()>;
}

/// FFmpeg CLI-backed backend used by production wiring.
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegMediaBackend;

impl MediaBackend for FfmpegMediaBackend {
    fn probe(&self, path: &Path) -> Result<SourceInfo> {
        let probe = media_ffmpeg::probe_source(path)?;

        Ok(SourceInfo {
            path: probe.path,
            duration_ticks: ticks_from_seconds(probe.duration_seconds).max(1),
            frame_rate: probe.video.frame_rate.into(),
            width: probe.video.width,
            height: probe.video.height,
            audio: probe.audio.map(|audio| AudioInfo {
                sample_rate: audio.sample_rate,
                channels: audio.channels,
            }),
        })
    }

    fn decode_preview_frame(&self, source: &SourceInfo, at_seconds: f64) -> Result<PreviewFrame> {
        let decoded =
            media_ffmpeg::decode_rgba_frame(&source.path, at_seconds, source.width, source.height)?;
        Ok(PreviewFrame {
            width: decoded.width,
            height: decoded.height,
            bytes: decoded.bytes.into(),
        })
    }

    fn export(&self, plan: &ExportPlan) -> Result<()> {
        let request = media_ffmpeg::TrimExportRequest {
            input: plan.input.clone(),
            keep_windows: plan
                .keep_windows
                .iter()
                .map(|window| media_ffmpeg::KeepWindow {
                    start_ticks: window.start_ticks,
                    end_ticks: window.end_ticks,
                })
                .collect(),
            audio: plan.audio.map(|audio| media_ffmpeg::AudioExportSettings {
                sample_rate: audio.sample_rate,
                channels: audio.channels,
            }),
            output_path: plan.output_path.clone(),
        };
        media_ffmpeg::export_keep_windows(&request)?;
        Ok(())
    }
}
