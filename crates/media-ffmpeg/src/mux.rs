use std::path::PathBuf;
use std::process::Command;

use crate::error::{MediaError, Result};
use crate::time::format_ticks_as_seconds;

/// Request payload for a keep-window MP4 export.
///
/// Windows are the parts of the single input that survive trimming, in
/// output order, expressed in microsecond ticks of the source timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimExportRequest {
    pub input: PathBuf,
    pub keep_windows: Vec<KeepWindow>,
    pub audio: Option<AudioExportSettings>,
    pub output_path: PathBuf,
}

/// One half-open `[start, end)` window of the source to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepWindow {
    pub start_ticks: i64,
    pub end_ticks: i64,
}

/// Audio output settings used when the source carries audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioExportSettings {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Exports the keep windows into an MP4 by decode -> trim -> concat -> encode.
pub fn export_keep_windows(request: &TrimExportRequest) -> Result<()> {
    validate_request(request)?;
    let filter_complex = build_filter_complex(request);
    let has_audio = request.audio.is_some();
    let output_video_label = if request.keep_windows.len() == 1 {
        "[v0]"
    } else {
        "[vout]"
    };
    let output_audio_label = if has_audio {
        Some(if request.keep_windows.len() == 1 {
            "[a0]"
        } else {
            "[aout]"
        })
    } else {
        None
    };

    let mut command = Command::new("ffmpeg");
    command.args(["-hide_banner", "-v", "error", "-y"]);
    command.arg("-i").arg(&request.input);

    command
        .arg("-filter_complex")
        .arg(filter_complex)
        .arg("-map")
        .arg(output_video_label)
        .args(["-c:v", "libx264", "-pix_fmt", "yuv420p"]);

    if let (Some(audio), Some(output_audio_label)) = (request.audio.as_ref(), output_audio_label) {
        command
            .arg("-map")
            .arg(output_audio_label)
            .args(["-c:a", "aac", "-ar"])
            .arg(audio.sample_rate.to_string())
            .arg("-ac")
            .arg(audio.channels.to_string());
    } else {
        command.arg("-an");
    }

    command.arg(&request.output_path);

    let output = command.output().map_err(|source| MediaError::Io {
        context: "run ffmpeg export",
        source,
    })?;
    if !output.status.success() {
        return Err(MediaError::CommandFailed {
            command: format!("ffmpeg export {}", request.output_path.display()),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}

fn build_filter_complex(request: &TrimExportRequest) -> String {
    let has_audio = request.audio.is_some();
    let mut chains = Vec::<String>::with_capacity(request.keep_windows.len() * 2 + 1);
    for (index, window) in request.keep_windows.iter().enumerate() {
        let start = format_ticks_as_seconds(window.start_ticks);
        let end = format_ticks_as_seconds(window.end_ticks);

        chains.push(format!(
            "[0:v:0]trim=start={start}:end={end},setpts=PTS-STARTPTS[v{index}]"
        ));

        if has_audio {
            let audio = request
                .audio
                .expect("audio settings must exist when audio export is enabled");
            let layout = channel_layout_for_channels(audio.channels)
                .expect("audio channels must map to a channel layout");
            chains.push(format!(
                "[0:a:0]atrim=start={start}:end={end},asetpts=PTS-STARTPTS,aresample={rate}:async=1:first_pts=0,aformat=sample_rates={rate}:channel_layouts={layout}[a{index}]",
                rate = audio.sample_rate,
            ));
        }
    }

    if request.keep_windows.len() > 1 {
        let mut concat_inputs = String::new();
        for index in 0..request.keep_windows.len() {
            if has_audio {
                concat_inputs.push_str(&format!("[v{index}][a{index}]"));
            } else {
                concat_inputs.push_str(&format!("[v{index}]"));
            }
        }
        if has_audio {
            chains.push(format!(
                "{concat_inputs}concat=n={}:v=1:a=1[vout][aout]",
                request.keep_windows.len()
            ));
        } else {
            chains.push(format!(
                "{concat_inputs}concat=n={}:v=1:a=0[vout]",
                request.keep_windows.len()
            ));
        }
    }

    chains.join(";")
}

fn validate_request(request: &TrimExportRequest) -> Result<()> {
    if request.keep_windows.is_empty() {
        return Err(MediaError::InvalidExportRequest {
            reason: "keep windows are empty",
        });
    }

    for window in &request.keep_windows {
        if window.start_ticks < 0 {
            return Err(MediaError::InvalidExportRequest {
                reason: "keep window starts before zero",
            });
        }
        if window.end_ticks <= window.start_ticks {
            return Err(MediaError::InvalidExportRequest {
                reason: "keep window is not positive",
            });
        }
    }

    if let Some(audio) = request.audio {
        if audio.sample_rate == 0 {
            return Err(MediaError::InvalidExportRequest {
                reason: "audio sample rate must be positive",
            });
        }
        if audio.channels == 0 {
            return Err(MediaError::InvalidExportRequest {
                reason: "audio channels must be positive",
            });
        }
        if channel_layout_for_channels(audio.channels).is_none() {
            return Err(MediaError::InvalidExportRequest {
                reason: "audio channel layout is unsupported",
            });
        }
    }

    Ok(())
}

fn channel_layout_for_channels(channels: u16) -> Option<&'static str> {
    match channels {
        1 => Some("mono"),
        2 => Some("stereo"),
        3 => Some("2.1"),
        4 => Some("quad"),
        5 => Some("5.0"),
        6 => Some("5.1"),
        7 => Some("6.1"),
        8 => Some("7.1"),
        _ => None,
    }
}
