use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

use crate::error::{MediaError, Result};
use crate::time::Rational;

/// Probe result reduced to what a trim session needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceProbe {
    pub path: PathBuf,
    pub duration_seconds: f64,
    pub video: VideoProbe,
    pub audio: Option<AudioProbe>,
}

/// Video stream facts: dimensions for frame decoding, frame rate for the
/// preview schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoProbe {
    pub width: u32,
    pub height: u32,
    pub frame_rate: Rational,
    pub time_base: Rational,
}

/// Audio stream facts carried through to the export encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioProbe {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Probes a media file via `ffprobe` JSON output.
///
/// # Example
/// ```no_run
/// use media_ffmpeg::probe_source;
///
/// let probe = probe_source("sample.mp4").expect("probe should succeed");
/// assert!(probe.duration_seconds > 0.0);
/// ```
pub fn probe_source(path: impl AsRef<Path>) -> Result<SourceProbe> {
    let path = path.as_ref();

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|source| MediaError::Io {
            context: "run ffprobe",
            source,
        })?;

    if !output.status.success() {
        return Err(MediaError::CommandFailed {
            command: format!("ffprobe {}", path.display()),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let stdout = String::from_utf8(output.stdout)?;
    reduce_probe_output(path, &stdout)
}

#[derive(Debug, Deserialize)]
struct RawProbe {
    #[serde(default)]
    streams: Vec<RawStream>,
    format: Option<RawFormat>,
}

#[derive(Debug, Deserialize)]
struct RawStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    time_base: Option<String>,
    sample_rate: Option<String>,
    channels: Option<u16>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    duration: Option<String>,
}

/// Reduces raw ffprobe JSON to a [`SourceProbe`].
///
/// Pure over the probe text so stream-shape handling is testable without a
/// media file on disk.
fn reduce_probe_output(path: &Path, json: &str) -> Result<SourceProbe> {
    let raw: RawProbe = serde_json::from_str(json)?;

    let video_raw = raw
        .streams
        .iter()
        .find(|stream| stream.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| MediaError::MissingVideoStream(path.to_path_buf()))?;

    let width = video_raw
        .width
        .ok_or_else(|| MediaError::MissingVideoDimensions(path.to_path_buf()))?;
    let height = video_raw
        .height
        .ok_or_else(|| MediaError::MissingVideoDimensions(path.to_path_buf()))?;

    let frame_rate = parse_frame_rate(video_raw)
        .ok_or_else(|| MediaError::MissingFrameRate(path.to_path_buf()))?;
    let time_base = match video_raw.time_base.as_deref() {
        Some(text) => Rational::parse(text)?,
        None => Rational::MICROS,
    };

    let audio = raw
        .streams
        .iter()
        .find(|stream| stream.codec_type.as_deref() == Some("audio"))
        .map(|stream| -> Result<AudioProbe> {
            let sample_rate = stream
                .sample_rate
                .as_deref()
                .and_then(|text| text.parse::<u32>().ok())
                .ok_or_else(|| MediaError::MissingAudioMetadata(path.to_path_buf()))?;
            let channels = stream
                .channels
                .ok_or_else(|| MediaError::MissingAudioMetadata(path.to_path_buf()))?;
            Ok(AudioProbe {
                sample_rate,
                channels,
            })
        })
        .transpose()?;

    let duration_seconds = duration_seconds(&raw, video_raw)
        .ok_or_else(|| MediaError::MissingDuration(path.to_path_buf()))?;

    Ok(SourceProbe {
        path: path.to_path_buf(),
        duration_seconds,
        video: VideoProbe {
            width,
            height,
            frame_rate,
            time_base,
        },
        audio,
    })
}

fn parse_frame_rate(stream: &RawStream) -> Option<Rational> {
    for candidate in [stream.r_frame_rate.as_deref(), stream.avg_frame_rate.as_deref()] {
        let Some(text) = candidate else {
            continue;
        };
        if text.is_empty() || text == "N/A" || text == "0/0" {
            continue;
        }
        if let Ok(rate) = Rational::parse(text) {
            return Some(rate);
        }
    }

    None
}

fn duration_seconds(raw: &RawProbe, video: &RawStream) -> Option<f64> {
    let format_duration = raw
        .format
        .as_ref()
        .and_then(|format| format.duration.as_deref())
        .and_then(parse_seconds);
    let stream_duration = video.duration.as_deref().and_then(parse_seconds);

    format_duration.or(stream_duration)
}

fn parse_seconds(text: &str) -> Option<f64> {
    let value = text.trim();
    if value.is_empty() || value == "N/A" {
        return None;
    }
    let seconds = value.parse::<f64>().ok()?;
    if seconds.is_finite() && seconds > 0.0 {
        Some(seconds)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::reduce_probe_output;
    use crate::error::MediaError;

    const AV_SAMPLE: &str = r#"{
        "streams": [
            {
                "index": 0,
                "codec_type": "video",
                "codec_name": "h264",
                "width": 160,
                "height": 90,
                "r_frame_rate": "30000/1001",
                "avg_frame_rate": "30000/1001",
                "time_base": "1/15360",
                "duration": "1.200000"
            },
            {
                "index": 1,
                "codec_type": "audio",
                "codec_name": "aac",
                "r_frame_rate": "0/0",
                "time_base": "1/48000",
                "sample_rate": "48000",
                "channels": 2
            }
        ],
        "format": { "duration": "1.234000" }
    }"#;

    #[test]
    fn reduces_av_sample_to_source_probe() {
        let probe =
            reduce_probe_output(Path::new("demo.mp4"), AV_SAMPLE).expect("probe should reduce");

        assert_eq!(probe.video.width, 160);
        assert_eq!(probe.video.height, 90);
        assert_eq!(probe.video.frame_rate.num, 30_000);
        assert_eq!(probe.video.frame_rate.den, 1_001);
        assert_eq!(probe.video.time_base.den, 15_360);
        assert!((probe.duration_seconds - 1.234).abs() < 1e-9);

        let audio = probe.audio.expect("audio probe exists");
        assert_eq!(audio.sample_rate, 48_000);
        assert_eq!(audio.channels, 2);
    }

    #[test]
    fn missing_video_stream_is_an_error() {
        let json = r#"{
            "streams": [
                { "codec_type": "audio", "time_base": "1/48000", "sample_rate": "48000", "channels": 2 }
            ],
            "format": { "duration": "2.0" }
        }"#;

        let result = reduce_probe_output(Path::new("audio-only.mp4"), json);
        assert!(matches!(result, Err(MediaError::MissingVideoStream(_))));
    }

    #[test]
    fn falls_back_to_avg_frame_rate_when_r_frame_rate_is_degenerate() {
        let json = r#"{
            "streams": [
                {
                    "codec_type": "video",
                    "width": 64,
                    "height": 64,
                    "r_frame_rate": "0/0",
                    "avg_frame_rate": "24/1",
                    "time_base": "1/12288"
                }
            ],
            "format": { "duration": "3.5" }
        }"#;

        let probe =
            reduce_probe_output(Path::new("demo.mp4"), json).expect("probe should reduce");
        assert_eq!(probe.video.frame_rate.num, 24);
        assert_eq!(probe.video.frame_rate.den, 1);
        assert!(probe.audio.is_none());
    }

    #[test]
    fn falls_back_to_stream_duration_when_format_duration_is_missing() {
        let json = r#"{
            "streams": [
                {
                    "codec_type": "video",
                    "width": 64,
                    "height": 64,
                    "r_frame_rate": "24/1",
                    "time_base": "1/12288",
                    "duration": "4.750000"
                }
            ]
        }"#;

        let probe =
            reduce_probe_output(Path::new("demo.mp4"), json).expect("probe should reduce");
        assert!((probe.duration_seconds - 4.75).abs() < 1e-9);
    }

    #[test]
    fn missing_duration_everywhere_is_an_error() {
        let json = r#"{
            "streams": [
                {
                    "codec_type": "video",
                    "width": 64,
                    "height": 64,
                    "r_frame_rate": "24/1",
                    "time_base": "1/12288"
                }
            ],
            "format": {}
        }"#;

        let result = reduce_probe_output(Path::new("demo.mp4"), json);
        assert!(matches!(result, Err(MediaError::MissingDuration(_))));
    }
}
