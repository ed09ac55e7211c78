use std::path::Path;
use std::process::Command;

use crate::error::{MediaError, Result};

/// A decoded video frame in row-major RGBA bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaFrame {
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Decodes the first video frame at-or-after `at_seconds`.
///
/// `width`/`height` come from a prior probe; the decoded payload must match
/// them exactly, which guards against pixel-format or stream surprises.
///
/// # Example
/// ```no_run
/// use media_ffmpeg::decode_rgba_frame;
///
/// let frame = decode_rgba_frame("sample.mp4", 0.5, 160, 90).expect("decode should succeed");
/// assert_eq!(frame.bytes.len(), 160 * 90 * 4);
/// ```
pub fn decode_rgba_frame(
    path: impl AsRef<Path>,
    at_seconds: f64,
    width: u32,
    height: u32,
) -> Result<RgbaFrame> {
    if !at_seconds.is_finite() || at_seconds < 0.0 {
        return Err(MediaError::InvalidTimestampSeconds(at_seconds));
    }

    let path = path.as_ref();
    let output = Command::new("ffmpeg")
        .args(["-hide_banner", "-v", "error"])
        .arg("-ss")
        .arg(format!("{at_seconds:.6}"))
        .arg("-i")
        .arg(path)
        .args(["-frames:v", "1", "-f", "rawvideo", "-pix_fmt", "rgba", "-"])
        .output()
        .map_err(|source| MediaError::Io {
            context: "run ffmpeg decode frame",
            source,
        })?;

    if !output.status.success() {
        return Err(MediaError::CommandFailed {
            command: format!("ffmpeg decode frame {}", path.display()),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let expected = width as usize * height as usize * 4;
    if output.stdout.len() != expected {
        return Err(MediaError::UnexpectedFrameSize {
            expected,
            actual: output.stdout.len(),
        });
    }

    Ok(RgbaFrame {
        width,
        height,
        bytes: output.stdout,
    })
}
