use std::path::PathBuf;
use std::process::Command;

use media_ffmpeg::{
    AudioExportSettings, KeepWindow, TrimExportRequest, export_keep_windows, probe_source,
};

fn ffmpeg_available() -> bool {
    Command::new("ffmpeg").arg("-version").output().is_ok()
        && Command::new("ffprobe").arg("-version").output().is_ok()
}

fn make_sample_video() -> PathBuf {
    let output = std::env::temp_dir().join(format!(
        "vtrim-export-{}-{}.mp4",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system clock must be after unix epoch")
            .as_nanos()
    ));

    let status = Command::new("ffmpeg")
        .args([
            "-y",
            "-v",
            "error",
            "-f",
            "lavfi",
            "-i",
            "testsrc=size=160x90:rate=30",
            "-f",
            "lavfi",
            "-i",
            "sine=frequency=440:sample_rate=48000",
            "-t",
            "2.0",
            "-pix_fmt",
            "yuv420p",
        ])
        .arg(&output)
        .output()
        .expect("ffmpeg must run");

    assert!(
        status.status.success(),
        "ffmpeg command must succeed: {}",
        String::from_utf8_lossy(&status.stderr)
    );
    output
}

fn output_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "vtrim-export-out-{tag}-{}-{}.mp4",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system clock must be after unix epoch")
            .as_nanos()
    ))
}

#[test]
fn export_concatenates_keep_windows_and_drops_the_gap() {
    if !ffmpeg_available() {
        eprintln!("skipping: ffmpeg/ffprobe not installed");
        return;
    }
    let sample = make_sample_video();
    let out = output_path("gap");

    let request = TrimExportRequest {
        input: sample,
        keep_windows: vec![
            KeepWindow {
                start_ticks: 0,
                end_ticks: 500_000,
            },
            KeepWindow {
                start_ticks: 1_000_000,
                end_ticks: 2_000_000,
            },
        ],
        audio: Some(AudioExportSettings {
            sample_rate: 48_000,
            channels: 1,
        }),
        output_path: out.clone(),
    };

    export_keep_windows(&request).expect("export should succeed");

    let probe = probe_source(&out).expect("output probe should succeed");
    assert!(
        (probe.duration_seconds - 1.5).abs() < 0.3,
        "expected roughly 1.5s output, got {}",
        probe.duration_seconds
    );
}

#[test]
fn export_of_a_single_full_window_keeps_input_duration() {
    if !ffmpeg_available() {
        eprintln!("skipping: ffmpeg/ffprobe not installed");
        return;
    }
    let sample = make_sample_video();
    let out = output_path("full");

    let request = TrimExportRequest {
        input: sample,
        keep_windows: vec![KeepWindow {
            start_ticks: 0,
            end_ticks: 2_000_000,
        }],
        audio: None,
        output_path: out.clone(),
    };

    export_keep_windows(&request).expect("export should succeed");

    let probe = probe_source(&out).expect("output probe should succeed");
    assert!(
        (probe.duration_seconds - 2.0).abs() < 0.3,
        "expected roughly 2.0s output, got {}",
        probe.duration_seconds
    );
}
