mod decode;
mod error;
mod mux;
mod probe;
mod time;

pub use decode::{RgbaFrame, decode_rgba_frame};
pub use error::{MediaError, Result};
pub use mux::{AudioExportSettings, KeepWindow, TrimExportRequest, export_keep_windows};
pub use probe::{AudioProbe, SourceProbe, VideoProbe, probe_source};
pub use time::{Rational, format_ticks_as_seconds};
