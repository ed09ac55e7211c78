use crate::error::{MediaError, Result};

/// Rational value used for frame rates and stream time bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    pub num: i32,
    pub den: i32,
}

impl Rational {
    /// Microsecond time base `(1 / 1_000_000)`.
    pub const MICROS: Self = Self {
        num: 1,
        den: 1_000_000,
    };

    /// Creates a validated rational value.
    ///
    /// # Example
    /// ```
    /// use media_ffmpeg::Rational;
    ///
    /// let fps = Rational::new(30_000, 1_001).expect("valid");
    /// assert_eq!(fps.den, 1_001);
    /// ```
    pub fn new(num: i32, den: i32) -> Result<Self> {
        if num <= 0 || den <= 0 {
            return Err(MediaError::InvalidRational { num, den });
        }

        Ok(Self { num, den })
    }

    /// Parses a `num/den` text, as printed by ffprobe, into a rational.
    ///
    /// # Example
    /// ```
    /// use media_ffmpeg::Rational;
    ///
    /// let tb = Rational::parse("1/15360").expect("valid");
    /// assert_eq!(tb.den, 15360);
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let (num, den) = input.split_once('/').ok_or_else(|| MediaError::Parse {
            context: "rational",
            value: input.to_string(),
        })?;
        let num = parse_i32(num, "rational num")?;
        let den = parse_i32(den, "rational den")?;
        Self::new(num, den)
    }
}

/// Formats microsecond ticks as exact decimal seconds for ffmpeg filter
/// arguments, e.g. `2_500_000` becomes `"2.500000"`.
pub fn format_ticks_as_seconds(ticks: i64) -> String {
    if ticks < 0 {
        // Filters never see negative positions; keep the text well formed anyway.
        return format!("-{}", format_ticks_as_seconds(ticks.saturating_abs()));
    }

    format!("{}.{:06}", ticks / 1_000_000, ticks % 1_000_000)
}

fn parse_i32(value: &str, context: &'static str) -> Result<i32> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| MediaError::Parse {
            context,
            value: value.to_string(),
        })
}
