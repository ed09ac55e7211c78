use crate::error::{EngineError, Result};

/// Parses a `HH:MM:SS:mmm` text into timeline ticks.
///
/// The text must split into exactly four colon-separated integer fields.
/// Components are not bounds-checked: `00:90:00:000` is ninety minutes and
/// negative components subtract, mirroring the plain arithmetic of
/// `H*3600 + M*60 + S + ms/1000`. Arithmetic is checked so absurd values
/// fail instead of wrapping.
///
/// # Example
/// ```
/// use engine::parse_timestamp;
///
/// assert_eq!(parse_timestamp("00:00:02:000").expect("valid"), 2_000_000);
/// assert_eq!(parse_timestamp("01:02:03:004").expect("valid"), 3_723_004_000);
/// assert!(parse_timestamp("1:2:3").is_err());
/// ```
pub fn parse_timestamp(text: &str) -> Result<i64> {
    let invalid = || EngineError::InvalidTimestamp {
        text: text.to_string(),
    };

    let mut fields = [0_i64; 4];
    let mut count = 0_usize;
    for part in text.split(':') {
        if count == fields.len() {
            return Err(invalid());
        }
        fields[count] = part.trim().parse::<i64>().map_err(|_| invalid())?;
        count += 1;
    }
    if count != fields.len() {
        return Err(invalid());
    }

    let [hours, minutes, seconds, millis] = fields;
    let total_seconds = hours
        .checked_mul(3_600)
        .and_then(|acc| acc.checked_add(minutes.checked_mul(60)?))
        .and_then(|acc| acc.checked_add(seconds))
        .ok_or_else(|| invalid())?;
    let total_millis = total_seconds
        .checked_mul(1_000)
        .and_then(|acc| acc.checked_add(millis))
        .ok_or_else(|| invalid())?;

    total_millis.checked_mul(1_000).ok_or_else(|| invalid())
}
