use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A `[start, end)` interval of the source timeline to excise, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalRange {
    pub start_ticks: i64,
    pub end_ticks: i64,
}

/// Ordered removal ranges under construction.
///
/// One added instant opens a pair and is held as pending; the next instant
/// completes the `(start, end)` range. The list keeps raw user input in
/// insertion order; clamping and overlap resolution happen when an export
/// plan is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkList {
    ranges: Vec<RemovalRange>,
    pending_start_ticks: Option<i64>,
}

impl MarkList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed removal ranges in insertion order.
    pub fn ranges(&self) -> &[RemovalRange] {
        &self.ranges
    }

    /// Start instant of a half-entered pair, if any.
    pub fn pending_start_ticks(&self) -> Option<i64> {
        self.pending_start_ticks
    }

    /// Records one instant: the first of a pair becomes pending, the second
    /// completes the range.
    pub fn add_instant(&mut self, ticks: i64) {
        match self.pending_start_ticks.take() {
            None => {
                self.pending_start_ticks = Some(ticks);
                debug!(ticks, "removal range start pending");
            }
            Some(start_ticks) => {
                self.ranges.push(RemovalRange {
                    start_ticks,
                    end_ticks: ticks,
                });
                debug!(
                    start_ticks,
                    end_ticks = ticks,
                    range_count = self.ranges.len(),
                    "removal range completed"
                );
            }
        }
    }
}

/// Normalizes raw removal ranges against the source duration: clamp to
/// `[0, duration]`, drop degenerate ranges, sort, and union overlaps.
///
/// Ranges always refer to the original source timeline, so removing one
/// range never shifts the meaning of the next.
///
/// # Example
/// ```
/// use engine::marks::{RemovalRange, normalize_ranges};
///
/// let raw = vec![
///     RemovalRange { start_ticks: 4_000_000, end_ticks: 6_000_000 },
///     RemovalRange { start_ticks: 1_000_000, end_ticks: 5_000_000 },
/// ];
/// let normalized = normalize_ranges(&raw, 10_000_000);
/// assert_eq!(normalized.len(), 1);
/// assert_eq!(normalized[0].start_ticks, 1_000_000);
/// assert_eq!(normalized[0].end_ticks, 6_000_000);
/// ```
pub fn normalize_ranges(ranges: &[RemovalRange], duration_ticks: i64) -> Vec<RemovalRange> {
    let mut clamped = Vec::with_capacity(ranges.len());
    for range in ranges {
        let start_ticks = range.start_ticks.clamp(0, duration_ticks);
        let end_ticks = range.end_ticks.clamp(0, duration_ticks);
        if end_ticks <= start_ticks {
            warn!(
                start_ticks = range.start_ticks,
                end_ticks = range.end_ticks,
                duration_ticks,
                "dropping degenerate removal range"
            );
            continue;
        }
        clamped.push(RemovalRange {
            start_ticks,
            end_ticks,
        });
    }

    clamped.sort_by_key(|range| (range.start_ticks, range.end_ticks));

    let mut merged: Vec<RemovalRange> = Vec::with_capacity(clamped.len());
    for range in clamped {
        match merged.last_mut() {
            Some(last) if range.start_ticks <= last.end_ticks => {
                last.end_ticks = last.end_ticks.max(range.end_ticks);
            }
            _ => merged.push(range),
        }
    }

    merged
}
