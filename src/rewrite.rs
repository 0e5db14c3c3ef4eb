//! In-place buffer rewriting
//!
//! The engine never writes while it scans. It records the byte ranges that must disappear from
//! the output, and the caller applies them to the buffer once the scan is over. Applying a
//! range replaces every byte with a space except `\r` and `\n`, so the buffer keeps its length
//! and its line structure.

use std::ops::Range;

/// Ordered, coalesced byte ranges to blank
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blanks {
    ranges: Vec<Range<usize>>,
}

impl Blanks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a range. Ranges arrive in scan order; one that touches the previous range is
    /// merged into it.
    pub fn push(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        if let Some(last) = self.ranges.last_mut() {
            if range.start <= last.end {
                last.end = last.end.max(range.end);
                return;
            }
        }
        self.ranges.push(range);
    }

    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Blank every recorded range of `buffer`. Ranges past the buffer end are clipped.
    pub fn apply(&self, buffer: &mut [u8]) {
        for range in &self.ranges {
            let end = range.end.min(buffer.len());
            let start = range.start.min(end);
            blank(&mut buffer[start..end]);
        }
    }
}

/// Replace every byte with a space, keeping line breaks.
pub fn blank(region: &mut [u8]) {
    for byte in region.iter_mut() {
        if *byte != b'\r' && *byte != b'\n' {
            *byte = b' ';
        }
    }
}
