//! DDI code composed of three numeric segments
//!
//! Stored on the expense as a plain string (`DDI-123-456-789`). Segments may
//! be left empty, which yields `DDI---`.

use std::fmt;

/// Prefix of every composed DDI code
pub const DDI_PREFIX: &str = "DDI";

/// Maximum digits accepted per segment
pub const SEGMENT_WIDTHS: [usize; 3] = [3, 3, 3];

/// Three-segment numeric identifier attached to an expense
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DdiCode {
    segments: [String; 3],
}

impl DdiCode {
    /// Create an empty code
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a code from three raw segment inputs, sanitizing each one
    pub fn from_segments(p1: &str, p2: &str, p3: &str) -> Self {
        let mut code = Self::new();
        code.set_segment(0, p1);
        code.set_segment(1, p2);
        code.set_segment(2, p3);
        code
    }

    /// Parse a user-typed code: `DDI-1-2-3`, `1-2-3` or `DDI---`
    pub fn parse(s: &str) -> Result<Self, DdiParseError> {
        let s = s.trim();
        let body = s
            .strip_prefix(DDI_PREFIX)
            .map(|rest| rest.strip_prefix('-').unwrap_or(rest))
            .unwrap_or(s);

        let parts: Vec<&str> = body.split('-').collect();
        if parts.len() != 3 {
            return Err(DdiParseError::SegmentCount(parts.len()));
        }

        for (idx, part) in parts.iter().enumerate() {
            if !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(DdiParseError::NonNumeric(idx + 1));
            }
            if part.len() > SEGMENT_WIDTHS[idx] {
                return Err(DdiParseError::TooLong(idx + 1));
            }
        }

        Ok(Self::from_segments(parts[0], parts[1], parts[2]))
    }

    /// Get one segment (0-based)
    pub fn segment(&self, index: usize) -> &str {
        self.segments.get(index).map(String::as_str).unwrap_or("")
    }

    /// Replace a segment with the digits of `input`, truncated to the
    /// segment's width. Returns true when the segment is now full.
    pub fn set_segment(&mut self, index: usize, input: &str) -> bool {
        let Some(width) = SEGMENT_WIDTHS.get(index).copied() else {
            return false;
        };
        let digits: String = input
            .chars()
            .filter(|c| c.is_ascii_digit())
            .take(width)
            .collect();
        let full = digits.len() == width;
        self.segments[index] = digits;
        full
    }

    /// True when no segment has any digit
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(String::is_empty)
    }
}

impl fmt::Display for DdiCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            DDI_PREFIX, self.segments[0], self.segments[1], self.segments[2]
        )
    }
}

/// Error type for DDI parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DdiParseError {
    SegmentCount(usize),
    NonNumeric(usize),
    TooLong(usize),
}

impl fmt::Display for DdiParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SegmentCount(n) => write!(f, "DDI code needs 3 segments, got {}", n),
            Self::NonNumeric(i) => write!(f, "DDI segment {} must contain only digits", i),
            Self::TooLong(i) => write!(
                f,
                "DDI segment {} is longer than {} digits",
                i,
                SEGMENT_WIDTHS[i - 1]
            ),
        }
    }
}

impl std::error::Error for DdiParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_code_format() {
        assert_eq!(DdiCode::new().to_string(), "DDI---");
        assert!(DdiCode::new().is_empty());
    }

    #[test]
    fn test_full_code_format() {
        let code = DdiCode::from_segments("123", "456", "789");
        assert_eq!(code.to_string(), "DDI-123-456-789");
    }

    #[test]
    fn test_set_segment_keeps_digits_and_caps_width() {
        let mut code = DdiCode::new();
        assert!(!code.set_segment(0, "1a2"));
        assert_eq!(code.segment(0), "12");

        assert!(code.set_segment(1, "98765"));
        assert_eq!(code.segment(1), "987");

        assert!(!code.set_segment(5, "1"));
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            DdiCode::parse("DDI-1-22-333").unwrap(),
            DdiCode::from_segments("1", "22", "333")
        );
        assert_eq!(
            DdiCode::parse("1-2-3").unwrap(),
            DdiCode::from_segments("1", "2", "3")
        );
        assert_eq!(DdiCode::parse("DDI---").unwrap(), DdiCode::new());
        assert_eq!(DdiCode::parse("1-2"), Err(DdiParseError::SegmentCount(2)));
        assert_eq!(DdiCode::parse("1-x-3"), Err(DdiParseError::NonNumeric(2)));
        assert_eq!(DdiCode::parse("1-2-3456"), Err(DdiParseError::TooLong(3)));
    }
}
