//! Schedule parsing
//!
//! This module turns free-text schedule strings into computable intervals.
//! The text is scanned for the first time-range pattern (two `H` / `H:MM` /
//! `HH:MM` tokens joined by a connector word or hyphen); when no range is
//! found, a keyword scan assigns a coarse shift bucket instead.
//!
//! Hours are taken as local wall-clock values and are not validated against
//! 0-23 beyond the two-digit constraint of the pattern, and intervals whose
//! end precedes their start are kept as-is.

use crate::config::InferenceConfig;
use crate::types::{ClockTime, ScheduleInterval, ShiftCategory};
use regex::{Captures, Regex};

/// Shifts starting in [5,13) are morning shifts
pub const MORNING_START_HOUR: u32 = 5;
/// Shifts starting in [13,21) are afternoon shifts
pub const AFTERNOON_START_HOUR: u32 = 13;
/// Shifts starting in [21,24) (or before 5) are night shifts
pub const NIGHT_START_HOUR: u32 = 21;

/// Shift label used when neither a time range nor a keyword matched
pub const UNDEFINED_SHIFT_LABEL: &str = "VARIABLE/NOT DEFINED";

/// Time-range pattern: `H[:MM] <connector> H[:MM]`, applied to the upper-cased
/// text. Connectors cover "06:00 A 14:00", "6-14", "9 TO 17", "8 AND 16".
const RANGE_PATTERN: &str = r"(\d{1,2})(?::(\d{2}))?\s*(?:TO|AND|A|Y|-)\s*(\d{1,2})(?::(\d{2}))?";

/// Parser for free-text schedule strings
pub struct ScheduleParser {
    range_pattern: Regex,
    morning_keywords: Vec<String>,
    afternoon_keywords: Vec<String>,
    night_keywords: Vec<String>,
}

impl Default for ScheduleParser {
    fn default() -> Self {
        Self::new(&InferenceConfig::default())
    }
}

impl ScheduleParser {
    /// Create a parser with the given keyword tables
    pub fn new(config: &InferenceConfig) -> Self {
        let lower = |keywords: &[String]| -> Vec<String> {
            keywords.iter().map(|k| k.to_lowercase()).collect()
        };

        Self {
            range_pattern: Regex::new(RANGE_PATTERN).expect("time-range pattern compiles"),
            morning_keywords: lower(&config.morning_keywords),
            afternoon_keywords: lower(&config.afternoon_keywords),
            night_keywords: lower(&config.night_keywords),
        }
    }

    /// Extract the first time range from the schedule text.
    ///
    /// Returns `None` for empty text or text without a recognizable range.
    /// Additional ranges after the first are ignored.
    pub fn parse_interval(&self, text: &str) -> Option<ScheduleInterval> {
        if text.trim().is_empty() {
            return None;
        }

        let upper = text.to_uppercase();
        let caps = self.range_pattern.captures(&upper)?;

        let start = ClockTime {
            hour: capture_num(&caps, 1),
            minute: capture_num(&caps, 2),
        };
        let end = ClockTime {
            hour: capture_num(&caps, 3),
            minute: capture_num(&caps, 4),
        };

        Some(ScheduleInterval {
            start,
            end,
            category: classify_start_hour(start.hour),
            matched_text: caps[0].to_string(),
        })
    }

    /// Fallback classification for text without a parseable time range
    pub fn keyword_shift(&self, text: &str) -> Option<ShiftCategory> {
        let lower = text.to_lowercase();

        if self.morning_keywords.iter().any(|k| lower.contains(k)) {
            return Some(ShiftCategory::Morning);
        }
        if self.afternoon_keywords.iter().any(|k| lower.contains(k)) {
            return Some(ShiftCategory::Afternoon);
        }
        if self.night_keywords.iter().any(|k| lower.contains(k)) {
            return Some(ShiftCategory::Night);
        }

        None
    }

    /// Resolve the shift label for a record: parsed interval first, then
    /// keyword fallback, then the undefined label
    pub fn shift_label(&self, text: &str, interval: Option<&ScheduleInterval>) -> String {
        if let Some(interval) = interval {
            return interval.category.as_str().to_string();
        }

        match self.keyword_shift(text) {
            Some(category) => category.as_str().to_string(),
            None => UNDEFINED_SHIFT_LABEL.to_string(),
        }
    }
}

/// Classify a shift bucket from the start hour alone
pub fn classify_start_hour(hour: u32) -> ShiftCategory {
    if (MORNING_START_HOUR..AFTERNOON_START_HOUR).contains(&hour) {
        ShiftCategory::Morning
    } else if (AFTERNOON_START_HOUR..NIGHT_START_HOUR).contains(&hour) {
        ShiftCategory::Afternoon
    } else {
        ShiftCategory::Night
    }
}

fn capture_num(caps: &Captures, idx: usize) -> u32 {
    caps.get(idx)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_range_with_day_prefix() {
        let parser = ScheduleParser::default();
        let interval = parser.parse_interval("L A V DE 06:00 A 14:00").unwrap();

        assert_eq!(interval.matched_text, "06:00 A 14:00");
        assert_eq!(interval.start, ClockTime { hour: 6, minute: 0 });
        assert_eq!(interval.end, ClockTime { hour: 14, minute: 0 });
        assert_eq!(interval.category, ShiftCategory::Morning);
    }

    #[test]
    fn test_bare_hours_with_hyphen() {
        let parser = ScheduleParser::default();
        let interval = parser.parse_interval("6-14").unwrap();

        assert_eq!(interval.start, ClockTime { hour: 6, minute: 0 });
        assert_eq!(interval.end, ClockTime { hour: 14, minute: 0 });
        assert_eq!(interval.matched_text, "6-14");
    }

    #[test]
    fn test_english_connectors() {
        let parser = ScheduleParser::default();

        let interval = parser.parse_interval("9 to 17").unwrap();
        assert_eq!(interval.start.hour, 9);
        assert_eq!(interval.end.hour, 17);

        let interval = parser.parse_interval("8 and 16:30").unwrap();
        assert_eq!(interval.end, ClockTime { hour: 16, minute: 30 });
    }

    #[test]
    fn test_first_range_wins() {
        let parser = ScheduleParser::default();
        let interval = parser.parse_interval("06:00 A 14:00 / 22:00 A 06:00").unwrap();
        assert_eq!(interval.matched_text, "06:00 A 14:00");
    }

    #[test]
    fn test_night_shift_by_start_hour() {
        let parser = ScheduleParser::default();
        let interval = parser.parse_interval("22:00 A 06:00").unwrap();

        assert_eq!(interval.category, ShiftCategory::Night);
        // Overnight interval is kept as-is: end precedes start numerically
        assert!(interval.end.minutes_since_midnight() < interval.start.minutes_since_midnight());
    }

    #[test]
    fn test_afternoon_boundaries() {
        assert_eq!(classify_start_hour(13), ShiftCategory::Afternoon);
        assert_eq!(classify_start_hour(20), ShiftCategory::Afternoon);
        assert_eq!(classify_start_hour(21), ShiftCategory::Night);
        assert_eq!(classify_start_hour(5), ShiftCategory::Morning);
        assert_eq!(classify_start_hour(12), ShiftCategory::Morning);
        assert_eq!(classify_start_hour(4), ShiftCategory::Night);
        assert_eq!(classify_start_hour(0), ShiftCategory::Night);
    }

    #[test]
    fn test_out_of_range_hour_is_accepted() {
        let parser = ScheduleParser::default();
        let interval = parser.parse_interval("25:00 A 26:00").unwrap();
        assert_eq!(interval.start.hour, 25);
        assert_eq!(interval.category, ShiftCategory::Night);
    }

    #[test]
    fn test_no_range_falls_back_to_keywords() {
        let parser = ScheduleParser::default();

        assert!(parser.parse_interval("rotating morning shift").is_none());
        assert_eq!(
            parser.keyword_shift("rotating morning shift"),
            Some(ShiftCategory::Morning)
        );
        assert_eq!(
            parser.keyword_shift("starts at 15:00"),
            Some(ShiftCategory::Afternoon)
        );
        assert_eq!(parser.keyword_shift("night rounds"), Some(ShiftCategory::Night));
    }

    #[test]
    fn test_empty_and_undefined_text() {
        let parser = ScheduleParser::default();

        assert!(parser.parse_interval("").is_none());
        assert!(parser.parse_interval("NOT DEFINED").is_none());
        assert_eq!(parser.keyword_shift("NOT DEFINED"), None);
        assert_eq!(parser.shift_label("NOT DEFINED", None), UNDEFINED_SHIFT_LABEL);
    }

    #[test]
    fn test_shift_label_prefers_interval() {
        let parser = ScheduleParser::default();
        let interval = parser.parse_interval("14:00 A 22:00");
        assert_eq!(parser.shift_label("14:00 A 22:00", interval.as_ref()), "AFTERNOON");
    }

    #[test]
    fn test_custom_keywords() {
        let config = InferenceConfig {
            night_keywords: vec!["graveyard".to_string()],
            ..Default::default()
        };
        let parser = ScheduleParser::new(&config);

        assert_eq!(
            parser.keyword_shift("graveyard rotation"),
            Some(ShiftCategory::Night)
        );
        assert_eq!(parser.keyword_shift("night rounds"), None);
    }
}
