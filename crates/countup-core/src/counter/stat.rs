//! Counter targets
//!
//! Page content describes a statistic as display text such as `"150 000 m²"`;
//! the engine needs the integer and the trailing suffix separately.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::format::{display_width, format_with_spaces};

/// One animated statistic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatTarget {
    pub target: u64,
    pub suffix: Option<String>,
    pub label: String,
}

fn number_run() -> &'static Regex {
    static NUMBER_RUN: OnceLock<Regex> = OnceLock::new();
    // Digits plus the grouping characters people type between them
    NUMBER_RUN.get_or_init(|| Regex::new(r"[0-9][0-9\s.,]*").expect("static regex"))
}

impl StatTarget {
    pub fn new(target: u64, suffix: Option<String>, label: impl Into<String>) -> Self {
        Self {
            target,
            suffix: suffix.filter(|s| !s.trim().is_empty()),
            label: label.into(),
        }
    }

    /// Parse display text like `"120+"` or `"150 000 m²"`
    ///
    /// The first run of digits (with spaces, dots and commas between them)
    /// becomes the target; whatever text remains becomes the suffix. Text with
    /// no digits yields a zero target and keeps the text as suffix.
    pub fn parse(value: &str, label: impl Into<String>) -> Self {
        let Some(m) = number_run().find(value) else {
            return Self::new(0, Some(value.trim().to_string()), label);
        };

        let digits: String = m.as_str().chars().filter(|c| c.is_ascii_digit()).collect();
        // Overflowing digit runs saturate
        let target = digits.parse::<u64>().unwrap_or(u64::MAX);

        let mut rest = String::with_capacity(value.len());
        rest.push_str(&value[..m.start()]);
        rest.push_str(&value[m.end()..]);

        Self::new(target, Some(rest.trim().to_string()), label)
    }

    /// Build from a raw float, clamping negative and non-finite input to 0
    pub fn from_f64(raw: f64, suffix: Option<String>, label: impl Into<String>) -> Self {
        Self::new(sanitize_target(raw), suffix, label)
    }

    /// Column width reserved for the animated number
    pub fn width(&self) -> usize {
        display_width(self.target)
    }

    /// Final display text, e.g. `"150 000 m²"`
    pub fn display(&self) -> String {
        let number = format_with_spaces(self.target);
        match &self.suffix {
            Some(suffix) => format!("{number} {suffix}"),
            None => number,
        }
    }
}

/// Clamp a raw target into the counter's domain
pub fn sanitize_target(raw: f64) -> u64 {
    if !raw.is_finite() || raw <= 0.0 {
        0
    } else if raw >= u64::MAX as f64 {
        u64::MAX
    } else {
        raw.floor() as u64
    }
}
