//! Timestamp extraction from log lines.
//!
//! A log line is tested against an ordered table of grammars. Each grammar is
//! a regex locating a candidate substring plus a layout that parses it. The
//! first grammar whose pattern matches *and* whose layout parses the matched
//! text wins; a parse failure moves on to the next grammar.
//!
//! The order of [`GRAMMARS`] is significant and must not be re-sorted. In
//! particular the plain `YYYY-MM-DDTHH:MM:SS` grammar comes before the
//! offset and fractional-second variants, so for those lines it wins and the
//! offset/fraction is ignored.
//!
//! All instants are naive wall-clock values. Layouts that carry a zone (an
//! explicit offset, a trailing `Z`, or Unix epoch seconds) are normalised to
//! UTC first.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

/// How a matched substring is turned into an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// A `chrono` format with both date and time fields
    DateTime(&'static str),
    /// A `chrono` format with a date only; the instant is midnight
    Date(&'static str),
    /// A `chrono` format carrying a UTC offset
    OffsetDateTime(&'static str),
    /// Seconds since the Unix epoch
    EpochSeconds,
    /// `YYYYMMDD` with no separators
    CompactDate,
}

/// A named (pattern, layout) pair.
#[derive(Debug)]
pub struct DateGrammar {
    /// Short human name, e.g. `"YYYY-MM-DD HH:MM:SS"`
    pub name: &'static str,
    /// Locates the candidate substring anywhere in the line
    pub pattern: Regex,
    /// Parses the candidate substring
    pub layout: Layout,
}

impl DateGrammar {
    fn new(name: &'static str, pattern: &str, layout: Layout) -> Self {
        Self {
            name,
            pattern: compile(pattern),
            layout,
        }
    }

    /// Whether this grammar's pattern occurs anywhere in the line.
    pub fn is_match(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    /// Find and parse this grammar's timestamp in the line.
    ///
    /// Only the first occurrence of the pattern is considered.
    pub fn extract(&self, line: &str) -> Option<NaiveDateTime> {
        let found = self.pattern.find(line)?;
        parse_layout(found.as_str(), self.layout)
    }
}

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => panic!("built-in timestamp pattern {pattern:?} must compile: {err}"),
    }
}

/// The grammar table, in priority order.
pub static GRAMMARS: LazyLock<Vec<DateGrammar>> = LazyLock::new(|| {
    vec![
        DateGrammar::new(
            "YYYY-MM-DD HH:MM:SS",
            r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}",
            Layout::DateTime("%Y-%m-%d %H:%M:%S"),
        ),
        DateGrammar::new(
            "YYYY-MM-DDTHH:MM:SS",
            r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}",
            Layout::DateTime("%Y-%m-%dT%H:%M:%S"),
        ),
        DateGrammar::new(
            "YYYY-MM-DDTHH:MM:SS+HH:MM",
            r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}[+\-]\d{2}:\d{2}",
            Layout::OffsetDateTime("%Y-%m-%dT%H:%M:%S%:z"),
        ),
        DateGrammar::new(
            "YYYY-MM-DDTHH:MM:SS.ffffffZ",
            r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d+Z",
            Layout::DateTime("%Y-%m-%dT%H:%M:%S%.fZ"),
        ),
        DateGrammar::new("MM/DD/YYYY", r"\d{2}/\d{2}/\d{4}", Layout::Date("%m/%d/%Y")),
        DateGrammar::new("YYYY-MM-DD", r"\d{4}-\d{2}-\d{2}", Layout::Date("%Y-%m-%d")),
        DateGrammar::new("epoch seconds", r"\d{10}", Layout::EpochSeconds),
        DateGrammar::new(
            "Mon DD HH:MM:SS YYYY",
            r"[A-Za-z]{3} \d{2} \d{2}:\d{2}:\d{2} \d{4}",
            Layout::DateTime("%b %d %H:%M:%S %Y"),
        ),
        DateGrammar::new(
            "Dow Mon DD HH:MM:SS YYYY",
            r"[A-Za-z]{3} [A-Za-z]{3} \d{2} \d{2}:\d{2}:\d{2} \d{4}",
            Layout::DateTime("%a %b %d %H:%M:%S %Y"),
        ),
        DateGrammar::new("YYYYMMDD", r"\d{8}", Layout::CompactDate),
    ]
});

fn parse_layout(text: &str, layout: Layout) -> Option<NaiveDateTime> {
    match layout {
        Layout::DateTime(fmt) => NaiveDateTime::parse_from_str(text, fmt).ok(),
        Layout::Date(fmt) => NaiveDate::parse_from_str(text, fmt)
            .ok()?
            .and_hms_opt(0, 0, 0),
        Layout::OffsetDateTime(fmt) => DateTime::parse_from_str(text, fmt)
            .ok()
            .map(|dt| dt.naive_utc()),
        Layout::EpochSeconds => {
            let secs: i64 = text.parse().ok()?;
            DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
        }
        Layout::CompactDate => {
            if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let year: i32 = text[0..4].parse().ok()?;
            let month: u32 = text[4..6].parse().ok()?;
            let day: u32 = text[6..8].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
        }
    }
}

/// Extract the timestamp of a log line, if it has one.
///
/// Grammars are tried in [`GRAMMARS`] order; see the module docs.
///
/// # Example
///
/// ```rust
/// use logcleanerlib::extract_timestamp;
/// use chrono::NaiveDate;
///
/// let ts = extract_timestamp("2024-02-15 10:30:45 INFO Test").unwrap();
/// assert_eq!(ts, NaiveDate::from_ymd_opt(2024, 2, 15).unwrap().and_hms_opt(10, 30, 45).unwrap());
///
/// assert!(extract_timestamp("no date here").is_none());
/// ```
pub fn extract_timestamp(line: &str) -> Option<NaiveDateTime> {
    GRAMMARS.iter().find_map(|grammar| {
        let ts = grammar.extract(line);
        if ts.is_some() {
            tracing::trace!(grammar = grammar.name, "matched timestamp");
        }
        ts
    })
}

/// Whether any grammar pattern occurs in the line, parseable or not.
pub fn has_timestamp_pattern(line: &str) -> bool {
    GRAMMARS.iter().any(|grammar| grammar.is_match(line))
}
