//! Rule-based interpretation of OCR receipt text
//!
//! Three independent extractions run over the same text:
//!
//! - **date**: first `YYYY?M?D` pattern anywhere in the text, otherwise today
//! - **amount**: largest number on a total-line, otherwise the largest number
//!   in the plausibility band, otherwise absent
//! - **title**: first line long enough that carries no digits or date/price
//!   punctuation, otherwise absent
//!
//! None of them can fail; a field with no usable signal is left empty so the
//! caller keeps whatever the form already holds.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ParserConfig;
use crate::traits::{Clock, SystemClock};

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]{4})\s?[/\-.年]\s?([0-9]{1,2})\s?[/\-.月]\s?([0-9]{1,2})")
        .expect("valid date pattern")
});

static AMOUNT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[¥￥]?\s?([0-9,]+)").expect("valid amount pattern"));

/// Best-effort structured guess extracted from one receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedReceipt {
    /// `YYYY-MM-DD`; always populated, falling back to the scan date
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Yen; never `Some(0)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
}

impl ParsedReceipt {
    /// The date as a calendar date, if the extracted digits form a real one
    pub fn naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

/// Receipt text parser with tunable thresholds and an injectable clock
pub struct ReceiptParser {
    config: ParserConfig,
    clock: Box<dyn Clock>,
}

impl Default for ReceiptParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl ReceiptParser {
    /// Create a parser that falls back to the system date
    pub fn new(config: ParserConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    /// Create a parser with a custom source of "today"
    pub fn with_clock(config: ParserConfig, clock: Box<dyn Clock>) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Interpret raw OCR text
    pub fn parse(&self, raw_text: &str) -> ParsedReceipt {
        let parsed = ParsedReceipt {
            date: self.extract_date(raw_text),
            title: self.extract_title(raw_text),
            amount: self.extract_amount(raw_text),
        };

        tracing::debug!(
            date = %parsed.date,
            title = ?parsed.title,
            amount = ?parsed.amount,
            "parsed receipt text"
        );

        parsed
    }

    /// Date found in the text, or today's date
    pub fn extract_date(&self, text: &str) -> String {
        find_date(text).unwrap_or_else(|| self.clock.today().format("%Y-%m-%d").to_string())
    }

    /// Total amount, preferring numbers on total-lines
    pub fn extract_amount(&self, text: &str) -> Option<u64> {
        let mut max_amount = 0;
        let mut found_total_line = false;

        for line in text.lines().filter(|line| self.is_total_line(line)) {
            for n in numeric_runs(line) {
                if n > max_amount {
                    max_amount = n;
                    found_total_line = true;
                }
            }
        }

        if !found_total_line || max_amount == 0 {
            max_amount = numeric_runs(text)
                .filter(|n| self.config.is_plausible(*n))
                .fold(max_amount, u64::max);
        }

        (max_amount > 0).then_some(max_amount)
    }

    /// First line that looks like a name rather than a number or date
    pub fn extract_title(&self, text: &str) -> Option<String> {
        text.lines()
            .map(str::trim)
            .find(|line| {
                line.chars().count() > self.config.min_title_chars
                    && !line
                        .chars()
                        .any(|c| c.is_ascii_digit() || matches!(c, '/' | '-' | '.'))
            })
            .map(str::to_string)
    }

    /// Whether a line carries one of the total keywords, ignoring whitespace
    pub fn is_total_line(&self, line: &str) -> bool {
        let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        self.config
            .active_keywords()
            .any(|keyword| compact.contains(keyword))
    }
}

/// Parse with default thresholds and the system clock
pub fn parse_receipt_text(raw_text: &str) -> ParsedReceipt {
    ReceiptParser::default().parse(raw_text)
}

fn find_date(text: &str) -> Option<String> {
    let caps = DATE_PATTERN.captures(text)?;
    Some(format!("{}-{:0>2}-{:0>2}", &caps[1], &caps[2], &caps[3]))
}

/// Every digit/comma run in `text` as an integer; runs that are only commas
/// or overflow are skipped
fn numeric_runs(text: &str) -> impl Iterator<Item = u64> + '_ {
    AMOUNT_PATTERN.captures_iter(text).filter_map(|caps| {
        let digits: String = caps[1].chars().filter(|c| *c != ',').collect();
        digits.parse::<u64>().ok()
    })
}
