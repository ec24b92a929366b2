//! Runtime configuration for the receipt parser and dashboard
//!
//! All tables are optional in TOML; missing keys take the defaults below.
//!
//! ```toml
//! [parser]
//! plausible_floor = 100
//! plausible_ceiling = 1000000
//! keyword_matching = "compound_only"
//!
//! [dashboard]
//! recent_count = 5
//! trend_months = 6
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::{LedgerError, LedgerResult};

/// Fallback amounts must be strictly greater than this
pub const DEFAULT_PLAUSIBLE_FLOOR: u64 = 100;

/// Fallback amounts must be strictly less than this
pub const DEFAULT_PLAUSIBLE_CEILING: u64 = 1_000_000;

/// A title candidate needs strictly more characters than this
pub const DEFAULT_MIN_TITLE_CHARS: usize = 2;

/// Words marking a line as carrying the receipt total.
///
/// `合` and `計` are listed on their own as well as inside `合計`, so any line
/// containing either character counts as a total-line.
pub const DEFAULT_TOTAL_KEYWORDS: [&str; 6] = ["合計", "合", "計", "小計", "お買上", "支払"];

/// OCR language tag passed to the recognition engine
pub const DEFAULT_OCR_LANGUAGE: &str = "jpn";

/// How total keywords are matched against a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordMatching {
    /// Every keyword is a substring test, single characters included
    #[default]
    Broad,
    /// Single-character keywords are ignored
    CompoundOnly,
}

/// Tunables for the receipt text parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub total_keywords: Vec<String>,
    pub keyword_matching: KeywordMatching,
    pub plausible_floor: u64,
    pub plausible_ceiling: u64,
    pub min_title_chars: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            total_keywords: DEFAULT_TOTAL_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            keyword_matching: KeywordMatching::default(),
            plausible_floor: DEFAULT_PLAUSIBLE_FLOOR,
            plausible_ceiling: DEFAULT_PLAUSIBLE_CEILING,
            min_title_chars: DEFAULT_MIN_TITLE_CHARS,
        }
    }
}

impl ParserConfig {
    /// Check the band and keyword list are usable
    pub fn validate(&self) -> LedgerResult<()> {
        if self.plausible_floor >= self.plausible_ceiling {
            return Err(LedgerError::Config(format!(
                "plausible_floor ({}) must be below plausible_ceiling ({})",
                self.plausible_floor, self.plausible_ceiling
            )));
        }

        if self.active_keywords().next().is_none() {
            return Err(LedgerError::Config(
                "at least one total keyword is required".to_string(),
            ));
        }

        Ok(())
    }

    /// Keywords that take part in total-line detection under the current mode
    pub fn active_keywords(&self) -> impl Iterator<Item = &str> {
        let matching = self.keyword_matching;
        self.total_keywords
            .iter()
            .map(String::as_str)
            .filter(move |k| match matching {
                KeywordMatching::Broad => !k.is_empty(),
                KeywordMatching::CompoundOnly => k.chars().count() > 1,
            })
    }

    /// Whether `n` falls inside the fallback plausibility band
    pub fn is_plausible(&self, n: u64) -> bool {
        n > self.plausible_floor && n < self.plausible_ceiling
    }
}

/// Dashboard presentation knobs that affect computed data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// How many transactions the recent list shows
    pub recent_count: usize,
    /// How many months the trend series covers
    pub trend_months: u32,
    /// Language tag handed to the OCR engine
    pub ocr_language: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_count: 5,
            trend_months: 6,
            ocr_language: DEFAULT_OCR_LANGUAGE.to_string(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub parser: ParserConfig,
    pub dashboard: DashboardConfig,
}

impl LedgerConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(raw: &str) -> LedgerResult<Self> {
        let config: LedgerConfig =
            toml::from_str(raw).map_err(|e| LedgerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file
    pub fn load(path: &Path) -> LedgerResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            LedgerError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.display(), "loaded ledger config");
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> LedgerResult<()> {
        self.parser.validate()?;

        if self.dashboard.trend_months == 0 {
            return Err(LedgerError::Config(
                "trend_months must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.parser.plausible_floor, 100);
        assert_eq!(config.parser.plausible_ceiling, 1_000_000);
        assert_eq!(config.parser.min_title_chars, 2);
        assert_eq!(config.parser.keyword_matching, KeywordMatching::Broad);
        assert_eq!(config.dashboard.recent_count, 5);
        assert_eq!(config.dashboard.trend_months, 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_plausibility_band_is_exclusive() {
        let config = ParserConfig::default();
        assert!(!config.is_plausible(99));
        assert!(!config.is_plausible(100));
        assert!(config.is_plausible(101));
        assert!(config.is_plausible(999_999));
        assert!(!config.is_plausible(1_000_000));
    }

    #[test]
    fn test_compound_only_drops_single_characters() {
        let config = ParserConfig {
            keyword_matching: KeywordMatching::CompoundOnly,
            ..ParserConfig::default()
        };
        let active: Vec<&str> = config.active_keywords().collect();
        assert_eq!(active, vec!["合計", "小計", "お買上", "支払"]);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = LedgerConfig::from_toml_str(
            r#"
            [parser]
            plausible_ceiling = 50000
            keyword_matching = "compound_only"

            [dashboard]
            trend_months = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.parser.plausible_floor, 100);
        assert_eq!(config.parser.plausible_ceiling, 50000);
        assert_eq!(config.parser.keyword_matching, KeywordMatching::CompoundOnly);
        assert_eq!(config.parser.total_keywords.len(), 6);
        assert_eq!(config.dashboard.trend_months, 12);
        assert_eq!(config.dashboard.recent_count, 5);
    }

    #[test]
    fn test_invalid_band_rejected() {
        let result = LedgerConfig::from_toml_str(
            r#"
            [parser]
            plausible_floor = 500
            plausible_ceiling = 500
            "#,
        );
        assert!(matches!(result, Err(LedgerError::Config(_))));
    }

    #[test]
    fn test_empty_keywords_rejected() {
        let config = ParserConfig {
            total_keywords: vec!["合".to_string()],
            keyword_matching: KeywordMatching::CompoundOnly,
            ..ParserConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let result = LedgerConfig::from_toml_str("[parser\nplausible_floor = ");
        assert!(matches!(result, Err(LedgerError::Config(_))));
    }
}
