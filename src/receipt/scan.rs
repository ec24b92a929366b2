//! Receipt scan flow: OCR engine first, then the text parser

use async_trait::async_trait;

use crate::config::{LedgerConfig, DEFAULT_OCR_LANGUAGE};
use crate::receipt::draft::TransactionDraft;
use crate::receipt::parser::{ParsedReceipt, ReceiptParser};

/// Status string engines report while text recognition is running
pub const RECOGNIZING_TEXT: &str = "recognizing text";

/// Incremental progress report from an OCR engine
#[derive(Debug, Clone, PartialEq)]
pub struct OcrProgress {
    pub status: String,
    /// Fraction done, `0.0..=1.0`
    pub progress: f32,
}

impl OcrProgress {
    pub fn new(status: impl Into<String>, progress: f32) -> Self {
        Self {
            status: status.into(),
            progress,
        }
    }

    /// Progress as a whole percentage, clamped to 0-100
    pub fn percent(&self) -> u32 {
        (self.progress.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

/// Errors raised by an OCR engine
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR engine failed: {0}")]
    Engine(String),
    #[error("OCR was cancelled")]
    Cancelled,
}

/// Errors from a receipt scan
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("receipt image is empty")]
    EmptyImage,
    #[error(transparent)]
    Ocr(#[from] OcrError),
}

/// External optical character recognition engine
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize text in an encoded image, reporting progress as it goes
    async fn recognize(
        &self,
        image: &[u8],
        language: &str,
        progress: &(dyn Fn(OcrProgress) + Send + Sync),
    ) -> Result<String, OcrError>;
}

/// Runs OCR on a receipt image and interprets the resulting text
pub struct ReceiptScanner<E: OcrEngine> {
    engine: E,
    parser: ReceiptParser,
    language: String,
}

impl<E: OcrEngine> ReceiptScanner<E> {
    /// Create a scanner with the default parser and Japanese language tag
    pub fn new(engine: E) -> Self {
        Self::with_parser(engine, ReceiptParser::default())
    }

    /// Create a scanner with a custom parser
    pub fn with_parser(engine: E, parser: ReceiptParser) -> Self {
        Self {
            engine,
            parser,
            language: DEFAULT_OCR_LANGUAGE.to_string(),
        }
    }

    /// Create a scanner from loaded configuration, using the system clock
    pub fn from_config(engine: E, config: &LedgerConfig) -> Self {
        Self::with_parser(engine, ReceiptParser::new(config.parser.clone()))
            .language(config.dashboard.ocr_language.clone())
    }

    /// Override the language tag handed to the engine
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Recognize and parse one receipt image
    ///
    /// The parser only runs once recognition has succeeded; an engine error
    /// is returned as-is and nothing is parsed.
    pub async fn scan(&self, image: &[u8]) -> Result<ParsedReceipt, ScanError> {
        if image.is_empty() {
            return Err(ScanError::EmptyImage);
        }

        tracing::info!(bytes = image.len(), language = %self.language, "scanning receipt");

        let report = |p: OcrProgress| {
            if p.status == RECOGNIZING_TEXT {
                tracing::debug!(percent = p.percent(), "recognizing receipt text");
            }
        };

        let text = match self.engine.recognize(image, &self.language, &report).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "receipt OCR failed");
                return Err(e.into());
            }
        };

        tracing::debug!(text = %text, "OCR result");

        let parsed = self.parser.parse(&text);
        tracing::info!(
            date = %parsed.date,
            has_title = parsed.title.is_some(),
            has_amount = parsed.amount.is_some(),
            "receipt scan complete"
        );
        Ok(parsed)
    }

    /// Scan an image and prefill `draft` with whatever was found
    pub async fn scan_into(
        &self,
        image: &[u8],
        draft: &mut TransactionDraft,
    ) -> Result<ParsedReceipt, ScanError> {
        let parsed = self.scan(image).await?;
        draft.apply_receipt(&parsed);
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::traits::FixedClock;
    use crate::types::TransactionKind;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedEngine {
        text: String,
        calls: AtomicUsize,
        languages: Mutex<Vec<String>>,
    }

    impl ScriptedEngine {
        fn new(text: &str) -> Self {
            Self {
                text: text.to_string(),
                calls: AtomicUsize::new(0),
                languages: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl OcrEngine for ScriptedEngine {
        async fn recognize(
            &self,
            _image: &[u8],
            language: &str,
            progress: &(dyn Fn(OcrProgress) + Send + Sync),
        ) -> Result<String, OcrError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.languages.lock().unwrap().push(language.to_string());
            progress(OcrProgress::new("loading language traineddata", 1.0));
            progress(OcrProgress::new(RECOGNIZING_TEXT, 0.5));
            progress(OcrProgress::new(RECOGNIZING_TEXT, 1.0));
            Ok(self.text.clone())
        }
    }

    struct BrokenEngine;

    #[async_trait]
    impl OcrEngine for BrokenEngine {
        async fn recognize(
            &self,
            _image: &[u8],
            _language: &str,
            _progress: &(dyn Fn(OcrProgress) + Send + Sync),
        ) -> Result<String, OcrError> {
            Err(OcrError::Engine("worker crashed".to_string()))
        }
    }

    fn fixed_parser() -> ReceiptParser {
        ReceiptParser::with_clock(
            ParserConfig::default(),
            Box::new(FixedClock(NaiveDate::from_ymd_opt(2025, 6, 14).unwrap())),
        )
    }

    #[tokio::test]
    async fn test_scan_parses_recognized_text() {
        let engine = ScriptedEngine::new("ローソン\n2025/06/10\n合計 ¥1,480");
        let scanner = ReceiptScanner::with_parser(engine, fixed_parser());

        let parsed = scanner.scan(b"jpeg bytes").await.unwrap();
        assert_eq!(parsed.date, "2025-06-10");
        assert_eq!(parsed.title.as_deref(), Some("ローソン"));
        assert_eq!(parsed.amount, Some(1480));
        assert_eq!(scanner.engine.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*scanner.engine.languages.lock().unwrap(), vec!["jpn"]);
    }

    #[tokio::test]
    async fn test_empty_image_skips_engine() {
        let scanner = ReceiptScanner::new(ScriptedEngine::new("合計 500"));
        let result = scanner.scan(&[]).await;
        assert!(matches!(result, Err(ScanError::EmptyImage)));
        assert_eq!(scanner.engine.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_engine_failure_is_reported() {
        let scanner = ReceiptScanner::new(BrokenEngine);
        let result = scanner.scan(b"png").await;
        assert!(matches!(result, Err(ScanError::Ocr(OcrError::Engine(_)))));
    }

    #[tokio::test]
    async fn test_scan_into_prefills_draft() {
        let scanner = ReceiptScanner::with_parser(
            ScriptedEngine::new("薬局マツモト\n小計 2,310"),
            fixed_parser(),
        )
        .language("jpn+eng");

        let today = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
        let mut draft = TransactionDraft::new(today);
        draft.kind = TransactionKind::Income;

        scanner.scan_into(b"img", &mut draft).await.unwrap();
        assert_eq!(draft.title, "薬局マツモト");
        assert_eq!(draft.amount, Some(BigDecimal::from(2310)));
        assert_eq!(draft.kind, TransactionKind::Expense);
        assert_eq!(draft.date, today);
        assert_eq!(*scanner.engine.languages.lock().unwrap(), vec!["jpn+eng"]);
    }

    #[tokio::test]
    async fn test_from_config_uses_configured_language() {
        let config = LedgerConfig::from_toml_str("[dashboard]\nocr_language = \"jpn_vert\"").unwrap();
        let scanner = ReceiptScanner::from_config(ScriptedEngine::new("合計 300"), &config);

        let parsed = scanner.scan(b"img").await.unwrap();
        assert_eq!(parsed.amount, Some(300));
        assert_eq!(*scanner.engine.languages.lock().unwrap(), vec!["jpn_vert"]);
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(OcrProgress::new(RECOGNIZING_TEXT, 0.424).percent(), 42);
        assert_eq!(OcrProgress::new(RECOGNIZING_TEXT, 1.7).percent(), 100);
    }
}
