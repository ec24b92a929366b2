//! # Household Ledger
//!
//! Core logic for a personal household-ledger dashboard: income and expense
//! records, fixed monthly subscriptions, debts, dashboard statistics, and a
//! rule-based parser that turns OCR receipt text into a prefilled entry.
//!
//! ## Features
//!
//! - **Receipt parsing**: date, title, and total extracted from raw OCR text
//! - **Scan flow**: pluggable OCR engine feeding the parser and entry form
//! - **Subscriptions**: monthly charges recorded automatically on their day
//! - **Debts**: balances with repayments recorded as expenses
//! - **Statistics**: monthly totals, category breakdown, calendar, trend series
//! - **Storage abstraction**: key-value blob backend behind an async trait
//!
//! ## Quick Start
//!
//! ```rust
//! use household_ledger::{ParserConfig, ReceiptParser};
//! use household_ledger::traits::FixedClock;
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
//! let parser = ReceiptParser::with_clock(ParserConfig::default(), Box::new(FixedClock(today)));
//!
//! let parsed = parser.parse("コンビニ\n2024年03月05日\n合計 ¥1,200");
//! assert_eq!(parsed.date, "2024-03-05");
//! assert_eq!(parsed.title.as_deref(), Some("コンビニ"));
//! assert_eq!(parsed.amount, Some(1200));
//! ```

pub mod config;
pub mod ledger;
pub mod receipt;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use ledger::*;
pub use receipt::*;
pub use traits::*;
pub use types::*;
