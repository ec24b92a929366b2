//! Traits for storage abstraction, time, and extensibility

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::types::*;

/// Storage abstraction for the household ledger
///
/// The backend is a key-value blob store: each collection is read and written
/// as a whole, the same way a browser `localStorage` entry or a single cloud
/// document would be. Any backend (in-memory, file, remote document store)
/// can be plugged in by implementing these methods.
#[async_trait]
pub trait LedgerStorage: Send + Sync {
    /// Load all transactions, in stored order
    async fn load_transactions(&self) -> LedgerResult<Vec<Transaction>>;

    /// Replace the stored transactions
    async fn store_transactions(&mut self, transactions: &[Transaction]) -> LedgerResult<()>;

    /// Load all subscriptions
    async fn load_subscriptions(&self) -> LedgerResult<Vec<Subscription>>;

    /// Replace the stored subscriptions
    async fn store_subscriptions(&mut self, subscriptions: &[Subscription]) -> LedgerResult<()>;

    /// Load all debts
    async fn load_debts(&self) -> LedgerResult<Vec<Debt>>;

    /// Replace the stored debts
    async fn store_debts(&mut self, debts: &[Debt]) -> LedgerResult<()>;

    /// Date subscriptions were last expanded into transactions
    async fn load_last_subscription_check(&self) -> LedgerResult<Option<NaiveDate>>;

    /// Persist the date subscriptions were last expanded
    async fn store_last_subscription_check(&mut self, date: NaiveDate) -> LedgerResult<()>;
}

/// Source of "today" for date fallbacks and period statistics
pub trait Clock: Send + Sync {
    /// Current local calendar date
    fn today(&self) -> NaiveDate;
}

/// Wall-clock time in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// A clock pinned to one date, for tests and replays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Trait for implementing custom transaction validation rules
pub trait TransactionValidator: Send + Sync {
    /// Validate a transaction before saving
    fn validate_transaction(&self, transaction: &Transaction) -> LedgerResult<()>;
}

/// Default transaction validator with basic rules
pub struct DefaultTransactionValidator;

impl TransactionValidator for DefaultTransactionValidator {
    fn validate_transaction(&self, transaction: &Transaction) -> LedgerResult<()> {
        transaction.validate()
    }
}
