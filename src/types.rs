//! Core types and data structures for the household ledger

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Direction of money flow for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in (salary, refunds, etc.)
    Income,
    /// Money going out
    Expense,
}

impl TransactionKind {
    /// Signed contribution of `amount` to a running balance
    pub fn signed(&self, amount: &BigDecimal) -> BigDecimal {
        match self {
            TransactionKind::Income => amount.clone(),
            TransactionKind::Expense => -amount.clone(),
        }
    }
}

/// Spending/earning categories shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Daily,
    Transport,
    Entertainment,
    Fixed,
    Salary,
    Other,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Daily,
        Category::Transport,
        Category::Entertainment,
        Category::Fixed,
        Category::Salary,
        Category::Other,
    ];

    /// Stable machine key used in stored data
    pub fn key(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Daily => "daily",
            Category::Transport => "transport",
            Category::Entertainment => "entertainment",
            Category::Fixed => "fixed",
            Category::Salary => "salary",
            Category::Other => "other",
        }
    }

    /// Japanese label for display
    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "食費",
            Category::Daily => "日用品",
            Category::Transport => "交通費",
            Category::Entertainment => "交際・娯楽",
            Category::Fixed => "固定費",
            Category::Salary => "給与",
            Category::Other => "その他",
        }
    }

    /// Parse a machine key; unknown keys fall into `Other`
    pub fn from_key(key: &str) -> Self {
        Category::ALL
            .into_iter()
            .find(|c| c.key() == key)
            .unwrap_or(Category::Other)
    }
}

/// A single income or expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier for the transaction
    pub id: String,
    /// Date when the money moved
    pub date: NaiveDate,
    /// Human-readable title (merchant, payee, memo)
    pub title: String,
    /// Amount in yen, always positive; direction comes from `kind`
    pub amount: BigDecimal,
    /// Income or expense
    pub kind: TransactionKind,
    /// Dashboard category
    pub category: Category,
    /// When the record was created
    pub created_at: NaiveDateTime,
}

impl Transaction {
    /// Create a new transaction with a fresh id
    pub fn new(
        date: NaiveDate,
        title: String,
        amount: BigDecimal,
        kind: TransactionKind,
        category: Category,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            title,
            amount,
            kind,
            category,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Create an income transaction
    pub fn income(date: NaiveDate, title: String, amount: BigDecimal, category: Category) -> Self {
        Self::new(date, title, amount, TransactionKind::Income, category)
    }

    /// Create an expense transaction
    pub fn expense(date: NaiveDate, title: String, amount: BigDecimal, category: Category) -> Self {
        Self::new(date, title, amount, TransactionKind::Expense, category)
    }

    /// Amount signed by direction (income positive, expense negative)
    pub fn signed_amount(&self) -> BigDecimal {
        self.kind.signed(&self.amount)
    }

    /// Validate the transaction
    pub fn validate(&self) -> LedgerResult<()> {
        if self.title.trim().is_empty() {
            return Err(LedgerError::Validation(
                "Transaction title cannot be empty".to_string(),
            ));
        }

        if self.amount <= BigDecimal::from(0) {
            return Err(LedgerError::Validation(format!(
                "Transaction amount must be positive, got {}",
                self.amount
            )));
        }

        Ok(())
    }
}

/// A fixed monthly cost that is recorded automatically on its charge day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub title: String,
    pub amount: BigDecimal,
    /// Day of month (1-31) the charge is recorded on
    pub day: u32,
}

impl Subscription {
    /// Create a new subscription with a fresh id
    pub fn new(title: String, amount: BigDecimal, day: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            amount,
            day,
        }
    }
}

/// Outstanding loan or credit balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: String,
    /// Lender name
    pub name: String,
    /// Remaining balance, never negative
    pub balance: BigDecimal,
    /// Planned monthly repayment
    pub monthly_payment: BigDecimal,
}

impl Debt {
    /// Create a new debt with a fresh id
    pub fn new(name: String, balance: BigDecimal, monthly_payment: BigDecimal) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            balance,
            monthly_payment,
        }
    }

    /// Reduce the balance by `amount`, clamping at zero
    pub fn apply_repayment(&mut self, amount: &BigDecimal) {
        self.balance -= amount;
        if self.balance < BigDecimal::from(0) {
            self.balance = BigDecimal::from(0);
        }
    }
}

/// Errors that can occur in the ledger system
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(String),
    #[error("Debt not found: {0}")]
    DebtNotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
