//! Transaction recording and listing

use crate::traits::*;
use crate::types::*;

/// Transaction manager for handling transaction operations
pub struct TransactionManager<S: LedgerStorage> {
    storage: S,
    validator: Box<dyn TransactionValidator>,
}

impl<S: LedgerStorage> TransactionManager<S> {
    /// Create a new transaction manager
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultTransactionValidator),
        }
    }

    /// Create a new transaction manager with custom validator
    pub fn with_validator(storage: S, validator: Box<dyn TransactionValidator>) -> Self {
        Self { storage, validator }
    }

    /// Record a new transaction; the newest record goes first
    pub async fn add_transaction(&mut self, transaction: Transaction) -> LedgerResult<Transaction> {
        self.validator.validate_transaction(&transaction)?;

        let mut transactions = self.storage.load_transactions().await?;
        transactions.insert(0, transaction.clone());
        self.storage.store_transactions(&transactions).await?;

        tracing::info!(
            id = %transaction.id,
            date = %transaction.date,
            amount = %transaction.amount,
            kind = ?transaction.kind,
            category = transaction.category.key(),
            "recorded transaction"
        );

        Ok(transaction)
    }

    /// Record several transactions at once
    ///
    /// Every record is validated before anything is stored, so a rejected
    /// record leaves storage untouched. The result matches adding them one by
    /// one in order: the last record ends up first.
    pub async fn add_transactions(
        &mut self,
        batch: Vec<Transaction>,
    ) -> LedgerResult<Vec<Transaction>> {
        for transaction in &batch {
            self.validator.validate_transaction(transaction)?;
        }
        if batch.is_empty() {
            return Ok(batch);
        }

        let existing = self.storage.load_transactions().await?;
        let mut transactions: Vec<Transaction> = batch.iter().rev().cloned().collect();
        transactions.extend(existing);
        self.storage.store_transactions(&transactions).await?;

        tracing::info!(count = batch.len(), "recorded transactions");
        Ok(batch)
    }

    /// Run the configured validator without storing anything
    pub fn validate(&self, transaction: &Transaction) -> LedgerResult<()> {
        self.validator.validate_transaction(transaction)
    }

    /// Remove a transaction by ID
    pub async fn remove_transaction(&mut self, transaction_id: &str) -> LedgerResult<()> {
        let mut transactions = self.storage.load_transactions().await?;
        let before = transactions.len();
        transactions.retain(|t| t.id != transaction_id);

        if transactions.len() == before {
            return Err(LedgerError::TransactionNotFound(transaction_id.to_string()));
        }

        self.storage.store_transactions(&transactions).await?;
        tracing::info!(id = %transaction_id, "removed transaction");
        Ok(())
    }

    /// Drop every transaction
    pub async fn clear_all(&mut self) -> LedgerResult<()> {
        self.storage.store_transactions(&[]).await?;
        tracing::warn!("cleared all transactions");
        Ok(())
    }

    /// Get a transaction by ID
    pub async fn get_transaction(&self, transaction_id: &str) -> LedgerResult<Option<Transaction>> {
        Ok(self
            .storage
            .load_transactions()
            .await?
            .into_iter()
            .find(|t| t.id == transaction_id))
    }

    /// All transactions in stored order
    pub async fn all_transactions(&self) -> LedgerResult<Vec<Transaction>> {
        self.storage.load_transactions().await
    }

    /// All transactions, newest date first; same-day records keep insertion
    /// order (most recently added first)
    pub async fn list_transactions(&self) -> LedgerResult<Vec<Transaction>> {
        let mut transactions = self.storage.load_transactions().await?;
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }

    /// The `count` most recent transactions
    pub async fn recent_transactions(&self, count: usize) -> LedgerResult<Vec<Transaction>> {
        let mut transactions = self.list_transactions().await?;
        transactions.truncate(count);
        Ok(transactions)
    }

    /// Whether no transactions are stored
    pub async fn is_empty(&self) -> LedgerResult<bool> {
        Ok(self.storage.load_transactions().await?.is_empty())
    }
}
