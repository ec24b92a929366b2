//! In-memory storage implementation for testing

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

const TRANSACTIONS_KEY: &str = "transactions";
const SUBSCRIPTIONS_KEY: &str = "subscriptions";
const DEBTS_KEY: &str = "debts";
const LAST_CHECK_KEY: &str = "last_subscription_check";

/// Full contents of a store, for backup and transfer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub transactions: Vec<Transaction>,
    pub subscriptions: Vec<Subscription>,
    pub debts: Vec<Debt>,
    pub last_subscription_check: Option<NaiveDate>,
}

/// In-memory key-value blob storage for testing and development
///
/// Each collection is kept as one JSON blob under a fixed key, mirroring how
/// a browser or document backend holds it.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blobs: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> LedgerResult<()> {
        self.blobs
            .write()
            .map_err(|_| poisoned())?
            .clear();
        Ok(())
    }

    /// Serialize every collection into one JSON document
    pub fn export_json(&self) -> LedgerResult<String> {
        let snapshot = Snapshot {
            transactions: self.get_blob(TRANSACTIONS_KEY)?.unwrap_or_default(),
            subscriptions: self.get_blob(SUBSCRIPTIONS_KEY)?.unwrap_or_default(),
            debts: self.get_blob(DEBTS_KEY)?.unwrap_or_default(),
            last_subscription_check: self.get_blob(LAST_CHECK_KEY)?,
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Replace all contents with a document produced by `export_json`
    pub fn import_json(&self, raw: &str) -> LedgerResult<()> {
        let snapshot: Snapshot = serde_json::from_str(raw)?;
        self.clear()?;
        self.put_blob(TRANSACTIONS_KEY, &snapshot.transactions)?;
        self.put_blob(SUBSCRIPTIONS_KEY, &snapshot.subscriptions)?;
        self.put_blob(DEBTS_KEY, &snapshot.debts)?;
        if let Some(date) = snapshot.last_subscription_check {
            self.put_blob(LAST_CHECK_KEY, &date)?;
        }
        tracing::debug!(
            transactions = snapshot.transactions.len(),
            subscriptions = snapshot.subscriptions.len(),
            debts = snapshot.debts.len(),
            "imported snapshot"
        );
        Ok(())
    }

    fn get_blob<T: DeserializeOwned>(&self, key: &str) -> LedgerResult<Option<T>> {
        let blobs = self.blobs.read().map_err(|_| poisoned())?;
        match blobs.get(key) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn put_blob<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> LedgerResult<()> {
        let raw = serde_json::to_string(value)?;
        self.blobs
            .write()
            .map_err(|_| poisoned())?
            .insert(key.to_string(), raw);
        Ok(())
    }
}

fn poisoned() -> LedgerError {
    LedgerError::Storage("memory storage lock poisoned".to_string())
}

#[async_trait]
impl LedgerStorage for MemoryStorage {
    async fn load_transactions(&self) -> LedgerResult<Vec<Transaction>> {
        Ok(self.get_blob(TRANSACTIONS_KEY)?.unwrap_or_default())
    }

    async fn store_transactions(&mut self, transactions: &[Transaction]) -> LedgerResult<()> {
        self.put_blob(TRANSACTIONS_KEY, transactions)
    }

    async fn load_subscriptions(&self) -> LedgerResult<Vec<Subscription>> {
        Ok(self.get_blob(SUBSCRIPTIONS_KEY)?.unwrap_or_default())
    }

    async fn store_subscriptions(&mut self, subscriptions: &[Subscription]) -> LedgerResult<()> {
        self.put_blob(SUBSCRIPTIONS_KEY, subscriptions)
    }

    async fn load_debts(&self) -> LedgerResult<Vec<Debt>> {
        Ok(self.get_blob(DEBTS_KEY)?.unwrap_or_default())
    }

    async fn store_debts(&mut self, debts: &[Debt]) -> LedgerResult<()> {
        self.put_blob(DEBTS_KEY, debts)
    }

    async fn load_last_subscription_check(&self) -> LedgerResult<Option<NaiveDate>> {
        self.get_blob(LAST_CHECK_KEY)
    }

    async fn store_last_subscription_check(&mut self, date: NaiveDate) -> LedgerResult<()> {
        self.put_blob(LAST_CHECK_KEY, &date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    #[tokio::test]
    async fn test_clones_share_state() {
        let mut storage = MemoryStorage::new();
        let other = storage.clone();

        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let txn = Transaction::expense(
            date,
            "電気代".to_string(),
            BigDecimal::from(6200),
            Category::Fixed,
        );
        storage.store_transactions(&[txn.clone()]).await.unwrap();

        assert_eq!(other.load_transactions().await.unwrap(), vec![txn]);
        assert!(other.load_debts().await.unwrap().is_empty());
        assert_eq!(other.load_last_subscription_check().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_snapshot_export_import() {
        let mut storage = MemoryStorage::new();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        storage
            .store_subscriptions(&[Subscription::new(
                "Netflix".to_string(),
                BigDecimal::from(1490),
                15,
            )])
            .await
            .unwrap();
        storage.store_last_subscription_check(date).await.unwrap();

        let exported = storage.export_json().unwrap();

        let restored = MemoryStorage::new();
        restored.import_json(&exported).unwrap();
        let subs = restored.load_subscriptions().await.unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].day, 15);
        assert_eq!(
            restored.load_last_subscription_check().await.unwrap(),
            Some(date)
        );
    }

    #[test]
    fn test_import_rejects_garbage() {
        let storage = MemoryStorage::new();
        assert!(matches!(
            storage.import_json("not json"),
            Err(LedgerError::Serialization(_))
        ));
    }
}
