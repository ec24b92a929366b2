//! Debt tracking

use bigdecimal::BigDecimal;

use crate::traits::*;
use crate::types::*;
use crate::utils::{validate_debt, validate_positive_amount};

/// Debt manager for loans and repayments
pub struct DebtManager<S: LedgerStorage> {
    storage: S,
}

impl<S: LedgerStorage> DebtManager<S> {
    /// Create a new debt manager
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Register a new debt
    pub async fn add_debt(
        &mut self,
        name: String,
        balance: BigDecimal,
        monthly_payment: BigDecimal,
    ) -> LedgerResult<Debt> {
        let debt = Debt::new(name, balance, monthly_payment);
        validate_debt(&debt)?;

        let mut debts = self.storage.load_debts().await?;
        debts.push(debt.clone());
        self.storage.store_debts(&debts).await?;

        tracing::info!(id = %debt.id, name = %debt.name, balance = %debt.balance, "added debt");
        Ok(debt)
    }

    /// Get a debt by ID, failing when it does not exist
    pub async fn get_debt_required(&self, debt_id: &str) -> LedgerResult<Debt> {
        self.storage
            .load_debts()
            .await?
            .into_iter()
            .find(|d| d.id == debt_id)
            .ok_or_else(|| LedgerError::DebtNotFound(debt_id.to_string()))
    }

    /// Reduce a debt's balance and return the updated debt
    pub async fn repay(&mut self, debt_id: &str, amount: &BigDecimal) -> LedgerResult<Debt> {
        validate_positive_amount(amount)?;

        let mut debts = self.storage.load_debts().await?;
        let debt = debts
            .iter_mut()
            .find(|d| d.id == debt_id)
            .ok_or_else(|| LedgerError::DebtNotFound(debt_id.to_string()))?;

        debt.apply_repayment(amount);
        let updated = debt.clone();
        self.storage.store_debts(&debts).await?;

        tracing::info!(
            id = %updated.id,
            paid = %amount,
            remaining = %updated.balance,
            "recorded debt repayment"
        );
        Ok(updated)
    }

    /// Remove a debt by ID
    pub async fn remove_debt(&mut self, debt_id: &str) -> LedgerResult<()> {
        let mut debts = self.storage.load_debts().await?;
        let before = debts.len();
        debts.retain(|d| d.id != debt_id);

        if debts.len() == before {
            return Err(LedgerError::DebtNotFound(debt_id.to_string()));
        }

        self.storage.store_debts(&debts).await
    }

    /// All debts in insertion order
    pub async fn list_debts(&self) -> LedgerResult<Vec<Debt>> {
        self.storage.load_debts().await
    }

    /// Sum of outstanding balances
    pub async fn total_debt(&self) -> LedgerResult<BigDecimal> {
        Ok(self
            .storage
            .load_debts()
            .await?
            .iter()
            .map(|d| &d.balance)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MemoryStorage;

    #[tokio::test]
    async fn test_total_debt() {
        let mut manager = DebtManager::new(MemoryStorage::new());
        manager
            .add_debt(
                "奨学金".to_string(),
                BigDecimal::from(1200000),
                BigDecimal::from(15000),
            )
            .await
            .unwrap();
        manager
            .add_debt(
                "カードローン".to_string(),
                BigDecimal::from(80000),
                BigDecimal::from(10000),
            )
            .await
            .unwrap();

        assert_eq!(
            manager.total_debt().await.unwrap(),
            BigDecimal::from(1280000)
        );
    }

    #[tokio::test]
    async fn test_repay_clamps_and_persists() {
        let mut manager = DebtManager::new(MemoryStorage::new());
        let debt = manager
            .add_debt(
                "友人".to_string(),
                BigDecimal::from(5000),
                BigDecimal::from(0),
            )
            .await
            .unwrap();

        let updated = manager.repay(&debt.id, &BigDecimal::from(8000)).await.unwrap();
        assert_eq!(updated.balance, BigDecimal::from(0));
        assert_eq!(manager.total_debt().await.unwrap(), BigDecimal::from(0));
    }

    #[tokio::test]
    async fn test_repay_errors() {
        let mut manager = DebtManager::new(MemoryStorage::new());
        assert!(matches!(
            manager.repay("nope", &BigDecimal::from(100)).await,
            Err(LedgerError::DebtNotFound(_))
        ));

        let debt = manager
            .add_debt(
                "友人".to_string(),
                BigDecimal::from(5000),
                BigDecimal::from(0),
            )
            .await
            .unwrap();
        assert!(matches!(
            manager.repay(&debt.id, &BigDecimal::from(0)).await,
            Err(LedgerError::Validation(_))
        ));
    }
}
