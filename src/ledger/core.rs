//! Main ledger orchestrator that coordinates transactions, subscriptions, and debts

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::ledger::stats::{self, *};
use crate::ledger::{DebtManager, SubscriptionManager, TransactionManager};
use crate::traits::*;
use crate::types::*;

/// Everything the dashboard page shows, computed in one pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub stats: MonthlyStats,
    pub recent: Vec<Transaction>,
    pub trend: TrendSeries,
    pub total_debt: BigDecimal,
}

/// Main ledger system that orchestrates all household bookkeeping
pub struct Ledger<S: LedgerStorage> {
    transaction_manager: TransactionManager<S>,
    subscription_manager: SubscriptionManager<S>,
    debt_manager: DebtManager<S>,
}

impl<S: LedgerStorage + Clone> Ledger<S> {
    /// Create a new ledger with the given storage backend
    pub fn new(storage: S) -> Self {
        Self {
            transaction_manager: TransactionManager::new(storage.clone()),
            subscription_manager: SubscriptionManager::new(storage.clone()),
            debt_manager: DebtManager::new(storage),
        }
    }

    /// Create a new ledger with a custom transaction validator
    pub fn with_validator(storage: S, transaction_validator: Box<dyn TransactionValidator>) -> Self {
        Self {
            transaction_manager: TransactionManager::with_validator(
                storage.clone(),
                transaction_validator,
            ),
            subscription_manager: SubscriptionManager::new(storage.clone()),
            debt_manager: DebtManager::new(storage),
        }
    }

    // Transaction operations
    /// Record a new transaction
    pub async fn add_transaction(&mut self, transaction: Transaction) -> LedgerResult<Transaction> {
        self.transaction_manager.add_transaction(transaction).await
    }

    /// Remove a transaction
    pub async fn remove_transaction(&mut self, transaction_id: &str) -> LedgerResult<()> {
        self.transaction_manager
            .remove_transaction(transaction_id)
            .await
    }

    /// Delete every transaction
    pub async fn clear_all(&mut self) -> LedgerResult<()> {
        self.transaction_manager.clear_all().await
    }

    /// Get a transaction by ID
    pub async fn get_transaction(&self, transaction_id: &str) -> LedgerResult<Option<Transaction>> {
        self.transaction_manager
            .get_transaction(transaction_id)
            .await
    }

    /// All transactions, newest date first
    pub async fn list_transactions(&self) -> LedgerResult<Vec<Transaction>> {
        self.transaction_manager.list_transactions().await
    }

    /// The `count` most recent transactions
    pub async fn recent_transactions(&self, count: usize) -> LedgerResult<Vec<Transaction>> {
        self.transaction_manager.recent_transactions(count).await
    }

    // Subscription operations
    /// Register a fixed monthly cost
    pub async fn add_subscription(
        &mut self,
        title: String,
        amount: BigDecimal,
        day: u32,
    ) -> LedgerResult<Subscription> {
        self.subscription_manager
            .add_subscription(title, amount, day)
            .await
    }

    /// Remove a subscription
    pub async fn remove_subscription(&mut self, subscription_id: &str) -> LedgerResult<()> {
        self.subscription_manager
            .remove_subscription(subscription_id)
            .await
    }

    /// All subscriptions
    pub async fn list_subscriptions(&self) -> LedgerResult<Vec<Subscription>> {
        self.subscription_manager.list_subscriptions().await
    }

    /// Record subscription charges for every day since the last check
    ///
    /// Runs at most once per day. The very first run only remembers `today`.
    /// Returns the transactions that were generated.
    pub async fn check_and_generate(&mut self, today: NaiveDate) -> LedgerResult<Vec<Transaction>> {
        let last_check = match self.subscription_manager.last_check().await? {
            Some(last) if last == today => return Ok(Vec::new()),
            Some(last) => last,
            None => {
                self.subscription_manager.mark_checked(today).await?;
                return Ok(Vec::new());
            }
        };

        let charges = self
            .subscription_manager
            .charges_between(last_check, today)
            .await?;

        let recorded = self.transaction_manager.add_transactions(charges).await?;
        self.subscription_manager.mark_checked(today).await?;

        tracing::info!(
            since = %last_check,
            through = %today,
            generated = recorded.len(),
            "expanded subscriptions"
        );
        Ok(recorded)
    }

    // Debt operations
    /// Register a debt
    pub async fn add_debt(
        &mut self,
        name: String,
        balance: BigDecimal,
        monthly_payment: BigDecimal,
    ) -> LedgerResult<Debt> {
        self.debt_manager
            .add_debt(name, balance, monthly_payment)
            .await
    }

    /// Repay part of a debt and record the payment as an expense
    ///
    /// The expense is for the full `amount` entered even when it exceeds the
    /// remaining balance; the balance itself stops at zero. The payment is
    /// validated before the balance changes.
    pub async fn repay_debt(
        &mut self,
        debt_id: &str,
        amount: BigDecimal,
        today: NaiveDate,
    ) -> LedgerResult<(Debt, Transaction)> {
        let debt = self.debt_manager.get_debt_required(debt_id).await?;
        let payment = Transaction::expense(
            today,
            format!("返済: {}", debt.name),
            amount,
            Category::Other,
        );
        self.transaction_manager.validate(&payment)?;

        let debt = self.debt_manager.repay(debt_id, &payment.amount).await?;
        let payment = self.transaction_manager.add_transaction(payment).await?;
        Ok((debt, payment))
    }

    /// Remove a debt
    pub async fn remove_debt(&mut self, debt_id: &str) -> LedgerResult<()> {
        self.debt_manager.remove_debt(debt_id).await
    }

    /// All debts
    pub async fn list_debts(&self) -> LedgerResult<Vec<Debt>> {
        self.debt_manager.list_debts().await
    }

    /// Sum of outstanding debt balances
    pub async fn total_debt(&self) -> LedgerResult<BigDecimal> {
        self.debt_manager.total_debt().await
    }

    // Statistics
    /// Current-month totals and all-time balance
    pub async fn monthly_stats(&self, today: NaiveDate) -> LedgerResult<MonthlyStats> {
        let transactions = self.transaction_manager.all_transactions().await?;
        Ok(stats::monthly_stats(&transactions, today))
    }

    /// Net income per month for the trend chart
    pub async fn trend_series(&self, today: NaiveDate, months: u32) -> LedgerResult<TrendSeries> {
        let transactions = self.transaction_manager.all_transactions().await?;
        Ok(stats::trend_series(&transactions, today, months))
    }

    /// Expense totals per category
    pub async fn category_breakdown(
        &self,
        today: NaiveDate,
        period: StatsPeriod,
    ) -> LedgerResult<CategoryBreakdown> {
        let transactions = self.transaction_manager.all_transactions().await?;
        Ok(stats::category_breakdown(&transactions, today, period))
    }

    /// Per-day totals for the calendar view
    pub async fn calendar_month(&self, year: i32, month: u32) -> LedgerResult<CalendarMonth> {
        let transactions = self.transaction_manager.all_transactions().await?;
        stats::calendar_month(&transactions, year, month)
    }

    /// Stats, recent list, trend, and total debt for the dashboard page
    pub async fn dashboard(
        &self,
        today: NaiveDate,
        config: &DashboardConfig,
    ) -> LedgerResult<DashboardSnapshot> {
        let transactions = self.transaction_manager.all_transactions().await?;
        let recent = self
            .transaction_manager
            .recent_transactions(config.recent_count)
            .await?;

        Ok(DashboardSnapshot {
            stats: stats::monthly_stats(&transactions, today),
            recent,
            trend: stats::trend_series(&transactions, today, config.trend_months),
            total_debt: self.debt_manager.total_debt().await?,
        })
    }

    /// Fill an empty ledger with sample data
    ///
    /// Adds a salary and a rent entry dated `today` when there are no
    /// transactions, and two sample subscriptions when there are none.
    pub async fn seed_demo_data(&mut self, today: NaiveDate) -> LedgerResult<()> {
        if self.transaction_manager.is_empty().await? {
            self.transaction_manager
                .add_transaction(Transaction::income(
                    today,
                    "初期データ: 給与".to_string(),
                    BigDecimal::from(300000),
                    Category::Salary,
                ))
                .await?;
            self.transaction_manager
                .add_transaction(Transaction::expense(
                    today,
                    "初期データ: 家賃".to_string(),
                    BigDecimal::from(80000),
                    Category::Fixed,
                ))
                .await?;
        }

        if self.subscription_manager.list_subscriptions().await?.is_empty() {
            self.subscription_manager
                .add_subscription("家賃".to_string(), BigDecimal::from(80000), 27)
                .await?;
            self.subscription_manager
                .add_subscription("Netflix".to_string(), BigDecimal::from(1490), 15)
                .await?;
        }

        tracing::debug!(%today, "seeded demo data");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{MemoryStorage, StrictTransactionValidator};
    use std::str::FromStr;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn strict_ledger() -> Ledger<MemoryStorage> {
        Ledger::with_validator(MemoryStorage::new(), Box::new(StrictTransactionValidator))
    }

    #[tokio::test]
    async fn test_rejected_charge_records_nothing_and_retries_cleanly() {
        let mut ledger = strict_ledger();
        ledger
            .add_subscription("Gym".to_string(), BigDecimal::from(5000), 2)
            .await
            .unwrap();
        let cloud = ledger
            .add_subscription(
                "Cloud".to_string(),
                BigDecimal::from_str("130.5").unwrap(),
                3,
            )
            .await
            .unwrap();

        ledger.check_and_generate(day(1)).await.unwrap();
        for _ in 0..2 {
            let result = ledger.check_and_generate(day(5)).await;
            assert!(matches!(result, Err(LedgerError::Validation(_))));
        }
        assert!(ledger.list_transactions().await.unwrap().is_empty());

        ledger.remove_subscription(&cloud.id).await.unwrap();
        let generated = ledger.check_and_generate(day(5)).await.unwrap();
        let titles: Vec<String> = generated.into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["Gym (自動)"]);
        assert_eq!(ledger.list_transactions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_repayment_keeps_balance() {
        let mut ledger = strict_ledger();
        let debt = ledger
            .add_debt(
                "車のローン".to_string(),
                BigDecimal::from(10000),
                BigDecimal::from(1000),
            )
            .await
            .unwrap();

        let result = ledger
            .repay_debt(&debt.id, BigDecimal::from_str("500.5").unwrap(), day(10))
            .await;
        assert!(matches!(result, Err(LedgerError::Validation(_))));
        assert_eq!(ledger.total_debt().await.unwrap(), BigDecimal::from(10000));
        assert!(ledger.list_transactions().await.unwrap().is_empty());

        let (updated, payment) = ledger
            .repay_debt(&debt.id, BigDecimal::from(500), day(10))
            .await
            .unwrap();
        assert_eq!(updated.balance, BigDecimal::from(9500));
        assert_eq!(payment.title, "返済: 車のローン");
    }
}
