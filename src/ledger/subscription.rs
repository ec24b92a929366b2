//! Fixed monthly costs and their automatic expansion into transactions

use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate};

use crate::traits::*;
use crate::types::*;
use crate::utils::validate_subscription;

/// Suffix marking transactions generated from a subscription
pub const AUTO_TITLE_SUFFIX: &str = " (自動)";

/// Subscription manager for recurring charges
pub struct SubscriptionManager<S: LedgerStorage> {
    storage: S,
}

impl<S: LedgerStorage> SubscriptionManager<S> {
    /// Create a new subscription manager
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Register a new subscription
    pub async fn add_subscription(
        &mut self,
        title: String,
        amount: BigDecimal,
        day: u32,
    ) -> LedgerResult<Subscription> {
        let subscription = Subscription::new(title, amount, day);
        validate_subscription(&subscription)?;

        let mut subscriptions = self.storage.load_subscriptions().await?;
        subscriptions.push(subscription.clone());
        self.storage.store_subscriptions(&subscriptions).await?;

        tracing::info!(
            id = %subscription.id,
            title = %subscription.title,
            day = subscription.day,
            "added subscription"
        );
        Ok(subscription)
    }

    /// Remove a subscription by ID
    pub async fn remove_subscription(&mut self, subscription_id: &str) -> LedgerResult<()> {
        let mut subscriptions = self.storage.load_subscriptions().await?;
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != subscription_id);

        if subscriptions.len() == before {
            return Err(LedgerError::SubscriptionNotFound(
                subscription_id.to_string(),
            ));
        }

        self.storage.store_subscriptions(&subscriptions).await
    }

    /// All subscriptions in insertion order
    pub async fn list_subscriptions(&self) -> LedgerResult<Vec<Subscription>> {
        self.storage.load_subscriptions().await
    }

    /// Date of the previous expansion run
    pub async fn last_check(&self) -> LedgerResult<Option<NaiveDate>> {
        self.storage.load_last_subscription_check().await
    }

    /// Record that expansion ran on `date`
    pub async fn mark_checked(&mut self, date: NaiveDate) -> LedgerResult<()> {
        self.storage.store_last_subscription_check(date).await
    }

    /// Expense transactions due strictly after `after` up to and including
    /// `through`, in date order
    pub async fn charges_between(
        &self,
        after: NaiveDate,
        through: NaiveDate,
    ) -> LedgerResult<Vec<Transaction>> {
        let subscriptions = self.storage.load_subscriptions().await?;
        Ok(charges_for(&subscriptions, after, through))
    }
}

/// Walk each day in `(after, through]` and emit one charge per subscription
/// whose day-of-month matches. Days a month lacks never match.
pub fn charges_for(
    subscriptions: &[Subscription],
    after: NaiveDate,
    through: NaiveDate,
) -> Vec<Transaction> {
    let mut charges = Vec::new();

    for date in after.iter_days().skip(1).take_while(|d| *d <= through) {
        for subscription in subscriptions.iter().filter(|s| s.day == date.day()) {
            charges.push(Transaction::expense(
                date,
                format!("{}{}", subscription.title, AUTO_TITLE_SUFFIX),
                subscription.amount.clone(),
                Category::Fixed,
            ));
        }
    }

    charges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MemoryStorage;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sub(title: &str, amount: i64, day: u32) -> Subscription {
        Subscription::new(title.to_string(), BigDecimal::from(amount), day)
    }

    #[test]
    fn test_charges_cover_half_open_range() {
        let subs = vec![sub("家賃", 80000, 27), sub("Netflix", 1490, 15)];

        let charges = charges_for(&subs, date(2024, 3, 15), date(2024, 4, 15));
        let summary: Vec<(NaiveDate, &str)> = charges
            .iter()
            .map(|t| (t.date, t.title.as_str()))
            .collect();

        assert_eq!(
            summary,
            vec![
                (date(2024, 3, 27), "家賃 (自動)"),
                (date(2024, 4, 15), "Netflix (自動)"),
            ]
        );
        assert!(charges
            .iter()
            .all(|t| t.kind == TransactionKind::Expense && t.category == Category::Fixed));
    }

    #[test]
    fn test_missing_month_days_are_skipped() {
        let subs = vec![sub("Gym", 7000, 31)];
        let charges = charges_for(&subs, date(2024, 1, 31), date(2024, 3, 31));
        let dates: Vec<NaiveDate> = charges.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date(2024, 3, 31)]);
    }

    #[test]
    fn test_empty_range() {
        let subs = vec![sub("Netflix", 1490, 15)];
        assert!(charges_for(&subs, date(2024, 4, 15), date(2024, 4, 15)).is_empty());
        assert!(charges_for(&subs, date(2024, 4, 20), date(2024, 4, 1)).is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_bad_day() {
        let mut manager = SubscriptionManager::new(MemoryStorage::new());
        let result = manager
            .add_subscription("Cloud".to_string(), BigDecimal::from(130), 0)
            .await;
        assert!(matches!(result, Err(LedgerError::Validation(_))));
        assert!(manager.list_subscriptions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_subscription() {
        let mut manager = SubscriptionManager::new(MemoryStorage::new());
        let s = manager
            .add_subscription("Cloud".to_string(), BigDecimal::from(130), 3)
            .await
            .unwrap();
        manager.remove_subscription(&s.id).await.unwrap();
        assert!(matches!(
            manager.remove_subscription(&s.id).await,
            Err(LedgerError::SubscriptionNotFound(_))
        ));
    }
}
