//! Validation utilities

use bigdecimal::BigDecimal;

use crate::traits::*;
use crate::types::*;

/// Validate that an amount is positive
pub fn validate_positive_amount(amount: &BigDecimal) -> LedgerResult<()> {
    if *amount <= BigDecimal::from(0) {
        Err(LedgerError::Validation(
            "Amount must be positive".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that an amount is zero or more
pub fn validate_non_negative_amount(amount: &BigDecimal) -> LedgerResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(LedgerError::Validation(
            "Amount cannot be negative".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Yen has no minor unit
pub fn validate_whole_yen(amount: &BigDecimal) -> LedgerResult<()> {
    if amount.is_integer() {
        Ok(())
    } else {
        Err(LedgerError::Validation(format!(
            "Amount must be a whole number of yen, got {}",
            amount
        )))
    }
}

/// Validate a title or name shown in lists
pub fn validate_title(title: &str) -> LedgerResult<()> {
    if title.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Title cannot be empty".to_string(),
        ));
    }

    if title.chars().count() > 100 {
        return Err(LedgerError::Validation(
            "Title cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate a subscription charge day
pub fn validate_charge_day(day: u32) -> LedgerResult<()> {
    if (1..=31).contains(&day) {
        Ok(())
    } else {
        Err(LedgerError::Validation(format!(
            "Charge day must be between 1 and 31, got {}",
            day
        )))
    }
}

/// Validate a subscription before saving
pub fn validate_subscription(subscription: &Subscription) -> LedgerResult<()> {
    validate_title(&subscription.title)?;
    validate_positive_amount(&subscription.amount)?;
    validate_charge_day(subscription.day)
}

/// Validate a debt before saving
pub fn validate_debt(debt: &Debt) -> LedgerResult<()> {
    validate_title(&debt.name)?;
    validate_non_negative_amount(&debt.balance)?;
    validate_non_negative_amount(&debt.monthly_payment)
}

/// Transaction validator that also enforces title length and whole yen
pub struct StrictTransactionValidator;

impl TransactionValidator for StrictTransactionValidator {
    fn validate_transaction(&self, transaction: &Transaction) -> LedgerResult<()> {
        transaction.validate()?;
        validate_title(&transaction.title)?;
        validate_whole_yen(&transaction.amount)
    }
}
