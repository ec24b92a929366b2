//! Transaction entry form model, prefilled from a scanned receipt

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::receipt::parser::ParsedReceipt;
use crate::types::*;

/// Editable, not yet validated transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub date: NaiveDate,
    pub title: String,
    pub amount: Option<BigDecimal>,
    pub kind: TransactionKind,
    pub category: Category,
}

impl TransactionDraft {
    /// Empty draft dated `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today,
            title: String::new(),
            amount: None,
            kind: TransactionKind::Expense,
            category: Category::Other,
        }
    }

    /// Copy every field the receipt actually carries; absent fields keep the
    /// current value. A scanned receipt is always an expense.
    pub fn apply_receipt(&mut self, receipt: &ParsedReceipt) {
        if let Some(date) = receipt.naive_date() {
            self.date = date;
        }
        if let Some(title) = &receipt.title {
            self.title = title.clone();
        }
        if let Some(amount) = receipt.amount {
            self.amount = Some(BigDecimal::from(amount));
        }
        self.kind = TransactionKind::Expense;
    }

    /// Turn the draft into a validated transaction
    pub fn into_transaction(self) -> LedgerResult<Transaction> {
        let amount = self
            .amount
            .ok_or_else(|| LedgerError::Validation("Amount is required".to_string()))?;

        let transaction = Transaction::new(
            self.date,
            self.title.trim().to_string(),
            amount,
            self.kind,
            self.category,
        );
        transaction.validate()?;
        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()
    }

    #[test]
    fn test_absent_fields_leave_draft_unchanged() {
        let mut draft = TransactionDraft::new(today());
        draft.title = "手入力".to_string();
        draft.amount = Some(BigDecimal::from(700));

        draft.apply_receipt(&ParsedReceipt {
            date: "2025-06-01".to_string(),
            title: None,
            amount: None,
        });

        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(draft.title, "手入力");
        assert_eq!(draft.amount, Some(BigDecimal::from(700)));
    }

    #[test]
    fn test_impossible_date_is_ignored() {
        let mut draft = TransactionDraft::new(today());
        draft.apply_receipt(&ParsedReceipt {
            date: "2025-13-40".to_string(),
            title: Some("八百屋".to_string()),
            amount: Some(320),
        });

        assert_eq!(draft.date, today());
        assert_eq!(draft.title, "八百屋");
        assert_eq!(draft.amount, Some(BigDecimal::from(320)));
    }

    #[test]
    fn test_into_transaction() {
        let mut draft = TransactionDraft::new(today());
        draft.title = "  ランチ ".to_string();
        draft.amount = Some(BigDecimal::from(950));
        draft.category = Category::Food;

        let transaction = draft.into_transaction().unwrap();
        assert_eq!(transaction.title, "ランチ");
        assert_eq!(transaction.kind, TransactionKind::Expense);
        assert_eq!(transaction.category, Category::Food);
        assert!(!transaction.id.is_empty());
    }

    #[test]
    fn test_into_transaction_requires_amount() {
        let mut draft = TransactionDraft::new(today());
        draft.title = "ランチ".to_string();
        assert!(matches!(
            draft.into_transaction(),
            Err(LedgerError::Validation(_))
        ));
    }
}
