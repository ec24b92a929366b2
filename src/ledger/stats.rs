//! Dashboard statistics computed from the transaction list
//!
//! These are plain functions over a slice so they can be reused on any
//! subset of transactions; [`crate::Ledger`] wraps them with storage access.

use bigdecimal::BigDecimal;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::*;

/// Overall balance health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceTrend {
    /// All-time balance is zero or positive
    Healthy,
    /// All-time balance is negative
    Deficit,
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    /// Income in the month containing `today`
    pub income: BigDecimal,
    /// Expense in the month containing `today`
    pub expense: BigDecimal,
    /// All-time income minus expense
    pub total_balance: BigDecimal,
    pub trend: BalanceTrend,
}

/// Net income per month, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    /// Month labels such as `3月`
    pub labels: Vec<String>,
    /// First day of each month in the series
    pub months: Vec<NaiveDate>,
    pub data: Vec<BigDecimal>,
}

/// Window for category statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsPeriod {
    #[default]
    CurrentMonth,
    PreviousMonth,
    AllTime,
}

/// Expense total for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: BigDecimal,
}

/// Expense split by category, largest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub period: StatsPeriod,
    pub totals: Vec<CategoryTotal>,
    pub total: BigDecimal,
}

/// Totals for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub income: BigDecimal,
    pub expense: BigDecimal,
    pub count: usize,
}

/// Per-day activity within one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub days_in_month: u32,
    /// Only days with at least one transaction, in date order
    pub days: Vec<CalendarDay>,
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn sum_kind<'a>(
    transactions: impl Iterator<Item = &'a Transaction>,
    kind: TransactionKind,
) -> BigDecimal {
    transactions
        .filter(|t| t.kind == kind)
        .map(|t| &t.amount)
        .sum()
}

/// Current-month income/expense plus all-time balance
pub fn monthly_stats(transactions: &[Transaction], today: NaiveDate) -> MonthlyStats {
    let this_month = move || {
        transactions
            .iter()
            .filter(move |t| same_month(t.date, today))
    };

    let income = sum_kind(this_month(), TransactionKind::Income);
    let expense = sum_kind(this_month(), TransactionKind::Expense);
    let total_balance: BigDecimal = transactions.iter().map(Transaction::signed_amount).sum();

    let trend = if total_balance >= BigDecimal::from(0) {
        BalanceTrend::Healthy
    } else {
        BalanceTrend::Deficit
    };

    MonthlyStats {
        income,
        expense,
        total_balance,
        trend,
    }
}

/// Net income for `months` consecutive months ending with the month of `today`
pub fn trend_series(transactions: &[Transaction], today: NaiveDate, months: u32) -> TrendSeries {
    let current = first_of_month(today);
    let month_starts: Vec<NaiveDate> = (0..months)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .collect();

    let labels: Vec<String> = month_starts
        .iter()
        .map(|m| format!("{}月", m.month()))
        .collect();
    let data: Vec<BigDecimal> = month_starts
        .iter()
        .map(|m| {
            transactions
                .iter()
                .filter(|t| same_month(t.date, *m))
                .map(Transaction::signed_amount)
                .sum::<BigDecimal>()
        })
        .collect();

    TrendSeries {
        labels,
        months: month_starts,
        data,
    }
}

/// Expense totals per category over `period`
pub fn category_breakdown(
    transactions: &[Transaction],
    today: NaiveDate,
    period: StatsPeriod,
) -> CategoryBreakdown {
    let previous = first_of_month(today).checked_sub_months(Months::new(1));
    let in_period = |t: &&Transaction| match period {
        StatsPeriod::CurrentMonth => same_month(t.date, today),
        StatsPeriod::PreviousMonth => previous.is_some_and(|p| same_month(t.date, p)),
        StatsPeriod::AllTime => true,
    };

    let mut by_category: BTreeMap<Category, BigDecimal> = BTreeMap::new();
    for t in transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense)
        .filter(in_period)
    {
        *by_category.entry(t.category).or_default() += &t.amount;
    }

    let mut totals: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, amount)| CategoryTotal { category, amount })
        .collect();
    totals.sort_by(|a, b| b.amount.cmp(&a.amount));

    let total: BigDecimal = totals.iter().map(|c| &c.amount).sum();

    CategoryBreakdown {
        period,
        totals,
        total,
    }
}

/// Per-day income and expense for one month
pub fn calendar_month(
    transactions: &[Transaction],
    year: i32,
    month: u32,
) -> LedgerResult<CalendarMonth> {
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        LedgerError::Validation(format!("Invalid calendar month {}-{}", year, month))
    })?;
    let days_in_month = start
        .checked_add_months(Months::new(1))
        .map(|next| next.signed_duration_since(start).num_days() as u32)
        .ok_or_else(|| {
            LedgerError::Validation(format!("Calendar month {}-{} out of range", year, month))
        })?;

    let mut days: BTreeMap<NaiveDate, CalendarDay> = BTreeMap::new();
    for t in transactions.iter().filter(|t| same_month(t.date, start)) {
        let day = days.entry(t.date).or_insert_with(|| CalendarDay {
            date: t.date,
            income: BigDecimal::from(0),
            expense: BigDecimal::from(0),
            count: 0,
        });
        match t.kind {
            TransactionKind::Income => day.income += &t.amount,
            TransactionKind::Expense => day.expense += &t.amount,
        }
        day.count += 1;
    }

    Ok(CalendarMonth {
        year,
        month,
        days_in_month,
        days: days.into_values().collect(),
    })
}
