//! Household dashboard walkthrough

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use household_ledger::utils::{format_jpy, MemoryStorage};
use household_ledger::{
    BalanceTrend, Category, DashboardConfig, Ledger, StatsPeriod, Transaction,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("📒 Household Ledger - Dashboard Example\n");

    let storage = MemoryStorage::new();
    let mut ledger = Ledger::new(storage.clone());
    let today = NaiveDate::from_ymd_opt(2024, 6, 20).unwrap();

    // 1. Sample data and recurring costs
    ledger.seed_demo_data(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()).await?;
    ledger.check_and_generate(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()).await?;

    ledger
        .add_transaction(Transaction::expense(
            NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
            "スーパー".to_string(),
            BigDecimal::from(6840),
            Category::Food,
        ))
        .await?;
    ledger
        .add_transaction(Transaction::expense(
            NaiveDate::from_ymd_opt(2024, 6, 9).unwrap(),
            "定期券".to_string(),
            BigDecimal::from(12800),
            Category::Transport,
        ))
        .await?;
    ledger
        .add_transaction(Transaction::income(
            NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(),
            "給与".to_string(),
            BigDecimal::from(310000),
            Category::Salary,
        ))
        .await?;

    // 2. Subscriptions since the last visit
    let generated = ledger.check_and_generate(today).await?;
    println!("🔁 Recorded {} subscription charges:", generated.len());
    for t in &generated {
        println!("  ✓ {} {} {}", t.date, t.title, format_jpy(&t.amount));
    }
    println!();

    // 3. Debts
    let loan = ledger
        .add_debt(
            "奨学金".to_string(),
            BigDecimal::from(1200000),
            BigDecimal::from(15000),
        )
        .await?;
    let (loan, _) = ledger
        .repay_debt(&loan.id, BigDecimal::from(15000), today)
        .await?;
    println!("🏦 {} remaining: {}\n", loan.name, format_jpy(&loan.balance));

    // 4. Dashboard
    let snapshot = ledger.dashboard(today, &DashboardConfig::default()).await?;
    println!("📊 This month");
    println!("  Income:  {}", format_jpy(&snapshot.stats.income));
    println!("  Expense: {}", format_jpy(&snapshot.stats.expense));
    println!(
        "  Balance: {} ({})",
        format_jpy(&snapshot.stats.total_balance),
        match snapshot.stats.trend {
            BalanceTrend::Healthy => "健全",
            BalanceTrend::Deficit => "赤字",
        }
    );
    println!("  Debt:    {}\n", format_jpy(&snapshot.total_debt));

    println!("🕒 Recent");
    for t in &snapshot.recent {
        println!(
            "  {} {:<16} {:>10} {}",
            t.date.format("%Y/%m/%d"),
            t.title,
            format_jpy(&t.signed_amount()),
            t.category.label()
        );
    }
    println!();

    println!("📈 Trend");
    for (label, value) in snapshot.trend.labels.iter().zip(&snapshot.trend.data) {
        println!("  {:>4} {}", label, format_jpy(value));
    }
    println!();

    let breakdown = ledger
        .category_breakdown(today, StatsPeriod::CurrentMonth)
        .await?;
    println!("🍰 Expenses by category");
    for entry in &breakdown.totals {
        println!("  {:<8} {}", entry.category.label(), format_jpy(&entry.amount));
    }
    println!();

    let calendar = ledger.calendar_month(2024, 6).await?;
    println!("📅 June activity ({} days)", calendar.days_in_month);
    for day in &calendar.days {
        println!(
            "  {} +{} -{}",
            day.date.format("%d"),
            format_jpy(&day.income),
            format_jpy(&day.expense)
        );
    }

    println!("\n💾 Snapshot size: {} bytes", storage.export_json()?.len());
    Ok(())
}
