//! Receipt scanning example with a canned OCR engine

use async_trait::async_trait;
use chrono::Local;
use household_ledger::utils::{format_jpy, MemoryStorage};
use household_ledger::{
    Category, Ledger, OcrEngine, OcrError, OcrProgress, ReceiptParser, ReceiptScanner,
    TransactionDraft, RECOGNIZING_TEXT,
};
use tracing_subscriber::EnvFilter;

/// Stands in for a real OCR engine by returning prepared text
struct CannedOcr {
    text: String,
}

#[async_trait]
impl OcrEngine for CannedOcr {
    async fn recognize(
        &self,
        _image: &[u8],
        _language: &str,
        progress: &(dyn Fn(OcrProgress) + Send + Sync),
    ) -> Result<String, OcrError> {
        for step in 0..=4 {
            progress(OcrProgress::new(RECOGNIZING_TEXT, step as f32 / 4.0));
        }
        Ok(self.text.clone())
    }
}

const RECEIPTS: [&str; 3] = [
    "ファミリーマート 渋谷店\n東京都渋谷区1-2-3\n2024年06月18日(火) 12:41\nおにぎり ¥150\nお茶 ¥128\n合計 ¥278\nお預り ¥1,000\nお釣り ¥722",
    "やさい村\nTEL 03-5555-0101\nトマト 298\nきゅうり 158\nレジ番号 0042",
    "THANK YOU\n",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    println!("🧾 Household Ledger - Receipt Scan Example\n");

    let mut ledger = Ledger::new(MemoryStorage::new());
    let today = Local::now().date_naive();

    for (i, text) in RECEIPTS.iter().enumerate() {
        let scanner = ReceiptScanner::with_parser(
            CannedOcr {
                text: text.to_string(),
            },
            ReceiptParser::default(),
        );

        let mut draft = TransactionDraft::new(today);
        draft.category = Category::Food;
        let parsed = scanner.scan_into(b"<image bytes>", &mut draft).await?;

        println!("Receipt #{}", i + 1);
        println!("  date:   {}", parsed.date);
        println!("  title:  {}", parsed.title.as_deref().unwrap_or("(none)"));
        println!(
            "  amount: {}",
            parsed
                .amount
                .map(|a| format_jpy(&a.into()))
                .unwrap_or_else(|| "(none)".to_string())
        );

        match draft.into_transaction() {
            Ok(transaction) => {
                let saved = ledger.add_transaction(transaction).await?;
                println!("  ✓ saved as {}\n", saved.id);
            }
            Err(e) => println!("  ✗ needs manual input: {}\n", e),
        }
    }

    println!("{} receipts recorded", ledger.list_transactions().await?.len());
    Ok(())
}
