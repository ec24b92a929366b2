//! Display helpers for yen amounts

use bigdecimal::BigDecimal;

/// Format as whole yen with thousands separators: `¥1,234`, `-¥80,000`
pub fn format_jpy(amount: &BigDecimal) -> String {
    let rounded = amount.round(0);
    let negative = rounded < BigDecimal::from(0);
    let digits = rounded.abs().with_scale(0).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if negative {
        format!("-¥{}", grouped)
    } else {
        format!("¥{}", grouped)
    }
}
