//! Brazilian money and date formatting for ledger and schedule display

use crate::schedule::{parse_event_time, sao_paulo};

/// Format as Brazilian reais, e.g. `R$ 1.234,56` or `-R$ 500,75`
pub fn format_money(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };

    format!(
        "{sign}R$ {},{:02}",
        group_thousands(cents / 100),
        cents % 100
    )
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// `dd/mm/yyyy HH:MM:SS` in São Paulo time; unparsable input comes back unchanged
pub fn format_date(iso_date: &str) -> String {
    match parse_event_time(iso_date) {
        Some(at) => at
            .with_timezone(&sao_paulo())
            .format("%d/%m/%Y %H:%M:%S")
            .to_string(),
        None => iso_date.to_string(),
    }
}
