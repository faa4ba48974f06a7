pub mod panels;
pub mod plot;
pub mod table;

/// Placeholder shown by every chart or table with nothing to draw.
pub const NO_DATA: &str = "No data available for the current filters.";

/// Format a dollar amount with thousands separators and no decimals,
/// e.g. `$120,000`.
pub fn format_usd(value: f64) -> String {
    format!("${}", group_thousands(value.round() as i64))
}

/// Format an integer with `,` thousands separators.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usd_formatting() {
        assert_eq!(format_usd(0.0), "$0");
        assert_eq!(format_usd(999.4), "$999");
        assert_eq!(format_usd(120_000.0), "$120,000");
        assert_eq!(format_usd(1_234_567.6), "$1,234,568");
        assert_eq!(group_thousands(-4_500), "-4,500");
    }
}
