use chrono::NaiveDate;
use contracts::dashboards::d400_store_kpi::AverageTicket;

/// Formats an integer with comma thousands separators
///
/// # Examples
/// ```
/// use backend::shared::format::format_number;
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Money with two decimals: `R$1,234.50`
pub fn format_money(currency: &str, amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{}{}{}.{:02}",
        sign,
        currency,
        format_number(cents / 100),
        cents % 100
    )
}

/// Average ticket, or "n/a" when no units were sold
pub fn format_ticket(currency: &str, ticket: AverageTicket) -> String {
    match ticket {
        AverageTicket::Value(v) => format_money(currency, v),
        AverageTicket::Undefined => "n/a".to_string(),
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(42), "42");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(1234567890), "1,234,567,890");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money("R$", 0.0), "R$0.00");
        assert_eq!(format_money("R$", 50.0), "R$50.00");
        assert_eq!(format_money("R$", 1234.5), "R$1,234.50");
        assert_eq!(format_money("$", 1234567.891), "$1,234,567.89");
        assert_eq!(format_money("R$", -12.3), "-R$12.30");
    }

    #[test]
    fn test_format_ticket_and_date() {
        assert_eq!(format_ticket("R$", AverageTicket::Value(100.0)), "R$100.00");
        assert_eq!(format_ticket("R$", AverageTicket::Undefined), "n/a");
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(format_date(date), "09/03/2024");
    }
}
