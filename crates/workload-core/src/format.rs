//! Display formatting for hours and money (ru-RU conventions)

pub const EMPTY: &str = "—";
pub const RATE_NOT_SET: &str = "Не установлен";

/// Russian noun form for a count: 1 час, 2 часа, 5 часов
pub fn hours_noun(whole: u64) -> &'static str {
    let last_digit = whole % 10;
    let last_two = whole % 100;
    if last_digit == 1 && last_two != 11 {
        "час"
    } else if (2..=4).contains(&last_digit) && !(12..=14).contains(&last_two) {
        "часа"
    } else {
        "часов"
    }
}

/// `"2.5 часа"`, one decimal at most; zero and missing both render as a dash
pub fn format_hours(hours: Option<f64>) -> String {
    let Some(hours) = hours.filter(|h| *h != 0.0 && h.is_finite()) else {
        return EMPTY.to_string();
    };
    let rounded = (hours * 10.0).round() / 10.0;
    let number = if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{:.1}", rounded)
    };
    format!("{} {}", number, hours_noun(rounded.abs().floor() as u64))
}

/// `HH:MM` rounded to the minute
pub fn format_hours_hm(hours: Option<f64>) -> String {
    let Some(hours) = hours.filter(|h| h.is_finite()) else {
        return EMPTY.to_string();
    };
    let total_minutes = (hours * 60.0).round().max(0.0) as u64;
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

/// Rubles the way ru-RU locales print them: `1 234,5 ₽`
fn rubles(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('\u{a0}');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    let fraction = match fraction {
        0 => String::new(),
        f if f % 10 == 0 => format!(",{}", f / 10),
        f => format!(",{:02}", f),
    };
    format!("{}{}{}\u{a0}₽", sign, grouped, fraction)
}

/// Report amounts; zero and missing render as a dash
pub fn format_currency(amount: Option<f64>) -> String {
    match amount {
        Some(a) if a != 0.0 && a.is_finite() => rubles(a),
        _ => EMPTY.to_string(),
    }
}

/// Employee rate cell; zero is a real rate, missing is "not set"
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(r) if r.is_finite() => rubles(r),
        _ => RATE_NOT_SET.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hours_plural_forms() {
        assert_eq!(format_hours(Some(1.0)), "1 час");
        assert_eq!(format_hours(Some(2.0)), "2 часа");
        assert_eq!(format_hours(Some(5.0)), "5 часов");
        assert_eq!(format_hours(Some(11.0)), "11 часов");
        assert_eq!(format_hours(Some(21.0)), "21 час");
        assert_eq!(format_hours(Some(13.0)), "13 часов");
        assert_eq!(format_hours(Some(1.54)), "1.5 час");
        assert_eq!(format_hours(Some(2.25)), "2.3 часа");
    }

    #[test]
    fn test_hours_empty() {
        assert_eq!(format_hours(None), "—");
        assert_eq!(format_hours(Some(0.0)), "—");
    }

    #[test]
    fn test_hours_hm() {
        assert_eq!(format_hours_hm(Some(1.5)), "01:30");
        assert_eq!(format_hours_hm(Some(0.0)), "00:00");
        assert_eq!(format_hours_hm(Some(12.26)), "12:16");
        assert_eq!(format_hours_hm(None), "—");
    }

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(Some(1234.0)), "1\u{a0}234\u{a0}₽");
        assert_eq!(format_currency(Some(1234567.5)), "1\u{a0}234\u{a0}567,5\u{a0}₽");
        assert_eq!(format_currency(Some(99.99)), "99,99\u{a0}₽");
        assert_eq!(format_currency(Some(0.0)), "—");
        assert_eq!(format_currency(None), "—");
    }

    #[test]
    fn test_rate() {
        assert_eq!(format_rate(None), "Не установлен");
        assert_eq!(format_rate(Some(0.0)), "0\u{a0}₽");
        assert_eq!(format_rate(Some(150000.0)), "150\u{a0}000\u{a0}₽");
    }
}
