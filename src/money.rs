//! Whole-unit currency formatting for dashboard cards.
//!
//! Only a handful of locales and currencies are known. Anything else falls
//! back to `"{rounded} {CODE}"`.

#[derive(Debug, Clone, Copy)]
struct LocaleRules {
    group_separator: &'static str,
    /// Integers with fewer digits than this are printed without grouping.
    min_grouping_digits: usize,
    symbol_after: bool,
    /// Goes between the number and a trailing symbol.
    symbol_gap: &'static str,
}

const NBSP: &str = "\u{a0}";
const NARROW_NBSP: &str = "\u{202f}";

fn locale_rules(locale: &str) -> Option<LocaleRules> {
    let rules = match locale.to_ascii_lowercase().replace('_', "-").as_str() {
        "es-es" | "es" => LocaleRules {
            group_separator: ".",
            min_grouping_digits: 5,
            symbol_after: true,
            symbol_gap: NBSP,
        },
        "de-de" | "de" => LocaleRules {
            group_separator: ".",
            min_grouping_digits: 4,
            symbol_after: true,
            symbol_gap: NBSP,
        },
        "fr-fr" | "fr" => LocaleRules {
            group_separator: NARROW_NBSP,
            min_grouping_digits: 4,
            symbol_after: true,
            symbol_gap: NBSP,
        },
        "en-us" | "en-gb" | "en" => LocaleRules {
            group_separator: ",",
            min_grouping_digits: 4,
            symbol_after: false,
            symbol_gap: "",
        },
        _ => return None,
    };
    Some(rules)
}

fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency.to_ascii_uppercase().as_str() {
        "EUR" => Some("€"),
        "USD" => Some("$"),
        "GBP" => Some("£"),
        _ => None,
    }
}

/// Formats `amount` rounded to whole units (half away from zero).
pub fn format_currency(amount: f64, locale: &str, currency: &str) -> String {
    let rounded = if amount.is_finite() { amount.round() } else { 0.0 };
    // Avoid printing "-0".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };

    let (Some(rules), Some(symbol)) = (locale_rules(locale), currency_symbol(currency)) else {
        return format!("{rounded:.0} {}", currency.to_ascii_uppercase());
    };

    let digits = format!("{:.0}", rounded.abs());
    let grouped = group_digits(&digits, rules.group_separator, rules.min_grouping_digits);
    let sign = if rounded < 0.0 { "-" } else { "" };

    if rules.symbol_after {
        format!("{sign}{grouped}{}{symbol}", rules.symbol_gap)
    } else {
        format!("{sign}{symbol}{grouped}")
    }
}

fn group_digits(digits: &str, separator: &str, min_grouping_digits: usize) -> String {
    if digits.len() < min_grouping_digits {
        return digits.to_string();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    let lead = digits.len() % 3;
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (index + 3 - lead) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spanish_euros_skip_grouping_below_five_digits() {
        assert_eq!(format_currency(1000.0, "es-ES", "EUR"), "1000\u{a0}€");
        assert_eq!(format_currency(12345.4, "es-ES", "EUR"), "12.345\u{a0}€");
        assert_eq!(format_currency(1234567.0, "es-ES", "EUR"), "1.234.567\u{a0}€");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(format_currency(199.5, "en-US", "USD"), "$200");
        assert_eq!(format_currency(-199.5, "en-US", "USD"), "-$200");
        assert_eq!(format_currency(-0.4, "en-US", "USD"), "$0");
    }

    #[test]
    fn english_locales_prefix_the_symbol() {
        assert_eq!(format_currency(1000.0, "en-US", "USD"), "$1,000");
        assert_eq!(format_currency(987654.0, "en-GB", "GBP"), "£987,654");
        assert_eq!(format_currency(-2500.0, "de-DE", "EUR"), "-2.500\u{a0}€");
    }

    #[test]
    fn unknown_locale_or_currency_uses_plain_fallback() {
        assert_eq!(format_currency(1000.4, "xx-YY", "EUR"), "1000 EUR");
        assert_eq!(format_currency(1000.0, "es-ES", "jpy"), "1000 JPY");
        assert_eq!(format_currency(f64::NAN, "zz", "ABC"), "0 ABC");
    }

    #[test]
    fn groups_every_three_digits() {
        assert_eq!(group_digits("100", ",", 4), "100");
        assert_eq!(group_digits("1000", ",", 4), "1,000");
        assert_eq!(group_digits("100000", ",", 4), "100,000");
        assert_eq!(group_digits("1000000", ",", 4), "1,000,000");
    }
}
