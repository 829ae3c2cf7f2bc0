//! Text rendering and parsing shared by the numeric and temporal kinds.

use num_format::{Locale, ToFormattedString};

/// `chrono` pattern of Date text, `dd/mm/yyyy`.
pub const DATE_PATTERN: &str = "%d/%m/%Y";
/// `chrono` pattern of Time text, `HH:mm`.
pub const TIME_PATTERN: &str = "%H:%M";

/// Display settings of a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    /// Digit grouping and decimal separator.
    pub locale: Locale,
    pub currency_symbol: String,
    /// `$12.50` when set, `12.50 $` otherwise.
    pub currency_symbol_first: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            locale: Locale::en,
            currency_symbol: "$".to_string(),
            currency_symbol_first: true,
        }
    }
}

impl FormatConfig {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            ..Self::default()
        }
    }

    pub fn with_currency(mut self, symbol: impl Into<String>, first: bool) -> Self {
        self.currency_symbol = symbol.into();
        self.currency_symbol_first = first;
        self
    }

    /// `1234567` -> `1,234,567` under `Locale::en`.
    pub fn group(&self, value: u64) -> String {
        value.to_formatted_string(&self.locale)
    }

    /// Inverse of [`FormatConfig::group`]; ungrouped digits parse as well.
    pub fn parse_grouped(&self, text: &str) -> Option<u64> {
        let separator = self.locale.separator();
        let digits = if separator.is_empty() {
            text.trim().to_string()
        } else {
            text.trim().replace(separator, "")
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// Renders integer cents as a locale amount with the currency symbol.
    pub fn currency(&self, cents: u64) -> String {
        let amount = format!(
            "{}{}{:02}",
            self.group(cents / 100),
            self.locale.decimal(),
            cents % 100
        );
        if self.currency_symbol_first {
            format!("{}{}", self.currency_symbol, amount)
        } else {
            format!("{} {}", amount, self.currency_symbol)
        }
    }

    /// Parses a currency amount into cents. Fraction digits past the second
    /// are truncated; the symbol is optional.
    pub fn parse_currency(&self, text: &str) -> Option<u64> {
        let text = text.trim();
        let bare = if self.currency_symbol.is_empty() {
            text
        } else {
            text.strip_prefix(self.currency_symbol.as_str())
                .or_else(|| text.strip_suffix(self.currency_symbol.as_str()))
                .unwrap_or(text)
                .trim()
        };

        let (units, fraction) = match bare.rsplit_once(self.locale.decimal()) {
            Some((units, fraction)) => (units, fraction),
            None => (bare, ""),
        };
        let units = if units.is_empty() && !fraction.is_empty() {
            0
        } else {
            self.parse_grouped(units)?
        };

        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let cents: u64 = fraction
            .bytes()
            .chain(std::iter::repeat(b'0'))
            .take(2)
            .fold(0, |acc, b| acc * 10 + u64::from(b - b'0'));

        units.checked_mul(100)?.checked_add(cents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouping_follows_locale() {
        let en = FormatConfig::default();
        assert_eq!(en.group(1_234_567), "1,234,567");
        assert_eq!(en.parse_grouped("1,234,567"), Some(1_234_567));
        assert_eq!(en.parse_grouped("42"), Some(42));
        assert_eq!(en.parse_grouped("4x2"), None);
        assert_eq!(en.parse_grouped(""), None);

        let de = FormatConfig::new(Locale::de);
        assert_eq!(de.group(1_234_567), "1.234.567");
        assert_eq!(de.parse_grouped("1.234.567"), Some(1_234_567));
    }

    #[test]
    fn currency_renders_cents() {
        let en = FormatConfig::default();
        assert_eq!(en.currency(123_456), "$1,234.56");
        assert_eq!(en.currency(5), "$0.05");

        let de = FormatConfig::new(Locale::de).with_currency("€", false);
        assert_eq!(de.currency(123_456), "1.234,56 €");
    }

    #[test]
    fn currency_parses_and_truncates() {
        let en = FormatConfig::default();
        assert_eq!(en.parse_currency("$1,234.56"), Some(123_456));
        assert_eq!(en.parse_currency("12"), Some(1200));
        assert_eq!(en.parse_currency("12.5"), Some(1250));
        assert_eq!(en.parse_currency("0.129"), Some(12));
        assert_eq!(en.parse_currency(".5"), Some(50));
        assert_eq!(en.parse_currency("$abc"), None);
        assert_eq!(en.parse_currency("-1.00"), None);

        let de = FormatConfig::new(Locale::de).with_currency("€", false);
        assert_eq!(de.parse_currency("1.234,56 €"), Some(123_456));
    }
}
