use std::{fmt, str::FromStr};

use crate::EngineError;

/// Amount of money in whole currency units.
///
/// Values are plain `f64`; the wrapper only decides how they are shown to and
/// read from a user.
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// assert_eq!(Amount::new(1234.4).to_string(), "$1,234");
/// assert_eq!(Amount::new(-200.0).to_string(), "-$200");
/// assert_eq!("$1,234".parse::<Amount>().unwrap().value(), 1234.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Amount(f64);

impl Amount {
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Parses `input`, returning `fallback` when it is not a valid amount.
    #[must_use]
    pub fn parse_or(input: &str, fallback: f64) -> f64 {
        input
            .parse::<Amount>()
            .map(Amount::value)
            .unwrap_or(fallback)
    }
}

/// Formats `value` rounded to whole units with `,` thousands separators and
/// no currency symbol.
#[must_use]
pub fn format_number(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    format!("{sign}{}", group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.0.round();
        let sign = if rounded < 0.0 { "-" } else { "" };
        write!(f, "{sign}${}", format_number(rounded.abs()))
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<Amount> for f64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl FromStr for Amount {
    type Err = EngineError;

    /// Parses user input such as `$1,234.50`, `1234` or `-200`.
    ///
    /// `$`, `,` and whitespace are ignored. Empty, non-numeric and
    /// non-finite input is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s
            .chars()
            .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
            .collect();
        if cleaned.is_empty() {
            return Err(EngineError::InvalidAmount("empty amount".to_string()));
        }
        let value: f64 = cleaned
            .parse()
            .map_err(|_| EngineError::InvalidAmount(format!("invalid amount: {}", s.trim())))?;
        if !value.is_finite() {
            return Err(EngineError::InvalidAmount(format!(
                "amount is not finite: {}",
                s.trim()
            )));
        }
        Ok(Amount(value))
    }
}
