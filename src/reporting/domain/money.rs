use std::fmt;

use serde::{Serialize, Serializer};

/// A dollar amount stored as a whole number of cents.
///
/// The amount is always represented as an integer so that report totals do
/// not have to deal with floating point precision errors. Values serialize as
/// decimal strings (`"123.45"`), never as floats.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Amount {
    cents: i64,
}

impl Amount {
    pub const ZERO: Self = Self { cents: 0 };

    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    pub const fn cents(self) -> i64 {
        self.cents
    }

    pub const fn is_negative(self) -> bool {
        self.cents < 0
    }

    pub const fn saturating_add(self, other: Self) -> Self {
        Self {
            cents: self.cents.saturating_add(other.cents),
        }
    }

    /// Divide a total evenly across `count` items, rounding half-up to the
    /// nearest cent.
    ///
    /// A zero `count` yields zero rather than an error; sparse ranges with no
    /// transactions are a normal case for the report.
    pub fn average(total: Self, count: u64) -> Self {
        if count == 0 {
            return Self::ZERO;
        }

        let count = i64::try_from(count).unwrap_or(i64::MAX);
        Self {
            cents: (total.cents + count / 2) / count,
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Preserve the sign, but then do string manipulation on the absolute
        // value so we don't have to worry about a negative sign.
        let sign = if self.cents.is_negative() { "-" } else { "" };

        // We have to pad the value in order to ensure the string is long
        // enough to insert the decimal point at the appropriate location.
        let padded = format!("{:0>3}", self.cents.unsigned_abs());
        let decimal_location = padded.len() - 2;

        let whole_part = &padded[..decimal_location];
        let decimal_part = &padded[decimal_location..];

        write!(f, "{}{}.{}", sign, whole_part, decimal_part)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn format_value_longer_than_padding() {
        let amount = Amount::from_cents(12345);

        assert_eq!("123.45", amount.to_string());
    }

    #[test]
    fn format_value_with_only_tens_place() {
        let amount = Amount::from_cents(70);

        assert_eq!("0.70", amount.to_string());
    }

    #[test]
    fn format_value_with_only_hundreds_place() {
        let amount = Amount::from_cents(7);

        assert_eq!("0.07", amount.to_string());
    }

    #[test]
    fn format_negative_value() {
        let amount = Amount::from_cents(-7);

        assert_eq!("-0.07", amount.to_string());
    }

    #[test]
    fn average_rounds_half_up() {
        // $200.00 over three deposits is 6,666.66... cents.
        let average = Amount::average(Amount::from_cents(20_000), 3);

        assert_eq!(Amount::from_cents(6_667), average);
        assert_eq!("66.67", average.to_string());
    }

    #[test]
    fn average_exact_half_rounds_up() {
        let average = Amount::average(Amount::from_cents(5), 2);

        assert_eq!(Amount::from_cents(3), average);
    }

    #[test]
    fn average_of_zero_count_is_zero() {
        let average = Amount::average(Amount::from_cents(20_000), 0);

        assert_eq!(Amount::ZERO, average);
    }

    #[test]
    fn serializes_as_decimal_string() {
        let serialized = serde_json::to_string(&Amount::from_cents(104_050))
            .expect("amount should serialize");

        assert_eq!(r#""1040.50""#, serialized);
    }
}
