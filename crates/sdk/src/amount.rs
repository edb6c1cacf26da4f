//! Exact monetary amounts.

use std::fmt;

// ---------------------------------------------------------------------------
// AmountError
// ---------------------------------------------------------------------------

/// Why an input failed to become an [`Amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountError {
    /// The input was not a finite number.
    NotFinite,
    /// The input was zero or negative.
    NotPositive,
    /// The input had more than 2 decimal places.
    TooPrecise,
}

// Messages match the form-level texts users see.
impl fmt::Display for AmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFinite => write!(f, "Amount must be a number"),
            Self::NotPositive => write!(f, "Amount must be positive"),
            Self::TooPrecise => write!(f, "Amount must have at most 2 decimal places"),
        }
    }
}

impl std::error::Error for AmountError {}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// A positive monetary amount with exactly 2 decimal places.
///
/// Stored as integer minor units (cents), so construction-time
/// validation is exact and equality is well-defined. Once an `Amount`
/// exists, `> 0` and 2-decimal precision hold by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u64);

impl Amount {
    /// Validates a numeric input.
    ///
    /// Rejects non-finite values, zero and negatives, and anything with
    /// more than 2 decimal places.
    pub fn from_f64(value: f64) -> Result<Self, AmountError> {
        if !value.is_finite() {
            return Err(AmountError::NotFinite);
        }
        if value <= 0.0 {
            return Err(AmountError::NotPositive);
        }
        let scaled = value * 100.0;
        let rounded = scaled.round();
        // Tolerance absorbs float noise (0.29 * 100 != 29 exactly) while
        // still rejecting genuine third decimals.
        if (scaled - rounded).abs() > 1e-6 {
            return Err(AmountError::TooPrecise);
        }
        Ok(Self(rounded as u64))
    }

    /// Validates a text input (trimmed).
    pub fn parse(input: &str) -> Result<Self, AmountError> {
        let value: f64 = input.trim().parse().map_err(|_| AmountError::NotFinite)?;
        Self::from_f64(value)
    }

    /// The amount in minor units (cents).
    pub const fn minor_units(self) -> u64 {
        self.0
    }

    /// The amount in major units, as sent on the wire.
    pub fn to_major(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_two_decimal_values() {
        assert_eq!(Amount::from_f64(40.55).unwrap().minor_units(), 4055);
        assert_eq!(Amount::from_f64(0.01).unwrap().minor_units(), 1);
        assert_eq!(Amount::from_f64(100.0).unwrap().minor_units(), 10_000);
    }

    #[test]
    fn rejects_zero_and_negative() {
        assert_eq!(Amount::from_f64(0.0), Err(AmountError::NotPositive));
        assert_eq!(Amount::from_f64(-5.0), Err(AmountError::NotPositive));
    }

    #[test]
    fn rejects_non_finite() {
        assert_eq!(Amount::from_f64(f64::NAN), Err(AmountError::NotFinite));
        assert_eq!(Amount::from_f64(f64::INFINITY), Err(AmountError::NotFinite));
    }

    #[test]
    fn rejects_third_decimals() {
        assert_eq!(Amount::from_f64(40.555), Err(AmountError::TooPrecise));
        assert_eq!(Amount::from_f64(0.001), Err(AmountError::TooPrecise));
    }

    #[test]
    fn float_noise_is_tolerated() {
        // 0.29 is not exactly representable; 0.29 * 100 = 28.999999...
        assert_eq!(Amount::from_f64(0.29).unwrap().minor_units(), 29);
    }

    #[test]
    fn parse_accepts_text_input() {
        assert_eq!(Amount::parse(" 12.50 ").unwrap().minor_units(), 1250);
        assert_eq!(Amount::parse("abc"), Err(AmountError::NotFinite));
        assert_eq!(Amount::parse("-1"), Err(AmountError::NotPositive));
    }

    #[test]
    fn display_keeps_two_decimals() {
        assert_eq!(Amount::from_f64(7.5).unwrap().to_string(), "7.50");
        assert_eq!(Amount::from_f64(100.0).unwrap().to_string(), "100.00");
    }

    #[test]
    fn round_trips_to_major_units() {
        let amount = Amount::from_f64(123.45).unwrap();
        assert_eq!(amount.to_major(), 123.45);
    }
}
