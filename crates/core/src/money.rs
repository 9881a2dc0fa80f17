//! Money in integer minor units.
//!
//! Amounts are stored and summed as cents. Conversion to a major-unit string
//! happens only when rendering text, and never changes the stored integer.

use core::iter::Sum;
use core::ops::Add;
use serde::{Deserialize, Serialize};

/// An amount of money in minor units (cents).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Major-unit amount with thousands grouping and only the decimals the
    /// value naturally has: `500000` → `5,000`, `123450` → `1,234.5`,
    /// `123456` → `1,234.56`.
    pub fn major_units(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = group_thousands(abs / 100);
        let frac = abs % 100;

        if frac == 0 {
            format!("{sign}{whole}")
        } else if frac % 10 == 0 {
            format!("{sign}{whole}.{}", frac / 10)
        } else {
            format!("{sign}{whole}.{frac:02}")
        }
    }
}

/// Renders as a dollar amount, e.g. `$5,000`.
impl core::fmt::Display for Cents {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let major = self.major_units();
        match major.strip_prefix('-') {
            Some(rest) => write!(f, "-${rest}"),
            None => write!(f, "${major}"),
        }
    }
}

impl Add for Cents {
    type Output = Cents;

    fn add(self, rhs: Cents) -> Cents {
        Cents(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Cents>>(iter: I) -> Self {
        iter.fold(Cents::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Cents> for Cents {
    fn sum<I: Iterator<Item = &'a Cents>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
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
    use proptest::prelude::*;

    #[test]
    fn whole_amounts_have_no_decimals() {
        assert_eq!(Cents::new(500_000).to_string(), "$5,000");
        assert_eq!(Cents::new(0).to_string(), "$0");
        assert_eq!(Cents::new(99_900).to_string(), "$999");
        assert_eq!(Cents::new(123_456_700).to_string(), "$1,234,567");
    }

    #[test]
    fn fractional_amounts_keep_only_natural_decimals() {
        assert_eq!(Cents::new(123_450).major_units(), "1,234.5");
        assert_eq!(Cents::new(123_456).major_units(), "1,234.56");
        assert_eq!(Cents::new(5).major_units(), "0.05");
        assert_eq!(Cents::new(50).major_units(), "0.5");
    }

    #[test]
    fn negative_amounts_put_the_sign_before_the_currency() {
        assert_eq!(Cents::new(-250_000).to_string(), "-$2,500");
    }

    #[test]
    fn sum_stays_in_minor_units() {
        let total: Cents = [Cents::new(150), Cents::new(250)].iter().sum();
        assert_eq!(total, Cents::new(400));
        assert_eq!(total.major_units(), "4");
    }

    proptest! {
        #[test]
        fn grouping_round_trips_to_the_same_integer(cents in 0i64..10_000_000_000) {
            let rendered = Cents::new(cents).major_units();
            let digits: String = rendered.chars().filter(|c| *c != ',').collect();
            let (whole, frac) = match digits.split_once('.') {
                Some((w, f)) => (w.to_string(), f.to_string()),
                None => (digits.clone(), String::new()),
            };
            let whole: i64 = whole.parse().unwrap();
            let frac_cents: i64 = match frac.len() {
                0 => 0,
                1 => frac.parse::<i64>().unwrap() * 10,
                _ => frac.parse::<i64>().unwrap(),
            };
            prop_assert_eq!(whole * 100 + frac_cents, cents);
        }
    }
}
