//! Round Curve amount type
//!
//! Every quantity the curve touches (stable-asset units, distributed-token
//! units, per-round prices, capacities) is an unbounded non-negative integer.
//! There is no floating point anywhere in the pricing path, so two equal call
//! sequences always produce bit-identical quotes.
//!
//! ## Serialization
//!
//! Amounts serialize as decimal strings so that values larger than `u64`
//! survive JSON and TOML. Deserialization also accepts plain integers, which
//! is what TOML files and most config layers produce for small constants.

use crate::errors::CurveError;
use num_bigint::{BigInt, BigUint};
use num_traits::{CheckedSub, ToPrimitive, Zero};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Mul};
use std::str::FromStr;

/// Arbitrary-precision, non-negative integer amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigUint);

impl Amount {
    /// Zero amount
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// `10^exponent`, the fixed-point scale for a token with `exponent` decimals
    pub fn pow10(exponent: u32) -> Self {
        Self(BigUint::from(10u32).pow(exponent))
    }

    /// Check if amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checked subtraction, `None` when `other > self`
    pub fn checked_sub(&self, other: &Amount) -> Option<Amount> {
        self.0.checked_sub(&other.0).map(Amount)
    }

    /// Saturating subtraction
    pub fn saturating_sub(&self, other: &Amount) -> Amount {
        self.checked_sub(other).unwrap_or_default()
    }

    /// Truncating division, `None` on a zero divisor
    pub fn checked_div(&self, divisor: &Amount) -> Option<Amount> {
        if divisor.is_zero() {
            None
        } else {
            Some(Amount(&self.0 / &divisor.0))
        }
    }

    /// Remainder, `None` on a zero divisor
    pub fn checked_rem(&self, divisor: &Amount) -> Option<Amount> {
        if divisor.is_zero() {
            None
        } else {
            Some(Amount(&self.0 % &divisor.0))
        }
    }

    /// `self * mul / div`, truncated toward zero. `None` on a zero divisor.
    ///
    /// The product is formed at full precision before dividing, so no
    /// intermediate truncation happens.
    pub fn mul_div(&self, mul: &Amount, div: &Amount) -> Option<Amount> {
        if div.is_zero() {
            return None;
        }
        Some(Amount(&self.0 * &mul.0 / &div.0))
    }

    /// Absolute difference between two amounts
    pub fn abs_diff(&self, other: &Amount) -> Amount {
        if self >= other {
            Amount(&self.0 - &other.0)
        } else {
            Amount(&other.0 - &self.0)
        }
    }

    /// Convert to `u64` if it fits
    pub fn to_u64(&self) -> Option<u64> {
        self.0.to_u64()
    }

    /// Render as a fixed-point decimal with `decimals` fractional digits,
    /// trimming trailing zeros (display only).
    pub fn to_scaled_string(&self, decimals: u32) -> String {
        if decimals == 0 {
            return self.0.to_string();
        }
        let scale = BigUint::from(10u32).pow(decimals);
        let whole = &self.0 / &scale;
        let fractional = &self.0 % &scale;
        if fractional.is_zero() {
            return whole.to_string();
        }
        let width = decimals as usize;
        let fractional_str = format!("{:0>width$}", fractional.to_string());
        format!("{whole}.{}", fractional_str.trim_end_matches('0'))
    }
}

impl From<u32> for Amount {
    fn from(value: u32) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<BigUint> for Amount {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl TryFrom<i64> for Amount {
    type Error = CurveError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value)
            .map(Amount::from)
            .map_err(|_| CurveError::InvalidInput(format!("negative amount: {value}")))
    }
}

impl TryFrom<i128> for Amount {
    type Error = CurveError;

    fn try_from(value: i128) -> Result<Self, Self::Error> {
        u128::try_from(value)
            .map(Amount::from)
            .map_err(|_| CurveError::InvalidInput(format!("negative amount: {value}")))
    }
}

impl TryFrom<BigInt> for Amount {
    type Error = CurveError;

    fn try_from(value: BigInt) -> Result<Self, Self::Error> {
        value
            .to_biguint()
            .map(Amount)
            .ok_or_else(|| CurveError::InvalidInput(format!("negative amount: {value}")))
    }
}

impl FromStr for Amount {
    type Err = CurveError;

    /// Parse a base-10 integer in minimal units. `_` separators are allowed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with('-') {
            return Err(CurveError::InvalidInput(format!("negative amount: {trimmed}")));
        }
        let digits: String = trimmed
            .strip_prefix('+')
            .unwrap_or(trimmed)
            .chars()
            .filter(|c| *c != '_')
            .collect();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CurveError::InvalidInput(format!("not an integer amount: {s:?}")));
        }
        BigUint::parse_bytes(digits.as_bytes(), 10)
            .map(Amount)
            .ok_or_else(|| CurveError::InvalidInput(format!("not an integer amount: {s:?}")))
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, other: Amount) -> Amount {
        Amount(self.0 + other.0)
    }
}

impl<'a> Add<&'a Amount> for &'a Amount {
    type Output = Amount;

    fn add(self, other: &'a Amount) -> Amount {
        Amount(&self.0 + &other.0)
    }
}

impl AddAssign<&Amount> for Amount {
    fn add_assign(&mut self, other: &Amount) {
        self.0 += &other.0;
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, other: Amount) {
        self.0 += other.0;
    }
}

impl<'a> Mul<&'a Amount> for &'a Amount {
    type Output = Amount;

    fn mul(self, other: &'a Amount) -> Amount {
        Amount(&self.0 * &other.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a decimal integer string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount::from(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Amount, E> {
        Ok(Amount::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        Amount::try_from(v).map_err(E::custom)
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Amount, E> {
        Amount::try_from(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}
