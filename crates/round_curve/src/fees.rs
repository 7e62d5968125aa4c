//! Proportional fee model
//!
//! The fee rate is `numerator / (100 * denominator)`; the reference deployment
//! uses 50_000 / (100 * 10_000) = 5%. Fees are always denominated in stable
//! units and are applied once, at the stable boundary of a conversion.
//!
//! Both directions truncate toward zero. Grossing a net amount up and then
//! extracting the fee again returns either the original net amount or one
//! unit less; the two formulas apply the same rate to complementary bases and
//! truncation can only lose value.

use crate::amount::Amount;
use crate::errors::CurveError;
use crate::params::CurveParams;
use serde::{Deserialize, Serialize};

/// Split of a stable amount into its net part and the fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    pub gross: Amount,
    pub net: Amount,
    pub fee: Amount,
}

impl FeeSplit {
    fn from_gross_and_net(gross: Amount, net: Amount) -> Result<Self, CurveError> {
        let fee = gross
            .checked_sub(&net)
            .ok_or(CurveError::CalculationOverflow("fee exceeds gross amount"))?;
        Ok(Self { gross, net, fee })
    }
}

/// Fee rate bound to one parameter set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeModel {
    numerator: Amount,
    /// `100 * denominator`
    base: Amount,
}

impl FeeModel {
    pub fn new(numerator: u64, denominator: u64) -> Result<Self, CurveError> {
        if denominator == 0 {
            return Err(CurveError::InvalidParameter(
                "fee_rate_denominator must be positive",
            ));
        }
        Ok(Self {
            numerator: Amount::from(numerator),
            base: Amount::from(100u128 * denominator as u128),
        })
    }

    pub fn from_params(p: &CurveParams) -> Result<Self, CurveError> {
        Self::new(p.fee_rate_numerator, p.fee_rate_denominator)
    }

    /// Take the fee out of a stated gross amount.
    ///
    /// `net = gross * base / (base + numerator)`, `fee = gross - net`.
    pub fn extract_fee(&self, gross: &Amount) -> Result<FeeSplit, CurveError> {
        let divisor = &self.base + &self.numerator;
        let net = gross
            .mul_div(&self.base, &divisor)
            .ok_or(CurveError::InvalidParameter("fee divisor is zero"))?;
        FeeSplit::from_gross_and_net(gross.clone(), net)
    }

    /// Gross a net amount up so the fee rides on top of it.
    ///
    /// `gross = net + net * numerator / base`, `fee = gross - net`.
    pub fn grow_for_fee(&self, net: &Amount) -> Result<FeeSplit, CurveError> {
        let fee = net
            .mul_div(&self.numerator, &self.base)
            .ok_or(CurveError::InvalidParameter("fee divisor is zero"))?;
        Ok(FeeSplit {
            gross: net + &fee,
            net: net.clone(),
            fee,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> FeeModel {
        FeeModel::from_params(&CurveParams::default()).unwrap()
    }

    #[test]
    fn test_extract_fee_reference_rate() {
        let split = reference().extract_fee(&Amount::from(1_000_000u64)).unwrap();
        assert_eq!(split.net, Amount::from(952_380u64));
        assert_eq!(split.fee, Amount::from(47_620u64));
        assert_eq!(split.gross, Amount::from(1_000_000u64));
    }

    #[test]
    fn test_grow_for_fee_reference_rate() {
        let split = reference().grow_for_fee(&Amount::from(1_000_000u64)).unwrap();
        assert_eq!(split.gross, Amount::from(1_050_000u64));
        assert_eq!(split.fee, Amount::from(50_000u64));
    }

    #[test]
    fn test_zero_amounts() {
        let fees = reference();
        let out = fees.extract_fee(&Amount::zero()).unwrap();
        assert!(out.net.is_zero() && out.fee.is_zero());
        let up = fees.grow_for_fee(&Amount::zero()).unwrap();
        assert!(up.gross.is_zero() && up.fee.is_zero());
    }

    #[test]
    fn test_round_trip_loses_at_most_one_unit() {
        let fees = reference();
        for net in [0u64, 1, 19, 20, 21, 999, 1_000_000, 1_904_761, 123_456_789] {
            let net = Amount::from(net);
            let gross = fees.grow_for_fee(&net).unwrap().gross;
            let back = fees.extract_fee(&gross).unwrap().net;
            assert!(back <= net);
            assert!(net.abs_diff(&back) <= Amount::from(1u64));
        }
    }

    #[test]
    fn test_round_trip_exact_on_rate_multiples() {
        // 5% rate: multiples of 20 gross up without truncation
        let fees = reference();
        let net = Amount::from(2_000u64);
        let gross = fees.grow_for_fee(&net).unwrap().gross;
        assert_eq!(fees.extract_fee(&gross).unwrap().net, net);
    }

    #[test]
    fn test_zero_rate() {
        let fees = FeeModel::new(0, 10_000).unwrap();
        let split = fees.extract_fee(&Amount::from(777u64)).unwrap();
        assert_eq!(split.net, Amount::from(777u64));
        assert!(split.fee.is_zero());
    }

    #[test]
    fn test_zero_denominator_rejected() {
        assert!(matches!(
            FeeModel::new(50_000, 0),
            Err(CurveError::InvalidParameter(_))
        ));
    }
}
