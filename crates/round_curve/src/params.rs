use crate::amount::Amount;
use crate::errors::CurveError;
use crate::types::RoundIndex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Reference distributed-token decimals (`S = 10^7`).
pub const DEFAULT_DST_DECIMALS: u32 = 7;
/// Reference fee numerator; with the default denominator this is 5%.
pub const DEFAULT_FEE_RATE_NUMERATOR: u64 = 50_000;
/// Reference fee denominator; the rate is `numerator / (100 * denominator)`.
pub const DEFAULT_FEE_RATE_DENOMINATOR: u64 = 10_000;

/// Deployment constants of the price ladder and fee.
///
/// Fixed at construction; the engine never tunes them at runtime. Missing
/// fields in a config file fall back to the reference deployment values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveParams {
    /// Distributed-token units sold per round. Default: 1_000_000 tokens at 7 decimals.
    pub round_volume: Amount,
    /// Price increment per round, in stable units per `10^dst_decimals` tokens.
    pub price_step: Amount,
    /// First round priced by the step ladder.
    pub start_round: RoundIndex,
    /// Floor price for rounds before `start_round`.
    pub base_price: Amount,
    pub fee_rate_numerator: u64,
    pub fee_rate_denominator: u64,
    /// Decimals of the distributed token.
    pub dst_decimals: u32,
}

impl Default for CurveParams {
    fn default() -> Self {
        // 1_000_000 whole tokens per round at 7 decimals
        let round_volume = Amount::from(1_000_000u64 * 10u64.pow(DEFAULT_DST_DECIMALS));

        Self {
            round_volume,
            price_step: Amount::from(1u64),
            start_round: 1,
            base_price: Amount::from(1u64),
            fee_rate_numerator: DEFAULT_FEE_RATE_NUMERATOR,
            fee_rate_denominator: DEFAULT_FEE_RATE_DENOMINATOR,
            dst_decimals: DEFAULT_DST_DECIMALS,
        }
    }
}

impl CurveParams {
    /// Reject configurations the walks cannot run on.
    pub fn validate(&self) -> Result<(), CurveError> {
        let rejection = if self.round_volume.is_zero() {
            Some("round_volume must be positive")
        } else if self.price_step.is_zero() {
            Some("price_step must be positive")
        } else if self.start_round == 0 {
            Some("start_round must be at least 1")
        } else if self.start_round > 1 && self.base_price.is_zero() {
            Some("base_price must be positive when start_round > 1")
        } else if self.fee_rate_denominator == 0 {
            Some("fee_rate_denominator must be positive")
        } else if self.full_round_cost().is_zero() {
            Some("a full round must cost at least one stable unit")
        } else {
            None
        };

        match rejection {
            Some(reason) => {
                warn!("Rejected curve parameters: {reason}");
                Err(CurveError::InvalidParameter(reason))
            }
            None => Ok(()),
        }
    }

    /// Stable cost of a whole round at the cheapest price the curve quotes.
    ///
    /// Every full-round step of a walk spends at least this much, so a zero
    /// here would let mint walks hand out rounds for free.
    pub fn full_round_cost(&self) -> Amount {
        let cheapest = if self.start_round > 1 {
            (&self.base_price).min(&self.price_step)
        } else {
            &self.price_step
        };
        self.round_volume
            .mul_div(cheapest, &self.scale())
            .unwrap_or_default()
    }

    /// Fixed-point scale of the distributed token, `10^dst_decimals`
    pub fn scale(&self) -> Amount {
        Amount::pow10(self.dst_decimals)
    }

    /// Fee rate as `(numerator, 100 * denominator)`
    pub fn fee_fraction(&self) -> (u64, u128) {
        (
            self.fee_rate_numerator,
            100u128 * self.fee_rate_denominator as u128,
        )
    }
}
