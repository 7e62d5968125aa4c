//! Round oracle
//!
//! Derives everything about rounds from one distributed-amount snapshot:
//! the current round, and for any round its price, remaining sellable
//! capacity and already-minted capacity.
//!
//! Nothing is cached. Every query recomputes from the snapshot and the
//! parameters, so a `RoundOracle` is exactly as fresh as the snapshot it was
//! built from and never more.

use crate::amount::Amount;
use crate::errors::CurveError;
use crate::params::CurveParams;
use crate::snapshot::DistributedSource;
use crate::types::{RoundIndex, RoundState};
use std::cmp::Ordering;

/// Current round for a distributed amount: `distributed / round_volume + 1`.
pub fn current_round(distributed: &Amount, p: &CurveParams) -> Result<RoundIndex, CurveError> {
    let completed = distributed
        .checked_div(&p.round_volume)
        .ok_or(CurveError::InvalidParameter("round_volume must be positive"))?;
    completed
        .to_u64()
        .and_then(|rounds| rounds.checked_add(1))
        .ok_or(CurveError::CalculationOverflow("current round index"))
}

/// Unit price of a round, in stable units per `10^dst_decimals` tokens.
///
/// `price = price_step * (round - start_round + 1)` on the ladder.
pub fn price_for_round(round: RoundIndex, p: &CurveParams) -> Amount {
    if round < p.start_round {
        // Below the ladder the floor price applies, not zero. Backward walks
        // that reach these rounds keep a positive divisor.
        return p.base_price.clone();
    }
    &p.price_step * &Amount::from(round - p.start_round + 1)
}

/// Read-only view of the rounds for one snapshot.
#[derive(Debug, Clone)]
pub struct RoundOracle<'p> {
    params: &'p CurveParams,
    distributed: Amount,
}

impl<'p> RoundOracle<'p> {
    /// Build an oracle over a validated parameter set and a snapshot value.
    pub fn new(params: &'p CurveParams, distributed: Amount) -> Result<Self, CurveError> {
        params.validate()?;
        // Surface an out-of-range round index at construction time
        current_round(&distributed, params)?;
        Ok(Self {
            params,
            distributed,
        })
    }

    /// Skips parameter validation; lets tests model corrupted configurations.
    #[cfg(test)]
    pub(crate) fn new_unchecked(params: &'p CurveParams, distributed: Amount) -> Self {
        Self {
            params,
            distributed,
        }
    }

    /// Build an oracle by reading the snapshot once from `source`.
    pub fn from_source<S>(params: &'p CurveParams, source: &S) -> Result<Self, CurveError>
    where
        S: DistributedSource + ?Sized,
    {
        Self::new(params, source.distributed_amount()?)
    }

    pub fn params(&self) -> &CurveParams {
        self.params
    }

    /// The snapshot this oracle prices against
    pub fn distributed(&self) -> &Amount {
        &self.distributed
    }

    pub fn current_round(&self) -> Result<RoundIndex, CurveError> {
        current_round(&self.distributed, self.params)
    }

    pub fn price(&self, round: RoundIndex) -> Amount {
        price_for_round(round, self.params)
    }

    /// Price of `round`, rejecting a zero price as a configuration fault.
    pub fn nonzero_price(&self, round: RoundIndex) -> Result<Amount, CurveError> {
        let price = self.price(round);
        if price.is_zero() {
            return Err(CurveError::ZeroPrice { round });
        }
        Ok(price)
    }

    /// Tokens already sold in `round`.
    ///
    /// | round vs current | minted |
    /// |---|---|
    /// | finished | `round_volume` |
    /// | current, first round | `distributed` |
    /// | current, later round | `distributed % round_volume` |
    /// | future | 0 |
    pub fn minted_capacity(&self, round: RoundIndex) -> Result<Amount, CurveError> {
        let cur = self.current_round()?;
        let minted = match round.cmp(&cur) {
            Ordering::Less => self.params.round_volume.clone(),
            Ordering::Equal => self.filled_in_current(cur)?,
            Ordering::Greater => Amount::zero(),
        };
        Ok(minted)
    }

    /// Tokens still sellable in `round`; always `round_volume - minted`.
    pub fn remaining_capacity(&self, round: RoundIndex) -> Result<Amount, CurveError> {
        let cur = self.current_round()?;
        let rv = &self.params.round_volume;
        let remaining = match round.cmp(&cur) {
            Ordering::Less => Amount::zero(),
            Ordering::Equal => rv
                .checked_sub(&self.filled_in_current(cur)?)
                .ok_or(CurveError::CalculationOverflow("remaining capacity of current round"))?,
            Ordering::Greater => rv.clone(),
        };
        Ok(remaining)
    }

    /// `(price, remaining)` for a round
    pub fn price_and_remaining(&self, round: RoundIndex) -> Result<(Amount, Amount), CurveError> {
        Ok((self.price(round), self.remaining_capacity(round)?))
    }

    /// `(price, minted)` for a round
    pub fn price_and_minted(&self, round: RoundIndex) -> Result<(Amount, Amount), CurveError> {
        Ok((self.price(round), self.minted_capacity(round)?))
    }

    pub fn round_state(&self, round: RoundIndex) -> Result<RoundState, CurveError> {
        Ok(RoundState {
            round,
            price: self.price(round),
            remaining: self.remaining_capacity(round)?,
            minted: self.minted_capacity(round)?,
        })
    }

    /// State of the round currently on sale
    pub fn current_state(&self) -> Result<RoundState, CurveError> {
        self.round_state(self.current_round()?)
    }

    fn filled_in_current(&self, cur: RoundIndex) -> Result<Amount, CurveError> {
        if cur == 1 {
            // first round: the whole distributed amount sits here
            return Ok(self.distributed.clone());
        }
        self.distributed
            .checked_rem(&self.params.round_volume)
            .ok_or(CurveError::InvalidParameter("round_volume must be positive"))
    }
}
