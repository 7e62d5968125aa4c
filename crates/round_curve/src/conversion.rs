//! Conversion engine
//!
//! The four quote algorithms. Each walks rounds from the current one,
//! forward for mints (rising price) and backward for burns (falling price),
//! consuming a whole round's capacity and moving on while demand exceeds it,
//! and stopping in the round where demand fits.
//!
//! Shared edge policy:
//! - capacity comparisons are strict `>`; demand exactly equal to a round's
//!   capacity is satisfied inside that round;
//! - a zero request returns `(0, 0)` without walking;
//! - a zero price anywhere on the walk is fatal (`CurveError::ZeroPrice`);
//! - the fee is applied once, on the stable side, in stable units.
//!
//! All division truncates toward zero at full precision.

use crate::amount::Amount;
use crate::errors::CurveError;
use crate::fees::FeeModel;
use crate::oracle::RoundOracle;
use crate::params::CurveParams;
use crate::snapshot::DistributedSource;
use crate::types::{Quote, QuoteKind, RoundIndex};
use tracing::{debug, trace, warn};

/// Quotes trades against one distributed-amount snapshot.
///
/// Cheap to build; build a new one per snapshot. A quote is only valid for
/// the snapshot the engine was built from.
#[derive(Debug, Clone)]
pub struct ConversionEngine<'p> {
    oracle: RoundOracle<'p>,
    fees: FeeModel,
    scale: Amount,
}

impl<'p> ConversionEngine<'p> {
    pub fn new(params: &'p CurveParams, distributed: Amount) -> Result<Self, CurveError> {
        Self::with_oracle(RoundOracle::new(params, distributed)?)
    }

    /// Read the snapshot once from `source` and build an engine over it.
    pub fn from_source<S>(params: &'p CurveParams, source: &S) -> Result<Self, CurveError>
    where
        S: DistributedSource + ?Sized,
    {
        Self::with_oracle(RoundOracle::from_source(params, source)?)
    }

    fn with_oracle(oracle: RoundOracle<'p>) -> Result<Self, CurveError> {
        let fees = FeeModel::from_params(oracle.params())?;
        let scale = oracle.params().scale();
        Ok(Self {
            oracle,
            fees,
            scale,
        })
    }

    pub fn oracle(&self) -> &RoundOracle<'p> {
        &self.oracle
    }

    pub fn fees(&self) -> &FeeModel {
        &self.fees
    }

    /// Spend `gross_in` stable units; returns `(tokens_out, fee)`.
    pub fn mint_tokens_for_exact_stable(
        &self,
        gross_in: &Amount,
    ) -> Result<(Amount, Amount), CurveError> {
        Ok(self.quote_mint_tokens_for_exact_stable(gross_in)?.into_pair())
    }

    /// Buy exactly `tokens_wanted`; returns `(gross_stable_required, fee)`.
    pub fn mint_stable_for_exact_tokens(
        &self,
        tokens_wanted: &Amount,
    ) -> Result<(Amount, Amount), CurveError> {
        Ok(self.quote_mint_stable_for_exact_tokens(tokens_wanted)?.into_pair())
    }

    /// Burn exactly `tokens_in`; returns `(net_stable_out, fee)`.
    pub fn burn_exact_tokens_for_stable(
        &self,
        tokens_in: &Amount,
    ) -> Result<(Amount, Amount), CurveError> {
        Ok(self.quote_burn_exact_tokens_for_stable(tokens_in)?.into_pair())
    }

    /// Receive exactly `net_wanted` stable units; returns `(tokens_required, fee)`.
    pub fn burn_tokens_for_exact_stable(
        &self,
        net_wanted: &Amount,
    ) -> Result<(Amount, Amount), CurveError> {
        Ok(self.quote_burn_tokens_for_exact_stable(net_wanted)?.into_pair())
    }

    /// Dispatch on the conversion kind.
    pub fn quote(&self, kind: QuoteKind, request: &Amount) -> Result<Quote, CurveError> {
        match kind {
            QuoteKind::MintTokensForExactStable => self.quote_mint_tokens_for_exact_stable(request),
            QuoteKind::MintStableForExactTokens => self.quote_mint_stable_for_exact_tokens(request),
            QuoteKind::BurnExactTokensForStable => self.quote_burn_exact_tokens_for_stable(request),
            QuoteKind::BurnTokensForExactStable => self.quote_burn_tokens_for_exact_stable(request),
        }
    }

    pub fn quote_mint_tokens_for_exact_stable(&self, gross_in: &Amount) -> Result<Quote, CurveError> {
        let kind = QuoteKind::MintTokensForExactStable;
        let start_round = self.oracle.current_round()?;
        if gross_in.is_zero() {
            return Ok(empty_quote(kind, start_round));
        }

        let split = self.fees.extract_fee(gross_in)?;
        let mut stable_left = split.net.clone();
        let mut tokens = Amount::zero();
        let mut round = start_round;

        while !stable_left.is_zero() {
            let price = self.oracle.nonzero_price(round)?;
            let rest = self.oracle.remaining_capacity(round)?;
            let affordable = self.stable_to_tokens(&stable_left, &price, round)?;

            if affordable > rest {
                let cost = self.tokens_to_stable(&rest, &price)?;
                // a dust remainder of the current round may round to zero; a
                // whole round may not
                if cost.is_zero() && rest == self.oracle.params().round_volume {
                    warn!(round, %price, "Full round priced at zero stable units");
                    return Err(CurveError::CalculationOverflow(
                        "mint walk took a full round for free",
                    ));
                }
                stable_left = stable_left
                    .checked_sub(&cost)
                    .ok_or(CurveError::CalculationOverflow("mint walk spent more than its input"))?;
                tokens += &rest;
                trace!(round, %price, consumed = %rest, "mint walk exhausted round");
                round = next_round(round)?;
            } else {
                tokens += affordable;
                break;
            }
        }

        Ok(finish(Quote {
            kind,
            request: gross_in.clone(),
            amount: tokens.clone(),
            fee: split.fee,
            gross_stable: split.gross,
            net_stable: split.net,
            tokens,
            start_round,
            end_round: round,
        }))
    }

    pub fn quote_mint_stable_for_exact_tokens(
        &self,
        tokens_wanted: &Amount,
    ) -> Result<Quote, CurveError> {
        let kind = QuoteKind::MintStableForExactTokens;
        let start_round = self.oracle.current_round()?;
        if tokens_wanted.is_zero() {
            return Ok(empty_quote(kind, start_round));
        }

        let mut tokens_left = tokens_wanted.clone();
        let mut net_cost = Amount::zero();
        let mut round = start_round;

        while !tokens_left.is_zero() {
            let price = self.oracle.nonzero_price(round)?;
            let rest = self.oracle.remaining_capacity(round)?;

            if tokens_left > rest {
                net_cost += self.tokens_to_stable(&rest, &price)?;
                tokens_left = tokens_left
                    .checked_sub(&rest)
                    .ok_or(CurveError::CalculationOverflow("mint walk over-consumed tokens"))?;
                trace!(round, %price, consumed = %rest, "mint walk exhausted round");
                round = next_round(round)?;
            } else {
                net_cost += self.tokens_to_stable(&tokens_left, &price)?;
                break;
            }
        }

        let split = self.fees.grow_for_fee(&net_cost)?;
        Ok(finish(Quote {
            kind,
            request: tokens_wanted.clone(),
            amount: split.gross.clone(),
            fee: split.fee,
            gross_stable: split.gross,
            net_stable: split.net,
            tokens: tokens_wanted.clone(),
            start_round,
            end_round: round,
        }))
    }

    pub fn quote_burn_exact_tokens_for_stable(&self, tokens_in: &Amount) -> Result<Quote, CurveError> {
        let kind = QuoteKind::BurnExactTokensForStable;
        let start_round = self.oracle.current_round()?;
        if tokens_in.is_zero() {
            return Ok(empty_quote(kind, start_round));
        }

        let supply = self.oracle.distributed();
        if tokens_in > supply {
            return Err(exhausted(tokens_in.clone(), supply.clone()));
        }

        let mut tokens_left = tokens_in.clone();
        let mut gross_proceeds = Amount::zero();
        let mut round = start_round;

        while !tokens_left.is_zero() {
            let price = self.oracle.nonzero_price(round)?;
            let minted = self.oracle.minted_capacity(round)?;

            if tokens_left > minted {
                gross_proceeds += self.tokens_to_stable(&minted, &price)?;
                tokens_left = tokens_left
                    .checked_sub(&minted)
                    .ok_or(CurveError::CalculationOverflow("burn walk over-consumed tokens"))?;
                trace!(round, %price, released = %minted, "burn walk emptied round");
                round = previous_round(round)
                    .ok_or_else(|| exhausted(tokens_in.clone(), supply.clone()))?;
            } else {
                gross_proceeds += self.tokens_to_stable(&tokens_left, &price)?;
                break;
            }
        }

        let split = self.fees.extract_fee(&gross_proceeds)?;
        Ok(finish(Quote {
            kind,
            request: tokens_in.clone(),
            amount: split.net.clone(),
            fee: split.fee,
            gross_stable: split.gross,
            net_stable: split.net,
            tokens: tokens_in.clone(),
            start_round,
            end_round: round,
        }))
    }

    pub fn quote_burn_tokens_for_exact_stable(&self, net_wanted: &Amount) -> Result<Quote, CurveError> {
        let kind = QuoteKind::BurnTokensForExactStable;
        let start_round = self.oracle.current_round()?;
        if net_wanted.is_zero() {
            return Ok(empty_quote(kind, start_round));
        }

        let split = self.fees.grow_for_fee(net_wanted)?;
        let mut gross_left = split.gross.clone();
        let mut tokens = Amount::zero();
        let mut round = start_round;

        while !gross_left.is_zero() {
            let price = self.oracle.nonzero_price(round)?;
            let minted = self.oracle.minted_capacity(round)?;
            let burnable = self.stable_to_tokens(&gross_left, &price, round)?;

            if burnable > minted {
                tokens += &minted;
                let released = self.tokens_to_stable(&minted, &price)?;
                gross_left = gross_left
                    .checked_sub(&released)
                    .ok_or(CurveError::CalculationOverflow("burn walk released more than requested"))?;
                trace!(round, %price, released = %minted, "burn walk emptied round");
                round = match previous_round(round) {
                    Some(previous) => previous,
                    None => {
                        // everything ever minted is worth gross - gross_left
                        let available = split.gross.saturating_sub(&gross_left);
                        return Err(exhausted(split.gross.clone(), available));
                    }
                };
            } else {
                tokens += burnable;
                break;
            }
        }

        Ok(finish(Quote {
            kind,
            request: net_wanted.clone(),
            amount: tokens.clone(),
            fee: split.fee,
            gross_stable: split.gross,
            net_stable: split.net,
            tokens,
            start_round,
            end_round: round,
        }))
    }

    /// `stable * 10^decimals / price`
    fn stable_to_tokens(
        &self,
        stable: &Amount,
        price: &Amount,
        round: RoundIndex,
    ) -> Result<Amount, CurveError> {
        stable
            .mul_div(&self.scale, price)
            .ok_or(CurveError::ZeroPrice { round })
    }

    /// `tokens * price / 10^decimals`
    fn tokens_to_stable(&self, tokens: &Amount, price: &Amount) -> Result<Amount, CurveError> {
        tokens
            .mul_div(price, &self.scale)
            .ok_or(CurveError::InvalidParameter("token scale is zero"))
    }
}

fn next_round(round: RoundIndex) -> Result<RoundIndex, CurveError> {
    round
        .checked_add(1)
        .ok_or(CurveError::CalculationOverflow("round cursor"))
}

/// Round below `round`, or `None` when the walk would leave round 1.
fn previous_round(round: RoundIndex) -> Option<RoundIndex> {
    round.checked_sub(1).filter(|r| *r >= 1)
}

fn exhausted(requested: Amount, available: Amount) -> CurveError {
    warn!(%requested, %available, "Burn request exceeds circulating supply");
    CurveError::CapacityExhausted {
        requested,
        available,
    }
}

fn empty_quote(kind: QuoteKind, round: RoundIndex) -> Quote {
    Quote {
        kind,
        request: Amount::zero(),
        amount: Amount::zero(),
        fee: Amount::zero(),
        gross_stable: Amount::zero(),
        net_stable: Amount::zero(),
        tokens: Amount::zero(),
        start_round: round,
        end_round: round,
    }
}

fn finish(quote: Quote) -> Quote {
    let side = if quote.kind.is_mint() { "mint" } else { "burn" };
    debug!(
        side,
        kind = ?quote.kind,
        request = %quote.request,
        amount = %quote.amount,
        fee = %quote.fee,
        start_round = quote.start_round,
        end_round = quote.end_round,
        "Quote computed"
    );
    quote
}
