//! Core types for the round curve
//!
//! Round indices, the derived per-round state, and the quote record returned
//! by the detailed conversion entry points.

use crate::amount::Amount;
use serde::{Deserialize, Serialize};

/// Round index, 1-based. Round 1 is the first round ever sold.
pub type RoundIndex = u64;

/// Derived state of a single round for one distributed-amount snapshot.
///
/// Never stored: valid only for the snapshot it was computed from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub round: RoundIndex,
    /// Stable units per `10^dst_decimals` distributed-token units
    pub price: Amount,
    /// Distributed-token units still sellable in this round
    pub remaining: Amount,
    /// Distributed-token units already sold in this round
    pub minted: Amount,
}

/// Which of the four conversions produced a quote
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteKind {
    /// Spend an exact gross stable amount, receive tokens
    MintTokensForExactStable,
    /// Receive an exact token amount, pay gross stable
    MintStableForExactTokens,
    /// Burn an exact token amount, receive net stable
    BurnExactTokensForStable,
    /// Receive an exact net stable amount, burn tokens
    BurnTokensForExactStable,
}

impl QuoteKind {
    /// True for the two mint-side conversions (forward walks)
    pub fn is_mint(self) -> bool {
        matches!(
            self,
            QuoteKind::MintTokensForExactStable | QuoteKind::MintStableForExactTokens
        )
    }
}

/// Full breakdown of one conversion.
///
/// `amount`/`fee` are the pair the plain entry points return; the remaining
/// fields show both stable legs and the rounds the walk touched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub kind: QuoteKind,
    /// The amount the caller stated
    pub request: Amount,
    /// The computed side of the trade
    pub amount: Amount,
    /// Fee in stable units
    pub fee: Amount,
    /// Stable amount including the fee
    pub gross_stable: Amount,
    /// Stable amount excluding the fee (what the curve itself prices)
    pub net_stable: Amount,
    /// Distributed-token units moved by the trade
    pub tokens: Amount,
    /// Round the walk started in (the current round of the snapshot)
    pub start_round: RoundIndex,
    /// Round the walk stopped in
    pub end_round: RoundIndex,
}

impl Quote {
    /// `(amount, fee)` as returned by the plain conversion functions
    pub fn into_pair(self) -> (Amount, Amount) {
        (self.amount, self.fee)
    }

    /// Number of rounds the walk moved across, 0 when it stayed in one round
    pub fn rounds_crossed(&self) -> u64 {
        self.start_round.abs_diff(self.end_round)
    }
}
