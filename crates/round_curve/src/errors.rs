use crate::amount::Amount;
use crate::types::RoundIndex;
use thiserror::Error;

/// Errors that can occur while deriving round state or computing quotes.
///
/// Every variant is deterministic: the same snapshot, parameters and request
/// always produce the same error. Nothing here is transient or retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurveError {
    /// Negative or unparsable amount, rejected before any computation.
    #[error("invalid input amount: {0}")]
    InvalidInput(String),

    #[error("price for round {round} is zero; curve configuration is inconsistent")]
    ZeroPrice { round: RoundIndex },

    /// Burn request larger than everything minted so far. Both amounts are in
    /// the unit of the request (tokens, or gross stable units).
    #[error("insufficient circulating supply to burn: requested={requested}, available={available}")]
    CapacityExhausted { requested: Amount, available: Amount },

    #[error("invalid curve parameter: {0}")]
    InvalidParameter(&'static str),

    #[error("arithmetic overflow while performing curve calculation: {0}")]
    CalculationOverflow(&'static str),
}
