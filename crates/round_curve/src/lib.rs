//! Round Curve: discrete bonding-curve pricing core
//!
//! Sells a distributed token in fixed-size rounds, each priced one step above
//! the previous one. Given a stable-asset amount or a token amount, quotes the
//! other side of the trade by walking rounds forward (mint) or backward
//! (burn), charging a proportional fee on the stable side.
//!
//! The core is a pure function of one external scalar, the distributed
//! amount, read once per engine. It never persists or mutates anything.
//!
//! Monetary unit: minimal units on both sides. Prices are stable units per
//! `10^dst_decimals` distributed-token units.

pub mod amount;
pub mod conversion;
pub mod errors;
pub mod fees;
pub mod oracle;
pub mod params;
pub mod snapshot;
pub mod types;

pub use amount::*;
pub use conversion::*;
pub use errors::*;
pub use fees::*;
pub use oracle::*;
pub use params::*;
pub use snapshot::*;
pub use types::*;

/// Commonly used items for quoting
pub mod prelude {
    pub use crate::amount::Amount;
    pub use crate::conversion::ConversionEngine;
    pub use crate::errors::CurveError;
    pub use crate::fees::{FeeModel, FeeSplit};
    pub use crate::oracle::{current_round, price_for_round, RoundOracle};
    pub use crate::params::CurveParams;
    pub use crate::snapshot::DistributedSource;
    pub use crate::types::{Quote, QuoteKind, RoundIndex, RoundState};
}
