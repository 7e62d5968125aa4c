//! Distributed-amount snapshot accessor
//!
//! The ledger that records how many distributed-token units exist is owned
//! elsewhere. The curve only needs one read of it per quote; this trait is
//! the seam an external ledger adapter implements.

use crate::amount::Amount;
use crate::errors::CurveError;
use num_bigint::BigInt;

/// Source of the cumulative distributed amount (tokens issued net of burns).
///
/// Implementations must return an atomic snapshot: the engine reads it once
/// and prices the whole quote against that single value.
pub trait DistributedSource {
    fn distributed_amount(&self) -> Result<Amount, CurveError>;
}

impl DistributedSource for Amount {
    fn distributed_amount(&self) -> Result<Amount, CurveError> {
        Ok(self.clone())
    }
}

impl DistributedSource for u64 {
    fn distributed_amount(&self) -> Result<Amount, CurveError> {
        Ok(Amount::from(*self))
    }
}

impl DistributedSource for u128 {
    fn distributed_amount(&self) -> Result<Amount, CurveError> {
        Ok(Amount::from(*self))
    }
}

/// Signed ledgers report through here; a negative supply is rejected.
impl DistributedSource for i64 {
    fn distributed_amount(&self) -> Result<Amount, CurveError> {
        Amount::try_from(*self)
    }
}

impl DistributedSource for BigInt {
    fn distributed_amount(&self) -> Result<Amount, CurveError> {
        Amount::try_from(self.clone())
    }
}

impl<T: DistributedSource + ?Sized> DistributedSource for &T {
    fn distributed_amount(&self) -> Result<Amount, CurveError> {
        (**self).distributed_amount()
    }
}
