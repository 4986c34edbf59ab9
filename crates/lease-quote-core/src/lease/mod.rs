//! Lease computation engine.
//!
//! Requests pass through [`normalizer`] into canonical parameters, are solved
//! forward or inverse by [`solver`], and forward quotes are decomposed by
//! [`tax_shield`], [`breakdown`] and [`schedule`].

pub mod breakdown;
pub mod normalizer;
#[cfg(feature = "offer")]
pub mod offer;
pub mod schedule;
pub mod solver;
pub mod tax_shield;
