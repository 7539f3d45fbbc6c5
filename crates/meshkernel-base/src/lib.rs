//! Basic structs and traits shared by the meshkernel crates: arena handles,
//! tolerance-based floating point comparison, `cgmath` re-exports with an
//! `f64` scalar, and the collective-reduction abstraction used by the
//! parallel layers above this crate.

#![cfg_attr(not(debug_assertions), deny(warnings))]
#![deny(clippy::all, rust_2018_idioms)]
#![warn(missing_debug_implementations, unused_import_braces, unused_qualifications)]

/// Re-exports of `cgmath` types fixed to an `f64` scalar.
pub mod cgmath64;
/// Collective (cross-rank) reduction abstraction and its single-process implementation.
pub mod collective;
/// Generational arena handle type used for all entity identity.
pub mod handle;
/// Tolerance-based floating point comparison.
pub mod tolerance;

pub use cgmath64::*;
pub use collective::{Collective, SerialCollective};
pub use handle::Handle;
pub use tolerance::{Tolerance, TOLERANCE, TOLERANCE2};
