//! Mathematical utilities: least squares and differencing.

pub mod diff;
pub mod ols;

pub use diff::*;
pub use ols::*;
