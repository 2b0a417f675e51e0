//! Model fitting orchestration.
//!
//! Responsibilities:
//!
//! - generate (φ, θ) search grids
//! - estimate ARIMA(1,1,1) by conditional sum of squares
//! - forecast each product independently (parallel) and collect outcomes

pub mod estimator;
pub mod forecaster;
pub mod grid;

pub use estimator::*;
pub use forecaster::*;
pub use grid::*;
