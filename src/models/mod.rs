//! ARIMA(1,1,1) model equations.
//!
//! The model is implemented as small, pure functions over the differenced
//! series so that estimation code (`fit`) can stay generic and testable.

pub mod arima;

pub use arima::*;
