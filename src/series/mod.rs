//! Series building: selection filter, monthly resampling and per-product totals.

pub mod builder;
pub mod calendar;

pub use builder::*;
pub use calendar::*;
