//! Wrapped forecasting backends.

mod traits;

pub mod baseline;

pub use baseline::BaselineQuantileModel;
pub use traits::TabularModel;
