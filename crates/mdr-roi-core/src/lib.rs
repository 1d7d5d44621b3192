pub mod calculator;
pub mod collector;
pub mod error;
pub mod format;
pub mod types;

#[cfg(feature = "presenter")]
pub mod presenter;

#[cfg(feature = "report")]
pub mod report;

#[cfg(feature = "lead_capture")]
pub mod lead;

#[cfg(feature = "sensitivity")]
pub mod sensitivity;

pub use calculator::{compute, CalculationInput, CalculationResult};
pub use error::RoiError;
pub use types::*;

/// Standard result type for all mdr-roi operations
pub type RoiResult<T> = Result<T, RoiError>;
