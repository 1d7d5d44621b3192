//! Pricing and risk calculator: in-house SOC versus MDR subscription.
//!
//! Pure functions only. Every recalculation takes a complete
//! [`CalculationInput`] and returns a fresh [`CalculationResult`].

pub mod engine;
pub mod input;
pub mod policy;
pub mod tables;

pub use engine::{calculate_roi, compute, compute_with_policy, CalculationResult};
pub use input::{
    CalculationInput, Country, Industry, ServiceLevel, ServicePriceSchedule, Technology,
    BASELINE_ANALYST_SALARY, MAX_ANALYST_SALARY, MAX_BURDEN_RATE_PERCENT, MAX_COUNT,
    MAX_MONTHLY_PRICE,
};
pub use policy::{PricingPolicy, TechAddonSchedule};
