//! Breach-cost and risk-factor lookup tables.
//!
//! Breach costs are average cost of a data breach in USD millions. Each
//! lookup returns `None` for an unlisted label; the `resolve_*` functions own
//! the fallback chain.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::input::{Country, Industry};

impl Industry {
    /// Average breach cost for the industry, USD millions.
    pub fn breach_cost_millions(&self) -> Option<Decimal> {
        match self {
            Industry::Healthcare => Some(dec!(10.93)),
            Industry::Financial => Some(dec!(5.9)),
            Industry::Pharmaceuticals => Some(dec!(4.82)),
            Industry::Energy => Some(dec!(4.78)),
            Industry::Industrial => Some(dec!(4.73)),
            Industry::CriticalInfrastructure => Some(dec!(5.04)),
            Industry::Other => Some(dec!(4.88)),
            Industry::Unlisted(_) => None,
        }
    }

    /// Baseline annual likelihood-of-breach factor for the industry.
    pub fn risk_factor(&self) -> Option<Decimal> {
        match self {
            Industry::Healthcare => Some(dec!(0.4)),
            Industry::Financial => Some(dec!(0.35)),
            Industry::Pharmaceuticals => Some(dec!(0.35)),
            Industry::Energy => Some(dec!(0.35)),
            Industry::Industrial => Some(dec!(0.3)),
            Industry::CriticalInfrastructure => Some(dec!(0.4)),
            Industry::Other => Some(dec!(0.25)),
            Industry::Unlisted(_) => None,
        }
    }
}

impl Country {
    /// Average breach cost for the country or region, USD millions.
    pub fn breach_cost_millions(&self) -> Option<Decimal> {
        match self {
            Country::Usa => Some(dec!(9.48)),
            Country::MiddleEast => Some(dec!(8.07)),
            Country::Canada => Some(dec!(5.13)),
            Country::Germany => Some(dec!(4.67)),
            Country::Japan => Some(dec!(4.52)),
            Country::Other => Some(dec!(4.88)),
            Country::Unlisted(_) => None,
        }
    }
}

fn industry_cost_or_other(industry: &Industry) -> Decimal {
    industry
        .breach_cost_millions()
        .or_else(|| Industry::Other.breach_cost_millions())
        .unwrap_or(dec!(4.88))
}

/// Base breach cost: the larger of the industry and country averages.
///
/// An unlisted industry uses the "Other" industry figure. An unlisted country
/// takes the industry figure instead, so it never raises the result.
pub fn resolve_base_breach_cost(industry: &Industry, country: &Country) -> Decimal {
    let industry_cost = industry_cost_or_other(industry);
    let country_cost = country.breach_cost_millions().unwrap_or(industry_cost);
    industry_cost.max(country_cost)
}

/// Industry risk factor with the "Other" fallback.
pub fn resolve_risk_factor(industry: &Industry) -> Decimal {
    industry
        .risk_factor()
        .or_else(|| Industry::Other.risk_factor())
        .unwrap_or(dec!(0.25))
}
