//! Pricing policy: every scalar constant the calculator uses.
//!
//! `PricingPolicy::default()` is the published policy. Deployments can load
//! an override file, which must pass `validate` before use.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::input::{ServicePriceSchedule, Technology, BASELINE_ANALYST_SALARY};
use crate::error::RoiError;
use crate::types::{Money, Rate};
use crate::RoiResult;

/// Flat monthly cost of each technology add-on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechAddonSchedule {
    pub siem: Money,
    pub edr: Money,
    pub threat_intel: Money,
}

impl TechAddonSchedule {
    pub fn monthly_cost(&self, tech: Technology) -> Money {
        match tech {
            Technology::Siem => self.siem,
            Technology::Edr => self.edr,
            Technology::ThreatIntel => self.threat_intel,
        }
    }

    pub fn annual_cost(&self, tech: Technology) -> Money {
        self.monthly_cost(tech) * dec!(12)
    }
}

impl Default for TechAddonSchedule {
    fn default() -> Self {
        TechAddonSchedule {
            siem: dec!(2000),
            edr: dec!(1000),
            threat_intel: dec!(1000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    /// In-house SOC cost per endpoint per year at the baseline salary
    pub in_house_cost_per_endpoint: Money,
    /// Salary the in-house endpoint rate is quoted at
    pub baseline_analyst_salary: Money,
    /// Default MDR price per endpoint per month
    pub monthly_service_prices: ServicePriceSchedule,
    /// Extra in-house infrastructure cost per server per year
    pub server_cost_per_year: Money,
    pub tech_addon_monthly: TechAddonSchedule,
    /// Bundle discount with exactly one existing product
    pub single_product_discount: Rate,
    /// Bundle discount with two or more existing products
    pub multi_product_discount: Rate,
    /// Relative breach-risk reduction under MDR
    pub mdr_risk_reduction: Rate,
    /// Breach cost avoided through AI and automation, USD millions
    pub automation_savings_millions: Decimal,
    pub strict_compliance_multiplier: Decimal,
    /// Analyst hours spent per manually triaged alert
    pub triage_hours_per_alert: Decimal,
    pub work_year_hours: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy {
            in_house_cost_per_endpoint: dec!(440),
            baseline_analyst_salary: BASELINE_ANALYST_SALARY,
            monthly_service_prices: ServicePriceSchedule::default(),
            server_cost_per_year: dec!(1200),
            tech_addon_monthly: TechAddonSchedule::default(),
            single_product_discount: dec!(0.10),
            multi_product_discount: dec!(0.15),
            mdr_risk_reduction: dec!(0.30),
            automation_savings_millions: dec!(1.76),
            strict_compliance_multiplier: dec!(1.2),
            triage_hours_per_alert: dec!(0.1),
            work_year_hours: dec!(2080),
        }
    }
}

impl PricingPolicy {
    pub fn validate(&self) -> RoiResult<()> {
        if self.baseline_analyst_salary <= Decimal::ZERO {
            return Err(RoiError::DivisionByZero {
                context: "baseline_analyst_salary must be positive".into(),
            });
        }
        if self.work_year_hours <= Decimal::ZERO {
            return Err(RoiError::DivisionByZero {
                context: "work_year_hours must be positive".into(),
            });
        }

        let non_negative = [
            ("in_house_cost_per_endpoint", self.in_house_cost_per_endpoint),
            ("server_cost_per_year", self.server_cost_per_year),
            ("monthly_service_prices.monitoring", self.monthly_service_prices.monitoring),
            (
                "monthly_service_prices.threat_hunting_and_response",
                self.monthly_service_prices.threat_hunting_and_response,
            ),
            (
                "monthly_service_prices.full_incident_response",
                self.monthly_service_prices.full_incident_response,
            ),
            ("tech_addon_monthly.siem", self.tech_addon_monthly.siem),
            ("tech_addon_monthly.edr", self.tech_addon_monthly.edr),
            ("tech_addon_monthly.threat_intel", self.tech_addon_monthly.threat_intel),
            ("automation_savings_millions", self.automation_savings_millions),
            ("strict_compliance_multiplier", self.strict_compliance_multiplier),
            ("triage_hours_per_alert", self.triage_hours_per_alert),
        ];
        for (field, value) in non_negative {
            if value < Decimal::ZERO {
                return Err(RoiError::InvalidInput {
                    field: field.into(),
                    reason: "Value cannot be negative".into(),
                });
            }
        }

        let rates = [
            ("single_product_discount", self.single_product_discount),
            ("multi_product_discount", self.multi_product_discount),
            ("mdr_risk_reduction", self.mdr_risk_reduction),
        ];
        for (field, value) in rates {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(RoiError::InvalidInput {
                    field: field.into(),
                    reason: "Rate must be between 0 and 1".into(),
                });
            }
        }
        Ok(())
    }

    /// Bundle discount for the number of vendor products already deployed.
    pub fn bundle_discount(&self, product_count: usize) -> Rate {
        match product_count {
            0 => Decimal::ZERO,
            1 => self.single_product_discount,
            _ => self.multi_product_discount,
        }
    }
}
