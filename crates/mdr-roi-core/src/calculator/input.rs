//! Typed calculation input.
//!
//! Service levels, industries and countries are matched against the labels
//! the calculator form displays ("Threat Hunting and Response", "Critical
//! Infrastructure", "Middle East", ...). A label that matches nothing is kept
//! verbatim in an `Unlisted` variant so it can still be echoed in reports,
//! and the lookup tables decide how it is priced.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::{Money, Percent};

/// Baseline annual analyst salary the in-house endpoint rate is quoted at.
pub const BASELINE_ANALYST_SALARY: Money = dec!(120000);

// Ceilings applied by `CalculationInput::sanitized`. Every product the
// calculator forms stays far inside `Decimal` range below them.
pub const MAX_COUNT: u64 = 1_000_000_000;
pub const MAX_ANALYST_SALARY: Money = dec!(10_000_000);
pub const MAX_BURDEN_RATE_PERCENT: Percent = dec!(1000);
pub const MAX_MONTHLY_PRICE: Money = dec!(1_000_000);

/// Lowercase and strip everything but ASCII alphanumerics.
fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// ---------------------------------------------------------------------------
// Service level
// ---------------------------------------------------------------------------

/// MDR service tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceLevel {
    Monitoring,
    #[default]
    ThreatHuntingAndResponse,
    FullIncidentResponse,
    /// Label that matched no known tier; priced as ThreatHuntingAndResponse.
    Unlisted(String),
}

impl ServiceLevel {
    pub fn from_label(label: &str) -> Self {
        match normalize_label(label).as_str() {
            "monitoring" => ServiceLevel::Monitoring,
            "threathuntingandresponse" | "threathunting" => ServiceLevel::ThreatHuntingAndResponse,
            "fullincidentresponse" | "incidentresponse" | "fullir" => {
                ServiceLevel::FullIncidentResponse
            }
            _ => ServiceLevel::Unlisted(label.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ServiceLevel::Monitoring => "Monitoring",
            ServiceLevel::ThreatHuntingAndResponse => "Threat Hunting and Response",
            ServiceLevel::FullIncidentResponse => "Full Incident Response",
            ServiceLevel::Unlisted(raw) => raw,
        }
    }

    pub fn is_unlisted(&self) -> bool {
        matches!(self, ServiceLevel::Unlisted(_))
    }
}

impl std::fmt::Display for ServiceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<String> for ServiceLevel {
    fn from(label: String) -> Self {
        ServiceLevel::from_label(&label)
    }
}

impl From<ServiceLevel> for String {
    fn from(level: ServiceLevel) -> Self {
        level.label().to_string()
    }
}

// ---------------------------------------------------------------------------
// Industry / Country
// ---------------------------------------------------------------------------

/// Industry vertical used for breach-cost and risk-factor lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Industry {
    Healthcare,
    Financial,
    Pharmaceuticals,
    Energy,
    Industrial,
    CriticalInfrastructure,
    #[default]
    Other,
    Unlisted(String),
}

impl Industry {
    pub fn from_label(label: &str) -> Self {
        match normalize_label(label).as_str() {
            "healthcare" => Industry::Healthcare,
            "financial" | "finance" | "financialservices" => Industry::Financial,
            "pharmaceuticals" | "pharma" => Industry::Pharmaceuticals,
            "energy" => Industry::Energy,
            "industrial" => Industry::Industrial,
            "criticalinfrastructure" => Industry::CriticalInfrastructure,
            "other" => Industry::Other,
            _ => Industry::Unlisted(label.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Industry::Healthcare => "Healthcare",
            Industry::Financial => "Financial",
            Industry::Pharmaceuticals => "Pharmaceuticals",
            Industry::Energy => "Energy",
            Industry::Industrial => "Industrial",
            Industry::CriticalInfrastructure => "Critical Infrastructure",
            Industry::Other => "Other",
            Industry::Unlisted(raw) => raw,
        }
    }

    pub fn is_unlisted(&self) -> bool {
        matches!(self, Industry::Unlisted(_))
    }
}

impl std::fmt::Display for Industry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<String> for Industry {
    fn from(label: String) -> Self {
        Industry::from_label(&label)
    }
}

impl From<Industry> for String {
    fn from(industry: Industry) -> Self {
        industry.label().to_string()
    }
}

/// Country or region used for the breach-cost lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Country {
    Usa,
    MiddleEast,
    Canada,
    Germany,
    Japan,
    #[default]
    Other,
    Unlisted(String),
}

impl Country {
    pub fn from_label(label: &str) -> Self {
        match normalize_label(label).as_str() {
            "usa" | "us" | "unitedstates" => Country::Usa,
            "middleeast" => Country::MiddleEast,
            "canada" => Country::Canada,
            "germany" => Country::Germany,
            "japan" => Country::Japan,
            "other" => Country::Other,
            _ => Country::Unlisted(label.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Country::Usa => "USA",
            Country::MiddleEast => "Middle East",
            Country::Canada => "Canada",
            Country::Germany => "Germany",
            Country::Japan => "Japan",
            Country::Other => "Other",
            Country::Unlisted(raw) => raw,
        }
    }

    pub fn is_unlisted(&self) -> bool {
        matches!(self, Country::Unlisted(_))
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<String> for Country {
    fn from(label: String) -> Self {
        Country::from_label(&label)
    }
}

impl From<Country> for String {
    fn from(country: Country) -> Self {
        country.label().to_string()
    }
}

// ---------------------------------------------------------------------------
// Technology add-ons
// ---------------------------------------------------------------------------

/// Technology the in-house build would otherwise have to license.
///
/// Serialized as the checkbox keys the form uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Technology {
    #[serde(rename = "siem")]
    Siem,
    #[serde(rename = "edr")]
    Edr,
    #[serde(rename = "threatIntel")]
    ThreatIntel,
}

impl Technology {
    pub const ALL: [Technology; 3] = [Technology::Siem, Technology::Edr, Technology::ThreatIntel];

    /// Match a checkbox key, ignoring case and separators.
    pub fn from_key(key: &str) -> Option<Self> {
        match normalize_label(key).as_str() {
            "siem" => Some(Technology::Siem),
            "edr" => Some(Technology::Edr),
            "threatintel" | "threatintelligence" => Some(Technology::ThreatIntel),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Technology::Siem => "siem",
            Technology::Edr => "edr",
            Technology::ThreatIntel => "threatIntel",
        }
    }
}

impl std::fmt::Display for Technology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

// ---------------------------------------------------------------------------
// Service price schedule
// ---------------------------------------------------------------------------

/// Per-endpoint monthly price for every service tier.
///
/// All three prices are always present; a partially filled override is never
/// turned into a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePriceSchedule {
    pub monitoring: Money,
    pub threat_hunting_and_response: Money,
    pub full_incident_response: Money,
}

impl ServicePriceSchedule {
    /// Every tier carries a positive price.
    pub fn is_positive(&self) -> bool {
        [
            self.monitoring,
            self.threat_hunting_and_response,
            self.full_incident_response,
        ]
        .iter()
        .all(|p| *p > Decimal::ZERO)
    }

    fn capped(&self) -> ServicePriceSchedule {
        ServicePriceSchedule {
            monitoring: self.monitoring.min(MAX_MONTHLY_PRICE),
            threat_hunting_and_response: self.threat_hunting_and_response.min(MAX_MONTHLY_PRICE),
            full_incident_response: self.full_incident_response.min(MAX_MONTHLY_PRICE),
        }
    }

    /// Monthly price for a tier. Unlisted tiers price as ThreatHuntingAndResponse.
    pub fn monthly_price(&self, level: &ServiceLevel) -> Money {
        match level {
            ServiceLevel::Monitoring => self.monitoring,
            ServiceLevel::FullIncidentResponse => self.full_incident_response,
            ServiceLevel::ThreatHuntingAndResponse | ServiceLevel::Unlisted(_) => {
                self.threat_hunting_and_response
            }
        }
    }

    pub fn annual_price(&self, level: &ServiceLevel) -> Money {
        self.monthly_price(level) * dec!(12)
    }
}

impl Default for ServicePriceSchedule {
    fn default() -> Self {
        ServicePriceSchedule {
            monitoring: dec!(15),
            threat_hunting_and_response: dec!(20),
            full_incident_response: dec!(25),
        }
    }
}

// ---------------------------------------------------------------------------
// Calculation input
// ---------------------------------------------------------------------------

/// Everything the calculator needs for one recalculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationInput {
    /// Workstation / laptop endpoints
    pub endpoints: u64,
    /// Servers; counted as endpoints and carry their own infrastructure cost
    pub servers: u64,
    /// Annual analyst salary before burden
    pub analyst_salary: Money,
    /// Employee burden (benefits, overhead) on top of salary, 0-100+
    pub burden_rate_percent: Percent,
    pub alerts_per_year: u64,
    /// Share of annual alerts triaged manually today, 0-100
    pub triage_percent: Percent,
    /// Stated risk tolerance, 0-100; lower means higher effective risk
    pub risk_tolerance: Percent,
    pub service_level: ServiceLevel,
    /// Vendor products already deployed, in selection order; the count
    /// drives the bundle discount
    pub existing_products: Vec<String>,
    pub industry: Industry,
    pub country: Country,
    pub technologies: BTreeSet<Technology>,
    pub strict_compliance: bool,
    /// Partner price schedule, resolved before the calculator runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_monthly_prices: Option<ServicePriceSchedule>,
}

impl Default for CalculationInput {
    fn default() -> Self {
        CalculationInput {
            endpoints: 0,
            servers: 0,
            analyst_salary: BASELINE_ANALYST_SALARY,
            burden_rate_percent: Decimal::ZERO,
            alerts_per_year: 0,
            triage_percent: Decimal::ZERO,
            risk_tolerance: Decimal::ZERO,
            service_level: ServiceLevel::default(),
            existing_products: Vec::new(),
            industry: Industry::default(),
            country: Country::default(),
            technologies: BTreeSet::new(),
            strict_compliance: false,
            custom_monthly_prices: None,
        }
    }
}

impl CalculationInput {
    pub fn total_endpoints(&self) -> u64 {
        self.endpoints.saturating_add(self.servers)
    }

    /// Coerce out-of-range values to the documented defaults.
    ///
    /// A non-positive salary becomes `baseline_salary`, a negative burden
    /// rate becomes zero and both percentages are clamped into [0, 100].
    /// Counts, salary, burden rate and custom prices are capped at the
    /// `MAX_*` ceilings. A custom schedule with any non-positive price is
    /// dropped. Products are trimmed and de-duplicated in order.
    ///
    /// Idempotent: sanitizing a sanitized input changes nothing.
    pub fn sanitized(&self, baseline_salary: Money) -> CalculationInput {
        let mut clean = self.clone();
        clean.endpoints = clean.endpoints.min(MAX_COUNT);
        clean.servers = clean.servers.min(MAX_COUNT);
        clean.alerts_per_year = clean.alerts_per_year.min(MAX_COUNT);
        if clean.analyst_salary <= Decimal::ZERO {
            clean.analyst_salary = baseline_salary;
        }
        clean.analyst_salary = clean.analyst_salary.min(MAX_ANALYST_SALARY);
        clean.burden_rate_percent = clean
            .burden_rate_percent
            .max(Decimal::ZERO)
            .min(MAX_BURDEN_RATE_PERCENT);
        clean.triage_percent = clamp_percent(clean.triage_percent);
        clean.risk_tolerance = clamp_percent(clean.risk_tolerance);
        clean.existing_products = dedup_products(&clean.existing_products);
        clean.custom_monthly_prices = clean
            .custom_monthly_prices
            .filter(ServicePriceSchedule::is_positive)
            .map(|s| s.capped());
        clean
    }
}

/// Trim, drop blanks and keep the first occurrence of each product.
pub(crate) fn dedup_products<S: AsRef<str>>(products: &[S]) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(products.len());
    for product in products {
        let product = product.as_ref().trim();
        if !product.is_empty() && !kept.iter().any(|k| k == product) {
            kept.push(product.to_string());
        }
    }
    kept
}

pub(crate) fn clamp_percent(value: Percent) -> Percent {
    value.max(Decimal::ZERO).min(dec!(100))
}
