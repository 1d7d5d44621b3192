use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::input::CalculationInput;
use super::policy::PricingPolicy;
use super::tables::{resolve_base_breach_cost, resolve_risk_factor};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::RoiResult;

const MILLION: Decimal = dec!(1000000);

/// Cost comparison for one set of inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Annual operating cost of an in-house SOC, excluding breach exposure
    pub in_house_annual_cost: Money,
    /// Annual MDR subscription plus technology add-ons, excluding breach exposure
    pub mdr_annual_cost: Money,
    pub expected_breach_cost_in_house: Money,
    /// Floored at zero after the automation credit
    pub expected_breach_cost_mdr: Money,
    pub total_in_house: Money,
    pub total_mdr: Money,
    /// May be negative when MDR is the more expensive option
    pub annual_savings: Money,
    /// Zero when total MDR cost is zero
    pub roi_percent: Percent,
    pub freed_ftes: Decimal,
    pub risk_score: Decimal,
    pub base_breach_cost_millions: Decimal,

    // --- breakdown ---
    /// In-house cost per endpoint after salary scaling
    pub per_endpoint_cost: Money,
    /// Per-endpoint annual MDR price for the selected tier
    pub annual_service_price: Money,
    pub bundle_discount_rate: Rate,
    pub tech_addon_annual_cost: Money,
    pub compliance_multiplier: Decimal,
    pub reduced_risk: Decimal,
    pub alerts_triaged: Decimal,
    pub freed_hours: Decimal,
}

/// Run the calculator with the published pricing policy.
///
/// Total: out-of-range inputs are coerced, never rejected.
pub fn compute(input: &CalculationInput) -> CalculationResult {
    evaluate(input, &PricingPolicy::default())
}

/// Run the calculator with a custom pricing policy.
pub fn compute_with_policy(
    input: &CalculationInput,
    policy: &PricingPolicy,
) -> RoiResult<CalculationResult> {
    policy.validate()?;
    Ok(evaluate(input, policy))
}

/// Run the calculator and wrap the result in the standard computation
/// envelope, with warnings for every fallback or clamp that fired.
pub fn calculate_roi(
    input: &CalculationInput,
    policy: &PricingPolicy,
) -> RoiResult<ComputationOutput<CalculationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = compute_with_policy(input, policy)?;

    if input.service_level.is_unlisted() {
        warnings.push(format!(
            "Service level '{}' not recognized; priced as Threat Hunting and Response",
            input.service_level
        ));
    }
    if input.industry.is_unlisted() {
        warnings.push(format!(
            "Industry '{}' not listed; using the 'Other' breach cost and risk factor",
            input.industry
        ));
    }
    if input.country.is_unlisted() {
        warnings.push(format!(
            "Country '{}' not listed; breach cost falls back to the industry average",
            input.country
        ));
    }
    let clean = input.sanitized(policy.baseline_analyst_salary);
    match (&input.custom_monthly_prices, &clean.custom_monthly_prices) {
        (Some(_), Some(_)) => {
            warnings.push("Partner price schedule applied in place of list pricing".into());
        }
        (Some(_), None) => warnings.push(
            "Partner price schedule ignored: every tier needs a positive price; list pricing used"
                .into(),
        ),
        _ => {}
    }
    if clean.endpoints < input.endpoints
        || clean.servers < input.servers
        || clean.alerts_per_year < input.alerts_per_year
        || clean.analyst_salary < input.analyst_salary
        || clean.burden_rate_percent < input.burden_rate_percent
    {
        warnings.push("Inputs above the supported ceilings were capped".into());
    }

    let unclamped_mdr_breach = result.base_breach_cost_millions
        * result.compliance_multiplier
        * result.reduced_risk
        - policy.automation_savings_millions;
    if unclamped_mdr_breach < Decimal::ZERO {
        warnings.push(format!(
            "Expected MDR breach cost floored at zero: the ${}M automation credit exceeds the \
             reduced exposure of ${}M",
            policy.automation_savings_millions,
            (unclamped_mdr_breach + policy.automation_savings_millions).round_dp(4)
        ));
    }
    if result.annual_savings < Decimal::ZERO {
        warnings.push(format!(
            "MDR costs more than the in-house build by {}",
            -result.annual_savings.round_dp(2)
        ));
    }

    tracing::debug!(
        endpoints = input.endpoints,
        servers = input.servers,
        total_in_house = %result.total_in_house,
        total_mdr = %result.total_mdr,
        roi_percent = %result.roi_percent,
        "recalculated ROI"
    );

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "In-house SOC vs MDR: operating cost plus expected breach cost",
        input,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Assumes `policy` has been validated.
pub(crate) fn evaluate(input: &CalculationInput, policy: &PricingPolicy) -> CalculationResult {
    let input = input.sanitized(policy.baseline_analyst_salary);
    let hundred = dec!(100);

    // --- In-house operating cost ---
    let adjusted_salary = input.analyst_salary * (Decimal::ONE + input.burden_rate_percent / hundred);
    let per_endpoint_cost =
        policy.in_house_cost_per_endpoint * (adjusted_salary / policy.baseline_analyst_salary);
    let total_endpoints = Decimal::from(input.total_endpoints());
    let servers = Decimal::from(input.servers);
    let in_house_annual_cost =
        total_endpoints * per_endpoint_cost + servers * policy.server_cost_per_year;

    // --- MDR subscription ---
    let schedule = input
        .custom_monthly_prices
        .as_ref()
        .unwrap_or(&policy.monthly_service_prices);
    let annual_service_price = schedule.annual_price(&input.service_level);
    let bundle_discount_rate = policy.bundle_discount(input.existing_products.len());
    let subscription = total_endpoints * annual_service_price * (Decimal::ONE - bundle_discount_rate);
    // Add-ons are flat and never discounted.
    let tech_addon_annual_cost: Money = input
        .technologies
        .iter()
        .map(|tech| policy.tech_addon_monthly.annual_cost(*tech))
        .sum();
    let mdr_annual_cost = subscription + tech_addon_annual_cost;

    // --- Breach exposure ---
    let base_breach_cost_millions = resolve_base_breach_cost(&input.industry, &input.country);
    let risk_adjustment = (hundred - input.risk_tolerance) / hundred;
    let risk_score = resolve_risk_factor(&input.industry) * risk_adjustment;
    let compliance_multiplier = if input.strict_compliance {
        policy.strict_compliance_multiplier
    } else {
        Decimal::ONE
    };
    let exposure_millions = base_breach_cost_millions * compliance_multiplier;
    let expected_breach_cost_in_house = exposure_millions * risk_score * MILLION;
    let reduced_risk = (risk_score * (Decimal::ONE - policy.mdr_risk_reduction)).max(Decimal::ZERO);
    // The automation credit is subtracted before the floor.
    let expected_breach_cost_mdr =
        ((exposure_millions * reduced_risk - policy.automation_savings_millions) * MILLION)
            .max(Decimal::ZERO);

    // --- Analyst capacity ---
    let alerts_triaged = Decimal::from(input.alerts_per_year) * (input.triage_percent / hundred);
    let freed_hours = alerts_triaged * policy.triage_hours_per_alert;
    let freed_ftes = freed_hours / policy.work_year_hours;

    // --- Totals ---
    let total_in_house = in_house_annual_cost + expected_breach_cost_in_house;
    let total_mdr = mdr_annual_cost + expected_breach_cost_mdr;
    let annual_savings = total_in_house - total_mdr;
    let roi_percent = if total_mdr > Decimal::ZERO {
        annual_savings / total_mdr * hundred
    } else {
        Decimal::ZERO
    };

    CalculationResult {
        in_house_annual_cost,
        mdr_annual_cost,
        expected_breach_cost_in_house,
        expected_breach_cost_mdr,
        total_in_house,
        total_mdr,
        annual_savings,
        roi_percent,
        freed_ftes,
        risk_score,
        base_breach_cost_millions,
        per_endpoint_cost,
        annual_service_price,
        bundle_discount_rate,
        tech_addon_annual_cost,
        compliance_multiplier,
        reduced_risk,
        alerts_triaged,
        freed_hours,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
