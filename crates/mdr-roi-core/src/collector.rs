//! Input collector: raw form state to [`CalculationInput`].
//!
//! Form fields arrive as whatever the user typed. Numbers are read with a
//! leading-number parse (`"15 hosts"` reads as 15, `"12.7"` as an integer
//! reads as 12) and anything missing, unparsable or out of range is coerced
//! to the field's default instead of being rejected:
//!
//! | Field | Default / coercion |
//! |---|---|
//! | endpoints, servers, alerts | 0 (zero or negative also 0) |
//! | analyst salary | baseline salary when missing, zero or negative |
//! | burden rate | 0 when missing or negative |
//! | triage percent, risk tolerance | 0 when missing, clamped to [0, 100] |
//!
//! Partner pricing is resolved here, not in the calculator: the custom
//! schedule is attached only when the form reports partner pricing as
//! unlocked and all three tier prices are positive numbers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::calculator::input::{
    clamp_percent, dedup_products, CalculationInput, Country, Industry, ServiceLevel, ServicePriceSchedule,
    Technology, BASELINE_ANALYST_SALARY,
};
use crate::types::{Money, Percent};

/// A single raw form value. Text inputs arrive as strings, programmatic
/// callers may pass JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(serde_json::Number),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Number(n) => Cow::Owned(n.to_string()),
            FieldValue::Text(s) => Cow::Borrowed(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

/// Partner price fields, per endpoint per month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartnerPricing {
    /// Capability flag set once the partner settings have been unlocked
    pub unlocked: bool,
    pub monitoring: Option<FieldValue>,
    pub threat_hunting_and_response: Option<FieldValue>,
    pub full_incident_response: Option<FieldValue>,
}

impl PartnerPricing {
    /// The full custom schedule, or `None` when locked or partially filled.
    pub fn resolve(&self) -> Option<ServicePriceSchedule> {
        if !self.unlocked {
            return None;
        }
        let price = |field: &Option<FieldValue>| {
            field
                .as_ref()
                .and_then(|v| parse_leading_decimal(&v.as_text()))
                .filter(|p| *p > Decimal::ZERO)
        };
        Some(ServicePriceSchedule {
            monitoring: price(&self.monitoring)?,
            threat_hunting_and_response: price(&self.threat_hunting_and_response)?,
            full_incident_response: price(&self.full_incident_response)?,
        })
    }
}

/// Raw state of the calculator form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormState {
    pub endpoints: Option<FieldValue>,
    pub servers: Option<FieldValue>,
    pub analyst_salary: Option<FieldValue>,
    pub burden_rate: Option<FieldValue>,
    pub alerts: Option<FieldValue>,
    pub triage_percent: Option<FieldValue>,
    pub risk_tolerance: Option<FieldValue>,
    pub service_level: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    /// Values of the checked existing-product boxes
    pub products: Vec<String>,
    /// Keys of the checked technology boxes (`siem`, `edr`, `threatIntel`)
    pub technologies: Vec<String>,
    pub strict_compliance: bool,
    pub partner_pricing: PartnerPricing,
}

/// Coerce raw form state into a complete calculation input.
pub fn collect(form: &FormState) -> CalculationInput {
    let technologies = form
        .technologies
        .iter()
        .filter_map(|key| {
            let tech = Technology::from_key(key);
            if tech.is_none() {
                tracing::warn!(key = %key, "ignoring unknown technology add-on");
            }
            tech
        })
        .collect::<BTreeSet<_>>();

    let existing_products = dedup_products(&form.products);

    CalculationInput {
        endpoints: count_field("endpoints", &form.endpoints),
        servers: count_field("servers", &form.servers),
        analyst_salary: salary_field(&form.analyst_salary),
        burden_rate_percent: burden_field(&form.burden_rate),
        alerts_per_year: count_field("alerts", &form.alerts),
        triage_percent: percent_field(&form.triage_percent),
        risk_tolerance: percent_field(&form.risk_tolerance),
        service_level: form
            .service_level
            .as_deref()
            .map(ServiceLevel::from_label)
            .unwrap_or_default(),
        existing_products,
        industry: form.industry.as_deref().map(Industry::from_label).unwrap_or_default(),
        country: form.country.as_deref().map(Country::from_label).unwrap_or_default(),
        technologies,
        strict_compliance: form.strict_compliance,
        custom_monthly_prices: form.partner_pricing.resolve(),
    }
    .sanitized(BASELINE_ANALYST_SALARY)
}

// ---------------------------------------------------------------------------
// Field coercion
// ---------------------------------------------------------------------------

fn count_field(name: &str, raw: &Option<FieldValue>) -> u64 {
    let parsed = raw.as_ref().and_then(|v| parse_leading_integer(&v.as_text()));
    match parsed {
        Some(n) if n > 0 => n as u64,
        Some(n) if n < 0 => {
            tracing::debug!(field = name, value = n, "negative count coerced to 0");
            0
        }
        _ => 0,
    }
}

fn salary_field(raw: &Option<FieldValue>) -> Money {
    raw.as_ref()
        .and_then(|v| parse_leading_decimal(&v.as_text()))
        .filter(|s| *s > Decimal::ZERO)
        .unwrap_or(BASELINE_ANALYST_SALARY)
}

fn burden_field(raw: &Option<FieldValue>) -> Percent {
    raw.as_ref()
        .and_then(|v| parse_leading_decimal(&v.as_text()))
        .filter(|r| *r > Decimal::ZERO)
        .unwrap_or(Decimal::ZERO)
}

fn percent_field(raw: &Option<FieldValue>) -> Percent {
    raw.as_ref()
        .and_then(|v| parse_leading_decimal(&v.as_text()))
        .map(clamp_percent)
        .unwrap_or(Decimal::ZERO)
}

/// Scan an optional sign followed by ASCII digits; returns the end offset.
fn scan_digits(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    end
}

/// Read the longest leading integer, ignoring trailing text.
pub fn parse_leading_integer(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let sign_len = usize::from(matches!(bytes.first(), Some(b'+') | Some(b'-')));
    let end = scan_digits(bytes, sign_len);
    if end == sign_len {
        return None;
    }
    s[..end].parse().ok()
}

/// Read the longest leading decimal number (sign, digits, fraction,
/// exponent), ignoring trailing text.
pub fn parse_leading_decimal(raw: &str) -> Option<Decimal> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let negative = bytes.first() == Some(&b'-');
    let sign_len = usize::from(matches!(bytes.first(), Some(b'+') | Some(b'-')));

    let int_end = scan_digits(bytes, sign_len);
    let int_part = &s[sign_len..int_end];
    let mut frac_part = "";
    let mut end = int_end;
    if bytes.get(int_end) == Some(&b'.') {
        let frac_end = scan_digits(bytes, int_end + 1);
        frac_part = &s[int_end + 1..frac_end];
        end = frac_end;
    }
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut mantissa = String::with_capacity(end + 2);
    if negative {
        mantissa.push('-');
    }
    mantissa.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        mantissa.push('.');
        mantissa.push_str(frac_part);
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let exp_sign_len = usize::from(matches!(bytes.get(end + 1), Some(b'+') | Some(b'-')));
        let exp_end = scan_digits(bytes, end + 1 + exp_sign_len);
        if exp_end > end + 1 + exp_sign_len {
            let exponent = &s[end + 1..exp_end];
            return Decimal::from_scientific(&format!("{mantissa}e{exponent}")).ok();
        }
    }
    mantissa.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::input::{MAX_ANALYST_SALARY, MAX_BURDEN_RATE_PERCENT};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn text(s: &str) -> Option<FieldValue> {
        Some(FieldValue::from(s))
    }

    fn sample_form() -> FormState {
        FormState {
            endpoints: text("100"),
            servers: text("0"),
            analyst_salary: text("120000"),
            burden_rate: text("0"),
            alerts: text("10000"),
            triage_percent: text("50"),
            risk_tolerance: text("50"),
            service_level: Some("Threat Hunting and Response".into()),
            industry: Some("Other".into()),
            country: Some("Other".into()),
            products: vec![],
            technologies: vec![],
            strict_compliance: false,
            partner_pricing: PartnerPricing::default(),
        }
    }

    #[test]
    fn test_leading_integer_parse() {
        assert_eq!(parse_leading_integer("42"), Some(42));
        assert_eq!(parse_leading_integer("  12.7"), Some(12));
        assert_eq!(parse_leading_integer("15 hosts"), Some(15));
        assert_eq!(parse_leading_integer("-3"), Some(-3));
        assert_eq!(parse_leading_integer("abc"), None);
        assert_eq!(parse_leading_integer(""), None);
        assert_eq!(parse_leading_integer("-"), None);
    }

    #[test]
    fn test_leading_decimal_parse() {
        assert_eq!(parse_leading_decimal("95000.50"), Some(dec!(95000.50)));
        assert_eq!(parse_leading_decimal(".5"), Some(dec!(0.5)));
        assert_eq!(parse_leading_decimal("7."), Some(dec!(7)));
        assert_eq!(parse_leading_decimal("1.2e5"), Some(dec!(120000)));
        assert_eq!(parse_leading_decimal("30%"), Some(dec!(30)));
        assert_eq!(parse_leading_decimal("-12.5k"), Some(dec!(-12.5)));
        assert_eq!(parse_leading_decimal("3e"), Some(dec!(3)));
        assert_eq!(parse_leading_decimal("."), None);
        assert_eq!(parse_leading_decimal("n/a"), None);
    }

    #[test]
    fn test_collect_reference_form() {
        let input = collect(&sample_form());
        let expected = CalculationInput {
            endpoints: 100,
            alerts_per_year: 10000,
            triage_percent: dec!(50),
            risk_tolerance: dec!(50),
            ..CalculationInput::default()
        };
        assert_eq!(input, expected);
    }

    #[test]
    fn test_missing_and_garbage_fields_coerce_to_defaults() {
        let form = FormState {
            endpoints: text("lots"),
            analyst_salary: text("0"),
            burden_rate: text("-10"),
            triage_percent: text("250"),
            ..FormState::default()
        };
        let input = collect(&form);
        assert_eq!(input.endpoints, 0);
        assert_eq!(input.servers, 0);
        assert_eq!(input.analyst_salary, BASELINE_ANALYST_SALARY);
        assert_eq!(input.burden_rate_percent, Decimal::ZERO);
        assert_eq!(input.triage_percent, dec!(100));
        assert_eq!(input.risk_tolerance, Decimal::ZERO);
        assert_eq!(input.service_level, ServiceLevel::ThreatHuntingAndResponse);
        assert_eq!(input.industry, Industry::Other);
        assert_eq!(input.country, Country::Other);
    }

    #[test]
    fn test_negative_counts_become_zero() {
        let form = FormState {
            endpoints: text("-40"),
            servers: Some(FieldValue::Number(serde_json::Number::from(-2))),
            ..sample_form()
        };
        let input = collect(&form);
        assert_eq!(input.endpoints, 0);
        assert_eq!(input.servers, 0);
    }

    #[test]
    fn test_json_numbers_accepted() {
        let form: FormState = serde_json::from_str(
            r#"{"endpoints": 250, "analyst_salary": "95000", "risk_tolerance": 35.5}"#,
        )
        .unwrap();
        let input = collect(&form);
        assert_eq!(input.endpoints, 250);
        assert_eq!(input.analyst_salary, dec!(95000));
        assert_eq!(input.risk_tolerance, dec!(35.5));
    }

    #[test]
    fn test_products_trimmed_and_deduplicated() {
        let form = FormState {
            products: vec!["Firebox".into(), " Firebox ".into(), "".into(), "EPDR".into()],
            ..sample_form()
        };
        let input = collect(&form);
        assert_eq!(input.existing_products, vec!["Firebox", "EPDR"]);
    }

    #[test]
    fn test_huge_salary_is_capped() {
        let form = FormState {
            endpoints: text("10000"),
            analyst_salary: text("1e28"),
            burden_rate: text("9e27"),
            ..sample_form()
        };
        let input = collect(&form);
        assert_eq!(input.analyst_salary, MAX_ANALYST_SALARY);
        assert_eq!(input.burden_rate_percent, MAX_BURDEN_RATE_PERCENT);

        let result = crate::calculator::compute(&input);
        assert!(result.total_in_house > result.total_mdr);
    }

    #[test]
    fn test_unknown_technologies_dropped() {
        let form = FormState {
            technologies: vec!["siem".into(), "xdr".into(), "threatIntel".into()],
            ..sample_form()
        };
        let input = collect(&form);
        let techs: Vec<_> = input.technologies.into_iter().collect();
        assert_eq!(techs, vec![Technology::Siem, Technology::ThreatIntel]);
    }

    #[test]
    fn test_partner_prices_require_unlock_and_all_three() {
        let full = PartnerPricing {
            unlocked: true,
            monitoring: text("10"),
            threat_hunting_and_response: text("14"),
            full_incident_response: text("19"),
        };
        assert_eq!(
            full.resolve(),
            Some(ServicePriceSchedule {
                monitoring: dec!(10),
                threat_hunting_and_response: dec!(14),
                full_incident_response: dec!(19),
            })
        );

        let locked = PartnerPricing {
            unlocked: false,
            ..full.clone()
        };
        assert_eq!(locked.resolve(), None);

        let partial = PartnerPricing {
            full_incident_response: None,
            ..full.clone()
        };
        assert_eq!(partial.resolve(), None);

        let zero_price = PartnerPricing {
            monitoring: text("0"),
            ..full
        };
        assert_eq!(zero_price.resolve(), None);
    }

    #[test]
    fn test_partial_partner_prices_leave_list_pricing() {
        let form = FormState {
            partner_pricing: PartnerPricing {
                unlocked: true,
                monitoring: text("10"),
                threat_hunting_and_response: text("14"),
                full_incident_response: text(""),
            },
            ..sample_form()
        };
        let result = crate::calculator::compute(&collect(&form));
        assert_eq!(result.annual_service_price, dec!(240));
        assert_eq!(result.mdr_annual_cost, dec!(24000));
    }
}
