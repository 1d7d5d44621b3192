//! One-page ROI report.
//!
//! [`build_report`] turns an (input, result) pair into a [`ReportDocument`];
//! the document is laid out on a US-letter page by [`layout`] and rendered
//! as plain text or PDF. Labels and line order match the published report.

pub mod layout;
pub mod pdf;
pub mod text;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculator::{CalculationInput, CalculationResult, BASELINE_ANALYST_SALARY};
use crate::format::{format_currency, format_grouped, format_one_decimal, format_plain};

pub use layout::{layout, FontStyle, PlacedText};
pub use pdf::render_pdf;
pub use text::render_text;

pub const REPORT_TITLE: &str = "WatchGuard MDR ROI Report";
pub const REPORT_FILE_NAME: &str = "WatchGuard_MDR_ROI_Report.pdf";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum SectionBody {
    /// One labeled value per line
    Lines(Vec<String>),
    /// Free-running paragraphs
    Paragraphs(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub heading: String,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub title: String,
    pub generated_on: NaiveDate,
    pub sections: Vec<ReportSection>,
    pub footnotes: Vec<String>,
}

impl ReportDocument {
    /// "Generated on 10/19/2026"
    pub fn date_line(&self) -> String {
        format!("Generated on {}", self.generated_on.format("%-m/%-d/%Y"))
    }

    pub fn section(&self, heading: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.heading == heading)
    }
}

/// Inputs are echoed as the calculator used them. Callers running a custom
/// policy pass `input.sanitized(policy.baseline_analyst_salary)`; any other
/// input is sanitized here against the published baseline salary.
pub fn build_report(
    input: &CalculationInput,
    result: &CalculationResult,
    generated_on: NaiveDate,
) -> ReportDocument {
    let input = input.sanitized(BASELINE_ANALYST_SALARY);
    ReportDocument {
        title: REPORT_TITLE.to_string(),
        generated_on,
        sections: vec![
            ReportSection {
                heading: "Your Inputs".into(),
                body: SectionBody::Lines(input_lines(&input)),
            },
            ReportSection {
                heading: "Results Summary".into(),
                body: SectionBody::Lines(result_lines(result)),
            },
            ReportSection {
                heading: "Methodology & Assumptions".into(),
                body: SectionBody::Paragraphs(
                    METHODOLOGY.iter().map(|p| p.to_string()).collect(),
                ),
            },
        ],
        footnotes: FOOTNOTES.iter().map(|f| f.to_string()).collect(),
    }
}

/// Servers, burden rate, tech stack and compliance only appear when they
/// differ from their defaults; "No" for compliance is printed only when some
/// other advanced setting was used.
fn input_lines(input: &CalculationInput) -> Vec<String> {
    let mut lines = vec![format!("Endpoints: {}", input.endpoints)];
    if input.servers > 0 {
        lines.push(format!("Servers: {}", input.servers));
    }
    lines.push(format!("Analyst salary: {}", format_currency(input.analyst_salary)));
    if input.burden_rate_percent > Decimal::ZERO {
        lines.push(format!(
            "Employee burden rate: {}%",
            format_plain(input.burden_rate_percent)
        ));
    }
    lines.push(format!(
        "Annual alerts: {}",
        format_grouped(Decimal::from(input.alerts_per_year))
    ));
    lines.push(format!("Alert triage today: {}%", format_plain(input.triage_percent)));
    lines.push(format!("Risk tolerance: {}", format_plain(input.risk_tolerance)));
    lines.push(format!("Service level: {}", input.service_level));
    if input.existing_products.is_empty() {
        lines.push("Existing products: None".into());
    } else {
        let products: Vec<&str> = input.existing_products.iter().map(String::as_str).collect();
        lines.push(format!("Existing products: {}", products.join(", ")));
    }
    lines.push(format!("Industry: {}", input.industry));
    lines.push(format!("Country: {}", input.country));
    if !input.technologies.is_empty() {
        let techs: Vec<String> = input
            .technologies
            .iter()
            .map(|t| t.key().to_uppercase())
            .collect();
        lines.push(format!("Tech stack needed: {}", techs.join(", ")));
    }
    let advanced_used = !input.technologies.is_empty()
        || input.servers > 0
        || input.burden_rate_percent > Decimal::ZERO;
    if input.strict_compliance {
        lines.push("Strict regulatory compliance: Yes".into());
    } else if advanced_used {
        lines.push("Strict regulatory compliance: No".into());
    }
    lines
}

fn result_lines(result: &CalculationResult) -> Vec<String> {
    vec![
        format!(
            "Total cost to build your own SOC: {}",
            format_currency(result.total_in_house)
        ),
        format!(
            "Total cost with WatchGuard MDR: {}",
            format_currency(result.total_mdr)
        ),
        format!("Annual savings: {}", format_currency(result.annual_savings)),
        format!("ROI: {}%", format_one_decimal(result.roi_percent)),
        format!("Freed SOC capacity: {} FTEs", format_one_decimal(result.freed_ftes)),
        "Reduced exposure time: 108 days".into(),
    ]
}

const METHODOLOGY: [&str; 4] = [
    "In-house SOC cost is estimated at $440 per endpoint per year for mid-sized organizations \
     and scaled by your analyst salary and overhead. Server infrastructure adds additional \
     recurring costs.",
    "MDR cost is based on the selected service level ($15-25 per endpoint per month) with \
     discounts for existing WatchGuard products and add-on pricing for SIEM/EDR/Threat \
     Intelligence if selected.",
    "Expected breach costs are derived from industry and country averages and adjusted by your \
     risk tolerance. MDR reduces breach risk by 30% and leverages AI and automation to save \
     $1.76M and shorten breach lifecycle by 108 days.",
    "Savings and ROI are calculated by comparing total in-house costs (operational + expected \
     breach costs) against total MDR costs (subscription + expected breach costs). Freed \
     capacity is estimated from the reduction in alerts you triage.",
];

const FOOTNOTES: [&str; 4] = [
    "[1] IT Convergence: Estimated total cost of in-house SOC and MDR comparison.",
    "[2] Research: AI & automation saves $1.76M and 108 days.",
    "[3] UpGuard: Average breach costs vary by industry.",
    "[4] MDR pricing factors include endpoints, servers and technology stacks.",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{compute, Technology};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn reference_input() -> CalculationInput {
        CalculationInput {
            endpoints: 100,
            alerts_per_year: 10000,
            triage_percent: dec!(50),
            risk_tolerance: dec!(50),
            ..CalculationInput::default()
        }
    }

    fn lines<'a>(doc: &'a ReportDocument, heading: &str) -> &'a [String] {
        match &doc.section(heading).unwrap().body {
            SectionBody::Lines(lines) => lines,
            SectionBody::Paragraphs(_) => panic!("{heading} is not a line section"),
        }
    }

    #[test]
    fn test_default_inputs_skip_advanced_lines() {
        let input = reference_input();
        let doc = build_report(&input, &compute(&input), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());

        assert_eq!(
            lines(&doc, "Your Inputs"),
            &[
                "Endpoints: 100",
                "Analyst salary: $120,000",
                "Annual alerts: 10,000",
                "Alert triage today: 50%",
                "Risk tolerance: 50",
                "Service level: Threat Hunting and Response",
                "Existing products: None",
                "Industry: Other",
                "Country: Other",
            ]
        );
        assert_eq!(doc.date_line(), "Generated on 10/19/2026");
    }

    #[test]
    fn test_advanced_settings_appear_when_used() {
        let mut input = reference_input();
        input.servers = 12;
        input.burden_rate_percent = dec!(30);
        input.technologies = [Technology::Siem, Technology::ThreatIntel].into_iter().collect();
        input.existing_products = vec!["Firebox".into(), "AuthPoint".into(), "Firebox".into()];
        let doc = build_report(&input, &compute(&input), NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        let inputs = lines(&doc, "Your Inputs");

        assert!(inputs.contains(&"Servers: 12".to_string()));
        assert!(inputs.contains(&"Employee burden rate: 30%".to_string()));
        assert!(inputs.contains(&"Tech stack needed: SIEM, THREATINTEL".to_string()));
        assert!(inputs.contains(&"Existing products: Firebox, AuthPoint".to_string()));
        assert_eq!(inputs.last().unwrap(), "Strict regulatory compliance: No");
    }

    #[test]
    fn test_inputs_echo_coerced_values() {
        let mut input = reference_input();
        input.analyst_salary = Decimal::ZERO;
        input.triage_percent = dec!(140);
        input.risk_tolerance = dec!(-5);
        let result = compute(&input);
        let doc = build_report(&input, &result, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        let inputs = lines(&doc, "Your Inputs");

        assert_eq!(result.in_house_annual_cost, dec!(44000));
        assert!(inputs.contains(&"Analyst salary: $120,000".to_string()));
        assert!(inputs.contains(&"Alert triage today: 100%".to_string()));
        assert!(inputs.contains(&"Risk tolerance: 0".to_string()));
    }

    #[test]
    fn test_compliance_yes_printed_without_other_advanced_settings() {
        let mut input = reference_input();
        input.strict_compliance = true;
        let doc = build_report(&input, &compute(&input), NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        assert_eq!(
            lines(&doc, "Your Inputs").last().unwrap(),
            "Strict regulatory compliance: Yes"
        );
    }

    #[test]
    fn test_results_section() {
        let input = reference_input();
        let doc = build_report(&input, &compute(&input), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(
            lines(&doc, "Results Summary"),
            &[
                "Total cost to build your own SOC: $654,000",
                "Total cost with WatchGuard MDR: $24,000",
                "Annual savings: $630,000",
                "ROI: 2625.0%",
                "Freed SOC capacity: 0.2 FTEs",
                "Reduced exposure time: 108 days",
            ]
        );
        assert_eq!(doc.footnotes.len(), 4);
    }
}
