use clap::Args;
use serde_json::Value;

use mdr_roi_core::calculator::{self, CalculationInput, PricingPolicy};
use mdr_roi_core::collector::{self, FieldValue, FormState, PartnerPricing};
use mdr_roi_core::presenter;

use super::CommandOutput;
use crate::input;
use crate::OutputFormat;

/// Calculator form fields. Values are taken as typed and coerced the same
/// way the web form coerces them (garbage reads as 0, a missing salary as
/// the baseline salary).
#[derive(Args, Debug, Clone, Default)]
pub struct FormArgs {
    /// Number of endpoints (workstations, laptops)
    #[arg(long, allow_hyphen_values = true)]
    pub endpoints: Option<String>,

    /// Number of servers
    #[arg(long, allow_hyphen_values = true)]
    pub servers: Option<String>,

    /// Annual analyst salary (defaults to 120000)
    #[arg(long, allow_hyphen_values = true)]
    pub analyst_salary: Option<String>,

    /// Employee burden rate in percent (e.g. 30)
    #[arg(long, allow_hyphen_values = true)]
    pub burden_rate: Option<String>,

    /// Security alerts per year
    #[arg(long, allow_hyphen_values = true)]
    pub alerts: Option<String>,

    /// Share of alerts triaged manually today, 0-100
    #[arg(long, allow_hyphen_values = true)]
    pub triage_percent: Option<String>,

    /// Risk tolerance, 0-100 (lower means higher effective risk)
    #[arg(long, allow_hyphen_values = true)]
    pub risk_tolerance: Option<String>,

    /// Monitoring | "Threat Hunting and Response" | "Full Incident Response"
    #[arg(long)]
    pub service_level: Option<String>,

    /// Healthcare, Financial, Pharmaceuticals, Energy, Industrial,
    /// "Critical Infrastructure" or Other
    #[arg(long)]
    pub industry: Option<String>,

    /// USA, "Middle East", Canada, Germany, Japan or Other
    #[arg(long)]
    pub country: Option<String>,

    /// Existing vendor product (repeatable or comma-separated)
    #[arg(long = "product", value_delimiter = ',')]
    pub products: Vec<String>,

    /// Technology add-on: siem, edr, threatIntel (repeatable or comma-separated)
    #[arg(long = "tech", value_delimiter = ',')]
    pub technologies: Vec<String>,

    /// Strict regulatory compliance environment
    #[arg(long)]
    pub compliance: bool,

    /// Partner pricing unlocked; the three partner prices below apply only
    /// when all are given
    #[arg(long)]
    pub partner_pricing: bool,

    /// Partner price for Monitoring, per endpoint per month
    #[arg(long, allow_hyphen_values = true)]
    pub partner_monitoring: Option<String>,

    /// Partner price for Threat Hunting and Response, per endpoint per month
    #[arg(long, allow_hyphen_values = true)]
    pub partner_threat_hunting: Option<String>,

    /// Partner price for Full Incident Response, per endpoint per month
    #[arg(long, allow_hyphen_values = true)]
    pub partner_full_ir: Option<String>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

impl FormArgs {
    fn to_form_state(&self) -> FormState {
        let field = |v: &Option<String>| v.as_deref().map(FieldValue::from);
        FormState {
            endpoints: field(&self.endpoints),
            servers: field(&self.servers),
            analyst_salary: field(&self.analyst_salary),
            burden_rate: field(&self.burden_rate),
            alerts: field(&self.alerts),
            triage_percent: field(&self.triage_percent),
            risk_tolerance: field(&self.risk_tolerance),
            service_level: self.service_level.clone(),
            industry: self.industry.clone(),
            country: self.country.clone(),
            products: self.products.clone(),
            technologies: self.technologies.clone(),
            strict_compliance: self.compliance,
            partner_pricing: PartnerPricing {
                unlocked: self.partner_pricing,
                monitoring: field(&self.partner_monitoring),
                threat_hunting_and_response: field(&self.partner_threat_hunting),
                full_incident_response: field(&self.partner_full_ir),
            },
        }
    }
}

/// Resolve the calculation input: `--input` file, then piped stdin, then
/// the individual flags.
pub fn resolve_input(args: &FormArgs) -> Result<CalculationInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if let Some(piped) = input::stdin::read_stdin()? {
        return Ok(piped);
    }
    Ok(collector::collect(&args.to_form_state()))
}

/// Arguments for the cost comparison
#[derive(Args)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub form: FormArgs,
}

/// Arguments for the results panel
#[derive(Args)]
pub struct PresentArgs {
    #[command(flatten)]
    pub form: FormArgs,
}

pub fn run_calculate(
    args: CalculateArgs,
    policy: &PricingPolicy,
) -> Result<CommandOutput, Box<dyn std::error::Error>> {
    let calc_input = resolve_input(&args.form)?;
    let result = calculator::calculate_roi(&calc_input, policy)?;
    Ok(CommandOutput::Data(serde_json::to_value(result)?))
}

pub fn run_present(
    args: PresentArgs,
    policy: &PricingPolicy,
    format: &OutputFormat,
) -> Result<CommandOutput, Box<dyn std::error::Error>> {
    let calc_input = resolve_input(&args.form)?;
    let result = calculator::compute_with_policy(&calc_input, policy)?;
    let presentation = presenter::present(&result);

    match format {
        OutputFormat::Json => Ok(CommandOutput::Data(serde_json::to_value(presentation)?)),
        OutputFormat::Table | OutputFormat::Minimal => {
            Ok(CommandOutput::Text(presentation.render_text()))
        }
        OutputFormat::Csv => {
            let rows: Vec<Value> = presentation
                .rows
                .iter()
                .map(|r| serde_json::json!({ "label": r.label, "value": r.value }))
                .collect();
            Ok(CommandOutput::Data(Value::Array(rows)))
        }
    }
}
