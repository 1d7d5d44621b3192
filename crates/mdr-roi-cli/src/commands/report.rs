use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use serde_json::json;
use std::fs;

use mdr_roi_core::calculator::{self, PricingPolicy};
use mdr_roi_core::lead::{self, LeadDetails, LogLeadSink};
use mdr_roi_core::report::{self, REPORT_FILE_NAME};

use super::calculate::{resolve_input, FormArgs};
use super::CommandOutput;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Pdf,
    Text,
}

/// Arguments for the gated report download
#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub form: FormArgs,

    /// Contact first name
    #[arg(long)]
    pub first_name: String,

    /// Contact last name
    #[arg(long)]
    pub last_name: String,

    /// Company name
    #[arg(long)]
    pub company: String,

    /// Business email
    #[arg(long)]
    pub email: String,

    /// Phone number (optional)
    #[arg(long)]
    pub phone: Option<String>,

    /// Destination file
    #[arg(long, default_value = REPORT_FILE_NAME)]
    pub out: String,

    /// Report format
    #[arg(long, value_enum, default_value = "pdf")]
    pub format: ReportFormat,

    /// Report date as YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub date: Option<String>,
}

fn report_date(raw: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match raw {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| format!("Invalid --date '{s}': {e}").into()),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

pub fn run_report(
    args: ReportArgs,
    policy: &PricingPolicy,
) -> Result<CommandOutput, Box<dyn std::error::Error>> {
    let calc_input = resolve_input(&args.form)?.sanitized(policy.baseline_analyst_salary);
    let result = calculator::compute_with_policy(&calc_input, policy)?;
    let generated_on = report_date(args.date.as_deref())?;

    let contact = LeadDetails {
        first_name: args.first_name,
        last_name: args.last_name,
        company: args.company,
        email: args.email,
        phone: args.phone,
    };
    let doc = lead::generate_gated_report(&contact, &LogLeadSink, &calc_input, &result, generated_on)?;

    let (bytes, format) = match args.format {
        ReportFormat::Pdf => (report::render_pdf(&doc)?, "pdf"),
        ReportFormat::Text => (report::render_text(&doc).into_bytes(), "text"),
    };
    fs::write(&args.out, &bytes)
        .map_err(|e| format!("Failed to write '{}': {}", args.out, e))?;

    tracing::info!(path = %args.out, format, bytes = bytes.len(), "report written");

    Ok(CommandOutput::Data(json!({
        "path": args.out,
        "format": format,
        "bytes": bytes.len(),
        "generated_on": generated_on.to_string(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_date_parses_iso() {
        let date = report_date(Some("2026-10-19")).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
    }

    #[test]
    fn test_report_date_rejects_us_order() {
        assert!(report_date(Some("10/19/2026")).is_err());
    }
}
