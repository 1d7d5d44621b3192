use clap::Args;
use serde::Serialize;
use serde_json::Value;

use mdr_roi_core::calculator::PricingPolicy;
use mdr_roi_core::sensitivity::{self, OutputMetric, SensitivityInput, SensitivityOutput};
use mdr_roi_core::SensitivityVariable;
use rust_decimal::Decimal;

use super::calculate::{resolve_input, FormArgs};
use super::CommandOutput;
use crate::OutputFormat;

/// Arguments for sensitivity analysis
#[derive(Args)]
pub struct SensitivityArgs {
    /// First sensitivity variable in format name:min:max:step
    /// (e.g. "endpoints:100:1000:100")
    #[arg(long)]
    pub var1: String,

    /// Second sensitivity variable (optional, creates a 2D grid)
    #[arg(long)]
    pub var2: Option<String>,

    /// Metric to tabulate: total_in_house, total_mdr, annual_savings,
    /// roi_percent, freed_ftes
    #[arg(long, default_value = "annual_savings")]
    pub metric: String,

    /// Base case inputs
    #[command(flatten)]
    pub form: FormArgs,
}

#[derive(Debug, Serialize)]
struct SensitivityRow {
    var1_value: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    var2_value: Option<Decimal>,
    output_value: Decimal,
}

fn parse_sens_var(raw: &str) -> Result<SensitivityVariable, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() != 4 {
        return Err(format!(
            "Sensitivity variable must be name:min:max:step, got '{}'",
            raw
        )
        .into());
    }
    Ok(SensitivityVariable {
        name: parts[0].to_string(),
        min: parts[1].parse()?,
        max: parts[2].parse()?,
        step: parts[3].parse()?,
    })
}

/// One row per grid point, for table and CSV output.
fn flatten(output: &SensitivityOutput) -> Vec<SensitivityRow> {
    let mut rows = Vec::new();
    for (i, &v1) in output.variable_1_values.iter().enumerate() {
        let Some(row) = output.matrix.get(i) else {
            continue;
        };
        if output.variable_2_values.is_empty() {
            if let Some(&value) = row.first() {
                rows.push(SensitivityRow {
                    var1_value: v1,
                    var2_value: None,
                    output_value: value,
                });
            }
        } else {
            for (&v2, &value) in output.variable_2_values.iter().zip(row) {
                rows.push(SensitivityRow {
                    var1_value: v1,
                    var2_value: Some(v2),
                    output_value: value,
                });
            }
        }
    }
    rows
}

pub fn run_sensitivity(
    args: SensitivityArgs,
    policy: &PricingPolicy,
    format: &OutputFormat,
) -> Result<CommandOutput, Box<dyn std::error::Error>> {
    let sens_input = SensitivityInput {
        base_input: resolve_input(&args.form)?,
        variable_1: parse_sens_var(&args.var1)?,
        variable_2: args.var2.as_deref().map(parse_sens_var).transpose()?,
        output_metric: args.metric.parse::<OutputMetric>()?,
    };
    let output = sensitivity::run_sensitivity(&sens_input, policy)?;

    match format {
        OutputFormat::Table | OutputFormat::Csv => {
            let rows = serde_json::to_value(flatten(&output.result))?;
            Ok(CommandOutput::Data(rows))
        }
        OutputFormat::Json | OutputFormat::Minimal => {
            Ok(CommandOutput::Data(serde_json::to_value(output)?))
        }
    }
}
