//! One- and two-way sensitivity sweeps over calculator inputs.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Instant;

use crate::calculator::engine::evaluate;
use crate::calculator::{CalculationInput, CalculationResult, PricingPolicy};
use crate::error::RoiError;
use crate::types::{with_metadata, ComputationOutput, SensitivityVariable};
use crate::RoiResult;

const MAX_GRID_POINTS: usize = 10_000;

/// Numeric input a sweep can vary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepVariable {
    Endpoints,
    Servers,
    AnalystSalary,
    BurdenRate,
    Alerts,
    TriagePercent,
    RiskTolerance,
}

impl FromStr for SweepVariable {
    type Err = RoiError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "endpoints" => Ok(SweepVariable::Endpoints),
            "servers" => Ok(SweepVariable::Servers),
            "analyst_salary" => Ok(SweepVariable::AnalystSalary),
            "burden_rate" => Ok(SweepVariable::BurdenRate),
            "alerts" => Ok(SweepVariable::Alerts),
            "triage_percent" => Ok(SweepVariable::TriagePercent),
            "risk_tolerance" => Ok(SweepVariable::RiskTolerance),
            other => Err(RoiError::InvalidInput {
                field: format!("variable:{other}"),
                reason: "Unknown sensitivity variable (expected endpoints, servers, \
                         analyst_salary, burden_rate, alerts, triage_percent or risk_tolerance)"
                    .into(),
            }),
        }
    }
}

impl SweepVariable {
    /// Copy of `base` with this variable set to `value`. Counts are
    /// truncated toward zero and floored at zero.
    pub fn apply(&self, base: &CalculationInput, value: Decimal) -> CalculationInput {
        let count = || value.trunc().max(Decimal::ZERO).to_u64().unwrap_or(u64::MAX);
        let mut input = base.clone();
        match self {
            SweepVariable::Endpoints => input.endpoints = count(),
            SweepVariable::Servers => input.servers = count(),
            SweepVariable::Alerts => input.alerts_per_year = count(),
            SweepVariable::AnalystSalary => input.analyst_salary = value,
            SweepVariable::BurdenRate => input.burden_rate_percent = value,
            SweepVariable::TriagePercent => input.triage_percent = value,
            SweepVariable::RiskTolerance => input.risk_tolerance = value,
        }
        input
    }
}

/// Result field a sweep reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMetric {
    TotalInHouse,
    TotalMdr,
    #[default]
    AnnualSavings,
    RoiPercent,
    FreedFtes,
}

impl OutputMetric {
    pub fn read(&self, result: &CalculationResult) -> Decimal {
        match self {
            OutputMetric::TotalInHouse => result.total_in_house,
            OutputMetric::TotalMdr => result.total_mdr,
            OutputMetric::AnnualSavings => result.annual_savings,
            OutputMetric::RoiPercent => result.roi_percent,
            OutputMetric::FreedFtes => result.freed_ftes,
        }
    }
}

impl FromStr for OutputMetric {
    type Err = RoiError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "total_in_house" => Ok(OutputMetric::TotalInHouse),
            "total_mdr" => Ok(OutputMetric::TotalMdr),
            "annual_savings" | "savings" => Ok(OutputMetric::AnnualSavings),
            "roi_percent" | "roi" => Ok(OutputMetric::RoiPercent),
            "freed_ftes" => Ok(OutputMetric::FreedFtes),
            other => Err(RoiError::InvalidInput {
                field: "output_metric".into(),
                reason: format!("Unknown output metric '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    /// Base case every grid point starts from
    pub base_input: CalculationInput,
    pub variable_1: SensitivityVariable,
    /// Optional second axis; omit for a one-way sweep
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_2: Option<SensitivityVariable>,
    #[serde(default)]
    pub output_metric: OutputMetric,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub variable_1_name: String,
    pub variable_1_values: Vec<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_2_name: Option<String>,
    /// Empty for a one-way sweep
    pub variable_2_values: Vec<Decimal>,
    pub output_metric: OutputMetric,
    /// matrix[i][j] = metric at (variable_1_values[i], variable_2_values[j]);
    /// one column per row for a one-way sweep
    pub matrix: Vec<Vec<Decimal>>,
    /// Metric at the unmodified base input
    pub base_case_value: Decimal,
}

/// Generate the sweep values for a sensitivity variable from min to max with step.
fn generate_sweep_values(var: &SensitivityVariable) -> RoiResult<Vec<Decimal>> {
    if var.step <= Decimal::ZERO {
        return Err(RoiError::InvalidInput {
            field: format!("variable:{}", var.name),
            reason: "Step must be positive".into(),
        });
    }
    if var.min > var.max {
        return Err(RoiError::InvalidInput {
            field: format!("variable:{}", var.name),
            reason: "Min must be <= max".into(),
        });
    }

    let mut values = Vec::new();
    let mut current = var.min;
    while current <= var.max {
        values.push(current);
        if values.len() > MAX_GRID_POINTS {
            return Err(too_many_points());
        }
        // Past Decimal::MAX is past `max` too.
        match current.checked_add(var.step) {
            Some(next) => current = next,
            None => break,
        }
    }
    // Ensure max is included if step doesn't land exactly on it
    if let Some(&last) = values.last() {
        if last < var.max {
            values.push(var.max);
        }
    }
    Ok(values)
}

fn too_many_points() -> RoiError {
    RoiError::InvalidInput {
        field: "variable".into(),
        reason: format!("Sweep exceeds {MAX_GRID_POINTS} grid points"),
    }
}

pub fn run_sensitivity(
    input: &SensitivityInput,
    policy: &PricingPolicy,
) -> RoiResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    policy.validate()?;

    let var_1: SweepVariable = input.variable_1.name.parse()?;
    let v1_values = generate_sweep_values(&input.variable_1)?;
    let axis_2 = match &input.variable_2 {
        Some(v) => {
            let var_2: SweepVariable = v.name.parse()?;
            if var_2 == var_1 {
                return Err(RoiError::InvalidInput {
                    field: format!("variable:{}", v.name),
                    reason: "Both axes sweep the same variable".into(),
                });
            }
            Some((var_2, generate_sweep_values(v)?))
        }
        None => None,
    };
    let columns = axis_2.as_ref().map_or(1, |(_, values)| values.len());
    if v1_values.len() * columns > MAX_GRID_POINTS {
        return Err(too_many_points());
    }

    let metric = input.output_metric;
    let mut matrix = Vec::with_capacity(v1_values.len());
    for v1 in &v1_values {
        let row_input = var_1.apply(&input.base_input, *v1);
        let row = match &axis_2 {
            Some((var_2, v2_values)) => v2_values
                .iter()
                .map(|v2| metric.read(&evaluate(&var_2.apply(&row_input, *v2), policy)))
                .collect(),
            None => vec![metric.read(&evaluate(&row_input, policy))],
        };
        matrix.push(row);
    }

    let base_case_value = metric.read(&evaluate(&input.base_input, policy));
    if matrix.iter().flatten().all(|v| *v == base_case_value) {
        warnings.push(format!(
            "{:?} does not respond to the swept variable(s) over this range",
            metric
        ));
    }

    let output = SensitivityOutput {
        variable_1_name: input.variable_1.name.clone(),
        variable_1_values: v1_values,
        variable_2_name: input.variable_2.as_ref().map(|v| v.name.clone()),
        variable_2_values: axis_2.map(|(_, values)| values).unwrap_or_default(),
        output_metric: metric,
        matrix,
        base_case_value,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        if output.variable_2_name.is_some() {
            "2-Way Sensitivity Analysis"
        } else {
            "1-Way Sensitivity Analysis"
        },
        &serde_json::json!({
            "variable_1": input.variable_1.name,
            "variable_2": input.variable_2.as_ref().map(|v| &v.name),
            "output_metric": metric,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn var(name: &str, min: Decimal, max: Decimal, step: Decimal) -> SensitivityVariable {
        SensitivityVariable {
            name: name.into(),
            min,
            max,
            step,
        }
    }

    fn base() -> CalculationInput {
        CalculationInput {
            endpoints: 100,
            risk_tolerance: dec!(50),
            ..CalculationInput::default()
        }
    }

    #[test]
    fn test_one_way_endpoint_sweep() {
        let input = SensitivityInput {
            base_input: base(),
            variable_1: var("endpoints", dec!(100), dec!(300), dec!(100)),
            variable_2: None,
            output_metric: OutputMetric::TotalMdr,
        };
        let out = run_sensitivity(&input, &PricingPolicy::default()).unwrap().result;

        assert_eq!(out.variable_1_values, vec![dec!(100), dec!(200), dec!(300)]);
        assert_eq!(
            out.matrix,
            vec![vec![dec!(24000)], vec![dec!(48000)], vec![dec!(72000)]]
        );
        assert_eq!(out.base_case_value, dec!(24000));
        assert!(out.variable_2_values.is_empty());
    }

    #[test]
    fn test_two_way_grid_shape() {
        let input = SensitivityInput {
            base_input: base(),
            variable_1: var("analyst_salary", dec!(90000), dec!(150000), dec!(30000)),
            variable_2: Some(var("risk_tolerance", dec!(0), dec!(100), dec!(25))),
            output_metric: OutputMetric::AnnualSavings,
        };
        let output = run_sensitivity(&input, &PricingPolicy::default()).unwrap();
        let out = &output.result;

        assert_eq!(out.matrix.len(), 3);
        assert!(out.matrix.iter().all(|row| row.len() == 5));
        // Higher salary -> costlier in-house SOC -> larger savings.
        assert!(out.matrix[2][0] > out.matrix[0][0]);
        assert_eq!(output.methodology, "2-Way Sensitivity Analysis");
    }

    #[test]
    fn test_max_included_when_step_overshoots() {
        let values = generate_sweep_values(&var("alerts", dec!(0), dec!(10), dec!(4))).unwrap();
        assert_eq!(values, vec![dec!(0), dec!(4), dec!(8), dec!(10)]);
    }

    #[test]
    fn test_sweep_near_decimal_max_stops_at_max() {
        let step = Decimal::MAX / dec!(2);
        let values = generate_sweep_values(&var("analyst_salary", Decimal::ZERO, Decimal::MAX, step))
            .unwrap();
        assert_eq!(values.first(), Some(&Decimal::ZERO));
        assert_eq!(values.last(), Some(&Decimal::MAX));
        assert!(values.len() <= 4);

        let input = SensitivityInput {
            base_input: base(),
            variable_1: var("analyst_salary", Decimal::ZERO, Decimal::MAX, step),
            variable_2: None,
            output_metric: OutputMetric::TotalInHouse,
        };
        assert!(run_sensitivity(&input, &PricingPolicy::default()).is_ok());
    }

    #[test]
    fn test_bad_sweeps_rejected() {
        assert!(generate_sweep_values(&var("alerts", dec!(0), dec!(10), dec!(0))).is_err());
        assert!(generate_sweep_values(&var("alerts", dec!(10), dec!(0), dec!(1))).is_err());
        assert!(generate_sweep_values(&var("alerts", dec!(0), dec!(1000000), dec!(1))).is_err());
        assert!("headcount".parse::<SweepVariable>().is_err());
        assert!("margin".parse::<OutputMetric>().is_err());
    }

    #[test]
    fn test_same_variable_on_both_axes_rejected() {
        let input = SensitivityInput {
            base_input: base(),
            variable_1: var("servers", dec!(0), dec!(10), dec!(5)),
            variable_2: Some(var("servers", dec!(0), dec!(10), dec!(5))),
            output_metric: OutputMetric::TotalInHouse,
        };
        assert!(run_sensitivity(&input, &PricingPolicy::default()).is_err());
    }

    #[test]
    fn test_flat_metric_warns() {
        let input = SensitivityInput {
            base_input: base(),
            variable_1: var("servers", dec!(0), dec!(10), dec!(5)),
            variable_2: None,
            output_metric: OutputMetric::FreedFtes,
        };
        let output = run_sensitivity(&input, &PricingPolicy::default()).unwrap();
        assert!(output.warnings.iter().any(|w| w.contains("does not respond")));
    }

    #[test]
    fn test_apply_truncates_counts() {
        let input = SweepVariable::Endpoints.apply(&base(), dec!(12.9));
        assert_eq!(input.endpoints, 12);
        let input = SweepVariable::Servers.apply(&base(), dec!(-3));
        assert_eq!(input.servers, 0);
    }
}
