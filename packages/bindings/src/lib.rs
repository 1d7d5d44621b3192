use chrono::NaiveDate;
use napi::bindgen_prelude::Buffer;
use napi::Result as NapiResult;
use napi_derive::napi;

use mdr_roi_core::calculator::{self, CalculationInput, CalculationResult, PricingPolicy};
use mdr_roi_core::collector::{self, FormState};
use mdr_roi_core::lead::{self, LeadDetails, LogLeadSink};
use mdr_roi_core::report::{self, ReportDocument};
use mdr_roi_core::{presenter, sensitivity};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Published policy unless the caller passes an override.
fn parse_policy(policy_json: Option<String>) -> NapiResult<PricingPolicy> {
    match policy_json {
        Some(json) => {
            let policy: PricingPolicy = serde_json::from_str(&json).map_err(to_napi_error)?;
            policy.validate().map_err(to_napi_error)?;
            Ok(policy)
        }
        None => Ok(PricingPolicy::default()),
    }
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// Raw form state to a calculation input. Never fails on field contents.
#[napi]
pub fn collect_inputs(form_json: String) -> NapiResult<String> {
    let form: FormState = serde_json::from_str(&form_json).map_err(to_napi_error)?;
    serde_json::to_string(&collector::collect(&form)).map_err(to_napi_error)
}

#[napi]
pub fn compute_roi(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let input: CalculationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy = parse_policy(policy_json)?;
    let output = calculator::calculate_roi(&input, &policy).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn default_policy() -> NapiResult<String> {
    serde_json::to_string(&PricingPolicy::default()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Presenter
// ---------------------------------------------------------------------------

#[napi]
pub fn present_results(result_json: String) -> NapiResult<String> {
    let result: CalculationResult = serde_json::from_str(&result_json).map_err(to_napi_error)?;
    serde_json::to_string(&presenter::present(&result)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Gate the report behind the lead form. `date` is YYYY-MM-DD.
#[napi]
pub fn capture_lead_and_build_report(
    lead_json: String,
    input_json: String,
    date: String,
    policy_json: Option<String>,
) -> NapiResult<String> {
    let lead: LeadDetails = serde_json::from_str(&lead_json).map_err(to_napi_error)?;
    let raw: CalculationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let generated_on = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(to_napi_error)?;
    let policy = parse_policy(policy_json)?;
    let input = raw.sanitized(policy.baseline_analyst_salary);

    let result = calculator::compute_with_policy(&input, &policy).map_err(to_napi_error)?;
    let doc = lead::generate_gated_report(&lead, &LogLeadSink, &input, &result, generated_on)
        .map_err(to_napi_error)?;
    serde_json::to_string(&doc).map_err(to_napi_error)
}

#[napi]
pub fn render_report_text(document_json: String) -> NapiResult<String> {
    let doc: ReportDocument = serde_json::from_str(&document_json).map_err(to_napi_error)?;
    Ok(report::render_text(&doc))
}

#[napi]
pub fn render_report_pdf(document_json: String) -> NapiResult<Buffer> {
    let doc: ReportDocument = serde_json::from_str(&document_json).map_err(to_napi_error)?;
    let bytes = report::render_pdf(&doc).map_err(to_napi_error)?;
    Ok(Buffer::from(bytes))
}

// ---------------------------------------------------------------------------
// Sensitivity
// ---------------------------------------------------------------------------

#[napi]
pub fn run_sensitivity(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let input: sensitivity::SensitivityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy = parse_policy(policy_json)?;
    let output = sensitivity::run_sensitivity(&input, &policy).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
