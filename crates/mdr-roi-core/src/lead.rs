//! Lead capture gate in front of the downloadable report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculator::{CalculationInput, CalculationResult};
use crate::error::RoiError;
use crate::report::{build_report, ReportDocument};
use crate::RoiResult;

/// Contact details collected before a report is released.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadDetails {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl LeadDetails {
    /// Copy with surrounding whitespace removed; a blank phone becomes `None`.
    pub fn trimmed(&self) -> LeadDetails {
        LeadDetails {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            company: self.company.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self
                .phone
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        }
    }

    pub fn validate(&self) -> RoiResult<()> {
        let required = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("company", &self.company),
            ("email", &self.email),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(RoiError::InvalidInput {
                    field: field.into(),
                    reason: "Required contact field is empty".into(),
                });
            }
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(RoiError::InvalidInput {
                field: "email".into(),
                reason: format!("'{email}' is not an email address"),
            }),
        }
    }
}

/// Destination for captured leads (CRM, marketing automation, log).
pub trait LeadSink {
    fn submit(&self, lead: &LeadDetails) -> RoiResult<()>;
}

/// Records captured leads in the application log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLeadSink;

impl LeadSink for LogLeadSink {
    fn submit(&self, lead: &LeadDetails) -> RoiResult<()> {
        tracing::info!(
            first_name = %lead.first_name,
            last_name = %lead.last_name,
            company = %lead.company,
            email = %lead.email,
            phone = lead.phone.as_deref().unwrap_or(""),
            "lead captured"
        );
        Ok(())
    }
}

/// Validate and submit the lead, then build the report. Nothing is built
/// for an invalid lead, and a failed submission blocks the report.
pub fn generate_gated_report(
    lead: &LeadDetails,
    sink: &dyn LeadSink,
    input: &CalculationInput,
    result: &CalculationResult,
    generated_on: NaiveDate,
) -> RoiResult<ReportDocument> {
    let lead = lead.trimmed();
    lead.validate()?;
    sink.submit(&lead)?;
    Ok(build_report(input, result, generated_on))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::compute;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSink {
        leads: RefCell<Vec<LeadDetails>>,
    }

    impl LeadSink for RecordingSink {
        fn submit(&self, lead: &LeadDetails) -> RoiResult<()> {
            self.leads.borrow_mut().push(lead.clone());
            Ok(())
        }
    }

    struct FailingSink;

    impl LeadSink for FailingSink {
        fn submit(&self, _lead: &LeadDetails) -> RoiResult<()> {
            Err(RoiError::SerializationError("endpoint rejected lead".into()))
        }
    }

    fn sample_lead() -> LeadDetails {
        LeadDetails {
            first_name: " Ada ".into(),
            last_name: "Lovelace".into(),
            company: "Analytical Engines Ltd".into(),
            email: "ada@example.com".into(),
            phone: Some("   ".into()),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_valid_lead_releases_report() {
        let input = CalculationInput {
            endpoints: 100,
            ..CalculationInput::default()
        };
        let sink = RecordingSink::default();
        let doc = generate_gated_report(&sample_lead(), &sink, &input, &compute(&input), today())
            .unwrap();

        assert_eq!(doc.title, "WatchGuard MDR ROI Report");
        let leads = sink.leads.borrow();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].first_name, "Ada");
        assert_eq!(leads[0].phone, None);
    }

    #[test]
    fn test_blank_required_field_blocks_report() {
        let mut lead = sample_lead();
        lead.company = "  ".into();
        let input = CalculationInput::default();
        let sink = RecordingSink::default();

        match generate_gated_report(&lead, &sink, &input, &compute(&input), today()).unwrap_err() {
            RoiError::InvalidInput { field, .. } => assert_eq!(field, "company"),
            e => panic!("Expected InvalidInput, got {e:?}"),
        }
        assert!(sink.leads.borrow().is_empty());
    }

    #[test]
    fn test_email_needs_at_sign() {
        let mut lead = sample_lead();
        lead.email = "ada.example.com".into();
        assert!(lead.validate().is_err());
        lead.email = "@example.com".into();
        assert!(lead.validate().is_err());
    }

    #[test]
    fn test_failed_submission_blocks_report() {
        let input = CalculationInput::default();
        let result =
            generate_gated_report(&sample_lead(), &FailingSink, &input, &compute(&input), today());
        assert!(result.is_err());
    }
}
