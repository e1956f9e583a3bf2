// SPDX-License-Identifier: Apache-2.0

use crate::catalog::{IMPACT_THOUGHT_ABOUT_REHOMING, ISSUE_SOMETHING_ELSE};
use crate::validation::{require_email, require_non_blank, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const COLLECTION_DISCOVERY_CALLS: &str = "bookings_discovery_calls";
pub const COLLECTION_IN_PERSON_EVALUATIONS: &str = "bookings_in_person_evaluations";
pub const BOOKING_SOURCE: &str = "website-booking-form";
pub const MANUAL_REVIEW_SERVICE: &str = "Manual Review";

/// In-person evaluation price in CAD cents.
pub const IN_PERSON_PRICE_CENTS: u64 = 10_000;
pub const CURRENCY: &str = "cad";
pub const IN_PERSON_DESCRIPTION: &str = "Montreal Canine Training - In-person evaluation";

const ISSUE_SERVICE_MAP: [(&str, &str); 6] = [
    ("puppy-out-of-control", "Puppy Foundations"),
    ("pulls-lunges-reacts", "City Manners / Reactivity"),
    ("anxiety-fear-separation", "Reactivity & Anxiety"),
    ("aggression-safety", "High-Risk Behaviors"),
    ("better-obedience", "City Manners"),
    (ISSUE_SOMETHING_ELSE, MANUAL_REVIEW_SERVICE),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectMethod {
    DiscoveryCall,
    InPersonEvaluation,
}

impl ConnectMethod {
    pub const ALL: [Self; 2] = [Self::DiscoveryCall, Self::InPersonEvaluation];

    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "discovery-call" => Some(Self::DiscoveryCall),
            "in-person-evaluation" => Some(Self::InPersonEvaluation),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DiscoveryCall => "discovery-call",
            Self::InPersonEvaluation => "in-person-evaluation",
        }
    }

    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::DiscoveryCall => COLLECTION_DISCOVERY_CALLS,
            Self::InPersonEvaluation => COLLECTION_IN_PERSON_EVALUATIONS,
        }
    }

    #[must_use]
    pub const fn requires_payment(self) -> bool {
        matches!(self, Self::InPersonEvaluation)
    }

    #[must_use]
    pub const fn default_payment_status(self) -> PaymentStatus {
        match self {
            Self::DiscoveryCall => PaymentStatus::NotRequired,
            Self::InPersonEvaluation => PaymentStatus::RequiresPaymentMethod,
        }
    }
}

impl Display for ConnectMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status recorded on a lead document.
///
/// Provider statuses we do not model explicitly are carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    NotRequired,
    RequiresPaymentMethod,
    Succeeded,
    Failed,
    Provider(String),
}

impl PaymentStatus {
    #[must_use]
    pub fn parse(input: &str) -> Self {
        match input {
            "not_required" => Self::NotRequired,
            "requires_payment_method" => Self::RequiresPaymentMethod,
            "succeeded" => Self::Succeeded,
            "failed" => Self::Failed,
            other => Self::Provider(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::NotRequired => "not_required",
            Self::RequiresPaymentMethod => "requires_payment_method",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Provider(s) => s,
        }
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answers accumulated by the booking questionnaire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingFormData {
    pub issue: String,
    pub issue_other: String,
    pub duration: String,
    pub tried: Vec<String>,
    pub impact: Vec<String>,
    pub dog_name: String,
    pub dog_breed: String,
    pub dog_age: String,
    pub dog_duration: String,
    pub dog_source: String,
    pub goals: Vec<String>,
    pub connect_method: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub contact_best_time: String,
    pub contact_notes: String,
}

impl BookingFormData {
    #[must_use]
    pub fn has_connect_method(&self) -> bool {
        !self.connect_method.is_empty()
    }

    #[must_use]
    pub fn connect_method(&self) -> Option<ConnectMethod> {
        ConnectMethod::parse(&self.connect_method)
    }

    #[must_use]
    pub fn suggested_service(&self) -> &'static str {
        suggested_service_for_issue(&self.issue)
    }

    #[must_use]
    pub fn is_high_priority(&self) -> bool {
        self.impact.iter().any(|v| v == IMPACT_THOUGHT_ABOUT_REHOMING)
    }

    #[must_use]
    pub fn default_payment_status(&self) -> PaymentStatus {
        self.connect_method()
            .map_or(PaymentStatus::NotRequired, ConnectMethod::default_payment_status)
    }

    pub fn validate_issue(&self) -> Result<(), ValidationError> {
        require_non_blank("issue", &self.issue)?;
        if self.issue == ISSUE_SOMETHING_ELSE {
            require_non_blank("issueOther", &self.issue_other)?;
        }
        Ok(())
    }

    pub fn validate_duration(&self) -> Result<(), ValidationError> {
        require_non_blank("duration", &self.duration)
    }

    pub fn validate_dog_info(&self) -> Result<(), ValidationError> {
        require_non_blank("dogName", &self.dog_name)?;
        require_non_blank("dogBreed", &self.dog_breed)?;
        require_non_blank("dogAge", &self.dog_age)?;
        require_non_blank("dogDuration", &self.dog_duration)?;
        require_non_blank("dogSource", &self.dog_source)
    }

    pub fn validate_connect(&self) -> Result<ConnectMethod, ValidationError> {
        self.connect_method().ok_or_else(|| {
            ValidationError("connectMethod must be discovery-call or in-person-evaluation".to_string())
        })
    }

    pub fn validate_contact(&self) -> Result<(), ValidationError> {
        require_non_blank("contactName", &self.contact_name)?;
        require_email("contactEmail", &self.contact_email)?;
        require_non_blank("contactPhone", &self.contact_phone)?;
        Ok(())
    }
}

#[must_use]
pub fn suggested_service_for_issue(issue: &str) -> &'static str {
    ISSUE_SERVICE_MAP
        .iter()
        .find(|(k, _)| *k == issue)
        .map_or(MANUAL_REVIEW_SERVICE, |(_, v)| *v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_method_wire_names_roundtrip() {
        for method in ConnectMethod::ALL {
            assert_eq!(ConnectMethod::parse(method.as_str()), Some(method));
            let json = serde_json::to_string(&method).expect("serialize");
            assert_eq!(json, format!("\"{}\"", method.as_str()));
        }
        assert_eq!(ConnectMethod::parse("carrier-pigeon"), None);
    }

    #[test]
    fn unknown_issue_falls_back_to_manual_review() {
        assert_eq!(suggested_service_for_issue(""), MANUAL_REVIEW_SERVICE);
        assert_eq!(suggested_service_for_issue("nope"), MANUAL_REVIEW_SERVICE);
        assert_eq!(
            suggested_service_for_issue("aggression-safety"),
            "High-Risk Behaviors"
        );
    }

    #[test]
    fn payment_status_keeps_provider_values() {
        assert_eq!(PaymentStatus::parse("processing").as_str(), "processing");
        assert_eq!(PaymentStatus::parse("succeeded"), PaymentStatus::Succeeded);
    }

    #[test]
    fn something_else_requires_free_text() {
        let mut data = BookingFormData {
            issue: ISSUE_SOMETHING_ELSE.to_string(),
            ..BookingFormData::default()
        };
        assert!(data.validate_issue().is_err());
        data.issue_other = "Eats socks".to_string();
        assert!(data.validate_issue().is_ok());
    }
}
