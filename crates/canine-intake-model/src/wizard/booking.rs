// SPDX-License-Identifier: Apache-2.0

use super::{progress, Direction, WizardError};
use crate::booking::{BookingFormData, ConnectMethod};
use crate::catalog::ISSUE_SOMETHING_ELSE;
use crate::validation::ValidationError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStep {
    Issue,
    Duration,
    Tried,
    Impact,
    DogInfo,
    Goals,
    Connect,
    Contact,
    Confirmation,
}

pub const BOOKING_QUESTION_STEPS: [BookingStep; 8] = [
    BookingStep::Issue,
    BookingStep::Duration,
    BookingStep::Tried,
    BookingStep::Impact,
    BookingStep::DogInfo,
    BookingStep::Goals,
    BookingStep::Connect,
    BookingStep::Contact,
];

impl BookingStep {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::Duration => "duration",
            Self::Tried => "tried",
            Self::Impact => "impact",
            Self::DogInfo => "dog-info",
            Self::Goals => "goals",
            Self::Connect => "connect",
            Self::Contact => "contact",
            Self::Confirmation => "confirmation",
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        BOOKING_QUESTION_STEPS
            .iter()
            .position(|s| *s == self)
            .unwrap_or(BOOKING_QUESTION_STEPS.len())
    }

    fn following(self) -> Option<Self> {
        BOOKING_QUESTION_STEPS.get(self.index() + 1).copied()
    }

    fn preceding(self) -> Self {
        let idx = self.index().min(BOOKING_QUESTION_STEPS.len() - 1);
        BOOKING_QUESTION_STEPS[idx.saturating_sub(1)]
    }

    pub fn validate(self, data: &BookingFormData) -> Result<(), ValidationError> {
        match self {
            Self::Issue => data.validate_issue(),
            Self::Duration => data.validate_duration(),
            Self::Tried => require_selection("tried", &data.tried),
            Self::Impact => require_selection("impact", &data.impact),
            Self::DogInfo => data.validate_dog_info(),
            Self::Goals => require_selection("goals", &data.goals),
            Self::Connect => data.validate_connect().map(|_| ()),
            Self::Contact => data.validate_contact(),
            Self::Confirmation => Ok(()),
        }
    }
}

fn require_selection(field: &str, values: &[String]) -> Result<(), ValidationError> {
    if values.is_empty() {
        return Err(ValidationError(format!("{field} needs at least one selection")));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiSelect {
    Tried,
    Impact,
    Goals,
}

/// Partial update merged into the form record. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingPatch {
    pub issue: Option<String>,
    pub issue_other: Option<String>,
    pub duration: Option<String>,
    pub dog_name: Option<String>,
    pub dog_breed: Option<String>,
    pub dog_age: Option<String>,
    pub dog_duration: Option<String>,
    pub dog_source: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_best_time: Option<String>,
    pub contact_notes: Option<String>,
}

/// Snapshot handed to the caller that creates the payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightTicket {
    pub generation: u64,
    pub form: BookingFormData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedIntent {
    pub payment_intent_id: String,
    pub client_secret: String,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreflightOutcome {
    Applied,
    Stale,
}

/// Body posted to the bookings endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSubmission {
    pub form_data: BookingFormData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct Preflight {
    generation: u64,
    in_flight: Option<u64>,
    prepared: Option<PreparedIntent>,
    error: Option<String>,
}

impl Preflight {
    fn invalidate(&mut self) {
        self.generation += 1;
        self.in_flight = None;
        self.prepared = None;
        self.error = None;
    }
}

#[derive(Debug, Clone)]
pub struct BookingWizard {
    data: BookingFormData,
    step: BookingStep,
    direction: Direction,
    submitting: bool,
    submit_error: Option<String>,
    submitted_id: Option<String>,
    preflight: Preflight,
}

impl Default for BookingWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingWizard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: BookingFormData::default(),
            step: BookingStep::Issue,
            direction: Direction::Forward,
            submitting: false,
            submit_error: None,
            submitted_id: None,
            preflight: Preflight::default(),
        }
    }

    #[must_use]
    pub fn data(&self) -> &BookingFormData {
        &self.data
    }

    #[must_use]
    pub fn step(&self) -> BookingStep {
        self.step
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    #[must_use]
    pub fn submitted_id(&self) -> Option<&str> {
        self.submitted_id.as_deref()
    }

    #[must_use]
    pub fn prepared_intent(&self) -> Option<&PreparedIntent> {
        self.preflight.prepared.as_ref()
    }

    #[must_use]
    pub fn preflight_error(&self) -> Option<&str> {
        self.preflight.error.as_deref()
    }

    #[must_use]
    pub fn preflight_generation(&self) -> u64 {
        self.preflight.generation
    }

    #[must_use]
    pub fn is_current_step_valid(&self) -> bool {
        self.step.validate(&self.data).is_ok()
    }

    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        progress(self.step.index(), BOOKING_QUESTION_STEPS.len())
    }

    pub fn update(&mut self, patch: BookingPatch) {
        let BookingPatch {
            issue,
            issue_other,
            duration,
            dog_name,
            dog_breed,
            dog_age,
            dog_duration,
            dog_source,
            contact_name,
            contact_email,
            contact_phone,
            contact_best_time,
            contact_notes,
        } = patch;
        if let Some(v) = issue {
            self.set_issue(v);
        }
        let d = &mut self.data;
        for (slot, value) in [
            (&mut d.issue_other, issue_other),
            (&mut d.duration, duration),
            (&mut d.dog_name, dog_name),
            (&mut d.dog_breed, dog_breed),
            (&mut d.dog_age, dog_age),
            (&mut d.dog_duration, dog_duration),
            (&mut d.dog_source, dog_source),
            (&mut d.contact_name, contact_name),
            (&mut d.contact_email, contact_email),
            (&mut d.contact_phone, contact_phone),
            (&mut d.contact_best_time, contact_best_time),
            (&mut d.contact_notes, contact_notes),
        ] {
            if let Some(v) = value {
                *slot = v;
            }
        }
    }

    pub fn toggle(&mut self, field: MultiSelect, value: &str) {
        let values = match field {
            MultiSelect::Tried => &mut self.data.tried,
            MultiSelect::Impact => &mut self.data.impact,
            MultiSelect::Goals => &mut self.data.goals,
        };
        if let Some(pos) = values.iter().position(|v| v == value) {
            values.remove(pos);
        } else {
            values.push(value.to_string());
        }
    }

    /// Returns true when the wizard moved on to the next step.
    pub fn select_issue(&mut self, value: &str) -> bool {
        self.set_issue(value.to_string());
        if value == ISSUE_SOMETHING_ELSE {
            return false;
        }
        self.auto_advance(BookingStep::Issue)
    }

    pub fn select_duration(&mut self, value: &str) -> bool {
        self.data.duration = value.to_string();
        self.auto_advance(BookingStep::Duration)
    }

    pub fn select_connect_method(&mut self, method: ConnectMethod) -> bool {
        if self.data.connect_method() != Some(method) {
            self.preflight.invalidate();
        }
        self.data.connect_method = method.as_str().to_string();
        self.auto_advance(BookingStep::Connect)
    }

    pub fn next(&mut self) -> Result<BookingStep, WizardError> {
        if self.submitting {
            return Err(WizardError::Submitting);
        }
        if self.step == BookingStep::Confirmation {
            return Err(WizardError::AlreadyComplete);
        }
        self.step
            .validate(&self.data)
            .map_err(|reason| WizardError::StepInvalid {
                step: self.step.as_str(),
                reason,
            })?;
        let next = self.step.following().ok_or(WizardError::LastStep)?;
        self.step = next;
        self.direction = Direction::Forward;
        Ok(next)
    }

    pub fn back(&mut self) -> Result<BookingStep, WizardError> {
        if self.submitting {
            return Err(WizardError::Submitting);
        }
        if self.step == BookingStep::Confirmation {
            return Err(WizardError::AlreadyComplete);
        }
        self.step = self.step.preceding();
        self.direction = Direction::Backward;
        Ok(self.step)
    }

    /// Hands out a ticket when an in-person intent should be prepared and no
    /// request for the current generation is outstanding.
    pub fn begin_preflight(&mut self) -> Option<PreflightTicket> {
        if self.data.connect_method() != Some(ConnectMethod::InPersonEvaluation) {
            return None;
        }
        let p = &mut self.preflight;
        if p.prepared.is_some() || p.in_flight == Some(p.generation) {
            return None;
        }
        p.in_flight = Some(p.generation);
        p.error = None;
        Some(PreflightTicket {
            generation: p.generation,
            form: self.data.clone(),
        })
    }

    pub fn complete_preflight(
        &mut self,
        ticket: &PreflightTicket,
        result: Result<PreparedIntent, String>,
    ) -> PreflightOutcome {
        let p = &mut self.preflight;
        if ticket.generation != p.generation || p.in_flight != Some(ticket.generation) {
            return PreflightOutcome::Stale;
        }
        p.in_flight = None;
        match result {
            Ok(intent) => p.prepared = Some(intent),
            Err(message) => p.error = Some(message),
        }
        PreflightOutcome::Applied
    }

    pub fn begin_submit(&mut self) -> Result<BookingSubmission, WizardError> {
        if self.submitting {
            return Err(WizardError::Submitting);
        }
        if self.step == BookingStep::Confirmation {
            return Err(WizardError::AlreadyComplete);
        }
        if self.step != BookingStep::Contact {
            return Err(WizardError::NotOnFinalStep);
        }
        for step in BOOKING_QUESTION_STEPS {
            step.validate(&self.data)
                .map_err(|reason| WizardError::StepInvalid {
                    step: step.as_str(),
                    reason,
                })?;
        }
        if self.preflight.in_flight == Some(self.preflight.generation) {
            return Err(WizardError::PreflightPending);
        }
        self.submitting = true;
        self.submit_error = None;
        let prepared = self.preflight.prepared.as_ref();
        Ok(BookingSubmission {
            form_data: self.data.clone(),
            payment_intent_id: prepared.map(|p| p.payment_intent_id.clone()),
            payment_status: prepared.map(|p| p.status.clone()),
        })
    }

    /// `Ok` carries the stored lead id, `Err` the message shown to the prospect.
    pub fn finish_submit(&mut self, result: Result<String, String>) -> Result<(), WizardError> {
        if !self.submitting {
            return Err(WizardError::NoSubmissionInFlight);
        }
        self.submitting = false;
        match result {
            Ok(id) => {
                self.submitted_id = Some(id);
                self.step = BookingStep::Confirmation;
                self.direction = Direction::Forward;
            }
            Err(message) => self.submit_error = Some(message),
        }
        Ok(())
    }

    fn set_issue(&mut self, value: String) {
        if value != ISSUE_SOMETHING_ELSE {
            self.data.issue_other.clear();
        }
        self.data.issue = value;
    }

    fn auto_advance(&mut self, answered: BookingStep) -> bool {
        if self.step != answered || self.submitting {
            return false;
        }
        self.next().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_is_outside_question_steps() {
        assert_eq!(BookingStep::Confirmation.index(), 8);
        assert_eq!(BookingStep::Contact.following(), None);
        assert_eq!(BookingStep::Issue.preceding(), BookingStep::Issue);
    }

    #[test]
    fn switching_issue_away_from_something_else_clears_free_text() {
        let mut w = BookingWizard::new();
        assert!(!w.select_issue(ISSUE_SOMETHING_ELSE));
        w.update(BookingPatch {
            issue_other: Some("Digs holes".to_string()),
            ..BookingPatch::default()
        });
        assert_eq!(w.data().issue_other, "Digs holes");
        assert!(w.select_issue("better-obedience"));
        assert!(w.data().issue_other.is_empty());
        assert_eq!(w.step(), BookingStep::Duration);
    }

    #[test]
    fn auto_advance_ignores_answers_for_other_steps() {
        let mut w = BookingWizard::new();
        assert!(!w.select_duration("over-a-year"));
        assert_eq!(w.step(), BookingStep::Issue);
    }
}
