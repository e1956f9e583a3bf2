// SPDX-License-Identifier: Apache-2.0

//! Step state machines driving the intake questionnaires.
//!
//! Both wizards are pure state: callers perform the HTTP work and feed the
//! outcome back through `finish_submit` (and `complete_preflight` for the
//! booking payment intent).

mod booking;
mod program;

pub use booking::{
    BookingPatch, BookingStep, BookingSubmission, BookingWizard, MultiSelect, PreflightOutcome,
    PreflightTicket, PreparedIntent, BOOKING_QUESTION_STEPS,
};
pub use program::{ProgramStep, ProgramWizard, PROGRAM_STEPS};

use crate::validation::ValidationError;
use std::fmt::{Display, Formatter};

/// Step transition was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    StepInvalid {
        step: &'static str,
        reason: ValidationError,
    },
    Submitting,
    LastStep,
    NotOnFinalStep,
    NoSubmissionInFlight,
    PreflightPending,
    AlreadyComplete,
}

impl Display for WizardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StepInvalid { step, reason } => write!(f, "step {step} is incomplete: {reason}"),
            Self::Submitting => f.write_str("a submission is already in flight"),
            Self::LastStep => f.write_str("already on the last question"),
            Self::NotOnFinalStep => f.write_str("submission is only possible from the final step"),
            Self::NoSubmissionInFlight => f.write_str("no submission in flight"),
            Self::PreflightPending => f.write_str("payment preparation is still running"),
            Self::AlreadyComplete => f.write_str("wizard already completed"),
        }
    }
}

impl std::error::Error for WizardError {}

/// Direction of the last transition, used to orient step animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

pub(crate) fn progress(index: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    let shown = (index + 1).min(total);
    (shown as f64 / total as f64) * 100.0
}
