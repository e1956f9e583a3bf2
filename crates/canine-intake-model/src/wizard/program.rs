// SPDX-License-Identifier: Apache-2.0

use super::{progress, Direction, WizardError};
use crate::program::ProgramSignupData;
use crate::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramStep {
    Dog,
    Schedule,
    Plan,
    Owner,
}

pub const PROGRAM_STEPS: [ProgramStep; 4] = [
    ProgramStep::Dog,
    ProgramStep::Schedule,
    ProgramStep::Plan,
    ProgramStep::Owner,
];

impl ProgramStep {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dog => "dog",
            Self::Schedule => "schedule",
            Self::Plan => "plan",
            Self::Owner => "owner",
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Dog => 0,
            Self::Schedule => 1,
            Self::Plan => 2,
            Self::Owner => 3,
        }
    }

    pub fn validate(self, data: &ProgramSignupData) -> Result<(), ValidationError> {
        match self {
            Self::Dog => data.validate_dog(),
            Self::Schedule => data.validate_schedule(),
            Self::Plan => data.validate_plan().map(|_| ()),
            Self::Owner => data.validate_owner(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProgramWizard {
    data: ProgramSignupData,
    step: ProgramStep,
    direction: Direction,
    submitting: bool,
    complete: bool,
    submit_error: Option<String>,
}

impl Default for ProgramWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramWizard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: ProgramSignupData::default(),
            step: ProgramStep::Dog,
            direction: Direction::Forward,
            submitting: false,
            complete: false,
            submit_error: None,
        }
    }

    #[must_use]
    pub fn data(&self) -> &ProgramSignupData {
        &self.data
    }

    /// Mutable access for free-text fields; step validity is re-checked on `next`.
    pub fn data_mut(&mut self) -> &mut ProgramSignupData {
        &mut self.data
    }

    #[must_use]
    pub fn step(&self) -> ProgramStep {
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
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    #[must_use]
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        progress(self.step.index(), PROGRAM_STEPS.len())
    }

    pub fn toggle_problem(&mut self, problem: &str) {
        self.data.toggle_problem(problem);
    }

    pub fn select_sessions(&mut self, sessions: u32) {
        self.data.sessions_count = Some(sessions);
    }

    pub fn next(&mut self) -> Result<ProgramStep, WizardError> {
        self.guard()?;
        self.step
            .validate(&self.data)
            .map_err(|reason| WizardError::StepInvalid {
                step: self.step.as_str(),
                reason,
            })?;
        let next = *PROGRAM_STEPS
            .get(self.step.index() + 1)
            .ok_or(WizardError::LastStep)?;
        self.step = next;
        self.direction = Direction::Forward;
        Ok(next)
    }

    pub fn back(&mut self) -> Result<ProgramStep, WizardError> {
        self.guard()?;
        self.step = PROGRAM_STEPS[self.step.index().saturating_sub(1)];
        self.direction = Direction::Backward;
        Ok(self.step)
    }

    pub fn begin_submit(&mut self) -> Result<ProgramSignupData, WizardError> {
        self.guard()?;
        if self.step != ProgramStep::Owner {
            return Err(WizardError::NotOnFinalStep);
        }
        for step in PROGRAM_STEPS {
            step.validate(&self.data)
                .map_err(|reason| WizardError::StepInvalid {
                    step: step.as_str(),
                    reason,
                })?;
        }
        self.submitting = true;
        self.submit_error = None;
        Ok(self.data.clone())
    }

    pub fn finish_submit(&mut self, result: Result<(), String>) -> Result<(), WizardError> {
        if !self.submitting {
            return Err(WizardError::NoSubmissionInFlight);
        }
        self.submitting = false;
        match result {
            Ok(()) => self.complete = true,
            Err(message) => self.submit_error = Some(message),
        }
        Ok(())
    }

    fn guard(&self) -> Result<(), WizardError> {
        if self.complete {
            return Err(WizardError::AlreadyComplete);
        }
        if self.submitting {
            return Err(WizardError::Submitting);
        }
        Ok(())
    }
}
