// SPDX-License-Identifier: Apache-2.0

use crate::booking::CURRENCY;
use crate::validation::{require_non_blank, ValidationError};
use serde::{Deserialize, Serialize};

pub const COLLECTION_PROGRAM_SIGNUPS: &str = "program_signups";
pub const PROGRAM_SIGNUP_SOURCE: &str = "program-signup-form";
pub const PROGRAM_PAYMENT_SOURCE: &str = "program-signup";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionPack {
    pub sessions: u32,
    pub price_cents: u64,
}

pub const SESSION_PACKS: [SessionPack; 3] = [
    SessionPack {
        sessions: 3,
        price_cents: 30_000,
    },
    SessionPack {
        sessions: 5,
        price_cents: 47_500,
    },
    SessionPack {
        sessions: 7,
        price_cents: 63_000,
    },
];

impl SessionPack {
    #[must_use]
    pub fn for_sessions(sessions: u32) -> Option<Self> {
        SESSION_PACKS.iter().copied().find(|p| p.sessions == sessions)
    }

    /// Reference per-session price shown next to the pack (20% above pack rate).
    #[must_use]
    pub fn per_session_display_cents(&self) -> u64 {
        if self.sessions == 0 {
            return 0;
        }
        let scaled = self.price_cents * 12;
        let divisor = u64::from(self.sessions) * 10;
        (scaled + divisor / 2) / divisor
    }

    #[must_use]
    pub fn description(&self) -> String {
        format!("Montreal Canine Training - {} session pack", self.sessions)
    }

    #[must_use]
    pub const fn currency(&self) -> &'static str {
        CURRENCY
    }
}

/// Formats CAD cents as `$1,234.56`.
#[must_use]
pub fn format_cad(cents: u64) -> String {
    let dollars = cents / 100;
    let rem = cents % 100;
    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${grouped}.{rem:02}")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramSignupData {
    pub dog_name: String,
    pub dog_breed: String,
    pub problems: Vec<String>,
    pub preferred_day: String,
    pub preferred_time_slot: String,
    pub sessions_count: Option<u32>,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_phone: String,
}

impl ProgramSignupData {
    #[must_use]
    pub fn selected_pack(&self) -> Option<SessionPack> {
        self.sessions_count.and_then(SessionPack::for_sessions)
    }

    pub fn toggle_problem(&mut self, problem: &str) {
        if let Some(pos) = self.problems.iter().position(|p| p == problem) {
            self.problems.remove(pos);
        } else {
            self.problems.push(problem.to_string());
        }
    }

    pub fn validate_dog(&self) -> Result<(), ValidationError> {
        require_non_blank("dogName", &self.dog_name)?;
        require_non_blank("dogBreed", &self.dog_breed)?;
        if self.problems.is_empty() {
            return Err(ValidationError(
                "select at least one problem".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_schedule(&self) -> Result<(), ValidationError> {
        require_non_blank("preferredDay", &self.preferred_day)?;
        require_non_blank("preferredTimeSlot", &self.preferred_time_slot)
    }

    pub fn validate_plan(&self) -> Result<SessionPack, ValidationError> {
        let sessions = self
            .sessions_count
            .ok_or_else(|| ValidationError("sessionsCount must be selected".to_string()))?;
        SessionPack::for_sessions(sessions)
            .ok_or_else(|| ValidationError(format!("no session pack with {sessions} sessions")))
    }

    pub fn validate_owner(&self) -> Result<(), ValidationError> {
        require_non_blank("ownerName", &self.owner_name)?;
        require_non_blank("ownerEmail", &self.owner_email)?;
        require_non_blank("ownerPhone", &self.owner_phone)?;
        Ok(())
    }
}
