// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

#[must_use]
pub fn is_blank(input: &str) -> bool {
    input.trim().is_empty()
}

pub fn require_non_blank(field: &str, input: &str) -> Result<(), ValidationError> {
    if is_blank(input) {
        return Err(ValidationError(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Loose shape check: an `@` with non-empty local and domain parts.
#[must_use]
pub fn looks_like_email(input: &str) -> bool {
    input
        .trim()
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty())
}

pub fn require_email(field: &str, input: &str) -> Result<(), ValidationError> {
    require_non_blank(field, input)?;
    if !looks_like_email(input) {
        return Err(ValidationError(format!(
            "{field} must be an email address"
        )));
    }
    Ok(())
}
