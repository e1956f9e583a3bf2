// SPDX-License-Identifier: Apache-2.0

pub mod events;
pub mod signature;

pub use events::{apply_event, update_lead_by_payment_intent, EventError, EventOutcome};
pub use signature::{sign, verify, SignatureError, DEFAULT_TOLERANCE_SECS};
