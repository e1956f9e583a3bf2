// SPDX-License-Identifier: Apache-2.0

pub(crate) mod bookings;
pub(crate) mod health;
pub(crate) mod payment_intent;
pub(crate) mod program_signups;
pub(crate) mod request_tracing;
pub(crate) mod response;
pub(crate) mod webhook;
