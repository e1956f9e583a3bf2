// SPDX-License-Identifier: Apache-2.0

pub(crate) mod cors;
pub(crate) mod guard;
pub(crate) mod request_tracing;
