#![forbid(unsafe_code)]
//! Canine intake model SSOT.
//!
//! Lead records, option catalogs, routing labels, pricing and the wizard
//! state machines. No I/O lives here.

mod booking;
mod catalog;
mod program;
mod validation;
mod wizard;

pub use booking::{
    suggested_service_for_issue, BookingFormData, ConnectMethod, PaymentStatus, BOOKING_SOURCE,
    COLLECTION_DISCOVERY_CALLS, COLLECTION_IN_PERSON_EVALUATIONS, CURRENCY, IN_PERSON_DESCRIPTION,
    IN_PERSON_PRICE_CENTS, MANUAL_REVIEW_SERVICE,
};
pub use catalog::{
    is_known, label_for, AnswerOption, BEST_TIME_OPTIONS, CONNECT_OPTIONS, DAYS_OF_WEEK,
    DOG_AGE_OPTIONS, DOG_DURATION_OPTIONS, DOG_SOURCE_OPTIONS, DURATION_OPTIONS, GOALS_OPTIONS,
    IMPACT_OPTIONS, IMPACT_THOUGHT_ABOUT_REHOMING, ISSUE_OPTIONS, ISSUE_SOMETHING_ELSE,
    PROGRAM_PROBLEMS, TIME_SLOTS, TRIED_OPTIONS,
};
pub use program::{
    format_cad, ProgramSignupData, SessionPack, COLLECTION_PROGRAM_SIGNUPS,
    PROGRAM_PAYMENT_SOURCE, PROGRAM_SIGNUP_SOURCE, SESSION_PACKS,
};
pub use validation::{is_blank, looks_like_email, require_email, require_non_blank, ValidationError};
pub use wizard::{
    BookingPatch, BookingStep, BookingSubmission, BookingWizard, Direction, MultiSelect,
    PreflightOutcome, PreflightTicket, PreparedIntent, ProgramStep, ProgramWizard, WizardError,
    BOOKING_QUESTION_STEPS, PROGRAM_STEPS,
};

/// Collections a payment webhook searches, in order, for the lead owning an intent.
pub const PAYMENT_LOOKUP_COLLECTIONS: [&str; 3] = [
    COLLECTION_DISCOVERY_CALLS,
    COLLECTION_IN_PERSON_EVALUATIONS,
    COLLECTION_PROGRAM_SIGNUPS,
];

pub const CRATE_NAME: &str = "canine-intake-model";
