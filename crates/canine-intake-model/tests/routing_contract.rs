// SPDX-License-Identifier: Apache-2.0

use canine_intake_model::{
    BookingFormData, ConnectMethod, PaymentStatus, ISSUE_OPTIONS, MANUAL_REVIEW_SERVICE,
    PAYMENT_LOOKUP_COLLECTIONS,
};

#[test]
fn every_issue_option_routes_to_a_service() {
    for option in ISSUE_OPTIONS {
        let data = BookingFormData {
            issue: option.value.to_string(),
            ..BookingFormData::default()
        };
        assert!(!data.suggested_service().is_empty());
    }
    let something_else = BookingFormData {
        issue: "something-else".to_string(),
        ..BookingFormData::default()
    };
    assert_eq!(something_else.suggested_service(), MANUAL_REVIEW_SERVICE);
}

#[test]
fn rehoming_marks_high_priority() {
    let mut data = BookingFormData {
        impact: vec!["overwhelmed".to_string()],
        ..BookingFormData::default()
    };
    assert!(!data.is_high_priority());
    data.impact.push("thought-about-rehoming".to_string());
    assert!(data.is_high_priority());
}

#[test]
fn connect_method_selects_collection_and_payment_default() {
    assert_eq!(
        ConnectMethod::DiscoveryCall.collection(),
        "bookings_discovery_calls"
    );
    assert_eq!(
        ConnectMethod::InPersonEvaluation.collection(),
        "bookings_in_person_evaluations"
    );
    let data = BookingFormData {
        connect_method: "in-person-evaluation".to_string(),
        ..BookingFormData::default()
    };
    assert_eq!(
        data.default_payment_status(),
        PaymentStatus::RequiresPaymentMethod
    );
    assert_eq!(
        BookingFormData::default().default_payment_status(),
        PaymentStatus::NotRequired
    );
}

#[test]
fn webhook_lookup_order_is_stable() {
    assert_eq!(
        PAYMENT_LOOKUP_COLLECTIONS,
        [
            "bookings_discovery_calls",
            "bookings_in_person_evaluations",
            "program_signups"
        ]
    );
}
