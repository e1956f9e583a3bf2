use canine_intake_api::{
    parse_booking_request, parse_payment_intent_request, parse_program_signup_request,
    ApiErrorCode, PaymentEventDto, MSG_INVALID_BOOKING, MSG_INVALID_PROGRAM_SIGNUP,
};

#[test]
fn booking_request_keeps_form_and_payment_fields() {
    let raw = br#"{"formData":{"connectMethod":"in-person-evaluation","issue":"better-obedience",
        "impact":["thought-about-rehoming"],"dogName":"Rex"},"paymentIntentId":"pi_1","paymentStatus":"requires_payment_method"}"#;
    let dto = parse_booking_request(raw).expect("parse");
    assert_eq!(dto.form_data.dog_name, "Rex");
    assert!(dto.form_data.is_high_priority());
    assert_eq!(dto.payment_intent_id(), Some("pi_1"));
}

#[test]
fn unknown_connect_method_still_passes_shape_check() {
    let dto = parse_booking_request(br#"{"formData":{"connectMethod":"carrier-pigeon"}}"#)
        .expect("shape ok");
    assert!(dto.form_data.connect_method().is_none());
}

#[test]
fn booking_form_is_typed_and_drops_unknown_fields() {
    for raw in [
        &br#"{"formData":{"connectMethod":"discovery-call","tried":null}}"#[..],
        &br#"{"formData":{"connectMethod":"discovery-call","dogAge":3}}"#[..],
    ] {
        let err = parse_booking_request(raw).expect_err("mistyped field");
        assert_eq!(err.message, MSG_INVALID_BOOKING);
    }

    let raw = br#"{"formData":{"connectMethod":"discovery-call","dogName":"Rex","utmSource":"flyer"}}"#;
    let dto = parse_booking_request(raw).expect("extra field ignored");
    let stored = serde_json::to_value(&dto.form_data).expect("serialize form");
    assert_eq!(stored["dogName"], "Rex");
    assert!(stored.get("utmSource").is_none());
}

#[test]
fn payment_intent_request_reads_booking_id() {
    let raw = br#"{"formData":{"connectMethod":"in-person-evaluation"},"bookingId":"lead-9"}"#;
    let dto = parse_payment_intent_request(raw).expect("parse");
    assert_eq!(dto.booking_id.as_deref(), Some("lead-9"));
}

#[test]
fn program_signup_rejects_missing_or_mistyped_fields() {
    let missing_phone = br#"{"formData":{"dogName":"a","dogBreed":"b","problems":[],"preferredDay":"Monday",
        "preferredTimeSlot":"x","sessionsCount":3,"ownerName":"o","ownerEmail":"e"}}"#;
    let err = parse_program_signup_request(missing_phone).expect_err("missing");
    assert_eq!(err.message, MSG_INVALID_PROGRAM_SIGNUP);

    let string_count = br#"{"formData":{"dogName":"a","dogBreed":"b","problems":[],"preferredDay":"Monday",
        "preferredTimeSlot":"x","sessionsCount":"3","ownerName":"o","ownerEmail":"e","ownerPhone":"p"}}"#;
    let err = parse_program_signup_request(string_count).expect_err("string count");
    assert_eq!(err.code, ApiErrorCode::InvalidPayload);
}

#[test]
fn program_signup_accepts_unknown_pack_for_later_rejection() {
    let raw = br#"{"formData":{"dogName":"a","dogBreed":"b","problems":["Poor recall"],"preferredDay":"Monday",
        "preferredTimeSlot":"x","sessionsCount":4,"ownerName":"o","ownerEmail":"e","ownerPhone":"p"}}"#;
    let dto = parse_program_signup_request(raw).expect("parse");
    assert_eq!(dto.form_data.sessions_count, Some(4));
    assert!(dto.form_data.selected_pack().is_none());
}

#[test]
fn payment_event_exposes_intent_fields() {
    let raw = r#"{"id":"evt_1","type":"payment_intent.payment_failed","data":{"object":{
        "id":"pi_1","amount":10000,"metadata":{"dogName":"Rex"},"last_payment_error":{"message":"Card declined"}}}}"#;
    let event: PaymentEventDto = serde_json::from_str(raw).expect("event");
    let intent = event.payment_intent().expect("intent");
    assert_eq!(intent.id, "pi_1");
    assert_eq!(
        intent.last_payment_error.and_then(|e| e.message).as_deref(),
        Some("Card declined")
    );
}
