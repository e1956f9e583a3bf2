use canine_intake_api::openapi_v1_spec;

#[test]
fn openapi_lists_every_route() {
    let spec = openapi_v1_spec();
    let paths = spec["paths"].as_object().expect("paths");
    for route in [
        "/api/bookings",
        "/api/program-signups",
        "/api/stripe/create-payment-intent",
        "/api/stripe/webhook",
        "/healthz",
        "/readyz",
        "/v1/openapi.json",
        "/v1/version",
    ] {
        assert!(paths.contains_key(route), "missing {route}");
    }
}

#[test]
fn openapi_paths_are_lexicographically_sorted() {
    let spec = openapi_v1_spec();
    let keys: Vec<&String> = spec["paths"].as_object().expect("paths").keys().collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn error_body_schema_is_closed() {
    let spec = openapi_v1_spec();
    let body = &spec["components"]["schemas"]["ErrorBody"];
    assert_eq!(body["additionalProperties"], serde_json::Value::Bool(false));
    assert_eq!(body["required"], serde_json::json!(["error"]));
}
