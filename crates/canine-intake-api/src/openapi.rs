// SPDX-License-Identifier: Apache-2.0

use crate::errors::API_ERROR_CODES;
use serde_json::{json, Value};

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {"application/json": {"schema": {"$ref": crate::error_mapping::API_ERROR_SCHEMA_REF}}}
    })
}

fn json_body(schema: &str) -> Value {
    json!({
        "required": true,
        "content": {"application/json": {"schema": {"$ref": format!("#/components/schemas/{schema}")}}}
    })
}

#[must_use]
pub fn openapi_v1_spec() -> Value {
    let codes: Vec<&str> = API_ERROR_CODES.iter().map(|c| c.as_str()).collect();
    json!({
      "openapi": "3.0.3",
      "info": {
        "title": "canine-intake API",
        "version": "v1"
      },
      "paths": {
        "/api/bookings": {
          "post": {
            "requestBody": json_body("BookingRequest"),
            "responses": {
              "200": {"description": "lead stored"},
              "400": error_response("invalid booking payload or unsupported booking type"),
              "413": error_response("request body too large"),
              "429": error_response("rate limited"),
              "500": error_response("failed to save booking")
            }
          }
        },
        "/api/program-signups": {
          "post": {
            "requestBody": json_body("ProgramSignupRequest"),
            "responses": {
              "200": {"description": "signup stored and checkout prepared"},
              "400": error_response("invalid payload or unsupported session package"),
              "429": error_response("rate limited"),
              "500": error_response("failed to initialize checkout")
            }
          }
        },
        "/api/stripe/create-payment-intent": {
          "post": {
            "requestBody": json_body("BookingRequest"),
            "responses": {
              "200": {"description": "payment intent created"},
              "400": error_response("invalid payload or payment not required"),
              "429": error_response("rate limited"),
              "500": error_response("failed to create payment intent")
            }
          }
        },
        "/api/stripe/webhook": {
          "post": {
            "parameters": [
              {"name": "stripe-signature", "in": "header", "required": true, "schema": {"type": "string"}}
            ],
            "responses": {
              "200": {"description": "event acknowledged"},
              "400": error_response("missing configuration or invalid signature"),
              "500": error_response("webhook handler failed")
            }
          }
        },
        "/healthz": {"get": {"responses": {"200": {"description": "ok"}}}},
        "/readyz": {
          "get": {
            "responses": {
              "200": {"description": "ready"},
              "503": {"description": "not ready"}
            }
          }
        },
        "/v1/openapi.json": {"get": {"responses": {"200": {"description": "OpenAPI v1 document"}}}},
        "/v1/version": {"get": {"responses": {"200": {"description": "service version metadata"}}}}
      },
      "components": {
        "schemas": {
          "ApiErrorCode": {"type": "string", "enum": codes},
          "BookingRequest": {
            "type": "object",
            "required": ["formData"],
            "properties": {
              "formData": {"type": "object", "required": ["connectMethod"], "properties": {
                "connectMethod": {"type": "string", "enum": ["discovery-call", "in-person-evaluation"]}
              }},
              "paymentIntentId": {"type": "string"},
              "paymentStatus": {"type": "string"},
              "bookingId": {"type": "string"}
            }
          },
          "ErrorBody": {
            "type": "object",
            "required": ["error"],
            "additionalProperties": false,
            "properties": {"error": {"type": "string"}}
          },
          "ProgramSignupRequest": {
            "type": "object",
            "required": ["formData"],
            "properties": {
              "formData": {
                "type": "object",
                "required": ["dogName", "dogBreed", "problems", "preferredDay", "preferredTimeSlot", "sessionsCount", "ownerName", "ownerEmail", "ownerPhone"],
                "properties": {
                  "problems": {"type": "array", "items": {"type": "string"}},
                  "sessionsCount": {"type": "integer", "enum": [3, 5, 7]}
                }
              }
            }
          }
        }
      }
    })
}
