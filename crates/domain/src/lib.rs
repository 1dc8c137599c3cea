//! Shared types for the payment webhook flow: the validated webhook
//! request, field-level validation errors, payment method normalization
//! and the normalized event handed to order finalizers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Known external provider names mapped to the internal canonical payment
/// method identifier. Lookup is data-driven so a new provider alias is one
/// row here, not a new branch in the webhook handler.
const PAYMENT_METHOD_ALIASES: &[(&str, &str)] = &[
    // Gateway sends "razorpay"; bookkeeping and display use "razor_pay".
    ("razorpay", "razor_pay"),
];

/// Canonical internal name for a payment method: lower-cased, then mapped
/// through the alias table. Unrecognized methods pass through lower-cased.
pub fn canonical_payment_method(method: &str) -> String {
    let lowered = method.to_lowercase();
    for (alias, canonical) in PAYMENT_METHOD_ALIASES {
        if lowered == *alias {
            return (*canonical).to_string();
        }
    }
    lowered
}

/// A single field-level validation failure: which field, which rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

/// Group field errors into a `field -> [messages]` map for the 422 body.
pub fn field_errors_to_map(errors: &[FieldError]) -> serde_json::Map<String, Value> {
    let mut map = serde_json::Map::new();
    for e in errors {
        let entry = map
            .entry(e.field.to_string())
            .or_insert_with(|| Value::Array(vec![]));
        if let Value::Array(messages) = entry {
            messages.push(Value::String(e.message.clone()));
        }
    }
    map
}

/// Payment status notification as validated at the webhook boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentWebhookRequest {
    pub order_id: i64,
    pub payment_method: String,
    pub transaction_id: Option<String>,
    /// "paid" or "failed"; guaranteed by `from_payload`.
    pub status: String,
}

impl PaymentWebhookRequest {
    /// Validate the raw JSON payload into a typed request, collecting every
    /// field-level violation rather than stopping at the first.
    pub fn from_payload(payload: &Value) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        // POS and gateway clients send order ids as numbers or numeric strings.
        let order_id = match payload.get("order_id") {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
            Some(_) => None,
            None => {
                errors.push(FieldError::new("order_id", "order_id is required"));
                None
            }
        };
        let order_id = match order_id {
            Some(id) if id > 0 => Some(id),
            Some(_) => {
                errors.push(FieldError::new(
                    "order_id",
                    "order_id must be a positive integer",
                ));
                None
            }
            None => {
                if payload.get("order_id").is_some() {
                    errors.push(FieldError::new(
                        "order_id",
                        "order_id must be a positive integer",
                    ));
                }
                None
            }
        };

        let payment_method = match payload.get("payment_method") {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            Some(_) => {
                errors.push(FieldError::new(
                    "payment_method",
                    "payment_method must be a non-empty string",
                ));
                None
            }
            None => {
                errors.push(FieldError::new(
                    "payment_method",
                    "payment_method is required",
                ));
                None
            }
        };

        let transaction_id = match payload.get("transaction_id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(_) => {
                errors.push(FieldError::new(
                    "transaction_id",
                    "transaction_id must be a string",
                ));
                None
            }
        };

        let status = match payload.get("status") {
            Some(Value::String(s)) if s == "paid" || s == "failed" => Some(s.clone()),
            Some(_) => {
                errors.push(FieldError::new(
                    "status",
                    "status must be one of: paid, failed",
                ));
                None
            }
            None => {
                errors.push(FieldError::new("status", "status is required"));
                None
            }
        };

        match (order_id, payment_method, status) {
            (Some(order_id), Some(payment_method), Some(status)) if errors.is_empty() => {
                Ok(Self {
                    order_id,
                    payment_method,
                    transaction_id,
                    status,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Normalized payment event handed to order finalizers. `payment_method`
/// carries the canonical internal name, never the raw provider spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedPaymentEvent {
    /// Entity kind the payment applies to; webhook-driven events are
    /// always "order".
    pub attribute: String,
    pub attribute_id: i64,
    pub payment_method: String,
    pub transaction_ref: Option<String>,
}

impl NormalizedPaymentEvent {
    pub fn for_order(
        order_id: i64,
        payment_method: String,
        transaction_ref: Option<String>,
    ) -> Self {
        Self {
            attribute: "order".to_string(),
            attribute_id: order_id,
            payment_method,
            transaction_ref,
        }
    }
}
