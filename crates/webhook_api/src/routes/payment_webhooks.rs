//! Inbound payment webhook from the upstream gateway. Strictly linear per
//! request: authenticate, validate, normalize, load the order, apply the
//! idempotency guard, then hand the terminal outcome to the finalizer.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

use crate::finalizers::FinalizeError;
use crate::state::AppState;
use domain::{canonical_payment_method, NormalizedPaymentEvent, PaymentWebhookRequest};

pub fn router(_state: AppState) -> Router<AppState> {
    Router::new().route("/webhooks/payment", post(payment_webhook))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    // Carried through into every log line; never interpreted.
    let correlation_id = header_str(&headers, "x-correlation-id").unwrap_or("");

    // Verify webhook authenticity using the shared secret. Fail closed when
    // no secret can be resolved for this deployment.
    let Some(expected_secret) = state.config.expected_secret() else {
        tracing::error!(correlation_id, "webhook secret not configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "success": false, "message": "Server misconfiguration" })),
        );
    };
    let provided_secret = header_str(&headers, "x-webhook-secret").unwrap_or("");
    if provided_secret != expected_secret {
        let source = header_str(&headers, "x-forwarded-for").unwrap_or("unknown");
        tracing::warn!(
            source,
            provided_secret_length = provided_secret.len(),
            correlation_id,
            "webhook authentication failed"
        );
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Unauthorized" })),
        );
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(error = %e, correlation_id, "webhook body is not valid JSON");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "message": "Invalid JSON payload" })),
            );
        }
    };

    let request = match PaymentWebhookRequest::from_payload(&payload) {
        Ok(request) => request,
        Err(errors) => {
            tracing::error!(
                errors = ?errors,
                payload = %payload,
                correlation_id,
                "webhook validation failed"
            );
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "success": false,
                    "errors": domain::field_errors_to_map(&errors),
                })),
            );
        }
    };

    let payment_method = canonical_payment_method(&request.payment_method);

    let Some(store) = state.store.as_ref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "success": false, "message": "database not available" })),
        );
    };

    // Ensure the order exists before attempting any side effects.
    let order = match store.find_order(request.order_id).await {
        Ok(Some(order)) => order,
        Ok(None) => {
            tracing::warn!(
                order_id = request.order_id,
                correlation_id,
                "webhook referenced non-existent order"
            );
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "success": false, "message": "Order not found" })),
            );
        }
        Err(e) => {
            tracing::error!(
                order_id = request.order_id,
                error = %e,
                correlation_id,
                "webhook order lookup failed"
            );
            return internal_error(&state, e.to_string());
        }
    };

    // Idempotency: a repeated delivery of an already-applied terminal status
    // is a successful no-op. A cross-status event after a terminal state is
    // deliberately not blocked here and proceeds to dispatch.
    if request.status == "paid" && order.payment_status == "paid" {
        tracing::info!(
            order_id = order.id,
            correlation_id,
            "webhook idempotent: order already paid"
        );
        return (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Order already paid (idempotent)",
                "order_id": order.id,
            })),
        );
    }
    if request.status == "failed" && order.order_status == "failed" {
        tracing::info!(
            order_id = order.id,
            correlation_id,
            "webhook idempotent: order already failed"
        );
        return (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Order already failed (idempotent)",
                "order_id": order.id,
            })),
        );
    }

    let event = NormalizedPaymentEvent::for_order(
        request.order_id,
        payment_method.clone(),
        request.transaction_id.clone(),
    );

    let outcome = match request.status.as_str() {
        "paid" => state.finalizer.on_paid(&event).await,
        "failed" => state.finalizer.on_failed(&event).await,
        other => {
            // Unreachable once validation passed; kept so a status added to
            // validation without a dispatch arm cannot silently fall through.
            tracing::warn!(
                order_id = request.order_id,
                status = other,
                correlation_id,
                "webhook carried unknown status"
            );
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "message": "Unknown status" })),
            );
        }
    };

    match outcome {
        Ok(()) if request.status == "paid" => {
            tracing::info!(
                order_id = request.order_id,
                payment_method = %payment_method,
                payment_method_original = %request.payment_method,
                transaction_id = ?request.transaction_id,
                correlation_id,
                "order payment confirmed via webhook"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Order payment confirmed",
                    "order_id": request.order_id,
                })),
            )
        }
        Ok(()) => {
            tracing::info!(
                order_id = request.order_id,
                payment_method = %payment_method,
                correlation_id,
                "order payment failure recorded via webhook"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Order payment failure recorded",
                    "order_id": request.order_id,
                })),
            )
        }
        Err(FinalizeError::Unavailable) => {
            tracing::error!(
                order_id = request.order_id,
                correlation_id,
                "order finalization handler not available"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "message": "Payment processing function not available",
                })),
            )
        }
        Err(FinalizeError::Failed(detail)) => {
            tracing::error!(
                order_id = request.order_id,
                error = %detail,
                correlation_id,
                "webhook processing error"
            );
            internal_error(&state, detail)
        }
    }
}

/// Generic 500; the underlying detail is exposed only in debug deployments.
fn internal_error(state: &AppState, detail: String) -> (StatusCode, Json<Value>) {
    let mut body = json!({ "success": false, "message": "Internal server error" });
    if state.config.debug {
        body["error"] = Value::String(detail);
    }
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body))
}
