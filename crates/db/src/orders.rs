//! Order record access for the payment webhook flow. The orders table is
//! owned by the order-management subsystem; this crate only reads the two
//! status columns and applies the guarded terminal transitions.

use sqlx::{FromRow, MySqlPool};

/// The slice of an order the webhook flow needs: identity plus the two
/// status columns the idempotency guard reads.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct OrderRow {
    pub id: i64,
    pub payment_status: String,
    pub order_status: String,
}

pub async fn find_order(pool: &MySqlPool, order_id: i64) -> Result<Option<OrderRow>, sqlx::Error> {
    sqlx::query_as::<_, OrderRow>(
        "SELECT id, payment_status, order_status FROM orders WHERE id = ?",
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await
}

/// Mark an order paid and confirm it, recording the canonical payment
/// method and the gateway transaction reference. Guarded on the current
/// payment_status so a duplicate delivery that raced past the handler's
/// idempotency check still persists at most once. Returns whether the
/// transition was applied.
pub async fn mark_order_paid(
    pool: &MySqlPool,
    order_id: i64,
    payment_method: &str,
    transaction_ref: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE orders
        SET payment_status = 'paid',
            order_status = 'confirmed',
            payment_method = ?,
            transaction_ref = COALESCE(?, transaction_ref)
        WHERE id = ? AND payment_status <> 'paid'
        "#,
    )
    .bind(payment_method)
    .bind(transaction_ref)
    .bind(order_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Mark an order failed. Same guard shape as `mark_order_paid`: a repeat
/// failure notification is a no-op at the database layer too.
pub async fn mark_order_failed(
    pool: &MySqlPool,
    order_id: i64,
    payment_method: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE orders
        SET order_status = 'failed',
            payment_method = ?
        WHERE id = ? AND order_status <> 'failed'
        "#,
    )
    .bind(payment_method)
    .bind(order_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
