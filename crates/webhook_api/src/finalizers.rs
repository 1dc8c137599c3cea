//! Order finalization capability. A deployment either wires the SQL-backed
//! finalizer or the unavailable stub, so "no processing function in this
//! deployment" is an explicit, typed outcome rather than a runtime
//! existence probe.

use async_trait::async_trait;
use db::DbPool;
use domain::NormalizedPaymentEvent;

#[derive(Debug, thiserror::Error)]
pub enum FinalizeError {
    /// No finalization handler is wired into this deployment.
    #[error("order finalization handler not available")]
    Unavailable,
    #[error("order finalization failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait OrderFinalizer: Send + Sync {
    /// Mark the order paid and run order-placement effects.
    async fn on_paid(&self, event: &NormalizedPaymentEvent) -> Result<(), FinalizeError>;

    /// Record the order's payment failure.
    async fn on_failed(&self, event: &NormalizedPaymentEvent) -> Result<(), FinalizeError>;
}

/// Stub for deployments without order processing wired; every call reports
/// the capability as unavailable.
pub struct UnavailableFinalizer;

#[async_trait]
impl OrderFinalizer for UnavailableFinalizer {
    async fn on_paid(&self, _event: &NormalizedPaymentEvent) -> Result<(), FinalizeError> {
        Err(FinalizeError::Unavailable)
    }

    async fn on_failed(&self, _event: &NormalizedPaymentEvent) -> Result<(), FinalizeError> {
        Err(FinalizeError::Unavailable)
    }
}

/// Applies the authoritative terminal transition in the order store. The
/// updates are status-guarded, so two deliveries racing past the handler's
/// read-then-act idempotency check still persist at most once.
pub struct SqlOrderFinalizer {
    pool: DbPool,
}

impl SqlOrderFinalizer {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderFinalizer for SqlOrderFinalizer {
    async fn on_paid(&self, event: &NormalizedPaymentEvent) -> Result<(), FinalizeError> {
        let applied = db::mark_order_paid(
            &self.pool,
            event.attribute_id,
            &event.payment_method,
            event.transaction_ref.as_deref(),
        )
        .await
        .map_err(|e| FinalizeError::Failed(e.to_string()))?;
        if !applied {
            tracing::info!(
                order_id = event.attribute_id,
                "order already paid; finalization skipped"
            );
        }
        Ok(())
    }

    async fn on_failed(&self, event: &NormalizedPaymentEvent) -> Result<(), FinalizeError> {
        let applied = db::mark_order_failed(
            &self.pool,
            event.attribute_id,
            &event.payment_method,
        )
        .await
        .map_err(|e| FinalizeError::Failed(e.to_string()))?;
        if !applied {
            tracing::info!(
                order_id = event.attribute_id,
                "order already failed; finalization skipped"
            );
        }
        Ok(())
    }
}
