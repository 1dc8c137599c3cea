//! Record access to the external order store, behind a trait so the
//! webhook handler can be exercised against an in-memory double.

use async_trait::async_trait;
use db::{DbPool, OrderRow};

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn find_order(&self, order_id: i64) -> Result<Option<OrderRow>, sqlx::Error>;
}

/// Production store backed by the orders table.
pub struct SqlOrderStore {
    pool: DbPool,
}

impl SqlOrderStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for SqlOrderStore {
    async fn find_order(&self, order_id: i64) -> Result<Option<OrderRow>, sqlx::Error> {
        db::find_order(&self.pool, order_id).await
    }
}
