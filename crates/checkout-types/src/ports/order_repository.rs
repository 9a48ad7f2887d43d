use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::order::{Order, OrderDraft};

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("db error: {0}")]
    DbError(String),
}

/// Order persistence. Implementations assign the id and creation time.
///
/// No idempotency key is taken: storing the same draft twice yields two orders.
#[async_trait]
pub trait OrderRepository: Send + Sync + 'static {
    async fn create(&self, draft: OrderDraft) -> Result<Order, RepoError>;
    async fn get(&self, id: Uuid) -> Result<Option<Order>, RepoError>;
}
