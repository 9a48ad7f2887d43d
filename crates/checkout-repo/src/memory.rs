use async_trait::async_trait;
use checkout_types::domain::order::{Order, OrderDraft};
use checkout_types::ports::order_repository::{OrderRepository, RepoError};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Process-lifetime order store. Lost on restart.
#[derive(Clone)]
pub struct InMemoryRepo {
    pub map: Arc<DashMap<Uuid, Order>>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            map: Arc::new(DashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for InMemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for InMemoryRepo {
    async fn create(&self, draft: OrderDraft) -> Result<Order, RepoError> {
        let order = Order::place(draft);
        self.map.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Order>, RepoError> {
        Ok(self.map.get(&id).map(|r| r.clone()))
    }
}
