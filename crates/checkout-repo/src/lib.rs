#[cfg(not(any(feature = "memory", feature = "sqlite")))]
compile_error!("Enable a repo feature: `memory` or `sqlite`.");

use checkout_types::domain::order::{Order, OrderDraft};
use checkout_types::ports::order_repository::OrderRepository;
use checkout_types::ports::order_repository::RepoError;
use uuid::Uuid;

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub struct Repo {
    #[cfg(all(feature = "memory", not(feature = "sqlite")))]
    memory: memory::InMemoryRepo,
    #[cfg(feature = "sqlite")]
    sqlite: sqlite::SqliteRepo,
}

pub async fn build_repo(url: Option<&str>) -> anyhow::Result<Repo> {
    Repo::build_repo(url).await
}

impl Repo {
    #[cfg(all(feature = "memory", not(feature = "sqlite")))]
    pub async fn build_repo(_: Option<&str>) -> anyhow::Result<Self> {
        tracing::info!("using in-memory order store");
        Ok(Self {
            memory: crate::memory::InMemoryRepo::new(),
        })
    }

    // sqlite wins when both features are on.
    #[cfg(feature = "sqlite")]
    pub async fn build_repo(database_url: Option<&str>) -> anyhow::Result<Self> {
        let url = database_url.unwrap_or("sqlite://orders.db");
        tracing::info!(url, "using sqlite order store");
        let sqlite = sqlite::SqliteRepo::new(url).await?;
        Ok(Self { sqlite })
    }
}

#[cfg(all(feature = "memory", not(feature = "sqlite")))]
#[async_trait::async_trait]
impl OrderRepository for Repo {
    async fn create(&self, draft: OrderDraft) -> Result<Order, RepoError> {
        self.memory.create(draft).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Order>, RepoError> {
        self.memory.get(id).await
    }
}

#[cfg(feature = "sqlite")]
#[async_trait::async_trait]
impl OrderRepository for Repo {
    async fn create(&self, draft: OrderDraft) -> Result<Order, RepoError> {
        self.sqlite.create(draft).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Order>, RepoError> {
        self.sqlite.get(id).await
    }
}
