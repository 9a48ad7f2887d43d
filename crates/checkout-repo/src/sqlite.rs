use async_trait::async_trait;
use checkout_types::domain::cart::CartItem;
use checkout_types::domain::order::{Order, OrderDraft};
use checkout_types::ports::order_repository::{OrderRepository, RepoError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;

pub struct SqliteRepo {
    pool: SqlitePool,
}

// Money is stored as decimal text so it round-trips exactly.
#[derive(FromRow)]
struct DbOrder {
    id: String,
    email: String,
    cart_item_json: String,
    promo_code: Option<String>,
    discount: String,
    subtotal: String,
    total: String,
    created_at: String,
}

fn db_err(e: impl std::fmt::Display) -> RepoError {
    RepoError::DbError(e.to_string())
}

impl DbOrder {
    fn into_order(self) -> Result<Order, RepoError> {
        let cart_item: CartItem = serde_json::from_str(&self.cart_item_json).map_err(db_err)?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(db_err)?
            .with_timezone(&Utc);
        Ok(Order {
            id: Uuid::parse_str(&self.id).map_err(db_err)?,
            email: self.email,
            cart_item,
            promo_code: self.promo_code,
            discount: Decimal::from_str(&self.discount).map_err(db_err)?,
            subtotal: Decimal::from_str(&self.subtotal).map_err(db_err)?,
            total: Decimal::from_str(&self.total).map_err(db_err)?,
            created_at,
        })
    }
}

impl SqliteRepo {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        let ddl = include_str!("../migrations/0001_create_orders.sql");
        sqlx::query(ddl).execute(&pool).await?;
        tracing::debug!(database_url, "sqlite order store ready");

        Ok(Self { pool })
    }
}

#[async_trait]
impl OrderRepository for SqliteRepo {
    async fn create(&self, draft: OrderDraft) -> Result<Order, RepoError> {
        let order = Order::place(draft);
        let cart_item_json = serde_json::to_string(&order.cart_item).map_err(db_err)?;
        sqlx::query(
            "INSERT INTO orders (id, email, cart_item_json, promo_code, discount, subtotal, total, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(order.id.to_string())
        .bind(&order.email)
        .bind(cart_item_json)
        .bind(order.promo_code.as_deref())
        .bind(order.discount.to_string())
        .bind(order.subtotal.to_string())
        .bind(order.total.to_string())
        .bind(order.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(order)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Order>, RepoError> {
        let row: Option<DbOrder> = sqlx::query_as(
            "SELECT id, email, cart_item_json, promo_code, discount, subtotal, total, created_at FROM orders WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.map(DbOrder::into_order).transpose()
    }
}
