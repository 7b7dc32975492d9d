// core/src/store/postgres.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{OrderStore, OrderTransaction};
use crate::error::ShopResult;
use crate::models::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};

const ORDER_COLUMNS: &str = "id, full_name, phone_number, recipient_name, recipient_phone, city, street, house, \
   building, apartment, delivery_method, delivery_date, delivery_time, wishes, card_text, is_self_pickup, \
   status, is_sent, created_at";

const ITEM_COLUMNS: &str = "id, order_id, product_id, name, price, quantity";

/// Order store backed by the `orders` and `order_items` PostgreSQL tables.
#[derive(Debug, Clone)]
pub struct PgOrderStore {
  pool: PgPool,
}

impl PgOrderStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }

  /// Applies the bundled schema migrations.
  pub async fn migrate(&self) -> ShopResult<()> {
    sqlx::migrate!("./migrations").run(&self.pool).await?;
    Ok(())
  }
}

#[async_trait]
impl OrderStore for PgOrderStore {
  async fn begin(&self) -> ShopResult<Box<dyn OrderTransaction>> {
    let tx = self.pool.begin().await?;
    Ok(Box::new(PgOrderTransaction { tx }))
  }
}

struct PgOrderTransaction {
  tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl OrderTransaction for PgOrderTransaction {
  async fn insert_order(&mut self, order: &NewOrder) -> ShopResult<Uuid> {
    let id: Uuid = sqlx::query_scalar(
      "INSERT INTO orders (full_name, phone_number, recipient_name, recipient_phone, city, street, house, \
       building, apartment, delivery_method, delivery_date, delivery_time, wishes, card_text, is_self_pickup) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) RETURNING id",
    )
    .bind(&order.full_name)
    .bind(&order.phone_number)
    .bind(&order.recipient_name)
    .bind(&order.recipient_phone)
    .bind(&order.city)
    .bind(&order.street)
    .bind(&order.house)
    .bind(&order.building)
    .bind(&order.apartment)
    .bind(&order.delivery_method)
    .bind(&order.delivery_date)
    .bind(&order.delivery_time)
    .bind(&order.wishes)
    .bind(&order.card_text)
    .bind(order.is_self_pickup)
    .fetch_one(&mut *self.tx)
    .await?;
    debug!(order_id = %id, "Inserted order row.");
    Ok(id)
  }

  async fn insert_item(&mut self, order_id: Uuid, item: &NewOrderItem) -> ShopResult<OrderItem> {
    let sql = format!(
      "INSERT INTO order_items (order_id, product_id, name, price, quantity) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
      ITEM_COLUMNS
    );
    let stored = sqlx::query_as::<_, OrderItem>(&sql)
      .bind(order_id)
      .bind(item.id)
      .bind(&item.name)
      .bind(item.price)
      .bind(item.quantity)
      .fetch_one(&mut *self.tx)
      .await?;
    Ok(stored)
  }

  #[instrument(name = "pg_store::claim_unsent", skip(self))]
  async fn claim_unsent(&mut self) -> ShopResult<Vec<Order>> {
    // Row locks with SKIP LOCKED keep two concurrent claims from returning the same order.
    let sql = format!(
      "UPDATE orders SET is_sent = TRUE \
       WHERE id IN (SELECT id FROM orders WHERE is_sent = FALSE FOR UPDATE SKIP LOCKED) \
       RETURNING {}",
      ORDER_COLUMNS
    );
    let mut orders = sqlx::query_as::<_, Order>(&sql).fetch_all(&mut *self.tx).await?;
    // RETURNING carries no ordering guarantee.
    orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    debug!(claimed = orders.len(), "Claimed unsent orders.");
    Ok(orders)
  }

  async fn orders_by_status(&mut self, status: OrderStatus) -> ShopResult<Vec<Order>> {
    let sql = format!(
      "SELECT {} FROM orders WHERE status = $1 ORDER BY created_at, id",
      ORDER_COLUMNS
    );
    let orders = sqlx::query_as::<_, Order>(&sql)
      .bind(status)
      .fetch_all(&mut *self.tx)
      .await?;
    Ok(orders)
  }

  async fn set_status(&mut self, order_id: Uuid, status: OrderStatus) -> ShopResult<Option<Order>> {
    let sql = format!("UPDATE orders SET status = $2 WHERE id = $1 RETURNING {}", ORDER_COLUMNS);
    let order = sqlx::query_as::<_, Order>(&sql)
      .bind(order_id)
      .bind(status)
      .fetch_optional(&mut *self.tx)
      .await?;
    Ok(order)
  }

  async fn items_for(&mut self, order_ids: &[Uuid]) -> ShopResult<Vec<OrderItem>> {
    if order_ids.is_empty() {
      return Ok(Vec::new());
    }
    let sql = format!(
      "SELECT {} FROM order_items WHERE order_id = ANY($1) ORDER BY id",
      ITEM_COLUMNS
    );
    let items = sqlx::query_as::<_, OrderItem>(&sql)
      .bind(order_ids)
      .fetch_all(&mut *self.tx)
      .await?;
    Ok(items)
  }

  async fn commit(self: Box<Self>) -> ShopResult<()> {
    let PgOrderTransaction { tx } = *self;
    tx.commit().await?;
    Ok(())
  }

  async fn rollback(self: Box<Self>) -> ShopResult<()> {
    let PgOrderTransaction { tx } = *self;
    tx.rollback().await?;
    Ok(())
  }
}
