// core/src/store/mod.rs

//! Unit-of-work access to persisted orders.
//!
//! Every service operation opens exactly one [`OrderTransaction`] through
//! [`OrderStore::begin`], performs its reads and writes on it and then commits or
//! rolls back. Dropping a transaction without committing discards its writes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ShopResult;
use crate::models::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};

pub mod memory;
pub mod postgres;

pub use memory::{Fault, MemoryOrderStore};
pub use postgres::PgOrderStore;

#[async_trait]
pub trait OrderStore: Send + Sync + 'static {
  async fn begin(&self) -> ShopResult<Box<dyn OrderTransaction>>;
}

#[async_trait]
pub trait OrderTransaction: Send {
  /// Inserts the order row with `status = pending` and `is_sent = false`, returning its new id.
  async fn insert_order(&mut self, order: &NewOrder) -> ShopResult<Uuid>;

  async fn insert_item(&mut self, order_id: Uuid, item: &NewOrderItem) -> ShopResult<OrderItem>;

  /// Marks every unsent order as sent and returns those rows, oldest first.
  ///
  /// Rows claimed by a concurrent, still-open transaction are skipped rather than returned twice.
  async fn claim_unsent(&mut self) -> ShopResult<Vec<Order>>;

  async fn orders_by_status(&mut self, status: OrderStatus) -> ShopResult<Vec<Order>>;

  /// Sets the status of one order. `None` when no order has that id.
  async fn set_status(&mut self, order_id: Uuid, status: OrderStatus) -> ShopResult<Option<Order>>;

  async fn items_for(&mut self, order_ids: &[Uuid]) -> ShopResult<Vec<OrderItem>>;

  async fn commit(self: Box<Self>) -> ShopResult<()>;

  async fn rollback(self: Box<Self>) -> ShopResult<()>;
}
