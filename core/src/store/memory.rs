// core/src/store/memory.rs

//! In-process order store.
//!
//! A transaction holds the dataset lock from `begin` until commit, rollback or drop,
//! so transactions run one at a time (serialisable isolation). Writes go to a staged
//! copy that replaces the shared dataset only on commit.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{OrderStore, OrderTransaction};
use crate::error::{ShopError, ShopResult};
use crate::models::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};

/// A one-shot failure armed with [`MemoryOrderStore::inject`]. It fires once and disarms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
  /// Fail the item insert that follows `after` successful item inserts in the same transaction.
  ItemInsert { after: usize },
  Claim,
  Commit,
}

/// Committed contents of a [`MemoryOrderStore`].
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
  pub orders: Vec<Order>,
  pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Default)]
struct Dataset {
  orders: Vec<Order>,
  items: Vec<OrderItem>,
  next_item_id: i64,
}

#[derive(Debug, Default)]
struct Counters {
  commits: AtomicUsize,
  rollbacks: AtomicUsize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryOrderStore {
  data: Arc<AsyncMutex<Dataset>>,
  fault: Arc<Mutex<Option<Fault>>>,
  counters: Arc<Counters>,
}

impl MemoryOrderStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn inject(&self, fault: Fault) {
    *self.fault.lock() = Some(fault);
  }

  pub async fn snapshot(&self) -> Snapshot {
    let data = self.data.lock().await;
    Snapshot {
      orders: data.orders.clone(),
      items: data.items.clone(),
    }
  }

  pub fn commits(&self) -> usize {
    self.counters.commits.load(Ordering::SeqCst)
  }

  /// Explicit rollbacks only; dropped transactions are not counted.
  pub fn rollbacks(&self) -> usize {
    self.counters.rollbacks.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
  async fn begin(&self) -> ShopResult<Box<dyn OrderTransaction>> {
    let guard = self.data.clone().lock_owned().await;
    let staged = guard.clone();
    Ok(Box::new(MemoryTransaction {
      guard,
      staged,
      fault: self.fault.clone(),
      counters: self.counters.clone(),
      items_inserted: 0,
    }))
  }
}

struct MemoryTransaction {
  guard: OwnedMutexGuard<Dataset>,
  staged: Dataset,
  fault: Arc<Mutex<Option<Fault>>>,
  counters: Arc<Counters>,
  items_inserted: usize,
}

impl MemoryTransaction {
  /// Disarms and reports the armed fault if `matches` accepts it.
  fn fire(&self, matches: impl FnOnce(Fault) -> bool) -> Option<Fault> {
    let mut armed = self.fault.lock();
    match *armed {
      Some(fault) if matches(fault) => armed.take(),
      _ => None,
    }
  }
}

#[async_trait]
impl OrderTransaction for MemoryTransaction {
  async fn insert_order(&mut self, order: &NewOrder) -> ShopResult<Uuid> {
    let id = Uuid::new_v4();
    self.staged.orders.push(Order {
      id,
      full_name: order.full_name.clone(),
      phone_number: order.phone_number.clone(),
      recipient_name: order.recipient_name.clone(),
      recipient_phone: order.recipient_phone.clone(),
      city: order.city.clone(),
      street: order.street.clone(),
      house: order.house.clone(),
      building: order.building.clone(),
      apartment: order.apartment.clone(),
      delivery_method: order.delivery_method.clone(),
      delivery_date: order.delivery_date.clone(),
      delivery_time: order.delivery_time.clone(),
      wishes: order.wishes.clone(),
      card_text: order.card_text.clone(),
      is_self_pickup: order.is_self_pickup,
      status: OrderStatus::Pending,
      is_sent: false,
      created_at: Utc::now(),
    });
    Ok(id)
  }

  async fn insert_item(&mut self, order_id: Uuid, item: &NewOrderItem) -> ShopResult<OrderItem> {
    let inserted = self.items_inserted;
    if let Some(fault) = self.fire(|f| f == Fault::ItemInsert { after: inserted }) {
      warn!(?fault, %order_id, "Injected item insert failure.");
      return Err(ShopError::Storage(format!(
        "injected failure inserting item {} of order {}",
        inserted + 1,
        order_id
      )));
    }
    if !self.staged.orders.iter().any(|o| o.id == order_id) {
      return Err(ShopError::Storage(format!(
        "order_items.order_id references missing order {}",
        order_id
      )));
    }
    if item.quantity <= 0 {
      return Err(ShopError::Storage(format!(
        "order_items.quantity check violated ({})",
        item.quantity
      )));
    }

    self.staged.next_item_id += 1;
    let stored = OrderItem {
      id: self.staged.next_item_id,
      order_id,
      product_id: item.id,
      name: item.name.clone(),
      price: item.price,
      quantity: item.quantity,
    };
    self.staged.items.push(stored.clone());
    self.items_inserted += 1;
    Ok(stored)
  }

  async fn claim_unsent(&mut self) -> ShopResult<Vec<Order>> {
    if let Some(fault) = self.fire(|f| f == Fault::Claim) {
      warn!(?fault, "Injected claim failure.");
      return Err(ShopError::Storage("injected failure claiming unsent orders".to_string()));
    }
    let mut claimed = Vec::new();
    for order in self.staged.orders.iter_mut().filter(|o| !o.is_sent) {
      order.is_sent = true;
      claimed.push(order.clone());
    }
    debug!(claimed = claimed.len(), "Claimed unsent orders.");
    Ok(claimed)
  }

  async fn orders_by_status(&mut self, status: OrderStatus) -> ShopResult<Vec<Order>> {
    Ok(self.staged.orders.iter().filter(|o| o.status == status).cloned().collect())
  }

  async fn set_status(&mut self, order_id: Uuid, status: OrderStatus) -> ShopResult<Option<Order>> {
    Ok(self.staged.orders.iter_mut().find(|o| o.id == order_id).map(|order| {
      order.status = status;
      order.clone()
    }))
  }

  async fn items_for(&mut self, order_ids: &[Uuid]) -> ShopResult<Vec<OrderItem>> {
    Ok(
      self
        .staged
        .items
        .iter()
        .filter(|item| order_ids.contains(&item.order_id))
        .cloned()
        .collect(),
    )
  }

  async fn commit(self: Box<Self>) -> ShopResult<()> {
    if let Some(fault) = self.fire(|f| f == Fault::Commit) {
      warn!(?fault, "Injected commit failure.");
      return Err(ShopError::Storage("injected failure committing transaction".to_string()));
    }
    let MemoryTransaction {
      mut guard,
      staged,
      counters,
      ..
    } = *self;
    *guard = staged;
    counters.commits.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }

  async fn rollback(self: Box<Self>) -> ShopResult<()> {
    self.counters.rollbacks.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }
}
