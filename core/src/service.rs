// core/src/service.rs

//! Order operations. Each one runs inside exactly one store transaction.

use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::error::{ShopError, ShopResult};
use crate::models::{NewOrder, OrderResponse, OrderStatus};
use crate::store::{OrderStore, OrderTransaction};

#[derive(Clone)]
pub struct OrderService {
  store: Arc<dyn OrderStore>,
}

impl OrderService {
  pub fn new(store: Arc<dyn OrderStore>) -> Self {
    Self { store }
  }

  /// Stores the order and all of its items atomically and returns the new order id.
  ///
  /// The payload is validated before a transaction is opened. If any insert fails the
  /// transaction is rolled back, so readers never see an order without its items.
  #[instrument(name = "order_service::create_order", skip(self, order), fields(items = order.items.len()))]
  pub async fn create_order(&self, order: NewOrder) -> ShopResult<Uuid> {
    order.validate()?;

    let mut tx = self.store.begin().await?;
    let order_id = match insert_order_with_items(&mut *tx, &order).await {
      Ok(id) => id,
      Err(e) => {
        rollback(tx, &e).await;
        return Err(e);
      }
    };
    tx.commit().await?;

    info!(%order_id, "Order created.");
    Ok(order_id)
  }

  /// Returns every order not yet sent and marks them sent in the same transaction.
  ///
  /// Orders handed to one caller are never handed to another. On failure nothing is
  /// marked sent.
  #[instrument(name = "order_service::list_unsent_orders", skip(self))]
  pub async fn list_unsent_orders(&self) -> ShopResult<Vec<OrderResponse>> {
    let mut tx = self.store.begin().await?;
    let loaded = async {
      let orders = tx.claim_unsent().await?;
      let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
      let items = tx.items_for(&ids).await?;
      Ok::<_, ShopError>(OrderResponse::assemble(orders, items))
    }
    .await;

    let responses = match loaded {
      Ok(responses) => responses,
      Err(e) => {
        rollback(tx, &e).await;
        return Err(e);
      }
    };
    tx.commit().await?;

    info!(count = responses.len(), "Unsent orders claimed.");
    Ok(responses)
  }

  #[instrument(name = "order_service::list_orders_by_status", skip_all, fields(%status))]
  pub async fn list_orders_by_status(&self, status: OrderStatus) -> ShopResult<Vec<OrderResponse>> {
    let mut tx = self.store.begin().await?;
    let loaded = async {
      let orders = tx.orders_by_status(status).await?;
      let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
      let items = tx.items_for(&ids).await?;
      Ok::<_, ShopError>(OrderResponse::assemble(orders, items))
    }
    .await;

    let responses = match loaded {
      Ok(responses) => responses,
      Err(e) => {
        rollback(tx, &e).await;
        return Err(e);
      }
    };
    // Read-only: ending with a rollback releases the snapshot without writing anything.
    tx.rollback().await?;
    Ok(responses)
  }

  /// Moves an order to `status`. Leaves `is_sent` untouched.
  #[instrument(name = "order_service::update_order_status", skip_all, fields(%order_id, %status))]
  pub async fn update_order_status(&self, order_id: Uuid, status: OrderStatus) -> ShopResult<OrderResponse> {
    let mut tx = self.store.begin().await?;
    let loaded = async {
      let order = tx
        .set_status(order_id, status)
        .await?
        .ok_or(ShopError::OrderNotFound(order_id))?;
      let items = tx.items_for(&[order_id]).await?;
      Ok::<_, ShopError>(OrderResponse::from_parts(order, items))
    }
    .await;

    let response = match loaded {
      Ok(response) => response,
      Err(e) => {
        rollback(tx, &e).await;
        return Err(e);
      }
    };
    tx.commit().await?;

    info!("Order status updated.");
    Ok(response)
  }
}

async fn insert_order_with_items(tx: &mut dyn OrderTransaction, order: &NewOrder) -> ShopResult<Uuid> {
  let order_id = tx.insert_order(order).await?;
  for item in &order.items {
    tx.insert_item(order_id, item).await?;
  }
  Ok(order_id)
}

async fn rollback(tx: Box<dyn OrderTransaction>, cause: &ShopError) {
  if cause.is_client_error() {
    warn!(error = %cause, "Rolling back transaction.");
  } else {
    error!(error = %cause, "Rolling back transaction.");
  }
  if let Err(rollback_err) = tx.rollback().await {
    error!(error = %rollback_err, "Rollback failed.");
  }
}
