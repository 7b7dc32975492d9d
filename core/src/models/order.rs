// core/src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

use super::order_item::{NewOrderItem, OrderItem, OrderItemResponse};
use super::status::OrderStatus;
use crate::error::{ShopError, ShopResult};

/// Order payload posted by the storefront checkout form.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
  pub full_name: String,
  pub phone_number: String,
  #[serde(default)]
  pub recipient_name: Option<String>,
  #[serde(default)]
  pub recipient_phone: Option<String>,
  // The form sends empty strings for the address when the customer picks up in store.
  #[serde(default)]
  pub city: String,
  #[serde(default)]
  pub street: String,
  #[serde(default)]
  pub house: String,
  #[serde(default)]
  pub building: Option<String>,
  #[serde(default)]
  pub apartment: Option<String>,
  #[serde(default)]
  pub delivery_method: Option<String>,
  #[serde(default)]
  pub delivery_date: Option<String>,
  #[serde(default)]
  pub delivery_time: Option<String>,
  #[serde(default)]
  pub wishes: Option<String>,
  #[serde(default)]
  pub card_text: Option<String>,
  #[serde(default)]
  pub is_self_pickup: bool,
  pub items: Vec<NewOrderItem>,
}

impl NewOrder {
  /// Checks the rules a stored order must satisfy. Runs before any transaction is opened.
  pub fn validate(&self) -> ShopResult<()> {
    require_text("fullName", &self.full_name)?;
    require_text("phoneNumber", &self.phone_number)?;
    if !self.is_self_pickup {
      require_text("city", &self.city)?;
      require_text("street", &self.street)?;
      require_text("house", &self.house)?;
    }

    if self.items.is_empty() {
      return Err(ShopError::Validation("Order must contain at least one item".to_string()));
    }
    for (index, item) in self.items.iter().enumerate() {
      if item.name.trim().is_empty() {
        return Err(ShopError::Validation(format!("items[{}].name must not be empty", index)));
      }
      if item.quantity <= 0 {
        return Err(ShopError::Validation(format!(
          "items[{}].quantity must be greater than zero (got {})",
          index, item.quantity
        )));
      }
      if item.price < Decimal::ZERO {
        return Err(ShopError::Validation(format!(
          "items[{}].price must not be negative (got {})",
          index, item.price
        )));
      }
      // order_items.price is NUMERIC(12, 2).
      if item.price.normalize().scale() > MAX_PRICE_SCALE {
        return Err(ShopError::Validation(format!(
          "items[{}].price must have at most {} decimal places (got {})",
          index, MAX_PRICE_SCALE, item.price
        )));
      }
      if item.price >= price_limit() {
        return Err(ShopError::Validation(format!(
          "items[{}].price must be less than {} (got {})",
          index,
          price_limit(),
          item.price
        )));
      }
    }
    Ok(())
  }
}

const MAX_PRICE_SCALE: u32 = 2;

/// Exclusive upper bound of a NUMERIC(12, 2) price: ten integer digits.
fn price_limit() -> Decimal {
  Decimal::new(10_000_000_000, 0)
}

fn require_text(field: &str, value: &str) -> ShopResult<()> {
  if value.trim().is_empty() {
    return Err(ShopError::Validation(format!("{} is required", field)));
  }
  Ok(())
}

/// A row of the `orders` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub full_name: String,
  pub phone_number: String,
  pub recipient_name: Option<String>,
  pub recipient_phone: Option<String>,
  pub city: String,
  pub street: String,
  pub house: String,
  pub building: Option<String>,
  pub apartment: Option<String>,
  pub delivery_method: Option<String>,
  pub delivery_date: Option<String>,
  pub delivery_time: Option<String>,
  pub wishes: Option<String>,
  pub card_text: Option<String>,
  pub is_self_pickup: bool,
  pub status: OrderStatus,
  pub is_sent: bool,
  pub created_at: DateTime<Utc>,
}

/// Full order shape returned by the listing endpoints, items included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
  pub id: Uuid,
  pub full_name: String,
  pub phone_number: String,
  pub recipient_name: Option<String>,
  pub recipient_phone: Option<String>,
  pub city: String,
  pub street: String,
  pub house: String,
  pub building: Option<String>,
  pub apartment: Option<String>,
  pub delivery_method: Option<String>,
  pub delivery_date: Option<String>,
  pub delivery_time: Option<String>,
  pub wishes: Option<String>,
  pub card_text: Option<String>,
  pub is_self_pickup: bool,
  pub status: OrderStatus,
  pub is_sent: bool,
  pub created_at: DateTime<Utc>,
  pub items: Vec<OrderItemResponse>,
}

impl OrderResponse {
  pub fn from_parts(order: Order, items: Vec<OrderItem>) -> Self {
    Self {
      id: order.id,
      full_name: order.full_name,
      phone_number: order.phone_number,
      recipient_name: order.recipient_name,
      recipient_phone: order.recipient_phone,
      city: order.city,
      street: order.street,
      house: order.house,
      building: order.building,
      apartment: order.apartment,
      delivery_method: order.delivery_method,
      delivery_date: order.delivery_date,
      delivery_time: order.delivery_time,
      wishes: order.wishes,
      card_text: order.card_text,
      is_self_pickup: order.is_self_pickup,
      status: order.status,
      is_sent: order.is_sent,
      created_at: order.created_at,
      items: items.into_iter().map(OrderItemResponse::from).collect(),
    }
  }

  /// Pairs each order with its items. Orders keep their given order, items are sorted by id.
  pub fn assemble(orders: Vec<Order>, items: Vec<OrderItem>) -> Vec<Self> {
    let mut by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::with_capacity(orders.len());
    for item in items {
      by_order.entry(item.order_id).or_default().push(item);
    }
    orders
      .into_iter()
      .map(|order| {
        let mut own_items = by_order.remove(&order.id).unwrap_or_default();
        own_items.sort_by_key(|item| item.id);
        Self::from_parts(order, own_items)
      })
      .collect()
  }
}
