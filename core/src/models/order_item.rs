// core/src/models/order_item.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A line item as it arrives in an order payload. `id` is the catalogue product id.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewOrderItem {
  pub id: i64,
  pub name: String,
  pub price: Decimal,
  pub quantity: i32,
}

/// A stored line item. Owned by exactly one order and deleted with it.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct OrderItem {
  pub id: i64,
  pub order_id: Uuid,
  pub product_id: i64,
  pub name: String,
  pub price: Decimal,
  pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemResponse {
  pub id: i64,
  pub product_id: i64,
  pub name: String,
  pub price: Decimal,
  pub quantity: i32,
}

impl From<OrderItem> for OrderItemResponse {
  fn from(item: OrderItem) -> Self {
    Self {
      id: item.id,
      product_id: item.product_id,
      name: item.name,
      price: item.price,
      quantity: item.quantity,
    }
  }
}
