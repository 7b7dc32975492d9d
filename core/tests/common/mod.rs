// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every helper

use flowers_core::{MemoryOrderStore, NewOrder, NewOrderItem, OrderService};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// A service over a fresh in-memory store. The store handle is returned for inspection and fault injection.
pub fn memory_service() -> (OrderService, MemoryOrderStore) {
  let store = MemoryOrderStore::new();
  (OrderService::new(Arc::new(store.clone())), store)
}

pub fn item(product_id: i64, name: &str, price_cents: i64, quantity: i32) -> NewOrderItem {
  NewOrderItem {
    id: product_id,
    name: name.to_string(),
    price: Decimal::new(price_cents, 2),
    quantity,
  }
}

/// A delivery order from `customer` with `item_count` distinct items.
pub fn sample_order(customer: &str, item_count: usize) -> NewOrder {
  NewOrder {
    full_name: customer.to_string(),
    phone_number: "+7 900 123-45-67".to_string(),
    recipient_name: Some("Maria".to_string()),
    recipient_phone: Some("+7 900 765-43-21".to_string()),
    city: "Moscow".to_string(),
    street: "Tverskaya".to_string(),
    house: "7".to_string(),
    building: None,
    apartment: Some("15".to_string()),
    delivery_method: Some("DELIVERY".to_string()),
    delivery_date: Some("2024-03-08".to_string()),
    delivery_time: Some("12:00-14:00".to_string()),
    wishes: None,
    card_text: Some("With love".to_string()),
    is_self_pickup: false,
    items: (0..item_count)
      .map(|i| item(100 + i as i64, &format!("Bouquet #{}", i + 1), 199_000 + i as i64 * 100, 1 + i as i32))
      .collect(),
  }
}
