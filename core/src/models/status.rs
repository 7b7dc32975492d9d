// core/src/models/status.rs

use serde::{Deserialize, Serialize};
use sqlx::Type as SqlxType;
use std::fmt;

/// Fulfilment state of an order, stored as the `order_status` Postgres enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, SqlxType)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
pub enum OrderStatus {
  #[default]
  Pending,
  Confirmed,
  InDelivery,
  Delivered,
  Cancelled,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 5] = [
    OrderStatus::Pending,
    OrderStatus::Confirmed,
    OrderStatus::InDelivery,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Confirmed => "confirmed",
      OrderStatus::InDelivery => "in_delivery",
      OrderStatus::Delivered => "delivered",
      OrderStatus::Cancelled => "cancelled",
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn wire_names_match_database_labels() {
    for status in OrderStatus::ALL {
      let json = serde_json::to_string(&status).unwrap();
      assert_eq!(json, format!("\"{}\"", status.as_str()));
      let back: OrderStatus = serde_json::from_str(&json).unwrap();
      assert_eq!(back, status);
    }
  }

  #[test]
  fn unknown_status_is_rejected() {
    assert!(serde_json::from_str::<OrderStatus>("\"shipped\"").is_err());
    assert!(serde_json::from_str::<OrderStatus>("\"Pending\"").is_err());
  }
}
