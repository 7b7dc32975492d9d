// core/src/models/mod.rs

//! Order entities as stored, as received from the storefront and as returned to clients.

pub mod order;
pub mod order_item;
pub mod status;

pub use order::{NewOrder, Order, OrderResponse};
pub use order_item::{NewOrderItem, OrderItem, OrderItemResponse};
pub use status::OrderStatus;
