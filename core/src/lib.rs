// core/src/lib.rs

//! Order domain of the flower shop backend.
//!
//! - [`models`]: orders and line items as stored, received and returned.
//! - [`store`]: unit-of-work access to persisted orders, with a PostgreSQL store and
//!   an in-memory store for tests.
//! - [`service::OrderService`]: create an order with its items atomically, claim
//!   unsent orders, filter by status, update status.
//! - [`password::PasswordHasher`]: Argon2id hashing and verification of credentials.

pub mod error;
pub mod models;
pub mod password;
pub mod service;
pub mod store;

pub use crate::error::{ShopError, ShopResult};
pub use crate::models::{NewOrder, NewOrderItem, Order, OrderItem, OrderItemResponse, OrderResponse, OrderStatus};
pub use crate::password::{HashingCost, PasswordHasher};
pub use crate::service::OrderService;
pub use crate::store::{Fault, MemoryOrderStore, OrderStore, OrderTransaction, PgOrderStore};
