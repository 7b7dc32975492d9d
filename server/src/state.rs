// server/src/state.rs
use flowers_core::OrderService;

/// Shared with every handler through `web::Data`. Cloning is cheap: the service holds an `Arc` to its store.
#[derive(Clone)]
pub struct AppState {
  pub orders: OrderService,
}

impl AppState {
  pub fn new(orders: OrderService) -> Self {
    Self { orders }
  }
}
