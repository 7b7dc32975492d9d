// core/src/error.rs
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ShopError {
  /// The payload broke a domain rule before any store work started.
  #[error("{0}")]
  Validation(String),

  #[error("Order {0} not found")]
  OrderNotFound(Uuid),

  #[error("{0}")]
  Database(#[from] sqlx::Error),

  #[error("{0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  /// Failures raised by non-SQL stores (the in-memory store and its injected faults).
  #[error("{0}")]
  Storage(String),

  #[error("Password hashing failed: {0}")]
  PasswordHash(String),

  #[error("Internal error: {0}")]
  Internal(String),
}

impl ShopError {
  /// True for errors the caller caused, as opposed to store or internal failures.
  pub fn is_client_error(&self) -> bool {
    matches!(self, ShopError::Validation(_) | ShopError::OrderNotFound(_))
  }
}

pub type ShopResult<T, E = ShopError> = std::result::Result<T, E>;
