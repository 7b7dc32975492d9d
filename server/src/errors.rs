// server/src/errors.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use flowers_core::ShopError;
use serde_json::json;
use thiserror::Error;

/// Errors returned by HTTP handlers. Every variant renders as `{"detail": "<message>"}`.
///
/// Store failures keep the underlying cause in the message.
#[derive(Debug, Error)]
pub enum AppError {
  #[error("Error processing order: {0}")]
  CreateOrder(#[source] ShopError),

  #[error("Error retrieving orders: {0}")]
  RetrieveOrders(#[source] ShopError),

  #[error("Error updating order: {0}")]
  UpdateOrder(#[source] ShopError),

  /// Malformed or rule-breaking request input.
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),
}

impl AppError {
  pub fn create_order(err: ShopError) -> Self {
    Self::classify(err, AppError::CreateOrder)
  }

  pub fn retrieve_orders(err: ShopError) -> Self {
    Self::classify(err, AppError::RetrieveOrders)
  }

  pub fn update_order(err: ShopError) -> Self {
    Self::classify(err, AppError::UpdateOrder)
  }

  // Caller mistakes keep their own status code whatever operation raised them.
  fn classify(err: ShopError, server_side: fn(ShopError) -> AppError) -> Self {
    match err {
      ShopError::Validation(msg) => AppError::Validation(msg),
      e @ ShopError::OrderNotFound(_) => AppError::NotFound(e.to_string()),
      other => server_side(other),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::CreateOrder(_) | AppError::RetrieveOrders(_) | AppError::UpdateOrder(_) | AppError::Config(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Rejecting request");
    }
    HttpResponse::build(status).json(json!({ "detail": self.to_string() }))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
