// server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use flowers_core::{NewOrder, OrderStatus};

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct StatusQuery {
  pub status: OrderStatus,
}

#[derive(Deserialize, Debug)]
pub struct StatusUpdatePayload {
  pub status: OrderStatus,
}

// --- Handler Implementations ---

#[instrument(
    name = "handler::create_order",
    skip(app_state, req_payload),
    fields(items = req_payload.items.len(), self_pickup = req_payload.is_self_pickup)
)]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<NewOrder>,
) -> Result<HttpResponse, AppError> {
  let order_id = app_state
    .orders
    .create_order(req_payload.into_inner())
    .await
    .map_err(AppError::create_order)?;

  info!(%order_id, "Order accepted.");
  Ok(HttpResponse::Ok().json(json!({ "message": "Order created successfully" })))
}

/// Hands out every order not yet sent. The returned orders are marked sent and will not be listed again.
#[instrument(name = "handler::list_unsent_orders", skip(app_state))]
pub async fn list_unsent_orders_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let orders = app_state
    .orders
    .list_unsent_orders()
    .await
    .map_err(AppError::retrieve_orders)?;

  info!("Returning {} unsent orders.", orders.len());
  Ok(HttpResponse::Ok().json(orders))
}

#[instrument(name = "handler::list_orders_by_status", skip(app_state, query), fields(status = %query.status))]
pub async fn list_orders_by_status_handler(
  app_state: web::Data<AppState>,
  query: web::Query<StatusQuery>,
) -> Result<HttpResponse, AppError> {
  let orders = app_state
    .orders
    .list_orders_by_status(query.status)
    .await
    .map_err(AppError::retrieve_orders)?;

  Ok(HttpResponse::Ok().json(orders))
}

#[instrument(
    name = "handler::update_order_status",
    skip(app_state, path, req_payload),
    fields(order_id = %path.as_ref(), status = %req_payload.status)
)]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<StatusUpdatePayload>,
) -> Result<HttpResponse, AppError> {
  let order = app_state
    .orders
    .update_order_status(path.into_inner(), req_payload.status)
    .await
    .map_err(AppError::update_order)?;

  Ok(HttpResponse::Ok().json(order))
}
