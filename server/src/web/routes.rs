// server/src/web/routes.rs

use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::web::handlers::order_handlers;

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Malformed bodies, paths and query strings answer 422 with a `detail` message instead of actix's plain-text 400.
fn extractor_configs(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into()))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into()))
    .app_data(web::PathConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into()));
}

// Called from `main.rs` and from the API tests to configure the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  extractor_configs(cfg);
  cfg.route("/health", web::get().to(health_check_handler)).service(
    web::scope("/orders")
      // The storefront posts to "/orders/"; accept the bare prefix as well.
      .route("", web::post().to(order_handlers::create_order_handler))
      .route("/", web::post().to(order_handlers::create_order_handler))
      .route("", web::get().to(order_handlers::list_unsent_orders_handler))
      .route("/", web::get().to(order_handlers::list_unsent_orders_handler))
      .route("/status", web::get().to(order_handlers::list_orders_by_status_handler))
      .route(
        "/{order_id}/status",
        web::patch().to(order_handlers::update_order_status_handler),
      ),
  );
}
