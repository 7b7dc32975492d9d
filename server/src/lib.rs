// server/src/lib.rs

//! HTTP front of the flower shop order backend (actix-web).

pub mod config;
pub mod errors;
pub mod state;
pub mod web;

pub use crate::config::{AppConfig, LogFormat};
pub use crate::errors::AppError;
pub use crate::state::AppState;
pub use crate::web::configure_app_routes;
