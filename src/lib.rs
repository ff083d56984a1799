//! blackswan - backend service scaffold
//!
//! Provides:
//! - Environment-driven settings with lenient defaults
//! - Success/error JSON envelopes for every API response
//! - Domain error vocabulary with stable codes
//! - An axum router exposing health and ping endpoints

pub mod api;
pub mod config;
pub mod error;
pub mod types;

pub use error::{Error, Result};
