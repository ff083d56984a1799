//! Error types for blackswan

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::response::ErrorResponse;

pub type Result<T> = std::result::Result<T, Error>;

/// Domain errors shared by every handler.
#[derive(Error, Debug)]
pub enum Error {
    #[error("resource not found")]
    NotFound,

    #[error("invalid input")]
    InvalidInput,

    #[error("unauthorized")]
    Unauthorized,

    #[error("insufficient balance")]
    InsufficientBalance,

    #[error("invalid price")]
    InvalidPrice,

    #[error("sanity too low")]
    SanityTooLow,

    #[error("market closed")]
    MarketClosed,

    #[error("no time slot available")]
    NoTimeSlot,

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    /// Machine-readable code placed in the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound => "NOT_FOUND",
            Error::InvalidInput => "INVALID_INPUT",
            Error::Unauthorized => "UNAUTHORIZED",
            Error::InsufficientBalance => "INSUFFICIENT_BALANCE",
            Error::InvalidPrice => "INVALID_PRICE",
            Error::SanityTooLow => "SANITY_TOO_LOW",
            Error::MarketClosed => "MARKET_CLOSED",
            Error::NoTimeSlot => "NO_TIME_SLOT",
            Error::Internal(_) => "INTERNAL",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::InvalidInput => StatusCode::BAD_REQUEST,
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::InsufficientBalance | Error::InvalidPrice | Error::SanityTooLow => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::MarketClosed | Error::NoTimeSlot => StatusCode::CONFLICT,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorResponse::new(self.code(), self.to_string(), None);
        (status, Json(body)).into_response()
    }
}
