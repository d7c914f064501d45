use http::StatusCode;

use super::types::{AbortReason, Error, Kind};

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Creates an `Error` for a builder/configuration error.
pub fn builder<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Builder).with(e.into())
}

/// Creates an `Error` for a transport failure that produced no response.
pub fn network<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Network).with(e.into())
}

/// Creates an `Error` for a non-2xx response.
pub fn status(code: StatusCode, reason: impl Into<String>) -> Error {
    Error::new(Kind::Status(code, reason.into()))
}

/// Creates an `Error` for a superseded request.
pub fn superseded() -> Error {
    Error::new(Kind::Cancelled(AbortReason::Superseded))
}

/// Creates an `Error` for a per-attempt timeout.
pub fn timed_out() -> Error {
    Error::new(Kind::Cancelled(AbortReason::TimedOut))
}

/// Creates an `Error` for a cancellation with an explicit reason.
pub fn cancelled(reason: AbortReason) -> Error {
    Error::new(Kind::Cancelled(reason))
}

/// Creates an `Error` for a throwing interceptor.
pub fn interceptor<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Interceptor).with(e.into())
}

/// Creates an `Error` for an unrecoverable body decode failure.
pub fn parse<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Parse).with(e.into())
}
