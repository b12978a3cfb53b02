//! Request handlers.
//!
//! Handlers parse and validate the request, delegate to the composer and
//! the session store, and map errors via [`AppError`](crate::error::AppError).

pub mod session;
