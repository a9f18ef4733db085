//! Request handlers.
//!
//! Each submodule provides the async handler functions for one area of the
//! API and maps failures via [`AppError`](crate::error::AppError).

pub mod advice;
pub mod images;
pub mod project;
pub mod session;
