//! Error taxonomy and shared formatting for dicebag.
//!
//! This crate provides:
//! - [`Error`] - Rich error type carrying an [`ErrorKind`] and optional context
//! - [`ErrorKind`] - One variant per failure the core can report
//! - [`format_modifier`] - Signed modifier rendering shared by every layer

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod format;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use format::{format_modifier, is_modifier_token, parse_modifier};
