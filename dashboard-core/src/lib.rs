//! NGO dashboard library
//!
//! The derived-metrics and filtering layer behind the dashboard pages:
//! dataset accessors, metric and timeline calculations, task views and
//! local mutations.

pub mod config;
pub mod dataset;
pub mod dates;
pub mod error;
pub mod format;
pub mod services;

pub use error::{AppError, Result};
