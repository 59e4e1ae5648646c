#![forbid(unsafe_code)]

//! Core domain model and business logic for the BMI tracker.
//!
//! This crate provides:
//! - Domain types (records, categories, the per-user store)
//! - BMI engine (validation, computation, classification)
//! - Persistence (JSON history file)
//! - Read paths for history listing, charting and CSV export

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod store;
pub mod engine;
pub mod history;
pub mod chart;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use engine::{calculate, classify, compute_bmi, parse_measurement, validate, Tracker};
pub use chart::{ChartOptions, Series};
pub use history::HistoryRow;
