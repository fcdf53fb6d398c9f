//! Seatwatch Core - schedule page extraction and shared models.
//!
//! This crate provides:
//! - HTML scanning helpers tailored to the class-schedule page layout
//! - Section table extraction into normalized records
//! - Shared models used by the monitor service

pub mod extract;
pub mod html;
pub mod models;

pub use extract::{extract_sections, ExtractError};
pub use models::SectionRecord;
