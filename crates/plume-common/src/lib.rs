//! Plume Common Library
//!
//! Shared types, utilities, and error handling for the plume project.
//!
//! # Overview
//!
//! This crate provides common functionality used across all plume workspace
//! members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Domain Types**: Closed enumerations shared between the API and the
//!   relational schema (vehicle types, review statuses, severities, ...)
//! - **Checksums**: Image integrity verification utilities
//! - **Logging**: Centralized `tracing` initialization
//!
//! # Example
//!
//! ```no_run
//! use plume_common::{Result, PlumeError};
//! use plume_common::types::ReviewStatus;
//!
//! fn parse_status(raw: &str) -> Result<ReviewStatus> {
//!     let status: ReviewStatus = raw.parse()?;
//!     Ok(status)
//! }
//! ```

pub mod checksum;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{PlumeError, Result};
