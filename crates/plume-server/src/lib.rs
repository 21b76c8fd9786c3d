//! Plume Server Library
//!
//! HTTP server for the vehicle emission detection registry.
//!
//! # Overview
//!
//! The plume server records emission-detection events captured by roadside
//! cameras, tracks the review workflow that turns a detection into a
//! confirmed violation, and stores the environmental measurements those
//! events are correlated against:
//!
//! - **API Endpoints**: RESTful API over the detection/violation data model
//! - **Database Management**: PostgreSQL integration with SQLx; uniqueness
//!   and foreign-key constraints are enforced by the schema, not by callers
//! - **Image Storage**: Content-addressed local media store for captured frames
//! - **Configuration**: Environment-based configuration management
//! - **Middleware**: CORS and request tracing
//!
//! # Architecture
//!
//! The server follows a **CQRS (Command Query Responsibility Segregation)**
//! layout: each feature is a vertical slice with `commands/` (writes),
//! `queries/` (reads), and `routes.rs` wiring them to Axum handlers.
//!
//! The one multi-row write path is the detection review transition: a
//! `confirmed` decision updates the detection and inserts its violation row
//! in a single transaction, so `is_violation` and the existence of a
//! violation record can never disagree.
//!
//! ## Framework Stack
//!
//! - **Axum**: Web framework
//! - **SQLx**: Asynchronous PostgreSQL driver with embedded migrations
//! - **Tower / tower-http**: Middleware layers

pub mod api;
pub mod config;
pub mod error;
pub mod features;
pub mod middleware;
pub mod storage;

// Re-export commonly used types
pub use error::{AppError, ServerResult};
