//! API module
//!
//! Response envelope types shared by all route handlers.

pub mod response;
