pub mod create_standard;

pub use create_standard::{CreateStandardCommand, CreateStandardError, CreateStandardResponse};
