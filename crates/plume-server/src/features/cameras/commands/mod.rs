pub mod create;

pub use create::{CreateCameraCommand, CreateCameraError, CreateCameraResponse};
