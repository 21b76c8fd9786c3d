pub mod commands;
pub mod routes;

pub use commands::{UploadImageCommand, UploadImageError, UploadImageResponse};
pub use routes::images_routes;
