pub mod get;
pub mod list;

pub use get::{GetCameraError, GetCameraQuery, GetCameraResponse};
pub use list::{CameraListItem, ListCamerasError, ListCamerasQuery, ListCamerasResponse};
