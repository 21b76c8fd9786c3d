pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{CreateCameraCommand, CreateCameraError, CreateCameraResponse};
pub use queries::{
    GetCameraError, GetCameraQuery, GetCameraResponse, ListCamerasError, ListCamerasQuery,
    ListCamerasResponse,
};
pub use routes::cameras_routes;
