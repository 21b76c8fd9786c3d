pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{CreateVehicleCommand, CreateVehicleError, CreateVehicleResponse};
pub use queries::{
    GetVehicleError, GetVehicleQuery, GetVehicleResponse, ListVehiclesError, ListVehiclesQuery,
    ListVehiclesResponse,
};
pub use routes::vehicles_routes;
