pub mod get;
pub mod list;

pub use get::{GetVehicleError, GetVehicleQuery, GetVehicleResponse};
pub use list::{ListVehiclesError, ListVehiclesQuery, ListVehiclesResponse, VehicleListItem};
