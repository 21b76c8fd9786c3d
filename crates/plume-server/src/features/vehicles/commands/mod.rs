pub mod create;

pub use create::{CreateVehicleCommand, CreateVehicleError, CreateVehicleResponse};
