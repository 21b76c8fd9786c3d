pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{MarkNotifiedCommand, MarkNotifiedError, MarkNotifiedResponse, NotifyTarget};
pub use queries::{
    GetViolationError, GetViolationQuery, GetViolationResponse, ListViolationsError,
    ListViolationsQuery, ListViolationsResponse,
};
pub use routes::violations_routes;
