pub mod get;
pub mod list;

pub use get::{GetViolationError, GetViolationQuery, GetViolationResponse};
pub use list::{
    ListViolationsError, ListViolationsQuery, ListViolationsResponse, ViolationListItem,
};
