pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{CreateStandardCommand, CreateStandardError, CreateStandardResponse};
pub use queries::{
    EvaluateComplianceError, EvaluateComplianceQuery, EvaluateComplianceResponse, FieldVerdict,
    ListStandardsError, ListStandardsQuery, ListStandardsResponse, Measurements, Thresholds,
};
pub use routes::compliance_routes;
