pub mod evaluate;
pub mod list_standards;

pub use evaluate::{
    EvaluateComplianceError, EvaluateComplianceQuery, EvaluateComplianceResponse, FieldVerdict,
    Measurements, Thresholds,
};
pub use list_standards::{
    ListStandardsError, ListStandardsQuery, ListStandardsResponse, StandardListItem,
};
