pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{
    CreateDetectionCommand, CreateDetectionError, CreateDetectionResponse, RecordResultsCommand,
    RecordResultsError, RecordResultsResponse, ReviewDetectionCommand, ReviewDetectionError,
    ReviewDetectionResponse,
};
pub use queries::{
    GetDetectionError, GetDetectionQuery, GetDetectionResponse, ListDetectionsError,
    ListDetectionsQuery, ListDetectionsResponse,
};
pub use routes::detections_routes;
