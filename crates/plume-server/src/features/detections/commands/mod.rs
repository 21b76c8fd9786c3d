pub mod create;
pub mod record_results;
pub mod review;

pub use create::{CreateDetectionCommand, CreateDetectionError, CreateDetectionResponse};
pub use record_results::{RecordResultsCommand, RecordResultsError, RecordResultsResponse};
pub use review::{ReviewDetectionCommand, ReviewDetectionError, ReviewDetectionResponse};
