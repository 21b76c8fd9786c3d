pub mod get;
pub mod list;

pub use get::{GetDetectionError, GetDetectionQuery, GetDetectionResponse, ViolationDetail};
pub use list::{
    DetectionListItem, ListDetectionsError, ListDetectionsQuery, ListDetectionsResponse,
};
