pub mod find_nearest;
pub mod list_impact;

pub use find_nearest::{
    FindNearestError, FindNearestQuery, FindNearestResponse, NearestAirQuality, NearestWeather,
};
pub use list_impact::{ImpactListItem, ListImpactError, ListImpactQuery, ListImpactResponse};
