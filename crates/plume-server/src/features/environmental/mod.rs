pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{
    RecordAirQualityCommand, RecordAirQualityError, RecordAirQualityResponse,
    RecordWeatherCommand, RecordWeatherError, RecordWeatherResponse, UpsertImpactCommand,
    UpsertImpactError, UpsertImpactResponse,
};
pub use queries::{
    FindNearestError, FindNearestQuery, FindNearestResponse, ListImpactError, ListImpactQuery,
    ListImpactResponse,
};
pub use routes::environmental_routes;
