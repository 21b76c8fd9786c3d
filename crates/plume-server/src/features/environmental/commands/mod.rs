pub mod record_air_quality;
pub mod record_weather;
pub mod upsert_impact;

pub use record_air_quality::{
    RecordAirQualityCommand, RecordAirQualityError, RecordAirQualityResponse,
};
pub use record_weather::{RecordWeatherCommand, RecordWeatherError, RecordWeatherResponse};
pub use upsert_impact::{UpsertImpactCommand, UpsertImpactError, UpsertImpactResponse};
