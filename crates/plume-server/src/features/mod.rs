//! Feature slices
//!
//! Each slice owns its commands (writes), queries (reads), and routes.
//! Slices that only touch the database take a `PgPool` state; the images
//! slice also needs the media store, so the composed router carries
//! [`FeatureState`].

pub mod cameras;
pub mod compliance;
pub mod detections;
pub mod environmental;
pub mod images;
pub mod shared;
pub mod vehicles;
pub mod violations;

use axum::Router;
use sqlx::PgPool;

use crate::storage::MediaStore;

/// Shared state for the composed API router.
#[derive(Clone)]
pub struct FeatureState {
    pub db: PgPool,
    pub media: MediaStore,
}

/// Compose all feature routers under `/api/v1`.
pub fn api_router(state: FeatureState) -> Router {
    let db = state.db.clone();

    Router::new().nest(
        "/api/v1",
        Router::new()
            .nest("/vehicles", vehicles::vehicles_routes().with_state(db.clone()))
            .nest("/cameras", cameras::cameras_routes().with_state(db.clone()))
            .nest(
                "/detections",
                detections::detections_routes().with_state(db.clone()),
            )
            .nest(
                "/violations",
                violations::violations_routes().with_state(db.clone()),
            )
            .nest(
                "/environmental",
                environmental::environmental_routes().with_state(db.clone()),
            )
            .nest("/compliance", compliance::compliance_routes().with_state(db))
            .nest("/images", images::images_routes().with_state(state)),
    )
}
