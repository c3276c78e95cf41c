pub mod error;
pub mod models;
pub mod route;
pub mod weather;

use std::{path::PathBuf, sync::Arc};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::error::{ApiResult, api_error, internal_error};
use crate::models::{PredictRequest, Prediction, Segment, Waypoint};
use crate::route::build_segments;
use crate::weather::WeatherService;

#[derive(Clone)]
pub struct AppState {
    pub weather: Arc<WeatherService>,
    pub waypoints: Arc<Vec<Waypoint>>,
    pub static_dir: PathBuf,
}

pub fn create_router(state: AppState) -> Router {
    let index = ServeFile::new(state.static_dir.join("index.html"));
    let privacy = ServeFile::new(state.static_dir.join("privacybeleid.html"));
    let assets = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/route", post(route_handler))
        .route("/predict", post(predict_handler))
        .route_service("/", index)
        .route_service("/privacybeleid", privacy)
        .fallback_service(assets)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn route_handler(State(state): State<AppState>) -> Json<Vec<Segment>> {
    let segments = build_segments(&state.weather, &state.waypoints).await;
    tracing::info!(
        "computed {} segment(s), {} failed",
        segments.len(),
        segments.iter().filter(|s| s.error.is_some()).count()
    );
    Json(segments)
}

async fn predict_handler(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> ApiResult<Json<Prediction>> {
    let location = match req.location.as_deref().map(str::trim) {
        Some(location) if !location.is_empty() => location,
        _ => return Err(api_error(StatusCode::BAD_REQUEST, "No location provided")),
    };

    let prediction = state.weather.predict(location).await.map_err(|err| {
        tracing::error!("prediction for {location:?} failed: {err}");
        internal_error(err)
    })?;
    tracing::debug!(
        "prediction for {location:?}: VVN={} VVX={} cloud_base={}",
        prediction.vvn,
        prediction.vvx,
        prediction.cloud_base
    );

    Ok(Json(prediction))
}
