use std::{io, path::PathBuf};

use axum::{Json, http::StatusCode};
use thiserror::Error;

use crate::models::ApiError;

pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

/// Startup configuration that could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid waypoint list: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("waypoint {name:?} has an invalid location: {source}")]
    Location {
        name: String,
        #[source]
        source: skyroute_shared::LocationParseError,
    },
    #[error("no weather source configured: set WEATHER_API_KEY or --observations")]
    MissingWeatherSource,
}

pub fn api_error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (
        status,
        Json(ApiError {
            error: message.into(),
        }),
    )
}

pub fn internal_error(err: impl std::error::Error) -> (StatusCode, Json<ApiError>) {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}
