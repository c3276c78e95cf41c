use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use clap::Parser;
use skyroute_backend::{
    AppState, create_router,
    error::ConfigError,
    route::{default_waypoints, load_waypoints},
    weather::{
        ModelSet, ObservationSource, ObservationTable, WeatherService, WeerliveClient,
        observation::WEERLIVE_URL,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Serve the cloud base route map and its prediction API"
)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "SKYROUTE_ADDR", default_value = "0.0.0.0:5000")]
    addr: SocketAddr,

    /// JSON file with the vvn, vvx and cloud_base regression models
    #[arg(long, env = "SKYROUTE_MODELS", default_value = "backend/data/models.json")]
    models: PathBuf,

    /// JSON list of {name, location} waypoints; the built-in route is used when absent
    #[arg(long, env = "SKYROUTE_WAYPOINTS")]
    waypoints: Option<PathBuf>,

    /// Directory holding index.html and the compiled frontend
    #[arg(long, env = "SKYROUTE_STATIC_DIR", default_value = "frontend/static")]
    static_dir: PathBuf,

    #[arg(long, env = "WEATHER_API_URL", default_value = WEERLIVE_URL)]
    weather_url: String,

    #[arg(long, env = "WEATHER_API_KEY", hide_env_values = true)]
    weather_api_key: Option<String>,

    /// Serve observations from this JSON snapshot instead of the live API
    #[arg(long, env = "SKYROUTE_OBSERVATIONS")]
    observations: Option<PathBuf>,
}

impl Args {
    fn observation_source(&self) -> Result<ObservationSource, Box<dyn std::error::Error>> {
        if let Some(path) = &self.observations {
            let table = ObservationTable::from_path(path)?;
            tracing::info!("using {} snapshot observation(s) from {path:?}", table.len());
            return Ok(ObservationSource::Snapshot(table));
        }
        let key = self
            .weather_api_key
            .as_deref()
            .ok_or(ConfigError::MissingWeatherSource)?;
        tracing::info!("using live observations from {}", self.weather_url);
        Ok(ObservationSource::Weerlive(WeerliveClient::new(
            self.weather_url.clone(),
            key,
        )?))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skyroute_backend=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let models = ModelSet::from_path(&args.models).map_err(|err| {
        tracing::error!("failed to load models from {:?}: {err}", args.models);
        err
    })?;
    tracing::info!("loaded regression models from {:?}", args.models);

    let waypoints = match &args.waypoints {
        Some(path) => load_waypoints(path)?,
        None => default_waypoints(),
    };
    tracing::info!("route has {} waypoint(s)", waypoints.len());

    let state = AppState {
        weather: Arc::new(WeatherService::new(args.observation_source()?, models)),
        waypoints: Arc::new(waypoints),
        static_dir: args.static_dir.clone(),
    };
    let app = create_router(state);

    tracing::info!("starting backend on http://{}", args.addr);
    let listener = tokio::net::TcpListener::bind(args.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
