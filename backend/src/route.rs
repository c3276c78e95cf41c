use std::{fs::File, io::Read, path::Path};

use crate::error::ConfigError;
use crate::models::{Prediction, Segment, Waypoint};
use crate::weather::WeatherService;

/// Models report cloud base in hectometres; segments carry metres.
pub const CLOUD_BASE_SCALE: f64 = 100.0;

const DEFAULT_ROUTE: &[(&str, &str)] = &[
    ("Nordhorn", "52.4300,7.0700"),
    ("Oldenzaal", "52.3000,6.9300"),
    ("Knooppunt Azelo", "52.2700,6.6300"),
    ("Lochem", "52.1600,6.4200"),
    ("Valeplas", "51.9000,5.9000"),
    ("Waalbrug A50 bij Ewijk", "51.8600,5.7500"),
    ("Knooppunt Paalgraven A50 - A59", "51.7400,5.6000"),
    ("Den Bosch", "51.6900,5.3100"),
    ("Efteling", "51.6550,5.0460"),
    ("Keizersveerbrug A27", "51.7360,4.9010"),
    ("Moerdijkbrug A16", "51.7010,4.6320"),
    ("Haringvlietbrug A29", "51.7330,4.4160"),
    ("Grevelingen Dam", "51.7510,3.8840"),
    ("Zeeland Brug", "51.6620,3.8530"),
    ("Neeltje Jans", "51.6260,3.7000"),
    ("Oostkapelle", "51.5600,3.5500"),
    ("Oostkapelle-1", "51.4450,3.5125"),
    ("Oostkapelle-2", "51.3300,3.4750"),
    ("Oostkapelle-3", "51.2150,3.4375"),
    ("GILTI", "51.0900,1.4000"),
    ("Canterbury", "51.2800,1.0800"),
    ("Southend-on-Sea", "51.5370,0.7130"),
    ("Witham", "51.7980,0.6390"),
    ("Braintree", "51.8790,0.5510"),
    ("Duxford", "52.0900,0.1300"),
];

/// The Nordhorn to Duxford crossing flown when no waypoint file is configured.
pub fn default_waypoints() -> Vec<Waypoint> {
    DEFAULT_ROUTE
        .iter()
        .map(|(name, location)| Waypoint::new(*name, *location))
        .collect()
}

pub fn load_waypoints(path: impl AsRef<Path>) -> Result<Vec<Waypoint>, ConfigError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    waypoints_from_reader(file)
}

/// Every waypoint location must parse, so a typo fails at startup rather
/// than as a broken line in the browser.
pub fn waypoints_from_reader<R: Read>(reader: R) -> Result<Vec<Waypoint>, ConfigError> {
    let waypoints: Vec<Waypoint> = serde_json::from_reader(reader)?;
    for waypoint in &waypoints {
        waypoint
            .lat_lng()
            .map_err(|source| ConfigError::Location {
                name: waypoint.name.clone(),
                source,
            })?;
    }
    Ok(waypoints)
}

/// Predicts conditions at the start of every leg, in order. A failed leg is
/// reported inline and does not stop the remaining ones.
pub async fn build_segments(weather: &WeatherService, waypoints: &[Waypoint]) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(waypoints.len().saturating_sub(1));

    for leg in waypoints.windows(2) {
        let (start, end) = (leg[0].clone(), leg[1].clone());
        let segment = match weather.predict(&start.location).await {
            Ok(prediction) => Segment::measured(start, end, to_metres(prediction)),
            Err(err) => {
                tracing::warn!("segment {} -> {} failed: {err}", start.name, end.name);
                Segment::failed(start, end, err.to_string())
            }
        };
        segments.push(segment);
    }

    segments
}

fn to_metres(prediction: Prediction) -> Prediction {
    Prediction {
        cloud_base: prediction.cloud_base * CLOUD_BASE_SCALE,
        ..prediction
    }
}
