use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Cloud base below this (metres) is rendered red.
pub const LOW_CLOUD_BASE_M: f64 = 300.0;
/// Cloud base below this (metres) is rendered orange, above it green.
pub const MARGINAL_CLOUD_BASE_M: f64 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationParseError {
    input: String,
}

impl fmt::Display for LocationParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid \"lat,lon\" location: {:?}", self.input)
    }
}

impl std::error::Error for LocationParseError {}

impl FromStr for LatLng {
    type Err = LocationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || LocationParseError {
            input: s.to_string(),
        };
        let (lat, lng) = s.split_once(',').ok_or_else(err)?;
        let lat = lat.trim().parse::<f64>().map_err(|_| err())?;
        let lng = lng.trim().parse::<f64>().map_err(|_| err())?;
        if !lat.is_finite() || !lng.is_finite() {
            return Err(err());
        }
        Ok(Self { lat, lng })
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// A named point on the route; `location` is kept as the `"lat,lon"` string
/// the backend also hands to the weather source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub name: String,
    pub location: String,
}

impl Waypoint {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }

    pub fn lat_lng(&self) -> Result<LatLng, LocationParseError> {
        self.location.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentColor {
    Green,
    Orange,
    Red,
}

impl SegmentColor {
    pub fn for_cloud_base(meters: f64) -> Self {
        if meters < LOW_CLOUD_BASE_M {
            Self::Red
        } else if meters < MARGINAL_CLOUD_BASE_M {
            Self::Orange
        } else {
            Self::Green
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Red => "red",
        }
    }
}

impl fmt::Display for SegmentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One leg of the route. A failed leg only carries `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Waypoint,
    pub end: Waypoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<SegmentColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_base: Option<f64>,
    #[serde(rename = "VVN", default, skip_serializing_if = "Option::is_none")]
    pub vvn: Option<f64>,
    #[serde(rename = "VVX", default, skip_serializing_if = "Option::is_none")]
    pub vvx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Segment {
    /// Builds a rendered leg from a prediction whose cloud base is in metres.
    pub fn measured(start: Waypoint, end: Waypoint, prediction: Prediction) -> Self {
        Self {
            start,
            end,
            color: Some(SegmentColor::for_cloud_base(prediction.cloud_base)),
            cloud_base: Some(prediction.cloud_base),
            vvn: Some(prediction.vvn),
            vvx: Some(prediction.vvx),
            error: None,
        }
    }

    pub fn failed(start: Waypoint, end: Waypoint, error: impl Into<String>) -> Self {
        Self {
            start,
            end,
            color: None,
            cloud_base: None,
            vvn: None,
            vvx: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(rename = "VVN")]
    pub vvn: f64,
    #[serde(rename = "VVX")]
    pub vvx: f64,
    pub cloud_base: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub location: Option<String>,
}

impl PredictRequest {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
        }
    }
}

/// Body of a `/predict` response, whatever the status code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictReply {
    Failed { error: String },
    Forecast(Prediction),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lat_lon_with_whitespace() {
        let point: LatLng = " 52.4300, 7.0700 ".parse().unwrap();
        assert_eq!(point, LatLng { lat: 52.43, lng: 7.07 });
    }

    #[test]
    fn rejects_malformed_locations() {
        for input in ["", "52.43", "52.43;7.07", "north,7.07", "52.43,", "NaN,1"] {
            assert!(input.parse::<LatLng>().is_err(), "{input:?} should fail");
        }
    }

    #[test]
    fn color_thresholds_are_half_open() {
        assert_eq!(SegmentColor::for_cloud_base(299.9), SegmentColor::Red);
        assert_eq!(SegmentColor::for_cloud_base(300.0), SegmentColor::Orange);
        assert_eq!(SegmentColor::for_cloud_base(599.9), SegmentColor::Orange);
        assert_eq!(SegmentColor::for_cloud_base(600.0), SegmentColor::Green);
    }

    #[test]
    fn failed_segment_serializes_without_measurements() {
        let segment = Segment::failed(
            Waypoint::new("Nordhorn", "52.4300,7.0700"),
            Waypoint::new("Oldenzaal", "52.3000,6.9300"),
            "boom",
        );
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["error"], "boom");
        assert!(json.get("color").is_none());
        assert!(json.get("VVN").is_none());
    }

    #[test]
    fn measured_segment_uses_wire_names() {
        let segment = Segment::measured(
            Waypoint::new("A", "1,2"),
            Waypoint::new("B", "3,4"),
            Prediction {
                vvn: 1.5,
                vvx: 2.5,
                cloud_base: 450.0,
            },
        );
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["color"], "orange");
        assert_eq!(json["VVN"], 1.5);
        assert_eq!(json["VVX"], 2.5);
        assert_eq!(json["cloud_base"], 450.0);
    }

    #[test]
    fn predict_reply_prefers_error_shape() {
        let reply: PredictReply =
            serde_json::from_str(r#"{"error":"No location provided"}"#).unwrap();
        assert_eq!(
            reply,
            PredictReply::Failed {
                error: "No location provided".into()
            }
        );

        let reply: PredictReply =
            serde_json::from_str(r#"{"VVN":3.0,"VVX":7.25,"cloud_base":4.5}"#).unwrap();
        assert!(matches!(reply, PredictReply::Forecast(p) if p.vvx == 7.25));
    }
}
