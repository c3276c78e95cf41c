use std::{collections::HashMap, fs::File, io::Read, path::Path, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Deserializer, de};

use super::WeatherError;

pub const WEERLIVE_URL: &str = "https://weerlive.nl/api/weerlive_api_v2.php";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Current conditions as reported by Weerlive. The API sends most values as
/// strings; a missing or null value reads as 0.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Observation {
    /// Precipitation.
    #[serde(deserialize_with = "lenient_f64")]
    pub neerslag: f64,
    /// Air pressure.
    #[serde(deserialize_with = "lenient_f64")]
    pub luchtd: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub windsnelheid: f64,
    /// Gusts.
    #[serde(deserialize_with = "lenient_f64")]
    pub windstoten: f64,
    /// Wind direction in degrees.
    #[serde(deserialize_with = "lenient_f64")]
    pub windrgr: f64,
    /// Sunshine.
    #[serde(deserialize_with = "lenient_f64")]
    pub zon: f64,
    /// Relative humidity.
    #[serde(deserialize_with = "lenient_f64")]
    pub lv: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub temp: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub temp24: f64,
    /// Dew point.
    #[serde(deserialize_with = "lenient_f64")]
    pub dauwp: f64,
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let value = match Option::<Raw>::deserialize(deserializer)? {
        None => return Ok(0.0),
        Some(Raw::Number(value)) => value,
        Some(Raw::Text(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| de::Error::custom(format!("not a number: {text:?}")))?,
    };
    if !value.is_finite() {
        return Err(de::Error::custom(format!("not a number: {value}")));
    }
    Ok(value)
}

#[derive(Debug, Deserialize)]
struct WeerliveResponse {
    #[serde(default)]
    liveweer: Vec<Observation>,
}

#[derive(Debug, Clone)]
pub struct WeerliveClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeerliveClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    pub async fn fetch(&self, location: &str) -> Result<Observation, WeatherError> {
        tracing::debug!("fetching live weather for {location:?}");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("key", self.api_key.as_str()), ("locatie", location)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let payload: WeerliveResponse = serde_json::from_slice(&body)?;
        payload
            .liveweer
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::NoObservation(location.to_string()))
    }
}

/// Fixed observations keyed by location string, for offline runs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ObservationTable {
    entries: HashMap<String, Observation>,
}

impl ObservationTable {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WeatherError> {
        Self::from_reader(File::open(path)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, WeatherError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn get(&self, location: &str) -> Option<&Observation> {
        self.entries.get(location)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub enum ObservationSource {
    Weerlive(WeerliveClient),
    Snapshot(ObservationTable),
}

impl ObservationSource {
    pub async fn fetch(&self, location: &str) -> Result<Observation, WeatherError> {
        match self {
            Self::Weerlive(client) => client.fetch(location).await,
            Self::Snapshot(table) => table
                .get(location)
                .cloned()
                .ok_or_else(|| WeatherError::UnknownLocation(location.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, query_param},
    };

    #[test]
    fn accepts_numbers_strings_and_nulls() {
        let obs: Observation = serde_json::from_value(json!({
            "temp": "11.4",
            "dauwp": 9,
            "lv": null,
            "plaats": "Lochem"
        }))
        .unwrap();
        assert_eq!(obs.temp, 11.4);
        assert_eq!(obs.dauwp, 9.0);
        assert_eq!(obs.lv, 0.0);
        assert_eq!(obs.windstoten, 0.0);
    }

    #[test]
    fn rejects_non_finite_text() {
        for text in ["NaN", "nan", "inf", "-infinity", "1e400"] {
            let err = serde_json::from_value::<Observation>(json!({ "temp": text })).unwrap_err();
            assert!(err.to_string().contains("not a number"), "{text}: {err}");
        }
    }

    #[tokio::test]
    async fn weerlive_nan_reading_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "liveweer": [{"plaats": "Lochem", "temp": "NaN", "dauwp": "9.8"}]
            })))
            .mount(&server)
            .await;

        let client = WeerliveClient::new(server.uri(), "secret").unwrap();
        let err = client.fetch("Lochem").await.unwrap_err();
        assert!(matches!(err, WeatherError::Parse(_)), "{err}");
    }

    #[test]
    fn rejects_non_numeric_text() {
        let err = serde_json::from_value::<Observation>(json!({"temp": "-"})).unwrap_err();
        assert!(err.to_string().contains("not a number"));
    }

    #[tokio::test]
    async fn weerlive_reads_first_observation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("key", "secret"))
            .and(query_param("locatie", "52.1600,6.4200"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "liveweer": [
                    {"plaats": "Lochem", "temp": "14.2", "dauwp": "9.8", "windstoten": "6"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = WeerliveClient::new(server.uri(), "secret").unwrap();
        let obs = client.fetch("52.1600,6.4200").await.unwrap();
        assert_eq!(obs.temp, 14.2);
        assert_eq!(obs.dauwp, 9.8);
        assert_eq!(obs.windstoten, 6.0);
    }

    #[tokio::test]
    async fn weerlive_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = WeerliveClient::new(server.uri(), "secret").unwrap();
        let err = client.fetch("Lochem").await.unwrap_err();
        assert!(matches!(err, WeatherError::Status(503)));
        assert_eq!(err.to_string(), "weather service returned status 503");
    }

    #[tokio::test]
    async fn weerlive_empty_list_is_no_observation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"liveweer": []})))
            .mount(&server)
            .await;

        let client = WeerliveClient::new(server.uri(), "secret").unwrap();
        let err = client.fetch("Lochem").await.unwrap_err();
        assert!(matches!(err, WeatherError::NoObservation(_)));
    }

    #[tokio::test]
    async fn snapshot_source_looks_up_exact_location() {
        let table = ObservationTable::from_reader(r#"{"Lochem": {"temp": 3}}"#.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        let source = ObservationSource::Snapshot(table);
        assert_eq!(source.fetch("Lochem").await.unwrap().temp, 3.0);
        assert!(matches!(
            source.fetch("lochem").await,
            Err(WeatherError::UnknownLocation(_))
        ));
    }
}
