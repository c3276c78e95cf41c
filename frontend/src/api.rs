use seed::prelude::*;
use serde::Deserialize;
use skyroute_shared::{LatLng, PredictReply, PredictRequest, Segment};

/// Shown when reverse geocoding finds no city, town or village.
pub const UNKNOWN_PLACE: &str = "Onbekend";

const NOMINATIM_ROOT: &str = "https://nominatim.openstreetmap.org";

fn api_root() -> String {
    option_env!("FRONTEND_API_ROOT")
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_default()
}

fn geocoder_root() -> &'static str {
    option_env!("FRONTEND_GEOCODER_URL")
        .map(|url| url.trim_end_matches('/'))
        .unwrap_or(NOMINATIM_ROOT)
}

pub fn reverse_geocode_url(at: LatLng) -> String {
    format!(
        "{}/reverse?format=json&lat={}&lon={}",
        geocoder_root(),
        at.lat,
        at.lng
    )
}

#[derive(Debug, Default, Deserialize)]
pub struct ReverseGeocodeReply {
    #[serde(default)]
    pub address: Option<Address>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Address {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
}

impl ReverseGeocodeReply {
    pub fn place_name(&self) -> String {
        self.address
            .as_ref()
            .and_then(|addr| {
                [&addr.city, &addr.town, &addr.village]
                    .into_iter()
                    .flatten()
                    .find(|name| !name.trim().is_empty())
            })
            .cloned()
            .unwrap_or_else(|| UNKNOWN_PLACE.to_string())
    }
}

pub async fn fetch_route() -> Result<Vec<Segment>, String> {
    web_sys::console::debug_1(&"[frontend] requesting route".into());
    let request = Request::new(format!("{}/route", api_root()))
        .method(Method::Post)
        .header(Header::custom("Content-Type", "application/json"));

    match request.fetch().await {
        Err(err) => Err(format!("{err:?}")),
        Ok(raw) => match raw.check_status() {
            Err(status_err) => Err(format!("{status_err:?}")),
            Ok(resp) => resp
                .json::<Vec<Segment>>()
                .await
                .map_err(|err| format!("{err:?}")),
        },
    }
}

pub async fn reverse_geocode(at: LatLng) -> Result<String, String> {
    let url = reverse_geocode_url(at);
    web_sys::console::debug_1(&format!("[frontend] reverse geocode {url}").into());
    match Request::new(url).fetch().await {
        Err(err) => Err(format!("{err:?}")),
        Ok(raw) => match raw.check_status() {
            Err(status_err) => Err(format!("{status_err:?}")),
            Ok(resp) => resp
                .json::<ReverseGeocodeReply>()
                .await
                .map(|reply| reply.place_name())
                .map_err(|err| format!("{err:?}")),
        },
    }
}

/// The backend answers errors with a JSON body too, so the status is not
/// checked before decoding.
pub async fn predict(location: String) -> Result<PredictReply, String> {
    let payload = PredictRequest::new(location);
    match Request::new(format!("{}/predict", api_root()))
        .method(Method::Post)
        .json(&payload)
    {
        Err(err) => Err(format!("{err:?}")),
        Ok(request) => match request.fetch().await {
            Err(err) => Err(format!("{err:?}")),
            Ok(resp) => resp
                .json::<PredictReply>()
                .await
                .map_err(|err| format!("{err:?}")),
        },
    }
}
