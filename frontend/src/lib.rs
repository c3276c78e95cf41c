pub mod api;
pub mod map;

use seed::{prelude::*, *};
use serde::Deserialize;
use skyroute_shared::{LatLng, PredictReply, Prediction, Segment};

use crate::map::{MapConfig, SegmentLine};

#[derive(Default)]
pub struct Model {
    results: Vec<ResultEntry>,
    drawn_segments: usize,
}

/// One block in the result area. A new selection replaces the area, every
/// prediction reply is appended to it.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultEntry {
    Selected { name: String, at: LatLng },
    Forecast(Prediction),
    Rejected(String),
    ServerError(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayLine {
    Heading(String),
    Text(String),
    Alert(String),
}

impl ResultEntry {
    pub fn display_lines(&self) -> Vec<DisplayLine> {
        match self {
            Self::Selected { name, at } => vec![DisplayLine::Text(format!(
                "Geselecteerde locatie: {name} ({:.5}, {:.5})",
                at.lat, at.lng
            ))],
            Self::Forecast(p) => vec![
                DisplayLine::Heading("Voorspelling".into()),
                DisplayLine::Text(format!("VVN: {}", p.vvn)),
                DisplayLine::Text(format!("VVX: {}", p.vvx)),
                DisplayLine::Text(format!("Cloud Base: {}", p.cloud_base)),
            ],
            Self::Rejected(error) => vec![DisplayLine::Alert(format!("Error: {error}"))],
            Self::ServerError(error) => vec![DisplayLine::Alert(format!("Serverfout: {error}"))],
        }
    }
}

pub enum Msg {
    RouteFetched(Result<Vec<Segment>, String>),
    MapClicked(LatLng),
    Geocoded {
        at: LatLng,
        result: Result<String, String>,
    },
    PredictionFetched(Result<PredictReply, String>),
}

/// Side effects requested by [`step`], carried out by [`update`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchRoute,
    DrawSegment(SegmentLine),
    ReverseGeocode(LatLng),
    Predict(String),
    LogDebug(String),
    LogError(String),
}

pub fn initial_effects() -> Vec<Effect> {
    vec![Effect::FetchRoute]
}

pub fn step(model: &mut Model, msg: Msg) -> Vec<Effect> {
    match msg {
        Msg::RouteFetched(Ok(segments)) => segments
            .iter()
            .map(|segment| match map::plan_segment(segment) {
                Ok(line) => {
                    model.drawn_segments += 1;
                    Effect::DrawSegment(line)
                }
                Err(reason) => Effect::LogError(reason),
            })
            .collect(),
        Msg::RouteFetched(Err(err)) => {
            vec![Effect::LogError(format!("[frontend] route request failed: {err}"))]
        }
        Msg::MapClicked(at) => vec![Effect::ReverseGeocode(at)],
        Msg::Geocoded {
            at,
            result: Ok(name),
        } => {
            model.results = vec![ResultEntry::Selected {
                name: name.clone(),
                at,
            }];
            vec![Effect::Predict(name)]
        }
        Msg::Geocoded { at, result: Err(err) } => vec![Effect::LogError(format!(
            "[frontend] reverse geocode at {:.5},{:.5} failed: {err}",
            at.lat, at.lng
        ))],
        Msg::PredictionFetched(Ok(PredictReply::Failed { error })) => {
            model.results.push(ResultEntry::Rejected(error));
            Vec::new()
        }
        Msg::PredictionFetched(Ok(PredictReply::Forecast(prediction))) => {
            model.results.push(ResultEntry::Forecast(prediction));
            vec![Effect::LogDebug(format!("[frontend] prediction {prediction:?}"))]
        }
        Msg::PredictionFetched(Err(err)) => {
            model.results.push(ResultEntry::ServerError(err));
            Vec::new()
        }
    }
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    for effect in step(model, msg) {
        perform(effect, orders);
    }
}

fn perform(effect: Effect, orders: &mut impl Orders<Msg>) {
    match effect {
        Effect::FetchRoute => {
            orders.perform_cmd(async { Msg::RouteFetched(api::fetch_route().await) });
        }
        Effect::DrawSegment(line) => map::draw_segment(&line),
        Effect::ReverseGeocode(at) => {
            orders.perform_cmd(async move {
                Msg::Geocoded {
                    at,
                    result: api::reverse_geocode(at).await,
                }
            });
        }
        Effect::Predict(location) => {
            orders.perform_cmd(async move { Msg::PredictionFetched(api::predict(location).await) });
        }
        Effect::LogDebug(message) => web_sys::console::debug_1(&message.into()),
        Effect::LogError(message) => web_sys::console::error_1(&message.into()),
    }
}

#[derive(Deserialize)]
struct MapClickPayload {
    lat: f64,
    lng: f64,
}

pub fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    orders.stream(streams::window_event(Ev::from("map-click"), |event| {
        let event = event.dyn_into::<web_sys::CustomEvent>().ok()?;
        let payload: MapClickPayload = serde_wasm_bindgen::from_value(event.detail()).ok()?;
        web_sys::console::debug_1(
            &format!(
                "[frontend] map click lat={:.5} lng={:.5}",
                payload.lat, payload.lng
            )
            .into(),
        );
        Some(Msg::MapClicked(LatLng {
            lat: payload.lat,
            lng: payload.lng,
        }))
    }));

    for effect in initial_effects() {
        perform(effect, orders);
    }

    Model::default()
}

pub fn view(model: &Model) -> Node<Msg> {
    let lines: Vec<Node<Msg>> = model
        .results
        .iter()
        .flat_map(ResultEntry::display_lines)
        .map(view_line)
        .collect();

    div![
        C!["panel"],
        small![format!("{} segment(en) getekend", model.drawn_segments)],
        div![attrs! { At::Id => "result" }, lines],
    ]
}

fn view_line(line: DisplayLine) -> Node<Msg> {
    match line {
        DisplayLine::Heading(text) => h3![text],
        DisplayLine::Text(text) => p![text],
        DisplayLine::Alert(text) => p![style! { St::Color => "red" }, text],
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    map::init_map(&MapConfig::default());
    App::start("app", init, update, view);
}
