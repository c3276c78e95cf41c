use seed::prelude::web_sys;
use serde::Serialize;
use serde_wasm_bindgen::to_value;
use skyroute_shared::{LatLng, Segment, SegmentColor};
use wasm_bindgen::prelude::{JsValue, wasm_bindgen};

#[wasm_bindgen(module = "/leaflet_map.js")]
extern "C" {
    #[wasm_bindgen(js_name = initMap)]
    fn init_map_js(config: JsValue);
    #[wasm_bindgen(js_name = drawSegment)]
    fn draw_segment_js(line: JsValue);
}

// Amsterdam
const CENTER: LatLng = LatLng {
    lat: 52.3676,
    lng: 4.9041,
};
const ZOOM: u8 = 6;
const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

#[derive(Debug, Clone, Serialize)]
pub struct MapConfig {
    pub element: &'static str,
    pub center: LatLng,
    pub zoom: u8,
    pub tile_url: &'static str,
    pub attribution: &'static str,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            element: "map",
            center: CENTER,
            zoom: ZOOM,
            tile_url: TILE_URL,
            attribution: ATTRIBUTION,
        }
    }
}

/// A route leg ready for the map: endpoints, stroke color and popup HTML.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentLine {
    pub from: LatLng,
    pub to: LatLng,
    pub color: SegmentColor,
    pub popup: String,
}

/// Mounts Leaflet on `#map`; clicks come back as `map-click` window events.
pub fn init_map(config: &MapConfig) {
    match to_value(config) {
        Ok(value) => init_map_js(value),
        Err(err) => web_sys::console::error_1(&format!("[frontend] map config: {err}").into()),
    }
}

pub fn draw_segment(line: &SegmentLine) {
    match to_value(line) {
        Ok(value) => draw_segment_js(value),
        Err(err) => web_sys::console::error_1(&format!("[frontend] segment: {err}").into()),
    }
}

/// Turns a route segment into a drawable line. The error string is what
/// ends up in the console when the segment is skipped.
pub fn plan_segment(segment: &Segment) -> Result<SegmentLine, String> {
    let (start, end) = (&segment.start, &segment.end);
    if let Some(error) = &segment.error {
        return Err(format!(
            "Fout voor segment {} naar {}: {error}",
            start.name, end.name
        ));
    }

    let from = start.lat_lng().map_err(|err| format!("{}: {err}", start.name))?;
    let to = end.lat_lng().map_err(|err| format!("{}: {err}", end.name))?;
    let color = segment
        .color
        .ok_or_else(|| format!("segment {} naar {} heeft geen kleur", start.name, end.name))?;

    Ok(SegmentLine {
        from,
        to,
        color,
        popup: popup_html(segment, color),
    })
}

fn popup_html(segment: &Segment, color: SegmentColor) -> String {
    let cloud_base = segment
        .cloud_base
        .map(|value| value.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "<strong>Van:</strong> {}<br>\
         <strong>Tot:</strong> {}<br>\
         <strong>Cloud Base:</strong> {cloud_base} m<br>\
         <strong>Kleur:</strong> {color}",
        escape_html(&segment.start.name),
        escape_html(&segment.end.name),
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
