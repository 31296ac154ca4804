use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

pub const MAP_ELEMENT_ID: &str = "map";
pub const WRAPPER_ELEMENT_ID: &str = "mapWrapper";
pub const LAT_INPUT_ID: &str = "lat";
pub const LON_INPUT_ID: &str = "lon";

// Initial view over the Indian subcontinent.
pub const DEFAULT_CENTER_LAT: f64 = 22.9734;
pub const DEFAULT_CENTER_LON: f64 = 78.6569;
pub const DEFAULT_ZOOM: f64 = 5.0;

pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
pub const TILE_MAX_ZOOM: f64 = 19.0;

pub const MIN_MARKER_ZOOM: f64 = 8.0;
pub const CENTER_ZOOM: f64 = 8.0;
pub const FIT_PADDING_PX: f64 = 30.0;
pub const FIT_MAX_ZOOM: f64 = 14.0;

pub const SETTLE_DELAY_MS: u32 = 200;
pub const FULLSCREEN_RESIZE_DELAY_MS: u32 = 150;
pub const NOTIFICATION_TIMEOUT_MS: u32 = 3000;
pub const COORDINATE_PRECISION: usize = 6;

/// Page-level settings for the adapter. Every field has a default, so the host
/// page only passes the keys it wants to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapConfig {
    pub map_element_id: String,
    pub wrapper_element_id: String,
    pub lat_input_id: String,
    pub lon_input_id: String,
    pub default_center: Coordinate,
    pub default_zoom: f64,
    pub tile_url: String,
    pub tile_attribution: String,
    pub tile_max_zoom: f64,
    pub min_marker_zoom: f64,
    pub center_zoom: f64,
    pub fit_padding_px: f64,
    pub fit_max_zoom: f64,
    pub settle_delay_ms: u32,
    pub fullscreen_resize_delay_ms: u32,
    pub notification_timeout_ms: u32,
    pub coordinate_precision: usize,
    /// Create the map on DOM ready. Pages that call `initialize` themselves
    /// set this to `false`.
    pub auto_start: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            map_element_id: MAP_ELEMENT_ID.to_string(),
            wrapper_element_id: WRAPPER_ELEMENT_ID.to_string(),
            lat_input_id: LAT_INPUT_ID.to_string(),
            lon_input_id: LON_INPUT_ID.to_string(),
            default_center: Coordinate {
                lat: DEFAULT_CENTER_LAT,
                lon: DEFAULT_CENTER_LON,
            },
            default_zoom: DEFAULT_ZOOM,
            tile_url: TILE_URL.to_string(),
            tile_attribution: TILE_ATTRIBUTION.to_string(),
            tile_max_zoom: TILE_MAX_ZOOM,
            min_marker_zoom: MIN_MARKER_ZOOM,
            center_zoom: CENTER_ZOOM,
            fit_padding_px: FIT_PADDING_PX,
            fit_max_zoom: FIT_MAX_ZOOM,
            settle_delay_ms: SETTLE_DELAY_MS,
            fullscreen_resize_delay_ms: FULLSCREEN_RESIZE_DELAY_MS,
            notification_timeout_ms: NOTIFICATION_TIMEOUT_MS,
            coordinate_precision: COORDINATE_PRECISION,
            auto_start: true,
        }
    }
}

impl MapConfig {
    /// Replace values that would break the map with their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if Coordinate::new(self.default_center.lat, self.default_center.lon).is_err() {
            self.default_center = defaults.default_center;
        }
        if !self.tile_max_zoom.is_finite() || self.tile_max_zoom <= 0.0 {
            self.tile_max_zoom = defaults.tile_max_zoom;
        }
        let max_zoom = self.tile_max_zoom;
        for zoom in [
            &mut self.default_zoom,
            &mut self.min_marker_zoom,
            &mut self.center_zoom,
            &mut self.fit_max_zoom,
        ] {
            if !zoom.is_finite() || *zoom < 0.0 {
                *zoom = 0.0;
            }
            *zoom = zoom.min(max_zoom);
        }
        if !self.fit_padding_px.is_finite() || self.fit_padding_px < 0.0 {
            self.fit_padding_px = defaults.fit_padding_px;
        }
        if self.coordinate_precision > 10 {
            self.coordinate_precision = defaults.coordinate_precision;
        }
        self
    }
}
