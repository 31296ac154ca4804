use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

/// Web Mercator cuts off the poles at this latitude.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;
pub const TILE_SIZE: f64 = 256.0;

/// Map center and zoom level as reported to the host page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl Bounds {
    pub fn from_coordinates(coords: &[Coordinate]) -> Option<Self> {
        let (first, rest) = coords.split_first()?;
        let mut bounds = Self {
            south_west: *first,
            north_east: *first,
        };
        for c in rest {
            bounds.extend(*c);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, c: Coordinate) {
        self.south_west.lat = self.south_west.lat.min(c.lat);
        self.south_west.lon = self.south_west.lon.min(c.lon);
        self.north_east.lat = self.north_east.lat.max(c.lat);
        self.north_east.lon = self.north_east.lon.max(c.lon);
    }

    /// Center and zoom that show the whole box inside a `width`x`height`
    /// viewport with `padding` pixels on every side. Zoom is floored to a whole
    /// level and capped at `max_zoom`, so a single point does not zoom in
    /// without bound.
    pub fn fit_view(
        &self,
        width: f64,
        height: f64,
        padding: f64,
        min_zoom: f64,
        max_zoom: f64,
    ) -> MapView {
        let (x0, y0) = project(self.south_west);
        let (x1, y1) = project(self.north_east);
        let span_x = (x1 - x0).abs();
        // y grows southward, so the south-west corner has the larger y.
        let span_y = (y0 - y1).abs();

        let avail_w = (width - 2.0 * padding).max(1.0);
        let avail_h = (height - 2.0 * padding).max(1.0);
        let scale_x = avail_w / (span_x * TILE_SIZE);
        let scale_y = avail_h / (span_y * TILE_SIZE);
        let scale = scale_x.min(scale_y);

        let zoom = if scale.is_finite() {
            scale.log2().floor()
        } else {
            max_zoom
        };

        MapView {
            center: unproject((x0 + x1) / 2.0, (y0 + y1) / 2.0),
            zoom: zoom.clamp(min_zoom, max_zoom),
        }
    }
}

/// Project onto the unit square (x east, y south).
pub fn project(c: Coordinate) -> (f64, f64) {
    let lat = c.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let x = (c.lon + 180.0) / 360.0;
    let sin = lat.sin();
    let y = 0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI);
    (x, y)
}

pub fn unproject(x: f64, y: f64) -> Coordinate {
    let lon = x * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();
    Coordinate::from_map(lat, lon)
}
