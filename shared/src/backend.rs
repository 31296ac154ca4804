use thiserror::Error;

use crate::bounds::MapView;
use crate::config::MapConfig;
use crate::coordinate::Coordinate;
use crate::events::UiEvent;
use crate::notify::Notification;
use crate::deferred::TaskId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("map container #{0} not found")]
    MissingContainer(String),
    #[error("mapping library is not loaded")]
    LibraryUnavailable,
    #[error("{0}")]
    Js(String),
}

/// Operations the adapter needs from a slippy-map library.
///
/// Handles are opaque to the adapter. Event wiring is done by the backend: the
/// `watch_*` calls must route the resulting [`UiEvent`]s back into
/// `MapAdapter::handle_event`.
pub trait MapBackend {
    type Map;
    type Layer: Clone;
    type Control;

    fn create_map(&mut self, config: &MapConfig) -> Result<Self::Map, BackendError>;
    fn add_tile_layer(&mut self, map: &Self::Map, config: &MapConfig);

    fn view(&self, map: &Self::Map) -> MapView;
    fn set_view(&mut self, map: &Self::Map, view: MapView);
    /// Container size in CSS pixels.
    fn size(&self, map: &Self::Map) -> (f64, f64);
    /// Re-read the container size after layout changes.
    fn invalidate_size(&mut self, map: &Self::Map);

    fn add_marker(&mut self, map: &Self::Map, at: Coordinate, draggable: bool) -> Self::Layer;
    fn set_marker_position(&mut self, marker: &Self::Layer, at: Coordinate);
    fn bind_popup(&mut self, layer: &Self::Layer, html: &str);

    fn watch_marker_drag(&mut self, marker: &Self::Layer);
    fn watch_map_clicks(&mut self, map: &Self::Map);

    fn new_layer_group(&mut self, map: &Self::Map) -> Self::Layer;
    fn clear_layer_group(&mut self, group: &Self::Layer);
    fn set_layer_attached(&mut self, map: &Self::Map, layer: &Self::Layer, attached: bool);
    /// Point, line and area layers currently on the map (markers, circle
    /// markers, polylines, polygons, circles).
    fn overlay_layers(&self, map: &Self::Map) -> Vec<Self::Layer>;
    fn same_layer(&self, a: &Self::Layer, b: &Self::Layer) -> bool;

    fn add_scale_control(&mut self, map: &Self::Map) -> Self::Control;
    fn add_legend_control(&mut self, map: &Self::Map, html: &str) -> Self::Control;
    /// A button that raises [`UiEvent::FullscreenToggle`] when pressed.
    fn add_fullscreen_control(&mut self, map: &Self::Map) -> Self::Control;
    fn remove_control(&mut self, map: &Self::Map, control: Self::Control);
}

/// The page around the map: inputs, visibility, toasts, timers, fullscreen.
pub trait HostPage {
    /// Write into the input with this id. Missing inputs are ignored.
    fn set_input(&mut self, id: &str, value: &str);
    fn show_element(&mut self, id: &str);
    fn notify(&mut self, notification: &Notification);

    /// Arrange for `MapAdapter::fire` to be called with `id` after `delay_ms`.
    fn arm_timer(&mut self, id: TaskId, delay_ms: u32);
    fn disarm_timer(&mut self, id: TaskId);

    /// Subscribe to a document-level event and forward it as `event`.
    fn listen(&mut self, name: &'static str, event: UiEvent);

    fn is_fullscreen(&self) -> bool;
    fn request_fullscreen(&mut self, id: &str);
    fn exit_fullscreen(&mut self);
}
