//! In-memory backend and host that record every call, for adapter tests.

use std::collections::{HashMap, HashSet};

use crate::backend::{BackendError, HostPage, MapBackend};
use crate::bounds::MapView;
use crate::config::MapConfig;
use crate::coordinate::Coordinate;
use crate::deferred::TaskId;
use crate::events::UiEvent;
use crate::notify::Notification;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Marker,
    Polyline,
    Polygon,
    Group,
}

#[derive(Debug, Clone)]
pub struct FakeLayer {
    pub kind: LayerKind,
    pub position: Option<Coordinate>,
    pub popup: Option<String>,
    pub draggable: bool,
    pub attached: bool,
    pub parent: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Scale,
    Legend,
    Fullscreen,
}

#[derive(Debug)]
pub struct RecordingBackend {
    pub fail_create: bool,
    pub maps_created: usize,
    pub tile_layers: usize,
    pub current: MapView,
    pub size: (f64, f64),
    pub set_views: Vec<MapView>,
    pub invalidations: usize,
    pub layers: Vec<FakeLayer>,
    pub controls: Vec<(ControlKind, String, bool)>,
    pub drag_watched: Vec<usize>,
    pub click_watches: usize,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self {
            fail_create: false,
            maps_created: 0,
            tile_layers: 0,
            current: MapView {
                center: Coordinate { lat: 0.0, lon: 0.0 },
                zoom: 0.0,
            },
            size: (800.0, 600.0),
            set_views: Vec::new(),
            invalidations: 0,
            layers: Vec::new(),
            controls: Vec::new(),
            drag_watched: Vec::new(),
            click_watches: 0,
        }
    }
}

impl RecordingBackend {
    fn push(&mut self, layer: FakeLayer) -> usize {
        self.layers.push(layer);
        self.layers.len() - 1
    }

    /// Draw an overlay directly on the map, the way host scripts do.
    pub fn draw(&mut self, kind: LayerKind) -> usize {
        self.push(FakeLayer {
            kind,
            position: None,
            popup: None,
            draggable: false,
            attached: true,
            parent: None,
        })
    }

    pub fn draw_in_group(&mut self, group: usize, kind: LayerKind) -> usize {
        let id = self.draw(kind);
        self.layers[id].parent = Some(group);
        id
    }

    pub fn on_map(&self, id: usize) -> bool {
        let layer = &self.layers[id];
        layer.attached && layer.parent.is_none_or(|p| self.on_map(p))
    }

    pub fn markers_on_map(&self) -> Vec<usize> {
        (0..self.layers.len())
            .filter(|&id| self.layers[id].kind == LayerKind::Marker && self.on_map(id))
            .collect()
    }

    pub fn attached_controls(&self, kind: ControlKind) -> usize {
        self.controls
            .iter()
            .filter(|(k, _, attached)| *k == kind && *attached)
            .count()
    }
}

impl MapBackend for RecordingBackend {
    type Map = ();
    type Layer = usize;
    type Control = usize;

    fn create_map(&mut self, config: &MapConfig) -> Result<(), BackendError> {
        if self.fail_create {
            return Err(BackendError::MissingContainer(config.map_element_id.clone()));
        }
        self.maps_created += 1;
        self.current = MapView {
            center: config.default_center,
            zoom: config.default_zoom,
        };
        Ok(())
    }

    fn add_tile_layer(&mut self, _map: &(), _config: &MapConfig) {
        self.tile_layers += 1;
    }

    fn view(&self, _map: &()) -> MapView {
        self.current
    }

    fn set_view(&mut self, _map: &(), view: MapView) {
        self.current = view;
        self.set_views.push(view);
    }

    fn size(&self, _map: &()) -> (f64, f64) {
        self.size
    }

    fn invalidate_size(&mut self, _map: &()) {
        self.invalidations += 1;
    }

    fn add_marker(&mut self, _map: &(), at: Coordinate, draggable: bool) -> usize {
        self.push(FakeLayer {
            kind: LayerKind::Marker,
            position: Some(at),
            popup: None,
            draggable,
            attached: true,
            parent: None,
        })
    }

    fn set_marker_position(&mut self, marker: &usize, at: Coordinate) {
        self.layers[*marker].position = Some(at);
    }

    fn bind_popup(&mut self, layer: &usize, html: &str) {
        self.layers[*layer].popup = Some(html.to_string());
    }

    fn watch_marker_drag(&mut self, marker: &usize) {
        self.drag_watched.push(*marker);
    }

    fn watch_map_clicks(&mut self, _map: &()) {
        self.click_watches += 1;
    }

    fn new_layer_group(&mut self, _map: &()) -> usize {
        self.draw(LayerKind::Group)
    }

    fn clear_layer_group(&mut self, group: &usize) {
        for layer in self.layers.iter_mut() {
            if layer.parent == Some(*group) {
                layer.attached = false;
            }
        }
    }

    fn set_layer_attached(&mut self, _map: &(), layer: &usize, attached: bool) {
        self.layers[*layer].attached = attached;
    }

    fn overlay_layers(&self, _map: &()) -> Vec<usize> {
        (0..self.layers.len())
            .filter(|&id| self.layers[id].kind != LayerKind::Group && self.on_map(id))
            .collect()
    }

    fn same_layer(&self, a: &usize, b: &usize) -> bool {
        a == b
    }

    fn add_scale_control(&mut self, _map: &()) -> usize {
        self.controls.push((ControlKind::Scale, String::new(), true));
        self.controls.len() - 1
    }

    fn add_legend_control(&mut self, _map: &(), html: &str) -> usize {
        self.controls
            .push((ControlKind::Legend, html.to_string(), true));
        self.controls.len() - 1
    }

    fn add_fullscreen_control(&mut self, _map: &()) -> usize {
        self.controls
            .push((ControlKind::Fullscreen, String::new(), true));
        self.controls.len() - 1
    }

    fn remove_control(&mut self, _map: &(), control: usize) {
        self.controls[control].2 = false;
    }
}

#[derive(Debug)]
pub struct RecordingHost {
    pub present_inputs: HashSet<String>,
    pub inputs: HashMap<String, String>,
    pub shown: Vec<String>,
    pub notifications: Vec<Notification>,
    pub armed: Vec<(TaskId, u32)>,
    pub disarmed: Vec<TaskId>,
    pub listeners: Vec<(&'static str, UiEvent)>,
    pub fullscreen: bool,
    pub fullscreen_requests: Vec<String>,
    pub fullscreen_exits: usize,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self {
            present_inputs: ["lat", "lon"].into_iter().map(String::from).collect(),
            inputs: HashMap::new(),
            shown: Vec::new(),
            notifications: Vec::new(),
            armed: Vec::new(),
            disarmed: Vec::new(),
            listeners: Vec::new(),
            fullscreen: false,
            fullscreen_requests: Vec::new(),
            fullscreen_exits: 0,
        }
    }
}

impl RecordingHost {
    pub fn last_armed(&self) -> Option<TaskId> {
        self.armed.last().map(|(id, _)| *id)
    }
}

impl HostPage for RecordingHost {
    fn set_input(&mut self, id: &str, value: &str) {
        if self.present_inputs.contains(id) {
            self.inputs.insert(id.to_string(), value.to_string());
        }
    }

    fn show_element(&mut self, id: &str) {
        self.shown.push(id.to_string());
    }

    fn notify(&mut self, notification: &Notification) {
        self.notifications.push(notification.clone());
    }

    fn arm_timer(&mut self, id: TaskId, delay_ms: u32) {
        self.armed.push((id, delay_ms));
    }

    fn disarm_timer(&mut self, id: TaskId) {
        self.disarmed.push(id);
    }

    fn listen(&mut self, name: &'static str, event: UiEvent) {
        self.listeners.push((name, event));
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn request_fullscreen(&mut self, id: &str) {
        self.fullscreen = true;
        self.fullscreen_requests.push(id.to_string());
    }

    fn exit_fullscreen(&mut self) {
        self.fullscreen = false;
        self.fullscreen_exits += 1;
    }
}
