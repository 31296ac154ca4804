use std::collections::BTreeMap;

use crate::backend::{BackendError, HostPage, MapBackend};
use crate::bounds::{Bounds, MapView};
use crate::config::MapConfig;
use crate::coordinate::Coordinate;
use crate::deferred::{DeferredQueue, DeferredTask, TaskId};
use crate::events::{FULLSCREEN_EVENTS, UiEvent};
use crate::legend::{LegendEntry, legend_markup};
use crate::notify::{Notification, NotifyLevel};

struct LayerGroup<L> {
    layer: L,
    visible: bool,
}

/// The live map plus everything the adapter placed on it.
struct MapSession<B: MapBackend> {
    map: B::Map,
    marker: Option<B::Layer>,
    groups: BTreeMap<String, LayerGroup<B::Layer>>,
    scale: Option<B::Control>,
    fullscreen: Option<B::Control>,
    legend: Option<B::Control>,
}

/// Owns one map session and wires it to the surrounding page.
///
/// Every operation is a no-op until [`MapAdapter::initialize`] has created the
/// map, except [`MapAdapter::open_and_center`] which initializes on demand.
pub struct MapAdapter<B: MapBackend, H: HostPage> {
    config: MapConfig,
    backend: B,
    host: H,
    session: Option<MapSession<B>>,
    deferred: DeferredQueue,
}

impl<B: MapBackend, H: HostPage> MapAdapter<B, H> {
    pub fn new(config: MapConfig, backend: B, host: H) -> Self {
        Self {
            config: config.sanitized(),
            backend,
            host,
            session: None,
            deferred: DeferredQueue::new(),
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Replace the configuration. Only takes effect before the map exists.
    pub fn configure(&mut self, config: MapConfig) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.config = config.sanitized();
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn pending_tasks(&self) -> &DeferredQueue {
        &self.deferred
    }

    /// Create the map, base tiles, and the draggable marker. Idempotent.
    pub fn initialize(&mut self) -> Result<(), BackendError> {
        if self.session.is_some() {
            return Ok(());
        }

        let map = self.backend.create_map(&self.config)?;
        self.backend.add_tile_layer(&map, &self.config);
        self.backend.watch_map_clicks(&map);

        let center = self.config.default_center;
        let marker = self.backend.add_marker(&map, center, true);
        self.backend
            .bind_popup(&marker, &center.popup_text(self.config.coordinate_precision));
        self.backend.watch_marker_drag(&marker);

        self.session = Some(MapSession {
            map,
            marker: Some(marker),
            groups: BTreeMap::new(),
            scale: None,
            fullscreen: None,
            legend: None,
        });
        Ok(())
    }

    /// Move (or create) the marker and recenter on it, zooming in to at least
    /// the configured marker zoom.
    pub fn update_marker(&mut self, at: Coordinate) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let marker = match &session.marker {
            Some(marker) => {
                self.backend.set_marker_position(marker, at);
                marker.clone()
            }
            None => {
                let marker = self.backend.add_marker(&session.map, at, true);
                self.backend.watch_marker_drag(&marker);
                session.marker = Some(marker.clone());
                marker
            }
        };
        self.backend
            .bind_popup(&marker, &at.popup_text(self.config.coordinate_precision));

        let zoom = self
            .backend
            .view(&session.map)
            .zoom
            .max(self.config.min_marker_zoom);
        self.backend
            .set_view(&session.map, MapView { center: at, zoom });
    }

    /// Validate, reveal the map container, place the marker, and recenter once
    /// the container has been laid out. Returns false if nothing was done.
    pub fn open_and_center(&mut self, lat: f64, lon: f64, zoom: Option<f64>) -> bool {
        let at = match Coordinate::new(lat, lon) {
            Ok(at) => at,
            Err(err) => {
                self.notify(NotifyLevel::Error, format!("Invalid coordinates: {err}"));
                return false;
            }
        };

        let wrapper = self.config.wrapper_element_id.clone();
        self.host.show_element(&wrapper);
        if let Err(err) = self.initialize() {
            self.notify(NotifyLevel::Error, format!("Map unavailable: {err}"));
            return false;
        }
        self.update_marker(at);

        let zoom = zoom
            .filter(|z| z.is_finite())
            .unwrap_or(self.config.center_zoom)
            .clamp(0.0, self.config.tile_max_zoom);
        // The container was hidden until now, so the map still thinks it is 0x0.
        self.schedule(
            DeferredTask::RefreshAndCenter {
                view: MapView { center: at, zoom },
            },
            self.config.settle_delay_ms,
        );
        true
    }

    /// Attach the scale control. Only the first call has an effect.
    pub fn add_controls(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.scale.is_none() {
            session.scale = Some(self.backend.add_scale_control(&session.map));
        }
    }

    /// Attach the fullscreen button and subscribe to every fullscreen change
    /// alias. Only the first call has an effect.
    pub fn add_fullscreen_toggle(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.fullscreen.is_some() {
            return;
        }
        session.fullscreen = Some(self.backend.add_fullscreen_control(&session.map));
        for (name, event) in FULLSCREEN_EVENTS {
            self.host.listen(*name, *event);
        }
    }

    /// Show a legend, replacing the one from a previous call.
    pub fn add_legend(&mut self, entries: &[LegendEntry]) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(old) = session.legend.take() {
            self.backend.remove_control(&session.map, old);
        }
        let html = legend_markup(entries);
        session.legend = Some(self.backend.add_legend_control(&session.map, &html));
    }

    pub fn remove_legend(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(old) = session.legend.take() {
            self.backend.remove_control(&session.map, old);
        }
    }

    /// Remove every point, line and area overlay except the primary marker.
    /// Named groups are emptied but stay registered.
    pub fn clear_overlays(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        for group in session.groups.values() {
            self.backend.clear_layer_group(&group.layer);
        }
        for layer in self.backend.overlay_layers(&session.map) {
            let is_marker = session
                .marker
                .as_ref()
                .is_some_and(|marker| self.backend.same_layer(marker, &layer));
            if !is_marker {
                self.backend
                    .set_layer_attached(&session.map, &layer, false);
            }
        }
    }

    pub fn fit_to_bounds(&mut self, coords: &[Coordinate]) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let Some(bounds) = Bounds::from_coordinates(coords) else {
            return;
        };
        let (width, height) = self.backend.size(&session.map);
        let view = bounds.fit_view(
            width,
            height,
            self.config.fit_padding_px,
            0.0,
            self.config.fit_max_zoom,
        );
        self.backend.set_view(&session.map, view);
    }

    pub fn view(&self) -> Option<MapView> {
        let session = self.session.as_ref()?;
        Some(self.backend.view(&session.map))
    }

    /// Look up a named group, creating and attaching it on first use.
    pub fn add_layer_group(&mut self, name: &str) -> Option<B::Layer> {
        let session = self.session.as_mut()?;
        if let Some(group) = session.groups.get(name) {
            return Some(group.layer.clone());
        }
        let layer = self.backend.new_layer_group(&session.map);
        session.groups.insert(
            name.to_string(),
            LayerGroup {
                layer: layer.clone(),
                visible: true,
            },
        );
        Some(layer)
    }

    pub fn set_layer_group_visible(&mut self, name: &str, visible: bool) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Some(group) = session.groups.get_mut(name) else {
            return false;
        };
        if group.visible != visible {
            self.backend
                .set_layer_attached(&session.map, &group.layer, visible);
            group.visible = visible;
        }
        true
    }

    pub fn layer_group_names(&self) -> Vec<String> {
        self.session
            .as_ref()
            .map(|s| s.groups.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn notify(&mut self, level: NotifyLevel, message: impl Into<String>) {
        let notification = Notification::new(level, message, self.config.notification_timeout_ms);
        self.host.notify(&notification);
    }

    pub fn handle_event(&mut self, event: UiEvent) -> Result<(), BackendError> {
        match event {
            UiEvent::DomReady => {
                if !self.config.auto_start {
                    return Ok(());
                }
                return self.initialize();
            }
            UiEvent::MarkerDragEnd(at) => {
                self.refresh_marker_popup(at);
                self.reflect_inputs(at);
            }
            UiEvent::MapClick(at) => {
                self.place_marker(at);
                self.reflect_inputs(at);
            }
            UiEvent::FullscreenToggle => {
                if self.session.is_none() {
                    return Ok(());
                }
                if self.host.is_fullscreen() {
                    self.host.exit_fullscreen();
                } else {
                    let id = self.config.map_element_id.clone();
                    self.host.request_fullscreen(&id);
                }
                self.schedule(DeferredTask::RefreshSize, self.config.fullscreen_resize_delay_ms);
            }
            UiEvent::FullscreenChanged => {
                if self.session.is_some() {
                    self.schedule(DeferredTask::RefreshSize, self.config.fullscreen_resize_delay_ms);
                }
            }
        }
        Ok(())
    }

    /// Run the task behind a fired timer. Cancelled ids are ignored.
    pub fn fire(&mut self, id: TaskId) {
        if let Some(task) = self.deferred.take(id) {
            self.run_task(task);
        }
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        let cancelled = self.deferred.cancel(id);
        if cancelled {
            self.host.disarm_timer(id);
        }
        cancelled
    }

    /// Run everything still pending without waiting for the timers.
    pub fn run_pending(&mut self) {
        for scheduled in self.deferred.drain() {
            self.host.disarm_timer(scheduled.id);
            self.run_task(scheduled.task);
        }
    }

    fn schedule(&mut self, task: DeferredTask, delay_ms: u32) -> TaskId {
        let (id, superseded) = self.deferred.schedule(task, delay_ms);
        if let Some(old) = superseded {
            self.host.disarm_timer(old);
        }
        self.host.arm_timer(id, delay_ms);
        id
    }

    fn run_task(&mut self, task: DeferredTask) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        self.backend.invalidate_size(&session.map);
        if let DeferredTask::RefreshAndCenter { view } = task {
            self.backend.set_view(&session.map, view);
        }
    }

    fn place_marker(&mut self, at: Coordinate) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if let Some(marker) = &session.marker {
            self.backend.set_marker_position(marker, at);
        }
        self.refresh_marker_popup(at);
    }

    fn refresh_marker_popup(&mut self, at: Coordinate) {
        let Some(marker) = self.session.as_ref().and_then(|s| s.marker.as_ref()) else {
            return;
        };
        self.backend
            .bind_popup(marker, &at.popup_text(self.config.coordinate_precision));
    }

    fn reflect_inputs(&mut self, at: Coordinate) {
        let (lat, lon) = at.format_parts(self.config.coordinate_precision);
        self.host.set_input(&self.config.lat_input_id, &lat);
        self.host.set_input(&self.config.lon_input_id, &lon);
    }
}
