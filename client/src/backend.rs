use std::cell::RefCell;
use std::rc::Rc;

use hydromap_shared::{BackendError, Coordinate, MapBackend, MapConfig, MapView, UiEvent};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

use crate::bridge;
use crate::leaflet::{self, Layer, LeafletMap, MarkerLayer, PathLayer};

const FULLSCREEN_BUTTON_GLYPH: &str = "\u{26F6}";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapOptions {
    center: [f64; 2],
    zoom: f64,
    max_zoom: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TileOptions<'a> {
    max_zoom: f64,
    attribution: &'a str,
}

#[derive(Serialize)]
struct MarkerOptions {
    draggable: bool,
}

#[derive(Serialize)]
struct ControlOptions {
    position: &'static str,
}

#[derive(Serialize)]
struct ScaleOptions {
    metric: bool,
    imperial: bool,
}

/// A Leaflet control plus the JS callbacks it needs while attached.
pub struct LeafletControl {
    control: leaflet::Control,
    _on_add: Option<Closure<dyn Fn(JsValue) -> JsValue>>,
    _on_click: Option<Closure<dyn Fn(web_sys::MouseEvent)>>,
}

/// [`MapBackend`] over Leaflet. Event callbacks registered with Leaflet are
/// kept here so they live as long as the map does.
#[derive(Default)]
pub struct LeafletBackend {
    handlers: Vec<Closure<dyn Fn(JsValue)>>,
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::UNDEFINED)
}

fn coordinate_of(latlng: &leaflet::LatLng) -> Coordinate {
    Coordinate::from_map(latlng.lat(), latlng.lng())
}

fn document() -> Option<web_sys::Document> {
    web_sys::window()?.document()
}

impl LeafletBackend {
    fn custom_control(
        &mut self,
        map: &LeafletMap,
        position: &'static str,
        build: impl Fn() -> Option<web_sys::HtmlElement> + 'static,
    ) -> LeafletControl {
        let control = leaflet::control(&to_js(&ControlOptions { position }));
        let on_add = Closure::<dyn Fn(JsValue) -> JsValue>::new(move |_map: JsValue| {
            build().map(JsValue::from).unwrap_or(JsValue::NULL)
        });
        control.set_on_add(on_add.as_ref().unchecked_ref());
        control.add_to(map);
        LeafletControl {
            control,
            _on_add: Some(on_add),
            _on_click: None,
        }
    }
}

impl MapBackend for LeafletBackend {
    type Map = LeafletMap;
    type Layer = Layer;
    type Control = LeafletControl;

    fn create_map(&mut self, config: &MapConfig) -> Result<LeafletMap, BackendError> {
        if !leaflet::is_loaded() {
            return Err(BackendError::LibraryUnavailable);
        }
        let exists = document()
            .and_then(|doc| doc.get_element_by_id(&config.map_element_id))
            .is_some();
        if !exists {
            return Err(BackendError::MissingContainer(config.map_element_id.clone()));
        }

        let options = MapOptions {
            center: [config.default_center.lat, config.default_center.lon],
            zoom: config.default_zoom,
            max_zoom: config.tile_max_zoom,
        };
        leaflet::create_map(&config.map_element_id, &to_js(&options))
            .map_err(|err| BackendError::Js(format!("{err:?}")))
    }

    fn add_tile_layer(&mut self, map: &LeafletMap, config: &MapConfig) {
        let options = TileOptions {
            max_zoom: config.tile_max_zoom,
            attribution: &config.tile_attribution,
        };
        leaflet::tile_layer(&config.tile_url, &to_js(&options)).add_to(map);
    }

    fn view(&self, map: &LeafletMap) -> MapView {
        MapView {
            center: coordinate_of(&map.get_center()),
            zoom: map.get_zoom(),
        }
    }

    fn set_view(&mut self, map: &LeafletMap, view: MapView) {
        map.set_view(
            &leaflet::lat_lng(view.center.lat, view.center.lon),
            view.zoom,
        );
    }

    fn size(&self, map: &LeafletMap) -> (f64, f64) {
        let size = map.get_size();
        (size.x(), size.y())
    }

    fn invalidate_size(&mut self, map: &LeafletMap) {
        map.invalidate_size();
    }

    fn add_marker(&mut self, map: &LeafletMap, at: Coordinate, draggable: bool) -> Layer {
        let marker = leaflet::marker(
            &leaflet::lat_lng(at.lat, at.lon),
            &to_js(&MarkerOptions { draggable }),
        );
        marker.add_to(map);
        marker
    }

    fn set_marker_position(&mut self, marker: &Layer, at: Coordinate) {
        marker.set_lat_lng(&leaflet::lat_lng(at.lat, at.lon));
    }

    fn bind_popup(&mut self, layer: &Layer, html: &str) {
        if layer.get_popup().is_undefined() {
            layer.bind_popup(html);
        } else {
            layer.set_popup_content(html);
        }
    }

    fn watch_marker_drag(&mut self, marker: &Layer) {
        let target = marker.clone();
        let handler = Closure::<dyn Fn(JsValue)>::new(move |_event: JsValue| {
            let at = coordinate_of(&target.get_lat_lng());
            bridge::dispatch(UiEvent::MarkerDragEnd(at));
        });
        marker.on("dragend", handler.as_ref().unchecked_ref());
        self.handlers.push(handler);
    }

    fn watch_map_clicks(&mut self, map: &LeafletMap) {
        let handler = Closure::<dyn Fn(JsValue)>::new(move |event: JsValue| {
            let Ok(latlng) = js_sys::Reflect::get(&event, &JsValue::from_str("latlng")) else {
                return;
            };
            if latlng.is_undefined() {
                return;
            }
            let at = coordinate_of(latlng.unchecked_ref());
            bridge::dispatch(UiEvent::MapClick(at));
        });
        map.on("click", handler.as_ref().unchecked_ref());
        self.handlers.push(handler);
    }

    fn new_layer_group(&mut self, map: &LeafletMap) -> Layer {
        let group = leaflet::layer_group();
        group.add_to(map);
        group
    }

    fn clear_layer_group(&mut self, group: &Layer) {
        group.clear_layers();
    }

    fn set_layer_attached(&mut self, map: &LeafletMap, layer: &Layer, attached: bool) {
        if attached {
            map.add_layer(layer);
        } else {
            map.remove_layer(layer);
        }
    }

    fn overlay_layers(&self, map: &LeafletMap) -> Vec<Layer> {
        let found = Rc::new(RefCell::new(Vec::new()));
        let collect = {
            let found = Rc::clone(&found);
            Closure::<dyn FnMut(JsValue)>::new(move |layer: JsValue| {
                if layer.is_instance_of::<MarkerLayer>() || layer.is_instance_of::<PathLayer>() {
                    found.borrow_mut().push(layer.unchecked_into::<Layer>());
                }
            })
        };
        map.each_layer(collect.as_ref().unchecked_ref());
        drop(collect);
        found.take()
    }

    fn same_layer(&self, a: &Layer, b: &Layer) -> bool {
        js_sys::Object::is(a, b)
    }

    fn add_scale_control(&mut self, map: &LeafletMap) -> LeafletControl {
        let control = leaflet::scale_control(&to_js(&ScaleOptions {
            metric: true,
            imperial: false,
        }));
        control.add_to(map);
        LeafletControl {
            control,
            _on_add: None,
            _on_click: None,
        }
    }

    fn add_legend_control(&mut self, map: &LeafletMap, html: &str) -> LeafletControl {
        let html = html.to_string();
        self.custom_control(map, "bottomright", move || {
            let div = document()?
                .create_element("div")
                .ok()?
                .dyn_into::<web_sys::HtmlElement>()
                .ok()?;
            div.set_class_name("info legend leaflet-control");
            div.set_inner_html(&html);
            let style = div.style();
            let _ = style.set_property("background", "rgba(255, 255, 255, 0.9)");
            let _ = style.set_property("padding", "6px 8px");
            let _ = style.set_property("border-radius", "4px");
            let _ = style.set_property("line-height", "18px");
            // Clicks and wheel scrolls on the legend must not reach the map.
            leaflet::disable_click_propagation(&div);
            leaflet::disable_scroll_propagation(&div);
            Some(div)
        })
    }

    fn add_fullscreen_control(&mut self, map: &LeafletMap) -> LeafletControl {
        let on_click = Closure::<dyn Fn(web_sys::MouseEvent)>::new(|e: web_sys::MouseEvent| {
            e.prevent_default();
            e.stop_propagation();
            bridge::dispatch(UiEvent::FullscreenToggle);
        });
        let click_fn: js_sys::Function = on_click.as_ref().unchecked_ref::<js_sys::Function>().clone();

        let mut control = self.custom_control(map, "topleft", move || {
            let doc = document()?;
            let bar = doc
                .create_element("div")
                .ok()?
                .dyn_into::<web_sys::HtmlElement>()
                .ok()?;
            bar.set_class_name("leaflet-bar leaflet-control hydromap-fullscreen");
            let button = doc
                .create_element("a")
                .ok()?
                .dyn_into::<web_sys::HtmlElement>()
                .ok()?;
            let _ = button.set_attribute("href", "#");
            let _ = button.set_attribute("role", "button");
            button.set_title("Toggle fullscreen");
            button.set_text_content(Some(FULLSCREEN_BUTTON_GLYPH));
            let _ = button.add_event_listener_with_callback("click", &click_fn);
            let _ = bar.append_child(&button);
            leaflet::disable_click_propagation(&bar);
            Some(bar)
        });
        control._on_click = Some(on_click);
        control
    }

    fn remove_control(&mut self, _map: &LeafletMap, control: LeafletControl) {
        control.control.remove();
    }
}
