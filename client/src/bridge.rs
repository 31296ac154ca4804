//! The single adapter instance and the `window.HydroMap` object host pages call.

use std::cell::RefCell;

use hydromap_shared::input;
use hydromap_shared::{
    Coordinate, CoordinateInput, LegendEntry, MapAdapter, MapConfig, NotifyLevel, NumberInput,
    TaskId, UiEvent, validate_coordinate,
};
use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

use crate::backend::LeafletBackend;
use crate::page::BrowserPage;

pub const NAMESPACE: &str = "HydroMap";
pub const CONFIG_GLOBAL: &str = "HydroMapConfig";

type BrowserAdapter = MapAdapter<LeafletBackend, BrowserPage>;

thread_local! {
    static ADAPTER: RefCell<Option<BrowserAdapter>> = const { RefCell::new(None) };
}

/// Run `f` against the adapter, creating it on first use. Calls that arrive
/// while the adapter is already borrowed (an event raised from inside another
/// adapter call) are dropped.
fn with_adapter<R>(f: impl FnOnce(&mut BrowserAdapter) -> R) -> Option<R> {
    ADAPTER.with(|slot| {
        let Ok(mut slot) = slot.try_borrow_mut() else {
            web_sys::console::warn_1(&"HydroMap: ignoring re-entrant call".into());
            return None;
        };
        let adapter = slot.get_or_insert_with(|| {
            MapAdapter::new(
                MapConfig::default(),
                LeafletBackend::default(),
                BrowserPage::default(),
            )
        });
        Some(f(adapter))
    })
}

pub fn dispatch(event: UiEvent) {
    let result = with_adapter(|adapter| adapter.handle_event(event));
    if let Some(Err(err)) = result {
        if event == UiEvent::DomReady {
            web_sys::console::log_1(&format!("HydroMap: map not created on load: {err}").into());
        } else {
            web_sys::console::warn_1(&format!("HydroMap: {err}").into());
        }
    }
}

pub fn fire(id: TaskId) {
    with_adapter(|adapter| {
        adapter.host_mut().release_timer(id);
        adapter.fire(id);
    });
}

/// Numbers, or numeric strings straight from an input field.
fn js_number(value: &JsValue) -> f64 {
    serde_wasm_bindgen::from_value::<NumberInput>(value.clone())
        .map(|n| n.value())
        .unwrap_or(f64::NAN)
}

/// Decode an optional config object; anything unusable falls back to defaults.
pub fn decode_config(config: JsValue) -> Option<MapConfig> {
    if config.is_undefined() || config.is_null() {
        return None;
    }
    match serde_wasm_bindgen::from_value::<MapConfig>(config) {
        Ok(config) => Some(config),
        Err(err) => {
            web_sys::console::warn_1(
                &format!("HydroMap: invalid config, using defaults: {err}").into(),
            );
            None
        }
    }
}

/// Apply page config before the map exists.
pub fn configure(config: MapConfig) {
    with_adapter(|adapter| adapter.configure(config));
}

fn initialize(config: JsValue) -> JsValue {
    let config = decode_config(config);
    let result = with_adapter(|adapter| {
        if let Some(config) = config
            && !adapter.configure(config)
        {
            web_sys::console::info_1(&"HydroMap: already initialized, config ignored".into());
        }
        adapter.initialize()
    });
    match result {
        Some(Ok(())) => JsValue::TRUE,
        Some(Err(err)) => {
            web_sys::console::warn_1(&format!("HydroMap: {err}").into());
            JsValue::FALSE
        }
        None => JsValue::FALSE,
    }
}

fn open_and_center(lat: JsValue, lon: JsValue, zoom: JsValue) -> JsValue {
    let zoom = (!zoom.is_undefined() && !zoom.is_null()).then(|| js_number(&zoom));
    let opened = with_adapter(|adapter| {
        adapter.open_and_center(js_number(&lat), js_number(&lon), zoom)
    });
    JsValue::from_bool(opened.unwrap_or(false))
}

fn update_marker(lat: JsValue, lon: JsValue) {
    match Coordinate::new(js_number(&lat), js_number(&lon)) {
        Ok(at) => {
            with_adapter(|adapter| adapter.update_marker(at));
        }
        Err(err) => {
            web_sys::console::warn_1(&format!("HydroMap.updateMarker: {err}").into());
        }
    }
}

fn fit_to_bounds(coords: JsValue) {
    if !Array::is_array(&coords) {
        return;
    }
    let coords = input::valid_coordinates(
        coords
            .unchecked_into::<Array>()
            .iter()
            .filter_map(|item| serde_wasm_bindgen::from_value::<CoordinateInput>(item).ok()),
    );
    with_adapter(|adapter| adapter.fit_to_bounds(&coords));
}

fn add_legend(entries: JsValue) {
    match serde_wasm_bindgen::from_value::<Vec<LegendEntry>>(entries) {
        Ok(entries) => {
            with_adapter(|adapter| adapter.add_legend(&entries));
        }
        Err(err) => {
            web_sys::console::warn_1(&format!("HydroMap.addLegend: {err}").into());
        }
    }
}

fn add_layer_group(name: JsValue) -> JsValue {
    let Some(name) = name.as_string() else {
        return JsValue::NULL;
    };
    with_adapter(|adapter| adapter.add_layer_group(&name))
        .flatten()
        .map(JsValue::from)
        .unwrap_or(JsValue::NULL)
}

fn get_view() -> JsValue {
    with_adapter(|adapter| adapter.view())
        .flatten()
        .and_then(|view| serde_wasm_bindgen::to_value(&view).ok())
        .unwrap_or(JsValue::NULL)
}

fn set_fn(ns: &Object, name: &str, func: JsValue) {
    if let Err(err) = Reflect::set(ns, &JsValue::from_str(name), &func) {
        web_sys::console::warn_1(&format!("HydroMap: could not export {name}: {err:?}").into());
    }
}

/// Publish `window.HydroMap`.
pub fn install(window: &web_sys::Window) {
    let ns = Object::new();

    set_fn(
        &ns,
        "initialize",
        Closure::<dyn Fn(JsValue) -> JsValue>::new(initialize).into_js_value(),
    );
    set_fn(
        &ns,
        "openAndCenter",
        Closure::<dyn Fn(JsValue, JsValue, JsValue) -> JsValue>::new(open_and_center)
            .into_js_value(),
    );
    set_fn(
        &ns,
        "updateMarker",
        Closure::<dyn Fn(JsValue, JsValue)>::new(update_marker).into_js_value(),
    );
    set_fn(
        &ns,
        "validateCoordinate",
        Closure::<dyn Fn(JsValue, JsValue) -> bool>::new(|lat: JsValue, lon: JsValue| {
            validate_coordinate(js_number(&lat), js_number(&lon))
        })
        .into_js_value(),
    );
    set_fn(
        &ns,
        "addControls",
        Closure::<dyn Fn()>::new(|| {
            with_adapter(|adapter| adapter.add_controls());
        })
        .into_js_value(),
    );
    set_fn(
        &ns,
        "addFullscreenToggle",
        Closure::<dyn Fn()>::new(|| {
            with_adapter(|adapter| adapter.add_fullscreen_toggle());
        })
        .into_js_value(),
    );
    set_fn(
        &ns,
        "addLayerGroup",
        Closure::<dyn Fn(JsValue) -> JsValue>::new(add_layer_group).into_js_value(),
    );
    set_fn(
        &ns,
        "setLayerGroupVisible",
        Closure::<dyn Fn(JsValue, JsValue) -> bool>::new(|name: JsValue, visible: JsValue| {
            let Some(name) = name.as_string() else {
                return false;
            };
            with_adapter(|adapter| adapter.set_layer_group_visible(&name, visible.is_truthy()))
                .unwrap_or(false)
        })
        .into_js_value(),
    );
    set_fn(
        &ns,
        "layerGroupNames",
        Closure::<dyn Fn() -> JsValue>::new(|| {
            let names = with_adapter(|adapter| adapter.layer_group_names()).unwrap_or_default();
            names
                .into_iter()
                .map(JsValue::from)
                .collect::<Array>()
                .into()
        })
        .into_js_value(),
    );
    set_fn(
        &ns,
        "clearOverlays",
        Closure::<dyn Fn()>::new(|| {
            with_adapter(|adapter| adapter.clear_overlays());
        })
        .into_js_value(),
    );
    set_fn(
        &ns,
        "fitToBounds",
        Closure::<dyn Fn(JsValue)>::new(fit_to_bounds).into_js_value(),
    );
    set_fn(
        &ns,
        "addLegend",
        Closure::<dyn Fn(JsValue)>::new(add_legend).into_js_value(),
    );
    set_fn(
        &ns,
        "removeLegend",
        Closure::<dyn Fn()>::new(|| {
            with_adapter(|adapter| adapter.remove_legend());
        })
        .into_js_value(),
    );
    set_fn(
        &ns,
        "getView",
        Closure::<dyn Fn() -> JsValue>::new(get_view).into_js_value(),
    );
    set_fn(
        &ns,
        "notify",
        Closure::<dyn Fn(JsValue, JsValue)>::new(|level: JsValue, message: JsValue| {
            let level = NotifyLevel::parse(&level.as_string().unwrap_or_default());
            let message = message.as_string().unwrap_or_default();
            with_adapter(|adapter| adapter.notify(level, message));
        })
        .into_js_value(),
    );

    if let Err(err) = Reflect::set(window.as_ref(), &JsValue::from_str(NAMESPACE), &ns) {
        web_sys::console::warn_1(&format!("HydroMap: could not install namespace: {err:?}").into());
    }
}
