mod backend;
mod bridge;
mod leaflet;
mod page;

use hydromap_shared::UiEvent;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    let Some(window) = web_sys::window() else {
        return;
    };
    bridge::install(&window);
    // Pages set `window.HydroMapConfig` before loading the module to override
    // defaults ahead of the DOM-ready start.
    let page_config =
        js_sys::Reflect::get(window.as_ref(), &JsValue::from_str(bridge::CONFIG_GLOBAL));
    if let Some(config) = page_config.ok().and_then(bridge::decode_config) {
        bridge::configure(config);
    }

    let Some(document) = window.document() else {
        return;
    };
    let ready_state = js_sys::Reflect::get(document.as_ref(), &JsValue::from_str("readyState"))
        .ok()
        .and_then(|state| state.as_string())
        .unwrap_or_default();
    if ready_state != "loading" {
        bridge::dispatch(UiEvent::DomReady);
        return;
    }
    let on_ready = Closure::once(|| bridge::dispatch(UiEvent::DomReady));
    if document
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())
        .is_ok()
    {
        on_ready.forget();
    }
}
