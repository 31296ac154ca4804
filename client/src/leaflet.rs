//! Bindings for the subset of Leaflet's global `L` namespace the adapter uses.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = L, js_name = Map, extends = js_sys::Object)]
    #[derive(Debug, Clone)]
    pub type LeafletMap;

    #[wasm_bindgen(js_namespace = L, js_name = map, catch)]
    pub fn create_map(id: &str, options: &JsValue) -> Result<LeafletMap, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    pub fn set_view(this: &LeafletMap, center: &LatLng, zoom: f64);

    #[wasm_bindgen(method, js_name = getCenter)]
    pub fn get_center(this: &LeafletMap) -> LatLng;

    #[wasm_bindgen(method, js_name = getZoom)]
    pub fn get_zoom(this: &LeafletMap) -> f64;

    #[wasm_bindgen(method, js_name = getSize)]
    pub fn get_size(this: &LeafletMap) -> Point;

    #[wasm_bindgen(method, js_name = invalidateSize)]
    pub fn invalidate_size(this: &LeafletMap);

    #[wasm_bindgen(method, js_name = eachLayer)]
    pub fn each_layer(this: &LeafletMap, callback: &js_sys::Function);

    #[wasm_bindgen(method, js_name = addLayer)]
    pub fn add_layer(this: &LeafletMap, layer: &Layer);

    #[wasm_bindgen(method, js_name = removeLayer)]
    pub fn remove_layer(this: &LeafletMap, layer: &Layer);

    #[wasm_bindgen(method)]
    pub fn on(this: &LeafletMap, event: &str, callback: &js_sys::Function);

    #[wasm_bindgen(js_namespace = L, js_name = LatLng)]
    #[derive(Debug, Clone)]
    pub type LatLng;

    #[wasm_bindgen(js_namespace = L, js_name = latLng)]
    pub fn lat_lng(lat: f64, lng: f64) -> LatLng;

    #[wasm_bindgen(method, getter)]
    pub fn lat(this: &LatLng) -> f64;

    #[wasm_bindgen(method, getter)]
    pub fn lng(this: &LatLng) -> f64;

    #[wasm_bindgen(js_namespace = L, js_name = Point)]
    pub type Point;

    #[wasm_bindgen(method, getter)]
    pub fn x(this: &Point) -> f64;

    #[wasm_bindgen(method, getter)]
    pub fn y(this: &Point) -> f64;

    #[wasm_bindgen(js_namespace = L, js_name = Layer, extends = js_sys::Object)]
    #[derive(Debug, Clone)]
    pub type Layer;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &Layer, map: &LeafletMap);

    #[wasm_bindgen(method, js_name = bindPopup)]
    pub fn bind_popup(this: &Layer, html: &str);

    #[wasm_bindgen(method, js_name = setPopupContent)]
    pub fn set_popup_content(this: &Layer, html: &str);

    #[wasm_bindgen(method, js_name = getPopup)]
    pub fn get_popup(this: &Layer) -> JsValue;

    #[wasm_bindgen(method, js_name = setLatLng)]
    pub fn set_lat_lng(this: &Layer, at: &LatLng);

    #[wasm_bindgen(method, js_name = getLatLng)]
    pub fn get_lat_lng(this: &Layer) -> LatLng;

    #[wasm_bindgen(method, js_name = clearLayers)]
    pub fn clear_layers(this: &Layer);

    #[wasm_bindgen(method)]
    pub fn on(this: &Layer, event: &str, callback: &js_sys::Function);

    /// Only used for `instanceof` checks.
    #[wasm_bindgen(js_namespace = L, js_name = Marker, extends = Layer)]
    pub type MarkerLayer;

    /// Base class of polylines, polygons, circles and circle markers.
    #[wasm_bindgen(js_namespace = L, js_name = Path, extends = Layer)]
    pub type PathLayer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    pub fn tile_layer(url: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    pub fn marker(at: &LatLng, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = layerGroup)]
    pub fn layer_group() -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = Control)]
    pub type Control;

    #[wasm_bindgen(js_namespace = L, js_name = control)]
    pub fn control(options: &JsValue) -> Control;

    #[wasm_bindgen(js_namespace = ["L", "control"], js_name = scale)]
    pub fn scale_control(options: &JsValue) -> Control;

    #[wasm_bindgen(method, setter = onAdd)]
    pub fn set_on_add(this: &Control, callback: &js_sys::Function);

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &Control, map: &LeafletMap);

    #[wasm_bindgen(method)]
    pub fn remove(this: &Control);

    #[wasm_bindgen(js_namespace = ["L", "DomEvent"], js_name = disableClickPropagation)]
    pub fn disable_click_propagation(element: &web_sys::HtmlElement);

    #[wasm_bindgen(js_namespace = ["L", "DomEvent"], js_name = disableScrollPropagation)]
    pub fn disable_scroll_propagation(element: &web_sys::HtmlElement);
}

/// True once the Leaflet script has defined `window.L`.
pub fn is_loaded() -> bool {
    js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("L"))
        .map(|value| !value.is_undefined() && !value.is_null())
        .unwrap_or(false)
}
