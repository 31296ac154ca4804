use std::collections::HashMap;

use gloo_timers::callback::Timeout;
use hydromap_shared::events::{
    EXIT_FULLSCREEN_METHODS, FULLSCREEN_ELEMENT_PROPS, REQUEST_FULLSCREEN_METHODS,
};
use hydromap_shared::{HostPage, Notification, TaskId, UiEvent};
use js_sys::{Function, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

use crate::bridge;

const TOAST_CONTAINER_ID: &str = "hydromap-toasts";

struct DocumentListener {
    document: web_sys::Document,
    name: &'static str,
    handler: Closure<dyn Fn()>,
}

impl Drop for DocumentListener {
    fn drop(&mut self) {
        let _ = self
            .document
            .remove_event_listener_with_callback(self.name, self.handler.as_ref().unchecked_ref());
    }
}

/// [`HostPage`] over the real DOM.
#[derive(Default)]
pub struct BrowserPage {
    timers: HashMap<TaskId, Timeout>,
    listeners: Vec<DocumentListener>,
}

fn document() -> Option<web_sys::Document> {
    web_sys::window()?.document()
}

/// Call the first of `methods` that `target` implements.
fn call_first(target: &JsValue, methods: &[&str]) -> bool {
    for method in methods {
        if let Ok(func) = Reflect::get(target, &JsValue::from_str(method))
            && let Ok(func) = func.dyn_into::<Function>()
        {
            if let Err(err) = func.call0(target) {
                web_sys::console::warn_1(&format!("{method} failed: {err:?}").into());
            }
            return true;
        }
    }
    false
}

impl BrowserPage {
    /// Drop bookkeeping for a timer that has just fired. The handle is
    /// forgotten rather than dropped because its callback is still running.
    pub fn release_timer(&mut self, id: TaskId) {
        if let Some(timeout) = self.timers.remove(&id) {
            timeout.forget();
        }
    }

    fn toast_container(doc: &web_sys::Document) -> Option<web_sys::HtmlElement> {
        if let Some(existing) = doc.get_element_by_id(TOAST_CONTAINER_ID) {
            return existing.dyn_into::<web_sys::HtmlElement>().ok();
        }
        let container = doc
            .create_element("div")
            .ok()?
            .dyn_into::<web_sys::HtmlElement>()
            .ok()?;
        container.set_id(TOAST_CONTAINER_ID);
        let style = container.style();
        let _ = style.set_property("position", "fixed");
        let _ = style.set_property("top", "16px");
        let _ = style.set_property("right", "16px");
        let _ = style.set_property("z-index", "10000");
        let _ = style.set_property("display", "flex");
        let _ = style.set_property("flex-direction", "column");
        let _ = style.set_property("gap", "8px");
        doc.body()?.append_child(&container).ok()?;
        Some(container)
    }
}

impl HostPage for BrowserPage {
    fn set_input(&mut self, id: &str, value: &str) {
        let Some(doc) = document() else {
            return;
        };
        let Some(input) = doc
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        input.set_value(value);
    }

    fn show_element(&mut self, id: &str) {
        let Some(el) = document()
            .and_then(|doc| doc.get_element_by_id(id))
            .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            return;
        };
        el.set_hidden(false);
        let _ = el.class_list().remove_1("hidden");
        let _ = el.style().set_property("display", "block");
    }

    fn notify(&mut self, notification: &Notification) {
        let Some(doc) = document() else {
            return;
        };
        let Some(container) = Self::toast_container(&doc) else {
            return;
        };
        let Some(toast) = doc
            .create_element("div")
            .ok()
            .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            return;
        };
        toast.set_class_name(&format!("hydromap-toast {}", notification.level.css_class()));
        let _ = toast.set_attribute("role", "status");
        toast.set_text_content(Some(&notification.message));
        let style = toast.style();
        let _ = style.set_property("background", notification.level.background());
        let _ = style.set_property("color", "#fff");
        let _ = style.set_property("padding", "10px 14px");
        let _ = style.set_property("border-radius", "6px");
        let _ = style.set_property("box-shadow", "0 2px 8px rgba(0, 0, 0, 0.25)");
        let _ = style.set_property("font", "14px/1.4 sans-serif");
        if container.append_child(&toast).is_err() {
            return;
        }
        Timeout::new(notification.timeout_ms, move || {
            toast.remove();
        })
        .forget();
    }

    fn arm_timer(&mut self, id: TaskId, delay_ms: u32) {
        let timeout = Timeout::new(delay_ms, move || bridge::fire(id));
        if let Some(old) = self.timers.insert(id, timeout) {
            old.cancel();
        }
    }

    fn disarm_timer(&mut self, id: TaskId) {
        if let Some(timeout) = self.timers.remove(&id) {
            timeout.cancel();
        }
    }

    fn listen(&mut self, name: &'static str, event: UiEvent) {
        let Some(doc) = document() else {
            return;
        };
        let handler = Closure::<dyn Fn()>::new(move || bridge::dispatch(event));
        if doc
            .add_event_listener_with_callback(name, handler.as_ref().unchecked_ref())
            .is_err()
        {
            web_sys::console::warn_1(&format!("Could not listen for {name}").into());
            return;
        }
        self.listeners.push(DocumentListener {
            document: doc,
            name,
            handler,
        });
    }

    fn is_fullscreen(&self) -> bool {
        let Some(doc) = document() else {
            return false;
        };
        FULLSCREEN_ELEMENT_PROPS.iter().any(|prop| {
            Reflect::get(doc.as_ref(), &JsValue::from_str(prop))
                .map(|el| !el.is_null() && !el.is_undefined())
                .unwrap_or(false)
        })
    }

    fn request_fullscreen(&mut self, id: &str) {
        let Some(el) = document().and_then(|doc| doc.get_element_by_id(id)) else {
            return;
        };
        if !call_first(el.as_ref(), REQUEST_FULLSCREEN_METHODS) {
            web_sys::console::warn_1(&"Fullscreen is not supported by this browser".into());
        }
    }

    fn exit_fullscreen(&mut self) {
        let Some(doc) = document() else {
            return;
        };
        call_first(doc.as_ref(), EXIT_FULLSCREEN_METHODS);
    }
}
