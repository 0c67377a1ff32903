use drawboard_shared::Point;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, PointerEvent};

use crate::relay::ConnectionState;

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

pub fn set_tool_button(button: &HtmlButtonElement, active: bool) {
    let pressed = if active { "true" } else { "false" };
    let _ = button.set_attribute("aria-pressed", pressed);
}

pub fn set_status(status_el: &Element, state: ConnectionState) {
    let text = match state {
        ConnectionState::Connecting => "Connecting...",
        ConnectionState::Open => "Connected",
        ConnectionState::Closed => "Disconnected",
    };
    let _ = status_el.set_attribute("data-state", state.label());
    status_el.set_text_content(Some(text));
}

pub fn event_to_point(event: &PointerEvent) -> Point {
    Point::new(event.offset_x() as f64, event.offset_y() as f64)
}
