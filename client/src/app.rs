//! Browser entry point. Expects a page with a `board` canvas, a `status`
//! element, `tool-<name>` buttons for each tool, `size-small`/`size-medium`/
//! `size-large` presets, `undo`/`redo` buttons and `color`, `text-input` and
//! `font-size` inputs.

use std::cell::RefCell;
use std::rc::Rc;

use drawboard_shared::Tool;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlButtonElement, HtmlCanvasElement, HtmlInputElement, PointerEvent};

use crate::actions::{apply_remote, pointer_down, pointer_move, pointer_up};
use crate::canvas::CanvasSurface;
use crate::dom::{event_to_point, get_element, set_status, set_tool_button};
use crate::history::HistoryStack;
use crate::persistence::LocalStorageStore;
use crate::state::{EditorState, BRUSH_PRESETS};
use crate::ws::connect_relay;

type SharedSurface = Rc<RefCell<CanvasSurface>>;
type SharedHistory = Rc<RefCell<HistoryStack<LocalStorageStore>>>;
type SharedEditor = Rc<RefCell<EditorState>>;

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let canvas: HtmlCanvasElement = get_element(&document, "board")?;
    let status_el: Element = get_element(&document, "status")?;
    let color_input: HtmlInputElement = get_element(&document, "color")?;
    let text_input: HtmlInputElement = get_element(&document, "text-input")?;
    let font_size_input: HtmlInputElement = get_element(&document, "font-size")?;
    let undo_button: HtmlButtonElement = get_element(&document, "undo")?;
    let redo_button: HtmlButtonElement = get_element(&document, "redo")?;

    let surface: SharedSurface = {
        let mut surface = CanvasSurface::new(canvas.clone())?;
        surface.resize(&window);
        Rc::new(RefCell::new(surface))
    };

    let history: SharedHistory = {
        let mut history = match LocalStorageStore::open(&window) {
            Ok(store) => HistoryStack::new(store),
            Err(error) => {
                warn!("Persistence disabled: {error}");
                HistoryStack::detached()
            }
        };
        if history.restore_persisted(&mut *surface.borrow_mut()) {
            info!("Restored saved canvas");
        }
        Rc::new(RefCell::new(history))
    };

    sync_history_ui(&history.borrow(), &undo_button, &redo_button);

    {
        let surface = surface.clone();
        let window_cb = window.clone();
        let onresize = Closure::<dyn FnMut(Event)>::new(move |_| {
            surface.borrow_mut().resize(&window_cb);
        });
        window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
        onresize.forget();
    }

    let editor: SharedEditor = Rc::new(RefCell::new(EditorState::new()));
    text_input.set_disabled(true);

    let relay = connect_relay(&window)?;
    {
        let mut relay = relay.borrow_mut();
        let status_el = status_el.clone();
        set_status(&status_el, relay.state());
        relay.on_state_change(move |state| set_status(&status_el, state));

        let surface = surface.clone();
        let history = history.clone();
        relay.on_receive(move |op| {
            apply_remote(&mut *surface.borrow_mut(), &mut *history.borrow_mut(), op);
        });
    }

    let tool_buttons = Tool::ALL
        .iter()
        .map(|tool| {
            get_element::<HtmlButtonElement>(&document, &format!("tool-{}", tool.name()))
                .map(|button| (*tool, button))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let tool_buttons = Rc::new(tool_buttons);
    sync_tool_ui(&editor.borrow(), &tool_buttons, &text_input);

    for (tool, button) in tool_buttons.iter() {
        let tool = *tool;
        let editor = editor.clone();
        let tool_buttons_cb = tool_buttons.clone();
        let text_input = text_input.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut editor = editor.borrow_mut();
            editor.set_tool(tool);
            sync_tool_ui(&editor, &tool_buttons_cb, &text_input);
        });
        button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    for (id, width) in ["size-small", "size-medium", "size-large"]
        .into_iter()
        .zip(BRUSH_PRESETS)
    {
        let button: HtmlButtonElement = get_element(&document, id)?;
        let editor = editor.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            editor.borrow_mut().set_line_width(width);
        });
        button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let editor = editor.clone();
        let color_input_cb = color_input.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |_| {
            editor.borrow_mut().set_stroke_style(color_input_cb.value());
        });
        color_input.add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    {
        let editor = editor.clone();
        let text_input_cb = text_input.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |_| {
            editor.borrow_mut().set_pending_text(text_input_cb.value());
        });
        text_input.add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    {
        let editor = editor.clone();
        let font_size_input_cb = font_size_input.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |_| {
            if let Ok(size) = font_size_input_cb.value().trim().parse::<f64>() {
                editor.borrow_mut().set_font_size(size);
            }
        });
        font_size_input
            .add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    {
        let surface = surface.clone();
        let history = history.clone();
        let undo_button_cb = undo_button.clone();
        let redo_button_cb = redo_button.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut history = history.borrow_mut();
            history.undo(&mut *surface.borrow_mut());
            sync_history_ui(&history, &undo_button_cb, &redo_button_cb);
        });
        undo_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let surface = surface.clone();
        let history = history.clone();
        let undo_button_cb = undo_button.clone();
        let redo_button_cb = redo_button.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut history = history.borrow_mut();
            history.redo(&mut *surface.borrow_mut());
            sync_history_ui(&history, &undo_button_cb, &redo_button_cb);
        });
        redo_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let editor = editor.clone();
        let surface = surface.clone();
        let history = history.clone();
        let relay = relay.clone();
        let text_input = text_input.clone();
        let undo_button_cb = undo_button.clone();
        let redo_button_cb = redo_button.clone();
        let down_canvas = canvas.clone();
        let ondown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if !event.is_primary() || event.button() != 0 {
                return;
            }
            event.prevent_default();
            let mut editor = editor.borrow_mut();
            let mut history = history.borrow_mut();
            let op = pointer_down(
                &mut *editor,
                &mut *surface.borrow_mut(),
                &mut *history,
                event_to_point(&event),
            );
            sync_history_ui(&history, &undo_button_cb, &redo_button_cb);
            if editor.is_dragging() {
                let _ = down_canvas.set_pointer_capture(event.pointer_id());
            }
            if let Some(op) = op {
                text_input.set_value("");
                relay.borrow().send(&op);
            }
        });
        canvas.add_event_listener_with_callback("pointerdown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let editor = editor.clone();
        let surface = surface.clone();
        let onmove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if !event.is_primary() {
                return;
            }
            pointer_move(
                &mut *editor.borrow_mut(),
                &mut *surface.borrow_mut(),
                event_to_point(&event),
            );
        });
        canvas.add_event_listener_with_callback("pointermove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    {
        let editor = editor.clone();
        let surface = surface.clone();
        let history = history.clone();
        let relay = relay.clone();
        let stop_canvas = canvas.clone();
        let onstop = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if !event.is_primary() {
                return;
            }
            let _ = stop_canvas.release_pointer_capture(event.pointer_id());
            let op = pointer_up(
                &mut *editor.borrow_mut(),
                &mut *surface.borrow_mut(),
                &mut *history.borrow_mut(),
                event_to_point(&event),
            );
            if let Some(op) = op {
                relay.borrow().send(&op);
            }
        });
        canvas.add_event_listener_with_callback("pointerup", onstop.as_ref().unchecked_ref())?;
        canvas
            .add_event_listener_with_callback("pointercancel", onstop.as_ref().unchecked_ref())?;
        onstop.forget();
    }

    info!("Drawing board ready");
    Ok(())
}

fn sync_history_ui(
    history: &HistoryStack<LocalStorageStore>,
    undo_button: &HtmlButtonElement,
    redo_button: &HtmlButtonElement,
) {
    undo_button.set_disabled(!history.can_undo());
    redo_button.set_disabled(!history.can_redo());
}

fn sync_tool_ui(
    editor: &EditorState,
    tool_buttons: &[(Tool, HtmlButtonElement)],
    text_input: &HtmlInputElement,
) {
    for (tool, button) in tool_buttons {
        set_tool_button(button, *tool == editor.tool);
    }
    text_input.set_disabled(editor.tool != Tool::Text);
}
