use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Event, HtmlCanvasElement, HtmlObjectElement, MouseEvent, MouseEventInit, TouchEvent,
};

use puffin_shared::{History, Point, PointerInput, Session, TouchPhase};

use crate::actions::{apply_command, pointer, resize_surface, select_color, select_tool, smart_fill};
use crate::config::{log_level, WidgetConfig};
use crate::dom::{event_to_point, first_touch, get_element, js_error_text, query_all};
use crate::palette::{is_control_event, toolbar_action_from_event, ToolbarAction};
use crate::state::State;
use crate::surface::CanvasSurface;

fn document_ready_state(document: &web_sys::Document) -> Option<String> {
    Reflect::get(document.as_ref(), &JsValue::from_str("readyState"))
        .ok()?
        .as_string()
}

/// Re-dispatches a touch on the canvas as the matching mouse event, so both
/// input kinds go through the same handlers.
fn forward_touch(canvas: &HtmlCanvasElement, event: &TouchEvent, phase: TouchPhase) {
    event.prevent_default();
    let init = MouseEventInit::new();
    if phase != TouchPhase::End {
        let Some((client_x, client_y)) = first_touch(event) else {
            return;
        };
        init.set_client_x(client_x);
        init.set_client_y(client_y);
    }
    match MouseEvent::new_with_mouse_event_init_dict(phase.mouse_event_type(), &init) {
        Ok(mouse) => {
            let _ = canvas.dispatch_event(&mouse);
        }
        Err(error) => log::warn!("Could not forward {phase:?} touch: {}", js_error_text(&error)),
    }
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let _ = console_log::init_with_level(log_level(&window));
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let started = Rc::new(Cell::new(false));

    if document_ready_state(&document).as_deref() == Some("complete") {
        started.set(true);
        return start_app();
    }

    let onload_started = started.clone();
    let onload = Closure::<dyn FnMut(Event)>::new(move |_| {
        if onload_started.replace(true) {
            return;
        }
        if let Err(err) = start_app() {
            log::error!("Coloring widget failed to start: {}", js_error_text(&err));
        }
    });
    window.add_event_listener_with_callback("load", onload.as_ref().unchecked_ref())?;
    onload.forget();

    Ok(())
}

fn start_app() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let config = WidgetConfig::load(&document);
    let canvas: HtmlCanvasElement = get_element(&document, &config.canvas_id)?;
    let svg_object: HtmlObjectElement = get_element(&document, &config.svg_id)?;

    let surface = CanvasSurface::new(canvas.clone())?;
    let session = Session::with_history(
        surface,
        config.initial_tool,
        config.initial_color,
        History::with_limit(config.history_limit),
    )
    .map_err(|error| JsValue::from_str(&error.to_string()))?;

    let state = Rc::new(RefCell::new(State {
        document: document.clone(),
        canvas: canvas.clone(),
        svg_object: svg_object.clone(),
        session,
        config: config.clone(),
    }));

    {
        let mut state = state.borrow_mut();
        select_tool(&mut state, config.initial_tool);
        resize_surface(&mut state);
    }
    log::info!(
        "Coloring widget ready: tool={} color={}",
        config.initial_tool.id(),
        config.initial_color
    );

    {
        let resize_state = state.clone();
        let onresize = Closure::<dyn FnMut()>::new(move || {
            resize_surface(&mut resize_state.borrow_mut());
        });
        window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
        onresize.forget();
    }

    {
        let load_state = state.clone();
        let onload = Closure::<dyn FnMut(Event)>::new(move |_| {
            log::debug!("Vector document loaded");
            resize_surface(&mut load_state.borrow_mut());
        });
        svg_object.add_event_listener_with_callback("load", onload.as_ref().unchecked_ref())?;
        onload.forget();
    }

    {
        let down_state = state.clone();
        let down_canvas = canvas.clone();
        let ondown = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let Some(point) = event_to_point(&down_canvas, event.client_x(), event.client_y())
            else {
                return;
            };
            pointer(&mut down_state.borrow_mut(), PointerInput::Down(point));
        });
        canvas.add_event_listener_with_callback("mousedown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let move_state = state.clone();
        let move_canvas = canvas.clone();
        let onmove = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let Some(point) = event_to_point(&move_canvas, event.client_x(), event.client_y())
            else {
                return;
            };
            pointer(&mut move_state.borrow_mut(), PointerInput::Move(point));
        });
        canvas.add_event_listener_with_callback("mousemove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    {
        let up_state = state.clone();
        let onup = Closure::<dyn FnMut(MouseEvent)>::new(move |_| {
            pointer(&mut up_state.borrow_mut(), PointerInput::Up);
        });
        canvas.add_event_listener_with_callback("mouseup", onup.as_ref().unchecked_ref())?;
        onup.forget();
    }

    for (name, phase) in [
        ("touchstart", TouchPhase::Start),
        ("touchmove", TouchPhase::Move),
        ("touchend", TouchPhase::End),
    ] {
        let touch_canvas = canvas.clone();
        let ontouch = Closure::<dyn FnMut(TouchEvent)>::new(move |event: TouchEvent| {
            forward_touch(&touch_canvas, &event, phase);
        });
        canvas.add_event_listener_with_callback(name, ontouch.as_ref().unchecked_ref())?;
        ontouch.forget();
    }

    let controls = query_all(&document, &config.tool_selector)
        .into_iter()
        .chain(query_all(&document, &config.swatch_selector));
    for control in controls {
        let control_state = state.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            match toolbar_action_from_event(&event) {
                Some(ToolbarAction::Command(command)) => apply_command(&control_state, command),
                Some(ToolbarAction::Color(color)) => {
                    select_color(&mut control_state.borrow_mut(), color)
                }
                None => {}
            }
        });
        control.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let fill_state = state.clone();
        let onclick = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let mut state = fill_state.borrow_mut();
            if is_control_event(&event, &state.config) {
                return;
            }
            let screen = Point::new(event.client_x() as f64, event.client_y() as f64);
            smart_fill(&mut state, screen);
        });
        document.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    Ok(())
}
