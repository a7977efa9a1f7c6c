use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;

use puffin_shared::{FillOutcome, Point, PointerInput, Rgb, Tool, ToolCommand};

use crate::dom::{container_size, js_error_text, load_image, set_cursor};
use crate::export::save_image;
use crate::palette::mark_active_tool;
use crate::scene::DomScene;
use crate::state::State;

pub fn apply_command(state: &Rc<RefCell<State>>, command: ToolCommand) {
    match command {
        ToolCommand::Select(tool) => select_tool(&mut state.borrow_mut(), tool),
        ToolCommand::Undo => undo(state),
        ToolCommand::Save => save_image(&state.borrow()),
    }
}

pub fn select_tool(state: &mut State, tool: Tool) {
    let chrome = state.session.select_tool(tool);
    set_cursor(&state.canvas, chrome.cursor);
    mark_active_tool(&state.document, &state.config.tool_selector, tool, chrome);
}

pub fn select_color(state: &mut State, color: Rgb) {
    log::debug!("Color {color}");
    state.session.set_color(color);
}

/// Steps back one history entry. The snapshot decodes asynchronously, and
/// only the latest undo gets painted.
pub fn undo(state: &Rc<RefCell<State>>) {
    let Some(pending) = state.borrow_mut().session.undo() else {
        log::debug!("Nothing to undo");
        return;
    };
    let state = state.clone();
    spawn_local(async move {
        match load_image(&pending.snapshot).await {
            Ok(image) => {
                state
                    .borrow_mut()
                    .session
                    .finish_restore(pending.seq, &image);
            }
            Err(error) => log::error!("Could not decode undo snapshot: {}", js_error_text(&error)),
        }
    });
}

pub fn smart_fill(state: &mut State, screen: Point) {
    let mut scene = DomScene::new(state.document.clone(), state.svg_object.clone());
    if let FillOutcome::Failed(error) = state.session.smart_fill(&mut scene, screen) {
        log::debug!("Fill at {screen:?} failed: {error}");
    }
}

/// Matches the raster layer to the vector container's rendered size.
pub fn resize_surface(state: &mut State) {
    let (width, height) = container_size(&state.svg_object);
    if let Err(error) = state.session.resize(width, height) {
        log::error!("Could not reset history after resize: {error}");
    }
}

pub fn pointer(state: &mut State, input: PointerInput) {
    if let Err(error) = state.session.handle_pointer(input) {
        log::error!("Could not record stroke: {error}");
    }
}
