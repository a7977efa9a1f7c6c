use js_sys::Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Blob, BlobPropertyBag, Document, HtmlCanvasElement, HtmlImageElement, HtmlObjectElement, Url,
    XmlSerializer,
};

use puffin_shared::{ExportKind, Layer, SceneError};

use crate::dom::{context_2d, download, js_error_text, load_image};
use crate::state::State;

/// Downloads the picture. The vector document and the drawing are flattened
/// onto white when the document can be read; otherwise only the drawing is
/// saved.
pub fn save_image(state: &State) {
    let document = state.document.clone();
    let raster = state.canvas.clone();
    let markup = match serialize_vector(&state.svg_object) {
        Ok(markup) => markup,
        Err(error) => {
            log::warn!("Saving drawing only: {error}");
            download_raster(&document, &raster);
            return;
        }
    };
    spawn_local(async move {
        if let Err(error) = export_composited(&document, &raster, &markup).await {
            log::warn!(
                "Composited export failed, saving drawing only: {}",
                js_error_text(&error)
            );
            download_raster(&document, &raster);
        }
    });
}

fn serialize_vector(svg_object: &HtmlObjectElement) -> Result<String, SceneError> {
    let root = svg_object
        .content_document()
        .and_then(|document| document.document_element())
        .ok_or(SceneError::Inaccessible)?;
    let serializer =
        XmlSerializer::new().map_err(|error| SceneError::Backend(js_error_text(&error)))?;
    serializer
        .serialize_to_string(&root)
        .map_err(|error| SceneError::Backend(js_error_text(&error)))
}

async fn export_composited(
    document: &Document,
    raster: &HtmlCanvasElement,
    markup: &str,
) -> Result<(), JsValue> {
    let options = BlobPropertyBag::new();
    options.set_type("image/svg+xml;charset=utf-8");
    let blob = Blob::new_with_str_sequence_and_options(
        &Array::of1(&JsValue::from_str(markup)),
        &options,
    )?;
    let url = Url::create_object_url_with_blob(&blob)?;
    let loaded = load_image(&url).await;
    let _ = Url::revoke_object_url(&url);
    let vector = loaded?;

    let kind = ExportKind::for_document(true);
    let href = flatten(document, raster, &vector, kind.layers())?;
    download(document, &href, kind.file_name())
}

fn flatten(
    document: &Document,
    raster: &HtmlCanvasElement,
    vector: &HtmlImageElement,
    layers: &[Layer],
) -> Result<String, JsValue> {
    let (width, height) = (raster.width(), raster.height());
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx = context_2d(&canvas)?;
    for layer in layers {
        match layer {
            Layer::Background(color) => {
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_rect(0.0, 0.0, width as f64, height as f64);
            }
            Layer::Vector => ctx.draw_image_with_html_image_element_and_dw_and_dh(
                vector,
                0.0,
                0.0,
                width as f64,
                height as f64,
            )?,
            Layer::Raster => ctx.draw_image_with_html_canvas_element(raster, 0.0, 0.0)?,
        }
    }
    canvas.to_data_url_with_type("image/png")
}

fn download_raster(document: &Document, raster: &HtmlCanvasElement) {
    let kind = ExportKind::for_document(false);
    let result = raster
        .to_data_url_with_type("image/png")
        .and_then(|href| download(document, &href, kind.file_name()));
    if let Err(error) = result {
        log::error!("Could not save drawing: {}", js_error_text(&error));
    }
}
