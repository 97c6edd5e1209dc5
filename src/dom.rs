use crate::constants::{CANVAS_CLASS, CANVAS_STYLE, CONTROL_Z_INDEX, MIN_CANVAS_PX};
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Read a CSS custom property from the document root, e.g. `--text-normal`.
pub fn theme_property(name: &str) -> Option<String> {
    let window = web::window()?;
    let root = window.document()?.document_element()?;
    let style = window.get_computed_style(&root).ok()??;
    style.get_property_value(name).ok()
}

/// Size the backing store to the element's layout box once.
pub fn size_canvas_to_layout(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(MIN_CANVAS_PX));
        canvas.set_height(h_px.max(MIN_CANVAS_PX));
    }
}

/// Create the overlay canvas inside `host` and lift the host's own controls
/// above it.
pub fn attach_canvas(host: &web::Element) -> anyhow::Result<web::HtmlCanvasElement> {
    let document = window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    canvas.set_class_name(CANVAS_CLASS);
    let style = canvas.style();
    for (prop, value) in CANVAS_STYLE {
        _ = style.set_property(prop, value);
    }

    let children = host.children();
    for i in 0..children.length() {
        if let Some(child) = children
            .item(i)
            .and_then(|c| c.dyn_into::<web::HtmlElement>().ok())
        {
            _ = child.style().set_property("z-index", CONTROL_Z_INDEX);
        }
    }

    host.append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    size_canvas_to_layout(&canvas);
    Ok(canvas)
}
