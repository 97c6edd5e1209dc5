use glam::Vec2;
use scope_core::Surface;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Canvas 2-D surface with colors resolved at construction.
pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    width: f32,
    height: f32,
    spectrum_color: String,
    scope_color: String,
}

impl CanvasSurface {
    pub fn new(
        canvas: web::HtmlCanvasElement,
        spectrum_color: String,
        scope_color: String,
    ) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow::anyhow!("{:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let width = canvas.width() as f32;
        let height = canvas.height() as f32;
        Ok(Self {
            canvas,
            ctx,
            width,
            height,
            spectrum_color,
            scope_color,
        })
    }

    /// Detach the canvas from the host element.
    pub fn remove(&self) {
        self.canvas.remove();
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, f64::from(self.width), f64::from(self.height));
    }

    fn fill_bar(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.set_fill_style_str(&self.spectrum_color);
        self.ctx
            .fill_rect(f64::from(x), f64::from(y), f64::from(w), f64::from(h));
    }

    fn stroke_polyline(&mut self, points: &[Vec2]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.set_stroke_style_str(&self.scope_color);
        self.ctx.begin_path();
        self.ctx.move_to(f64::from(first.x), f64::from(first.y));
        for p in rest {
            self.ctx.line_to(f64::from(p.x), f64::from(p.y));
        }
        self.ctx.stroke();
    }
}
