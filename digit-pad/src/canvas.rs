use recognizer::{CanvasSurface, DrawingSurface, PadConfig, Point, RecognizerError};
use std::f64::consts::TAU;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// The page's drawing canvas as a `DrawingSurface`
pub struct Canvas2dSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    background: String,
    ink: String,
}

impl Canvas2dSurface {
    pub fn new(canvas: HtmlCanvasElement, config: &PadConfig) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        ctx.set_line_cap("round");
        ctx.set_line_join("round");

        Ok(Self {
            canvas,
            ctx,
            background: config.background.clone(),
            ink: config.ink.clone(),
        })
    }

    /// Map viewport coordinates onto canvas pixels via the bounding box
    pub fn to_canvas_point(&self, client_x: f64, client_y: f64) -> Point {
        let rect = self.canvas.get_bounding_client_rect();
        Point::new(
            to_canvas_axis(client_x, rect.left(), rect.width(), self.canvas.width()),
            to_canvas_axis(client_y, rect.top(), rect.height(), self.canvas.height()),
        )
    }

    /// Copy the current pixels out of the canvas
    pub fn snapshot(&self) -> Result<CanvasSurface, RecognizerError> {
        let image = self
            .ctx
            .get_image_data(0.0, 0.0, self.width() as f64, self.height() as f64)
            .map_err(|e| {
                RecognizerError::InvalidSurface(format!("could not read canvas: {:?}", e))
            })?;
        CanvasSurface::from_rgba(image.width(), image.height(), image.data().0)
    }
}

impl DrawingSurface for Canvas2dSurface {
    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn fill_background(&mut self) {
        self.ctx.set_fill_style_str(&self.background);
        self.ctx
            .fill_rect(0.0, 0.0, self.width() as f64, self.height() as f64);
    }

    fn stroke_segment(&mut self, from: Point, to: Point, line_width: f64) {
        self.ctx.set_stroke_style_str(&self.ink);
        self.ctx.set_line_width(line_width);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }

    fn fill_dot(&mut self, center: Point, radius: f64) {
        self.ctx.set_fill_style_str(&self.ink);
        self.ctx.begin_path();
        let _ = self.ctx.arc(center.x, center.y, radius, 0.0, TAU);
        self.ctx.fill();
    }
}

/// Canvases styled to a different CSS size than their pixel size need the
/// offset rescaled
fn to_canvas_axis(client: f64, rect_start: f64, rect_len: f64, canvas_len: u32) -> f64 {
    let offset = client - rect_start;
    if rect_len > 0.0 {
        offset * canvas_len as f64 / rect_len
    } else {
        offset
    }
}
