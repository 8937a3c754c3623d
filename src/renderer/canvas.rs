//! Canvas 2D surface for the browser build

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Color, Surface};
use crate::error::{GameError, GameResult};
use crate::sim::Rect;

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Size `canvas` to the arena and grab its 2D context
    pub fn new(canvas: &HtmlCanvasElement, width: f32, height: f32) -> GameResult<Self> {
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| GameError::Host(format!("2d context: {e:?}")))?
            .ok_or_else(|| GameError::Host("2d context unsupported".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| GameError::Host("not a 2d context".into()))?;
        ctx.set_font("bold 16px sans-serif");
        ctx.set_text_baseline("top");
        Ok(Self { ctx })
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn fill_rect(&mut self, rect: &Rect, color: Color) {
        self.ctx.set_fill_style_str(color.css());
        self.ctx.fill_rect(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: Color) {
        self.ctx.set_fill_style_str(color.css());
        let _ = self.ctx.fill_text(text, x as f64, y as f64);
    }
}
