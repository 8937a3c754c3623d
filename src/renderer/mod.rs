//! Rendering module
//!
//! The game never owns its drawing surface. It is handed a [`Surface`] each
//! frame and paints flat rectangles and a little HUD text onto it.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

use crate::sim::{GameState, Rect};

/// Fill colors used by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Avatar,
    Enemy,
    Block,
    Hud,
}

impl Color {
    /// CSS color string
    pub fn css(&self) -> &'static str {
        match self {
            Color::Avatar => "red",
            Color::Enemy => "black",
            Color::Block => "blue",
            Color::Hud => "#333",
        }
    }
}

/// Something that can draw filled rectangles
pub trait Surface {
    /// Wipe the whole drawing area
    fn clear(&mut self, width: f32, height: f32);

    fn fill_rect(&mut self, rect: &Rect, color: Color);

    /// HUD text, anchored at its top-left corner
    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: Color);
}

/// Paint the whole scene: avatar, enemy, blocks, then the level HUD
pub fn draw_scene<S: Surface + ?Sized>(state: &GameState, surface: &mut S) {
    surface.fill_rect(&state.avatar.rect, Color::Avatar);
    surface.fill_rect(&state.enemy.rect, Color::Enemy);
    for block in &state.blocks {
        surface.fill_rect(&block.rect, Color::Block);
    }

    let hud = format!("Level: {}", state.level.level);
    surface.fill_text(&hud, state.settings.canvas_width - 90.0, 8.0, Color::Hud);
}

/// Surface that records draw calls, for tests and headless runs
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    Rect(Rect, Color),
    Text(String),
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rectangles drawn since the last clear
    pub fn frame_rects(&self) -> Vec<(Rect, Color)> {
        let start = self
            .calls
            .iter()
            .rposition(|c| *c == DrawCall::Clear)
            .map_or(0, |i| i + 1);
        self.calls[start..]
            .iter()
            .filter_map(|c| match c {
                DrawCall::Rect(r, color) => Some((*r, *color)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, _width: f32, _height: f32) {
        self.calls.push(DrawCall::Clear);
    }

    fn fill_rect(&mut self, rect: &Rect, color: Color) {
        self.calls.push(DrawCall::Rect(*rect, color));
    }

    fn fill_text(&mut self, text: &str, _x: f32, _y: f32, _color: Color) {
        self.calls.push(DrawCall::Text(text.to_string()));
    }
}
