//! Renderer capability and frame composition
//!
//! `draw_scene` describes a frame in world units through the `Renderer`
//! trait; backends decide what a world unit looks like.

use std::io;

use crate::assets::{AssetCache, Sprite, SpriteHandle, SpriteId};
use crate::config::GameConfig;
use crate::error::AssetError;
use crate::sim::collision::lava_bands;
use crate::sim::{Phase, Pose, Session};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }
}

pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const SHADOW: Rgb = Rgb(30, 30, 30);
pub const PIPE: Rgb = Rgb(255, 165, 0);
pub const PIPE_LIP: Rgb = Rgb::lerp(PIPE, BLACK, 50);
pub const LAVA: Rgb = Rgb(255, 69, 0);
pub const LAVA_GLOW: Rgb = Rgb(255, 140, 0);
pub const SCORE_TEXT: Rgb = WHITE;
pub const BEST_TEXT: Rgb = Rgb(245, 200, 66);
pub const LETTERBOX: Rgb = Rgb(16, 16, 24);

// ── 3x5 bitmap font ─────────────────────────────────────────────────────────

pub const GLYPH_W: usize = 3;
pub const GLYPH_H: usize = 5;
/// Horizontal distance between glyph origins, in font pixels
pub const GLYPH_ADVANCE: usize = GLYPH_W + 1;

/// Rows of a glyph, top first; bit 2 is the leftmost column.
#[rustfmt::skip]
pub fn glyph(c: char) -> Option<[u8; GLYPH_H]> {
    let rows = match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b011, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ' ' => [0; GLYPH_H],
        _ => return None,
    };
    Some(rows)
}

/// Width of `text` in font pixels.
pub fn text_pixels(text: &str) -> usize {
    let n = text.chars().count();
    if n == 0 { 0 } else { n * GLYPH_ADVANCE - 1 }
}

// ── Renderer capability ─────────────────────────────────────────────────────

pub trait Renderer {
    fn clear(&mut self, color: Rgb);
    /// Blit `sprite` at its world size with its top-left corner at `(x, y)`,
    /// rotated clockwise about its center.
    fn draw_image(&mut self, sprite: &Sprite, x: f32, y: f32, rotation_degrees: f32);
    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb);
    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Rgb);
    /// Size `text` would occupy, in world units.
    fn text_size(&self, text: &str) -> (f32, f32);
    fn present(&mut self) -> io::Result<()>;
    fn resize(&mut self, _cols: u16, _rows: u16) {}
}

/// One recorded renderer call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Rgb),
    Image {
        world_size: (f32, f32),
        x: f32,
        y: f32,
        rotation: f32,
    },
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgb,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        color: Rgb,
    },
}

/// Renderer that only remembers what it was asked to draw. Text is measured
/// as one world unit per font pixel.
#[derive(Debug, Default)]
pub struct DrawLog {
    pending: Vec<DrawCall>,
    frames: Vec<Vec<DrawCall>>,
}

impl DrawLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Vec<DrawCall>] {
        &self.frames
    }

    /// Calls of the most recently presented frame.
    pub fn last_frame(&self) -> &[DrawCall] {
        self.frames.last().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Text drawn in the most recently presented frame.
    pub fn last_texts(&self) -> Vec<&str> {
        self.last_frame()
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for DrawLog {
    fn clear(&mut self, color: Rgb) {
        self.pending.push(DrawCall::Clear(color));
    }

    fn draw_image(&mut self, sprite: &Sprite, x: f32, y: f32, rotation_degrees: f32) {
        self.pending.push(DrawCall::Image {
            world_size: sprite.world_size(),
            x,
            y,
            rotation: rotation_degrees,
        });
    }

    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.pending.push(DrawCall::Rect { x, y, w, h, color });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Rgb) {
        self.pending.push(DrawCall::Text {
            text: text.to_string(),
            x,
            y,
            color,
        });
    }

    fn text_size(&self, text: &str) -> (f32, f32) {
        (text_pixels(text) as f32, GLYPH_H as f32)
    }

    fn present(&mut self) -> io::Result<()> {
        self.frames.push(std::mem::take(&mut self.pending));
        Ok(())
    }
}

// ── Scene ───────────────────────────────────────────────────────────────────

/// Every sprite a frame can need.
#[derive(Debug, Clone)]
pub struct Sprites {
    pub bird_up: SpriteHandle,
    pub bird_down: SpriteHandle,
    pub background: SpriteHandle,
    pub game_over: SpriteHandle,
}

impl Sprites {
    pub fn load(cache: &mut AssetCache) -> Result<Self, AssetError> {
        Ok(Self {
            bird_up: cache.load_sprite(SpriteId::BirdUp)?,
            bird_down: cache.load_sprite(SpriteId::BirdDown)?,
            background: cache.load_sprite(SpriteId::Background)?,
            game_over: cache.load_sprite(SpriteId::GameOver)?,
        })
    }
}

/// Lip drawn at the mouth of each pipe half
const LIP_H: f32 = 10.0;
const LIP_OVERHANG: f32 = 3.0;
const LAVA_GLOW_H: f32 = 6.0;

/// Compose one full frame. Does not present it.
pub fn draw_scene<R: Renderer + ?Sized>(
    out: &mut R,
    session: &Session,
    sprites: &Sprites,
    best: u32,
) {
    let config = session.config();
    out.clear(WHITE);

    for x in session.background().offsets() {
        out.draw_image(&sprites.background, x, 0.0, 0.0);
    }
    draw_lava(out, config);
    draw_pipes(out, session);
    draw_bird(out, session, sprites);

    match session.phase() {
        Phase::Running => draw_score(out, session.score()),
        Phase::Paused => {
            draw_score(out, session.score());
            draw_centered(out, config, "PAUSED", config.screen_height / 2.0, WHITE);
        }
        Phase::Ended => draw_game_over(out, config, session.score(), best, sprites),
    }
}

fn draw_lava<R: Renderer + ?Sized>(out: &mut R, config: &GameConfig) {
    let Some([top, bottom]) = lava_bands(config) else {
        return;
    };
    out.draw_rect(top.x, top.y, top.w, top.h, LAVA);
    out.draw_rect(top.x, top.y + top.h - LAVA_GLOW_H, top.w, LAVA_GLOW_H, LAVA_GLOW);
    out.draw_rect(bottom.x, bottom.y, bottom.w, bottom.h, LAVA);
    out.draw_rect(bottom.x, bottom.y, bottom.w, LAVA_GLOW_H, LAVA_GLOW);
}

fn draw_pipes<R: Renderer + ?Sized>(out: &mut R, session: &Session) {
    let screen_h = session.config().screen_height;
    for pipe in session.pipes() {
        // Top half
        out.draw_rect(pipe.x, 0.0, pipe.width, pipe.gap_top, PIPE);
        out.draw_rect(
            pipe.x - LIP_OVERHANG,
            pipe.gap_top - LIP_H,
            pipe.width + LIP_OVERHANG * 2.0,
            LIP_H,
            PIPE_LIP,
        );
        // Bottom half
        out.draw_rect(pipe.x, pipe.gap_bottom, pipe.width, screen_h - pipe.gap_bottom, PIPE);
        out.draw_rect(
            pipe.x - LIP_OVERHANG,
            pipe.gap_bottom,
            pipe.width + LIP_OVERHANG * 2.0,
            LIP_H,
            PIPE_LIP,
        );
    }
}

fn draw_bird<R: Renderer + ?Sized>(out: &mut R, session: &Session, sprites: &Sprites) {
    let bird = session.bird();
    let sprite = match bird.pose {
        Pose::Up => &sprites.bird_up,
        Pose::Down => &sprites.bird_down,
    };
    let (w, h) = sprite.world_size();
    out.draw_image(sprite, bird.x - w / 2.0, bird.y - h / 2.0, bird.tilt);
}

fn draw_score<R: Renderer + ?Sized>(out: &mut R, score: u32) {
    let text = format!("SCORE: {score}");
    out.draw_text(&text, 10.0, 10.0, SCORE_TEXT);
}

fn draw_centered<R: Renderer + ?Sized>(
    out: &mut R,
    config: &GameConfig,
    text: &str,
    y: f32,
    color: Rgb,
) {
    let (w, _) = out.text_size(text);
    out.draw_text(text, (config.screen_width - w) / 2.0, y, color);
}

fn draw_game_over<R: Renderer + ?Sized>(
    out: &mut R,
    config: &GameConfig,
    score: u32,
    best: u32,
    sprites: &Sprites,
) {
    let (panel_w, panel_h) = sprites.game_over.world_size();
    let mid = config.screen_height / 2.0;
    let panel_y = mid + 10.0;
    out.draw_image(&sprites.game_over, (config.screen_width - panel_w) / 2.0, panel_y, 0.0);

    let (_, line_h) = out.text_size("0");
    let step = (panel_h / 5.0).max(line_h * 1.5);
    draw_centered(out, config, "GAME OVER", panel_y + step * 0.5, BLACK);
    draw_centered(out, config, &format!("SCORE: {score}"), panel_y + step * 1.5, BLACK);
    draw_centered(out, config, &format!("BEST: {best}"), panel_y + step * 2.5, BEST_TEXT);
    draw_centered(out, config, "PRESS R TO RESTART", panel_y + step * 3.5, BLACK);
}
