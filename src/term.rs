//! Terminal backend: half-block pixel rendering and crossterm input
//!
//! Each terminal cell shows two stacked pixels (`▀` with separate fg/bg), so
//! a `cols x rows` terminal is a `cols x rows*2` pixel canvas. The world is
//! scaled uniformly into the largest centered viewport that fits; the rest
//! is letterboxed.

use std::io::{self, Write, stdout};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{self, Color as CColor},
    terminal,
};

use crate::assets::Sprite;
use crate::config::GameConfig;
use crate::input::{InputEvent, InputSource, Key};
use crate::render::{
    GLYPH_ADVANCE, GLYPH_H, GLYPH_W, LETTERBOX, Renderer, Rgb, SHADOW, glyph, text_pixels,
};

// ── Pixel buffer with half-block rendering ──────────────────────────────────

#[derive(Debug, Clone)]
pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![LETTERBOX; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.clear();
        self.px.resize(w * h, LETTERBOX);
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    pub fn fill(&mut self, c: Rgb) {
        self.px.fill(c);
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(out, style::SetBackgroundColor(color(top)))?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(out, style::SetForegroundColor(color(top)))?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(out, style::SetBackgroundColor(color(bot)))?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row < rows - 1 {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

fn color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

// ── World to pixel mapping ──────────────────────────────────────────────────

/// Where the world lands on the pixel canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Pixels per world unit, same on both axes
    pub scale: f32,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Viewport {
    pub fn fit(px_w: usize, px_h: usize, world_w: f32, world_h: f32) -> Self {
        let scale = (px_w as f32 / world_w).min(px_h as f32 / world_h);
        let w = (world_w * scale).round() as i32;
        let h = (world_h * scale).round() as i32;
        Self {
            scale,
            x: (px_w as i32 - w) / 2,
            y: (px_h as i32 - h) / 2,
            w,
            h,
        }
    }

    pub fn to_px(&self, x: f32, y: f32) -> (f32, f32) {
        (self.x as f32 + x * self.scale, self.y as f32 + y * self.scale)
    }

    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && py >= self.y && px < self.x + self.w && py < self.y + self.h
    }
}

// ── Renderer ────────────────────────────────────────────────────────────────

pub struct TermRenderer<W: Write> {
    out: W,
    buf: PixelBuf,
    world: (f32, f32),
    view: Viewport,
}

impl<W: Write> TermRenderer<W> {
    pub fn new(out: W, cols: u16, rows: u16, config: &GameConfig) -> Self {
        let world = (config.screen_width, config.screen_height);
        let (pw, ph) = (cols as usize, rows as usize * 2);
        Self {
            out,
            buf: PixelBuf::new(pw, ph),
            world,
            view: Viewport::fit(pw, ph, world.0, world.1),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.view
    }

    pub fn pixels(&self) -> &PixelBuf {
        &self.buf
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Side of one font pixel, in canvas pixels.
    fn glyph_px(&self) -> i32 {
        ((self.view.scale * 5.0).floor() as i32).max(1)
    }

    /// World shapes stay inside the viewport.
    fn plot(&mut self, x: i32, y: i32, c: Rgb) {
        if self.view.contains(x, y) {
            self.buf.set(x, y, c);
        }
    }

    fn draw_glyphs(&mut self, text: &str, x: i32, y: i32, k: i32, c: Rgb) {
        for (i, ch) in text.chars().enumerate() {
            let Some(rows) = glyph(ch) else { continue };
            let gx = x + (i * GLYPH_ADVANCE) as i32 * k;
            for (ry, bits) in rows.iter().enumerate() {
                for rx in 0..GLYPH_W {
                    if bits & (1 << (GLYPH_W - 1 - rx)) == 0 {
                        continue;
                    }
                    for dy in 0..k {
                        for dx in 0..k {
                            self.buf.set(gx + rx as i32 * k + dx, y + ry as i32 * k + dy, c);
                        }
                    }
                }
            }
        }
    }
}

impl<W: Write> Renderer for TermRenderer<W> {
    fn clear(&mut self, color: Rgb) {
        self.buf.fill(LETTERBOX);
        let v = self.view;
        for y in v.y..v.y + v.h {
            for x in v.x..v.x + v.w {
                self.buf.set(x, y, color);
            }
        }
    }

    fn draw_image(&mut self, sprite: &Sprite, x: f32, y: f32, rotation_degrees: f32) {
        let (ww, wh) = sprite.world_size();
        let dw = ww * self.view.scale;
        let dh = wh * self.view.scale;
        if dw < 0.5 || dh < 0.5 || sprite.width() == 0 || sprite.height() == 0 {
            return;
        }
        let (cx, cy) = self.view.to_px(x + ww / 2.0, y + wh / 2.0);
        let (sin, cos) = rotation_degrees.to_radians().sin_cos();
        let reach = (dw * dw + dh * dh).sqrt() / 2.0;

        let (x0, x1) = ((cx - reach).floor() as i32, (cx + reach).ceil() as i32);
        let (y0, y1) = ((cy - reach).floor() as i32, (cy + reach).ceil() as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                // Inverse-rotate the pixel center back into sprite space
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                let u = (dx * cos + dy * sin + dw / 2.0) / dw;
                let v = (-dx * sin + dy * cos + dh / 2.0) / dh;
                if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                    continue;
                }
                let sx = ((u * sprite.width() as f32) as usize).min(sprite.width() - 1);
                let sy = ((v * sprite.height() as f32) as usize).min(sprite.height() - 1);
                if let Some(c) = sprite.get(sx, sy) {
                    self.plot(px, py, c);
                }
            }
        }
    }

    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        let (ax, ay) = self.view.to_px(x, y);
        let (bx, by) = self.view.to_px(x + w, y + h);
        for py in ay.round() as i32..by.round() as i32 {
            for px in ax.round() as i32..bx.round() as i32 {
                self.plot(px, py, color);
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Rgb) {
        let k = self.glyph_px();
        let (px, py) = self.view.to_px(x, y);
        let (px, py) = (px.round() as i32, py.round() as i32);
        let light = color.0 as u16 + color.1 as u16 + color.2 as u16 > 384;
        if light {
            self.draw_glyphs(text, px + 1, py + 1, k, SHADOW);
        }
        self.draw_glyphs(text, px, py, k, color);
    }

    fn text_size(&self, text: &str) -> (f32, f32) {
        let k = self.glyph_px() as f32;
        let scale = self.view.scale.max(f32::EPSILON);
        (text_pixels(text) as f32 * k / scale, GLYPH_H as f32 * k / scale)
    }

    fn present(&mut self) -> io::Result<()> {
        self.buf.render(&mut self.out)
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        let (pw, ph) = (cols as usize, rows as usize * 2);
        self.buf.resize(pw, ph);
        self.view = Viewport::fit(pw, ph, self.world.0, self.world.1);
        log::debug!("Resized to {cols}x{rows} cells, scale {:.3}", self.view.scale);
    }
}

// ── Input ───────────────────────────────────────────────────────────────────

/// Keyboard and resize events from the controlling terminal.
#[derive(Debug, Default)]
pub struct TermInput;

impl InputSource for TermInput {
    fn poll_events(&mut self) -> io::Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => events.extend(map_key(key)),
                Event::Resize(cols, rows) => events.push(InputEvent::Resize { cols, rows }),
                _ => {}
            }
        }
        Ok(events)
    }
}

/// Translate a key press. Releases and repeats are dropped.
pub fn map_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(InputEvent::Quit);
    }
    let event = match key.code {
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => InputEvent::KeyDown(Key::Jump),
        KeyCode::Esc => InputEvent::Quit,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => InputEvent::KeyDown(Key::Jump),
            'p' => InputEvent::KeyDown(Key::Pause),
            'r' => InputEvent::KeyDown(Key::Restart),
            'q' => InputEvent::Quit,
            _ => return None,
        },
        _ => return None,
    };
    Some(event)
}

// ── Terminal mode ───────────────────────────────────────────────────────────

/// Raw mode plus alternate screen for as long as it lives.
#[derive(Debug)]
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // Restores raw mode if the screen setup below fails
        let guard = Self { _private: () };
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
        )?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let restored = execute!(
            stdout(),
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )
        .and_then(|()| terminal::disable_raw_mode());
        if let Err(e) = restored {
            log::error!("Failed to restore the terminal: {e}");
        }
    }
}
