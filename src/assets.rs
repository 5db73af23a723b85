//! Sprites: decoding, background removal and the asset cache
//!
//! A sprite file is plain text. Palette lines map one character to a color
//! (`Y #f5c842`, or `. none` for a transparent pixel), a `---` line ends the
//! palette, and every following line is one row of pixels. Lines starting
//! with `;` are comments.

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::config::GameConfig;
use crate::error::AssetError;
use crate::render::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    BirdUp,
    BirdDown,
    Background,
    GameOver,
}

impl SpriteId {
    pub const ALL: [SpriteId; 4] = [
        SpriteId::BirdUp,
        SpriteId::BirdDown,
        SpriteId::Background,
        SpriteId::GameOver,
    ];

    /// File stem looked up in the assets directory.
    pub fn name(&self) -> &'static str {
        match self {
            SpriteId::BirdUp => "bird_up",
            SpriteId::BirdDown => "bird_down",
            SpriteId::Background => "background",
            SpriteId::GameOver => "game_over",
        }
    }

    /// Whether the solid color around the art should be cut away.
    pub fn strips_background(&self) -> bool {
        !matches!(self, SpriteId::Background)
    }

    /// Size the sprite is drawn at, in world units.
    pub fn world_size(&self, config: &GameConfig) -> (f32, f32) {
        match self {
            SpriteId::BirdUp | SpriteId::BirdDown => (config.bird_size, config.bird_size),
            SpriteId::Background => (config.screen_width, config.screen_height),
            SpriteId::GameOver => (config.screen_width * 0.75, config.screen_height * 0.25),
        }
    }

    fn builtin(&self) -> &'static str {
        match self {
            SpriteId::BirdUp => BIRD_UP,
            SpriteId::BirdDown => BIRD_DOWN,
            SpriteId::Background => BACKGROUND,
            SpriteId::GameOver => GAME_OVER,
        }
    }
}

/// Decoded pixel art. `None` pixels are transparent.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    width: usize,
    height: usize,
    px: Vec<Option<Rgb>>,
    world_w: f32,
    world_h: f32,
}

impl Sprite {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            self.px[y * self.width + x]
        } else {
            None
        }
    }

    pub fn world_size(&self) -> (f32, f32) {
        (self.world_w, self.world_h)
    }

    pub fn opaque_pixels(&self) -> usize {
        self.px.iter().filter(|p| p.is_some()).count()
    }
}

/// Cheap shared handle; the same source always yields the same handle.
pub type SpriteHandle = Rc<Sprite>;

struct Decoded {
    width: usize,
    height: usize,
    px: Vec<Option<Rgb>>,
}

fn parse_color(s: &str) -> Option<Option<Rgb>> {
    if s.eq_ignore_ascii_case("none") {
        return Some(None);
    }
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Some(Rgb(channel(0)?, channel(2)?, channel(4)?)))
}

fn decode(id: SpriteId, text: &str) -> Result<Decoded, AssetError> {
    let err = |line: usize, reason: String| AssetError::Parse { id, line, reason };

    let mut palette: HashMap<char, Option<Rgb>> = HashMap::new();
    let mut rows: Vec<Vec<Option<Rgb>>> = Vec::new();
    let mut in_pixels = false;

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim_end();
        if line.starts_with(';') {
            continue;
        }
        if !in_pixels {
            let entry = line.trim();
            if entry.is_empty() {
                continue;
            }
            if entry == "---" {
                in_pixels = true;
                continue;
            }
            let mut chars = entry.chars();
            let key = chars.next().ok_or_else(|| err(line_no, "empty palette entry".into()))?;
            let value = chars.as_str().trim();
            let color = parse_color(value)
                .ok_or_else(|| err(line_no, format!("bad color `{value}` for `{key}`")))?;
            if palette.insert(key, color).is_some() {
                return Err(err(line_no, format!("`{key}` defined twice")));
            }
        } else {
            if line.is_empty() {
                continue;
            }
            let row = line
                .chars()
                .map(|c| {
                    palette
                        .get(&c)
                        .copied()
                        .ok_or_else(|| err(line_no, format!("`{c}` is not in the palette")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            if let Some(first) = rows.first() {
                if row.len() != first.len() {
                    return Err(err(
                        line_no,
                        format!("row is {} pixels wide, expected {}", row.len(), first.len()),
                    ));
                }
            }
            rows.push(row);
        }
    }

    if rows.is_empty() {
        return Err(AssetError::Empty { id });
    }
    let width = rows[0].len();
    let height = rows.len();
    Ok(Decoded {
        width,
        height,
        px: rows.into_iter().flatten().collect(),
    })
}

/// Cut away the solid backdrop: every pixel matching the top-left color that
/// is connected to the border becomes transparent. Same-colored pixels
/// enclosed by the art are kept.
fn remove_background(width: usize, height: usize, px: &mut [Option<Rgb>]) {
    let Some(backdrop) = px.first().copied().flatten() else {
        return;
    };
    let mut seen = vec![false; px.len()];
    let mut queue = VecDeque::new();
    for x in 0..width {
        queue.push_back((x, 0));
        queue.push_back((x, height - 1));
    }
    for y in 0..height {
        queue.push_back((0, y));
        queue.push_back((width - 1, y));
    }

    while let Some((x, y)) = queue.pop_front() {
        let i = y * width + x;
        if seen[i] || px[i] != Some(backdrop) {
            continue;
        }
        seen[i] = true;
        px[i] = None;
        if x > 0 {
            queue.push_back((x - 1, y));
        }
        if x + 1 < width {
            queue.push_back((x + 1, y));
        }
        if y > 0 {
            queue.push_back((x, y - 1));
        }
        if y + 1 < height {
            queue.push_back((x, y + 1));
        }
    }
}

/// Decode a sprite from source text.
pub fn load_from_str(id: SpriteId, text: &str, world: (f32, f32)) -> Result<Sprite, AssetError> {
    let mut decoded = decode(id, text)?;
    if id.strips_background() {
        remove_background(decoded.width, decoded.height, &mut decoded.px);
    }
    Ok(Sprite {
        width: decoded.width,
        height: decoded.height,
        px: decoded.px,
        world_w: world.0,
        world_h: world.1,
    })
}

/// Lazily decoded sprites, keyed by id.
pub struct AssetCache {
    dir: Option<PathBuf>,
    config: GameConfig,
    sprites: HashMap<SpriteId, SpriteHandle>,
    decodes: usize,
}

impl AssetCache {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            dir: config.assets_dir.clone(),
            config: config.clone(),
            sprites: HashMap::new(),
            decodes: 0,
        }
    }

    /// Handle for `id`, decoding it on first use only.
    pub fn load_sprite(&mut self, id: SpriteId) -> Result<SpriteHandle, AssetError> {
        if let Some(handle) = self.sprites.get(&id) {
            log::trace!("Sprite {id:?} served from cache");
            return Ok(Rc::clone(handle));
        }

        let sprite = match &self.dir {
            Some(dir) => {
                let path = sprite_path(dir, id);
                let text = fs::read_to_string(&path)
                    .map_err(|source| AssetError::Read { path: path.clone(), source })?;
                log::debug!("Decoding sprite {id:?} from {}", path.display());
                load_from_str(id, &text, id.world_size(&self.config))?
            }
            None => {
                log::debug!("Decoding built-in sprite {id:?}");
                load_from_str(id, id.builtin(), id.world_size(&self.config))?
            }
        };
        self.decodes += 1;

        let handle = Rc::new(sprite);
        self.sprites.insert(id, Rc::clone(&handle));
        Ok(handle)
    }

    /// Decode everything up front so failures surface before the game starts.
    pub fn preload(&mut self, ids: &[SpriteId]) -> Result<(), AssetError> {
        for &id in ids {
            self.load_sprite(id)?;
        }
        Ok(())
    }

    /// How many times a sprite source has actually been decoded.
    pub fn decode_count(&self) -> usize {
        self.decodes
    }
}

pub fn sprite_path(dir: &Path, id: SpriteId) -> PathBuf {
    dir.join(format!("{}.sprite", id.name()))
}

// ── Built-in art ────────────────────────────────────────────────────────────

const BIRD_UP: &str = "\
; wings raised, on a magenta backdrop
o #ff00ff
K #282828
Y #f5c842
H #ffe164
W #d7a523
E #ffffff
P #141414
B #e14b23
b #f06e32
---
oooooooooooo
oKKoKKKKKooo
KWWKHHYYEKoo
KWWWKYYEEPKo
oKWWKYYYYKBK
ooKKYYYYKBbK
ooKYYYYYYKKo
oooKKYYYYKoo
ooooKKKKKooo
oooooooooooo
";

const BIRD_DOWN: &str = "\
; wings lowered
o #ff00ff
K #282828
Y #f5c842
H #ffe164
W #d7a523
E #ffffff
P #141414
B #e14b23
b #f06e32
---
oooooooooooo
ooooKKKKKooo
oooKHHYYEKoo
ooKYYYYEEPKo
oKKKKYYYYKBK
KWWWKYYYKBbK
KWWKYYYYYKKo
oKKKKYYYYKoo
ooooKKKKKooo
oooooooooooo
";

const BACKGROUND: &str = "\
; sky gradient, clouds and hills; drawn as two scrolling tiles
a #46b4c8
b #5abed0
s #6ec8d8
d #82d2e0
e #96dce8
f #aae4ee
c #ffffff
h #78c34b
g #5faf37
---
aaaaaaaaaaaaaaaaaaaa
aaaaaaaaaaaaaaaaaaaa
aaaaaaaaaaaaaaaaaaaa
aaaaacccaaaaaaaaaaaa
bbbbcccccbbbbbbbbbbb
bbbbbbbbbbbbbbbbbbbb
bbbbbbbbbbbbbbbcccbb
bbbbbbbbbbbbbbcccccb
ssssssssssssssssssss
ssssssssssssssssssss
ssssssssssssssssssss
dddddddddddddddddddd
dddccddddddddddddddd
ddccccdddddddddddddd
dddddddddddddddddddd
eeeeeeeeeeeeeecceeee
eeeeeeeeeeeeecccceee
eeeeeeeeeeeeeeeeeeee
eeeeeeeeeeeeeeeeeeee
ffffffffffffffffffff
ffffffffffffffffffff
ffffffffhhhhffffffff
hhffffhhhhhhhhffffhh
hhhhhhhhhhhhhhhhhhhh
hhhhgghhhhhhgghhhhhh
hhhggggghhgggggghhgg
gggggggggggggggggggg
gggggggggggggggggggg
gggggggggggggggggggg
gggggggggggggggggggg
";

const GAME_OVER: &str = "\
; rounded panel behind the game over text
o #ff00ff
K #1e1e1e
d #d2b96e
l #dcc378
---
ooKKKKKKKKKKKKKKKKKKKKKKKKKKoo
oKddddddddddddddddddddddddddKo
KdlllllllllllllllllllllllllldK
KdlllllllllllllllllllllllllldK
KdlllllllllllllllllllllllllldK
KdlllllllllllllllllllllllllldK
KdlllllllllllllllllllllllllldK
KdlllllllllllllllllllllllllldK
KdlllllllllllllllllllllllllldK
KdlllllllllllllllllllllllllldK
KdlllllllllllllllllllllllllldK
KdlllllllllllllllllllllllllldK
KdlllllllllllllllllllllllllldK
oKddddddddddddddddddddddddddKo
ooKKKKKKKKKKKKKKKKKKKKKKKKKKoo
";
