//! Sprite frames, rotation and opacity masks
//!
//! The asset loader hands the core decoded alpha channels. Frames are
//! immutable after load and shared between every entity that uses them.

use std::fmt;
use std::sync::Arc;

use crate::consts::MASK_ALPHA_THRESHOLD;
use crate::error::{SimError, SimResult};

/// Alpha channel of one decoded sprite frame, row-major
#[derive(Clone, PartialEq, Eq)]
pub struct Sprite {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl fmt::Debug for Sprite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sprite({}x{})", self.width, self.height)
    }
}

impl Sprite {
    pub fn new(width: u32, height: u32, alpha: Vec<u8>) -> SimResult<Self> {
        if alpha.len() != width as usize * height as usize {
            return Err(SimError::BadSpriteSize {
                width,
                height,
                len: alpha.len(),
            });
        }
        Ok(Self {
            width,
            height,
            alpha,
        })
    }

    /// Build a sprite by evaluating `f(x, y)` for every pixel
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> u8) -> Self {
        let mut alpha = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                alpha.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            alpha,
        }
    }

    /// Fully opaque rectangle
    pub fn solid(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| 255)
    }

    /// Opaque ellipse inscribed in the frame, transparent corners
    pub fn ellipse(width: u32, height: u32) -> Self {
        let rx = width as f32 / 2.0;
        let ry = height as f32 / 2.0;
        Self::from_fn(width, height, |x, y| {
            let dx = (x as f32 + 0.5 - rx) / rx;
            let dy = (y as f32 + 0.5 - ry) / ry;
            if dx * dx + dy * dy <= 1.0 { 255 } else { 0 }
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.alpha[(y * self.width + x) as usize]
    }

    /// Rotate counter-clockwise on screen by `degrees`, growing the frame to
    /// fit the rotated bounds. Nearest-neighbour sampling; quarter turns are
    /// exact pixel permutations.
    pub fn rotated(&self, degrees: f32) -> Sprite {
        let turn = degrees.rem_euclid(360.0);
        let quarter = (turn / 90.0).round();
        if (turn - quarter * 90.0).abs() < 1e-4 {
            return self.rotated_quarters(quarter as u32 % 4);
        }

        let (sin, cos) = turn.to_radians().sin_cos();
        let (w, h) = (self.width as f32, self.height as f32);
        let (new_w, new_h) = self.rotated_size(degrees);
        let (half_nw, half_nh) = (new_w as f32 / 2.0, new_h as f32 / 2.0);

        Sprite::from_fn(new_w, new_h, |x, y| {
            let dx = x as f32 + 0.5 - half_nw;
            let dy = y as f32 + 0.5 - half_nh;
            // Inverse of the y-down CCW rotation
            let sx = (dx * cos - dy * sin + w / 2.0).floor();
            let sy = (dx * sin + dy * cos + h / 2.0).floor();
            if sx >= 0.0 && sy >= 0.0 && sx < w && sy < h {
                self.alpha_at(sx as u32, sy as u32)
            } else {
                0
            }
        })
    }

    /// Frame size `rotated(degrees)` would produce, without touching pixels
    pub fn rotated_size(&self, degrees: f32) -> (u32, u32) {
        let turn = degrees.rem_euclid(360.0);
        let quarter = (turn / 90.0).round();
        if (turn - quarter * 90.0).abs() < 1e-4 {
            return if quarter as u32 % 2 == 1 {
                (self.height, self.width)
            } else {
                (self.width, self.height)
            };
        }
        let (sin, cos) = turn.to_radians().sin_cos();
        let (w, h) = (self.width as f32, self.height as f32);
        // Truncated like the blitter sizes its output; the nudge keeps an
        // exact 30.0 from landing on 29.99999
        let new_w = ((w * cos).abs() + (h * sin).abs() + 1e-4).floor().max(1.0) as u32;
        let new_h = ((w * sin).abs() + (h * cos).abs() + 1e-4).floor().max(1.0) as u32;
        (new_w, new_h)
    }

    fn rotated_quarters(&self, quarters: u32) -> Sprite {
        let (w, h) = (self.width, self.height);
        match quarters {
            1 => Sprite::from_fn(h, w, |x, y| self.alpha_at(w - 1 - y, x)),
            2 => Sprite::from_fn(w, h, |x, y| self.alpha_at(w - 1 - x, h - 1 - y)),
            3 => Sprite::from_fn(h, w, |x, y| self.alpha_at(y, h - 1 - x)),
            _ => self.clone(),
        }
    }
}

/// Binary occupancy grid of a sprite's opaque pixels
#[derive(Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mask({}x{}, {} set)", self.width, self.height, self.count())
    }
}

impl Mask {
    /// Pixels with alpha above the threshold are set
    pub fn from_sprite(sprite: &Sprite) -> Self {
        Self {
            width: sprite.width,
            height: sprite.height,
            bits: sprite
                .alpha
                .iter()
                .map(|&a| a > MASK_ALPHA_THRESHOLD)
                .collect(),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    /// Number of set pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// First pixel (in this mask's coordinates) where both masks are set,
    /// with `other`'s top-left placed at `offset`
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> Option<(i32, i32)> {
        let (dx, dy) = offset;
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (dx + other.width as i32).min(self.width as i32);
        let y1 = (dy + other.height as i32).min(self.height as i32);

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - dx, y - dy) {
                    return Some((x, y));
                }
            }
        }
        None
    }
}

/// A decoded frame with its precomputed unrotated mask
#[derive(Debug, Clone)]
pub struct Frame {
    pub sprite: Sprite,
    pub mask: Mask,
}

/// Shared immutable frame sequence, addressable by index
#[derive(Clone)]
pub struct FrameTable {
    name: &'static str,
    frames: Arc<[Frame]>,
}

impl fmt::Debug for FrameTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameTable({}, {} frames)", self.name, self.frames.len())
    }
}

impl FrameTable {
    /// Fails if the sequence is empty
    pub fn new(name: &'static str, sprites: Vec<Sprite>) -> SimResult<Self> {
        if sprites.is_empty() {
            return Err(SimError::EmptyFrames { sequence: name });
        }
        Ok(Self::from_frames(name, sprites))
    }

    fn from_frames(name: &'static str, sprites: Vec<Sprite>) -> Self {
        debug_assert!(!sprites.is_empty());
        let frames: Vec<Frame> = sprites
            .into_iter()
            .map(|sprite| Frame {
                mask: Mask::from_sprite(&sprite),
                sprite,
            })
            .collect();
        Self {
            name,
            frames: frames.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Always at least 1
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `index`, clamped to the last frame
    #[inline]
    pub fn frame(&self, index: usize) -> &Frame {
        &self.frames[index.min(self.frames.len() - 1)]
    }

    /// True if both tables point at the same frames
    pub fn shares_frames_with(&self, other: &FrameTable) -> bool {
        Arc::ptr_eq(&self.frames, &other.frames)
    }
}

/// Every frame sequence the core needs
#[derive(Debug, Clone)]
pub struct SpriteBank {
    /// Rowing animation
    pub vessel: FrameTable,
    /// One frame per net stage, stage 0 first
    pub net: FrameTable,
    /// Fish life animation
    pub fish: FrameTable,
    /// Catch stars, one per score
    pub stars: FrameTable,
}

impl SpriteBank {
    pub fn new(
        vessel: Vec<Sprite>,
        net: Vec<Sprite>,
        fish: Vec<Sprite>,
        stars: Vec<Sprite>,
    ) -> SimResult<Self> {
        let bank = Self {
            vessel: FrameTable::new("vessel", vessel)?,
            net: FrameTable::new("net", net)?,
            fish: FrameTable::new("fish", fish)?,
            stars: FrameTable::new("stars", stars)?,
        };
        for table in [&bank.vessel, &bank.net, &bank.fish, &bank.stars] {
            log::debug!("Loaded {} {} frames", table.len(), table.name());
        }
        Ok(bank)
    }

    /// Procedural stand-ins with the shipped frame counts
    /// (7 waka, 3 net, 27 fish, 9 stars)
    pub fn placeholder() -> Self {
        let vessel = (0..7).map(|_| Sprite::ellipse(40, 140)).collect();
        let net = (0..3u32)
            .map(|stage| Sprite::ellipse(60 + stage * 50, 60 + stage * 40))
            .collect();
        let fish = (0..27u32)
            .map(|i| {
                // Fish breaches then dives: grows to the midpoint, shrinks after
                let rise = 13 - (i as i32 - 13).abs();
                let size = 20 + rise as u32 * 3;
                Sprite::ellipse(size, size)
            })
            .collect();
        let stars = (0..9).map(|_| Sprite::ellipse(48, 48)).collect();

        // Non-empty by construction
        Self {
            vessel: FrameTable::from_frames("vessel", vessel),
            net: FrameTable::from_frames("net", net),
            fish: FrameTable::from_frames("fish", fish),
            stars: FrameTable::from_frames("stars", stars),
        }
    }
}
