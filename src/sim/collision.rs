//! Pixel-accurate catch test
//!
//! The net's current stage sprite is rotated with the same convention used to
//! draw it and centred on the waka; the fish's current frame is centred on the
//! fish. A catch needs at least one pixel opaque in both.
//!
//! Cheap checks run first: no fish, net stowed, or disjoint rectangles all
//! return before any rotation or mask work.

use glam::Vec2;

use super::sprite::{FrameTable, Mask};
use super::target::Fish;
use super::vessel::Vessel;

/// Integer screen rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Rectangle of the given size centred on `center`. Coordinates are
    /// truncated here and nowhere earlier, matching how sprites are drawn.
    pub fn centered(center: Vec2, width: u32, height: u32) -> Self {
        let (cx, cy) = (center.x as i32, center.y as i32);
        Self {
            left: cx - (width / 2) as i32,
            top: cy - (height / 2) as i32,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.left + self.width as i32
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.top + self.height as i32
    }

    pub fn intersects(&self, other: &PixelRect) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }
}

/// How far a catch test got
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatchTest {
    /// Slot is empty
    NoFish,
    /// Catch window closed
    NetStowed,
    /// Bounding rectangles do not touch, masks never built
    Disjoint,
    /// Rectangles touch but no opaque pixel coincides
    Miss,
    /// First coinciding pixel, in screen coordinates
    Hit { x: i32, y: i32 },
}

impl CatchTest {
    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, CatchTest::Hit { .. })
    }
}

/// Run the catch test and report which stage decided it
pub fn evaluate_catch(vessel: &Vessel, net_frames: &FrameTable, fish: Option<&Fish>) -> CatchTest {
    let Some(fish) = fish else {
        return CatchTest::NoFish;
    };
    if !vessel.net.is_active() {
        return CatchTest::NetStowed;
    }

    let angle = vessel.render_angle();
    let net_sprite = &net_frames.frame(vessel.net.stage()).sprite;
    let (net_w, net_h) = net_sprite.rotated_size(angle);
    let net_rect = PixelRect::centered(vessel.pos, net_w, net_h);

    let fish_frame = fish.current_frame();
    let fish_rect = PixelRect::centered(
        fish.pos,
        fish_frame.sprite.width(),
        fish_frame.sprite.height(),
    );

    if !net_rect.intersects(&fish_rect) {
        return CatchTest::Disjoint;
    }

    let net_mask = Mask::from_sprite(&net_sprite.rotated(angle));
    let offset = (fish_rect.left - net_rect.left, fish_rect.top - net_rect.top);
    log::trace!("Pixel test: net {:?} fish {:?} offset {:?}", net_rect, fish_rect, offset);

    match net_mask.overlap(&fish_frame.mask, offset) {
        Some((x, y)) => CatchTest::Hit {
            x: net_rect.left + x,
            y: net_rect.top + y,
        },
        None => CatchTest::Miss,
    }
}

/// True iff the deployed net overlaps the fish by at least one opaque pixel
pub fn try_catch(vessel: &Vessel, net_frames: &FrameTable, fish: Option<&Fish>) -> bool {
    evaluate_catch(vessel, net_frames, fish).is_hit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::clock::SimClock;
    use crate::sim::sprite::Sprite;
    use crate::tuning::Tuning;

    fn corner_pixel(size: u32, cx: u32, cy: u32) -> Sprite {
        Sprite::from_fn(size, size, |x, y| if x == cx && y == cy { 255 } else { 0 })
    }

    fn setup(net: Sprite, fish: Sprite) -> (Vessel, FrameTable, FrameTable, Tuning) {
        let tuning = Tuning::default();
        let net_frames = FrameTable::new("net", vec![net]).unwrap();
        let fish_frames = FrameTable::new("fish", vec![fish]).unwrap();
        let mut vessel = Vessel::new(&tuning, 1, net_frames.len());
        vessel.pos = Vec2::new(100.0, 100.0);
        // Facing up: net drawn unrotated
        vessel.heading_deg = -90.0;
        vessel.net.deploy();
        (vessel, net_frames, fish_frames, tuning)
    }

    fn fish_at(pos: Vec2, frames: &FrameTable, tuning: &Tuning) -> Fish {
        Fish::new(pos, &SimClock::new(), tuning, frames.clone())
    }

    #[test]
    fn test_centered_rect_truncates() {
        let r = PixelRect::centered(Vec2::new(100.9, 50.2), 11, 10);
        assert_eq!((r.left, r.top), (95, 45));
        assert_eq!((r.right(), r.bottom()), (106, 55));
    }

    #[test]
    fn test_single_pixel_overlap_hits() {
        // Net pixel (9,9) lands on screen (104,104)
        let (vessel, net, fish_frames, tuning) =
            setup(corner_pixel(10, 9, 9), corner_pixel(10, 0, 0));

        // Fish pixel (0,0) lands on (104,104) when centred at (109,109)
        let fish = fish_at(Vec2::new(109.0, 109.0), &fish_frames, &tuning);
        assert_eq!(
            evaluate_catch(&vessel, &net, Some(&fish)),
            CatchTest::Hit { x: 104, y: 104 }
        );
        assert!(try_catch(&vessel, &net, Some(&fish)));

        // One pixel to the left: rectangles still touch, pixels don't
        let fish = fish_at(Vec2::new(108.0, 109.0), &fish_frames, &tuning);
        assert_eq!(evaluate_catch(&vessel, &net, Some(&fish)), CatchTest::Miss);
    }

    #[test]
    fn test_disjoint_rects_short_circuit() {
        let (vessel, net, fish_frames, tuning) = setup(Sprite::solid(10, 10), Sprite::solid(10, 10));
        let fish = fish_at(Vec2::new(300.0, 300.0), &fish_frames, &tuning);
        assert_eq!(evaluate_catch(&vessel, &net, Some(&fish)), CatchTest::Disjoint);
    }

    #[test]
    fn test_preconditions() {
        let (mut vessel, net, fish_frames, tuning) =
            setup(Sprite::solid(10, 10), Sprite::solid(10, 10));
        assert_eq!(evaluate_catch(&vessel, &net, None), CatchTest::NoFish);

        let fish = fish_at(vessel.pos, &fish_frames, &tuning);
        assert!(try_catch(&vessel, &net, Some(&fish)));

        vessel.net = crate::sim::net::Net::new(1, 90);
        assert_eq!(evaluate_catch(&vessel, &net, Some(&fish)), CatchTest::NetStowed);
    }

    #[test]
    fn test_net_rotates_with_heading() {
        // 20x4 bar, drawn horizontally when facing up
        let (mut vessel, net, fish_frames, tuning) =
            setup(Sprite::solid(20, 4), Sprite::solid(2, 2));
        let fish = fish_at(Vec2::new(100.0, 92.0), &fish_frames, &tuning);
        assert_eq!(evaluate_catch(&vessel, &net, Some(&fish)), CatchTest::Disjoint);

        // Facing right the bar stands vertically and reaches the fish
        vessel.heading_deg = 0.0;
        assert!(try_catch(&vessel, &net, Some(&fish)));
    }
}
