//! Two-tile wraparound background scroller

#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    pub x1: f32,
    pub x2: f32,
    width: f32,
    speed: f32,
}

impl Background {
    pub fn new(width: f32, speed: f32) -> Self {
        Self {
            x1: 0.0,
            x2: width,
            width,
            speed,
        }
    }

    /// Scroll both tiles left. A tile that has fully left the screen moves
    /// right by whole multiples of two widths, which lands it exactly behind
    /// the other tile even when one step covers more than a screen.
    pub fn advance(&mut self) {
        self.x1 = Self::wrap(self.x1 - self.speed, self.width);
        self.x2 = Self::wrap(self.x2 - self.speed, self.width);
    }

    fn wrap(x: f32, width: f32) -> f32 {
        if x <= -width {
            width - (width - x).rem_euclid(2.0 * width)
        } else {
            x
        }
    }

    pub fn offsets(&self) -> [f32; 2] {
        [self.x1, self.x2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_start_side_by_side() {
        let bg = Background::new(400.0, 1.0);
        assert_eq!(bg.offsets(), [0.0, 400.0]);
    }

    #[test]
    fn first_tile_wraps_after_one_screen() {
        let mut bg = Background::new(400.0, 1.0);
        for _ in 0..399 {
            bg.advance();
        }
        assert_eq!(bg.x1, -399.0);
        bg.advance();
        assert_eq!(bg.x1, 400.0);
        assert_eq!(bg.x2, 0.0);
    }

    #[test]
    fn tiles_stay_one_width_apart() {
        let mut bg = Background::new(400.0, 7.0);
        for _ in 0..1_000 {
            bg.advance();
            assert_eq!((bg.x1 - bg.x2).abs(), 400.0);
        }
    }

    #[test]
    fn steps_longer_than_a_screen_still_wrap() {
        let mut bg = Background::new(400.0, 1300.0);
        bg.advance();
        assert_eq!(bg.offsets(), [300.0, -100.0]);
        for _ in 0..100 {
            bg.advance();
            assert!(bg.x1 > -400.0 && bg.x2 > -400.0);
            assert_eq!((bg.x1 - bg.x2).abs(), 400.0);
        }
    }

    #[test]
    fn offsets_stay_above_negative_width() {
        let mut bg = Background::new(400.0, 7.0);
        for _ in 0..5_000 {
            bg.advance();
            assert!(bg.x1 > -400.0 && bg.x2 > -400.0);
        }
    }
}
