#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn rotated(self, radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Grows by the given amount on every side; negative values shrink.
    #[must_use]
    pub fn inflate(self, horizontal: i32, vertical: i32) -> Self {
        Self {
            x: self.x - horizontal,
            y: self.y - vertical,
            width: self.width + horizontal * 2,
            height: self.height + vertical * 2,
        }
    }

    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        other.x < self.right()
            && self.x < other.right()
            && other.y < self.bottom()
            && self.y < other.bottom()
    }
}

/// Visible world region. `x`/`y` are the world position of the top-left
/// corner, `width`/`height` the size of the backbuffer in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// A minimized or not yet sized backbuffer has nothing to draw into.
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.height.is_finite() && self.height > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapsed_viewports_are_not_drawable() {
        let screen = Viewport {
            width: 1280.0,
            height: 720.0,
            ..Viewport::default()
        };
        assert!(screen.is_drawable());
        assert!(!Viewport::default().is_drawable());
        assert!(!Viewport { height: f32::NAN, ..screen }.is_drawable());
        assert!(!Viewport { height: -4.0, ..screen }.is_drawable());
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(!a.intersects(&Rect::new(10, 0, 5, 5)));
        assert!(a.intersects(&Rect::new(9, 9, 5, 5)));
    }

    #[test]
    fn negative_inflate_shrinks_from_all_sides() {
        let shrunk = Rect::new(0, 0, 100, 40).inflate(-6, -6);
        assert_eq!(shrunk, Rect::new(6, 6, 88, 28));
    }

    #[test]
    fn quarter_turn_rotation() {
        let v = Vec2::new(1.0, 0.0).rotated(std::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }
}
