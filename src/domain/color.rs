use serde::{Deserialize, Serialize};

#[must_use]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Premultiplied color with channels in `0.0..=1.0`. Scaling attenuates
/// every channel including alpha, matching how the host's sprite batch
/// treats tinted additive sprites.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tint {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Tint {
    pub const WHITE: Tint = Tint::rgb8(255, 255, 255);
    pub const TRANSPARENT: Tint = Tint {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    #[must_use]
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    #[must_use]
    pub fn lerp(self, to: Tint, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: lerp(self.r, to.r, t),
            g: lerp(self.g, to.g, t),
            b: lerp(self.b, to.b, t),
            a: lerp(self.a, to.a, t),
        }
    }

    /// Channels saturate at 1.0 after every multiply.
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        let f = factor.max(0.0);
        Self {
            r: (self.r * f).min(1.0),
            g: (self.g * f).min(1.0),
            b: (self.b * f).min(1.0),
            a: (self.a * f).min(1.0),
        }
    }

    #[must_use]
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    #[cfg(test)]
    #[must_use]
    pub(crate) fn approx_eq(self, other: Tint) -> bool {
        const EPS: f32 = 1e-5;
        (self.r - other.r).abs() < EPS
            && (self.g - other.g).abs() < EPS
            && (self.b - other.b).abs() < EPS
            && (self.a - other.a).abs() < EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints_are_exact() {
        let from = Tint::rgb8(255, 229, 138);
        let to = Tint::rgb8(238, 108, 69);
        assert_eq!(from.lerp(to, 0.0), from);
        assert!(from.lerp(to, 1.0).approx_eq(to));
    }

    #[test]
    fn scaled_saturates_and_never_goes_negative() {
        let boosted = Tint::WHITE.scaled(1.5);
        assert_eq!(boosted, Tint::WHITE);
        let dimmed = Tint::WHITE.scaled(-2.0);
        assert_eq!(dimmed, Tint::TRANSPARENT);
    }

    #[test]
    fn rgba8_rounds_channels() {
        assert_eq!(Tint::rgb8(238, 108, 69).to_rgba8(), [238, 108, 69, 255]);
        assert_eq!(Tint::WHITE.scaled(0.5).to_rgba8(), [128, 128, 128, 128]);
    }
}
