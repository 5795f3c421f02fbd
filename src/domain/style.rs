use serde::{Deserialize, Serialize};

use super::geometry::{Rect, Vec2};

pub const STANDARD_ASSET: &str = "Mods/Lightshafts/Rays";
pub const HIGH_DETAIL_ASSET: &str = "Mods/Lightshafts/RaysHD";

/// Ray angles in degrees at dawn, noon and full dark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSet {
    pub morning: f32,
    pub noon: f32,
    pub night: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Pivot {
    TopCenter,
    /// Horizontally centered, dropped by this many pixels per unit of draw
    /// scale.
    CenterBelowTop(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteVariant {
    pub source: Rect,
    pivot: Pivot,
}

impl SpriteVariant {
    const fn top_center(source: Rect) -> Self {
        Self {
            source,
            pivot: Pivot::TopCenter,
        }
    }

    const fn below_top(source: Rect, drop: f32) -> Self {
        Self {
            source,
            pivot: Pivot::CenterBelowTop(drop),
        }
    }

    #[must_use]
    pub fn origin(&self, draw_scale: f32) -> Vec2 {
        let half_width = self.source.width as f32 / 2.0;
        match self.pivot {
            Pivot::TopCenter => Vec2::new(half_width, 0.0),
            Pivot::CenterBelowTop(drop) => Vec2::new(half_width, drop * draw_scale),
        }
    }
}

const STANDARD_VARIANTS: [SpriteVariant; 2] = [
    SpriteVariant::top_center(Rect::new(0, 0, 128, 128)),
    SpriteVariant::top_center(Rect::new(128, 0, 128, 128)),
];

const HIGH_DETAIL_VARIANTS: [SpriteVariant; 3] = [
    SpriteVariant::below_top(Rect::new(230, 0, 100, 850), 96.0),
    SpriteVariant::below_top(Rect::new(575, 0, 215, 1015), 96.0),
    SpriteVariant::below_top(Rect::new(1065, 0, 630, 1000), 96.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RayStyle {
    #[default]
    Standard,
    HighDetail,
}

impl RayStyle {
    pub const ALL: [RayStyle; 2] = [RayStyle::Standard, RayStyle::HighDetail];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::HighDetail => "HighDetail",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|style| style.label().eq_ignore_ascii_case(label))
    }

    /// Scale above which rays start fading to keep them from washing out the
    /// screen. Chosen by eye rather than from screen coverage.
    #[must_use]
    pub fn baseline_scale(self) -> f32 {
        match self {
            Self::Standard => 0.65,
            Self::HighDetail => 0.25,
        }
    }

    #[must_use]
    pub fn angles(self) -> AngleSet {
        match self {
            Self::Standard => AngleSet {
                morning: 0.0,
                noon: -27.0,
                night: -54.0,
            },
            Self::HighDetail => AngleSet {
                morning: 45.0,
                noon: 0.0,
                night: -45.0,
            },
        }
    }

    /// Extra gain on the scale-corrected base color. The low-resolution sheet
    /// is dimmer, so its correction is divided by 0.75.
    #[must_use]
    pub fn correction_gain(self) -> f32 {
        match self {
            Self::Standard => 1.0 / 0.75,
            Self::HighDetail => 1.0,
        }
    }

    #[must_use]
    pub fn variants(self) -> &'static [SpriteVariant] {
        match self {
            Self::Standard => &STANDARD_VARIANTS,
            Self::HighDetail => &HIGH_DETAIL_VARIANTS,
        }
    }

    #[must_use]
    pub fn asset_name(self) -> &'static str {
        match self {
            Self::Standard => STANDARD_ASSET,
            Self::HighDetail => HIGH_DETAIL_ASSET,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_counts_match_sheets() {
        assert_eq!(RayStyle::Standard.variants().len(), 2);
        assert_eq!(RayStyle::HighDetail.variants().len(), 3);
    }

    #[test]
    fn high_detail_pivot_drops_with_scale() {
        let variant = RayStyle::HighDetail.variants()[1];
        assert_eq!(variant.origin(0.5), Vec2::new(107.5, 48.0));
        let standard = RayStyle::Standard.variants()[0];
        assert_eq!(standard.origin(3.0), Vec2::new(64.0, 0.0));
    }

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!(RayStyle::from_label("highdetail"), Some(RayStyle::HighDetail));
        assert_eq!(RayStyle::from_label("Standard"), Some(RayStyle::Standard));
        assert_eq!(RayStyle::from_label("Vanilla"), None);
    }
}
