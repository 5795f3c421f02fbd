//! Seams to the game host. Everything the effect reads from or writes to the
//! running game goes through these traits, so the effect itself never holds
//! global state.

use thiserror::Error;

use crate::domain::{
    clock::{ClockReading, DarknessThresholds},
    color::Tint,
    geometry::{Rect, Vec2, Viewport},
    weather::WeatherState,
};

#[derive(Debug, Clone, PartialEq)]
pub struct LocationInfo {
    pub name: String,
    pub is_outdoors: bool,
    pub map_width: f32,
}

/// A drifting cloud shadow as the host reports it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudShadow {
    pub bounds: Rect,
    pub zoom: i32,
    pub sprite_width: i32,
    pub sprite_height: i32,
    pub flipped_horizontally: bool,
    pub flipped_vertically: bool,
}

impl CloudShadow {
    /// The box that counts as "under the cloud". Clouds mirrored on both
    /// axes report their box one sprite up-left of where they draw, and the
    /// soft edge is trimmed off so brushing past a corner doesn't count.
    #[must_use]
    pub fn shade_box(&self) -> Rect {
        let mut shade = self.bounds;
        if self.flipped_horizontally && self.flipped_vertically {
            shade = shade.offset(
                -self.sprite_width * self.zoom,
                -self.sprite_height * self.zoom,
            );
        }
        shade.inflate(-6 * self.zoom, -6 * self.zoom)
    }
}

pub trait WorldView {
    fn location(&self) -> Option<LocationInfo>;
    fn clock(&self) -> ClockReading;
    fn darkness(&self) -> DarknessThresholds;
    fn viewport(&self) -> Viewport;
    fn player_bounds(&self) -> Rect;
    fn cloud_shadows(&self) -> Vec<CloudShadow>;
    fn weather(&self) -> WeatherState;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("failed to load asset '{name}': {details}")]
    Load { name: String, details: String },
}

pub trait ContentLoader {
    fn load_texture(&mut self, asset_name: &str) -> Result<TextureHandle, AssetError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    AlphaBlend,
    Additive,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteDraw {
    pub position: Vec2,
    pub source: Rect,
    pub color: Tint,
    pub rotation: f32,
    pub origin: Vec2,
    pub scale: f32,
    pub layer_depth: f32,
}

/// The host's immediate-mode sprite batch for the current frame. A batch is
/// open between `begin` and `end`; changing blend mode means ending the open
/// batch and starting another.
pub trait SpriteSurface {
    fn blend_mode(&self) -> BlendMode;
    fn begin(&mut self, mode: BlendMode);
    fn end(&mut self);
    fn draw(&mut self, texture: TextureHandle, sprite: &SpriteDraw);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HudTag {
    LocationToggle,
    WeatherToggle,
    AnimationSpeed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudKind {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudMessage {
    pub tag: HudTag,
    pub kind: HudKind,
    pub text: String,
}

pub trait Hud {
    fn dismiss(&mut self, tag: HudTag);
    fn show(&mut self, message: HudMessage);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shadow(flip_h: bool, flip_v: bool) -> CloudShadow {
        CloudShadow {
            bounds: Rect::new(400, 200, 147 * 4, 67 * 4),
            zoom: 4,
            sprite_width: 147,
            sprite_height: 67,
            flipped_horizontally: flip_h,
            flipped_vertically: flip_v,
        }
    }

    #[test]
    fn shade_box_trims_soft_edge() {
        let shade = shadow(false, false).shade_box();
        assert_eq!(shade, Rect::new(424, 224, 147 * 4 - 48, 67 * 4 - 48));
    }

    #[test]
    fn double_flipped_clouds_shift_up_left() {
        let shade = shadow(true, true).shade_box();
        assert_eq!(shade.x, 400 - 147 * 4 + 24);
        assert_eq!(shade.y, 200 - 67 * 4 + 24);
        let single = shadow(true, false).shade_box();
        assert_eq!(single.x, 424);
    }
}
