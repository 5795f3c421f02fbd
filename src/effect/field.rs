use std::ops::Range;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::{
    domain::{
        color::{Tint, lerp},
        geometry::{Rect, Vec2},
    },
    effect::solver::DrawParameters,
};

const FOLLOW_DAMPING: f32 = 1.05;
const SMALL_RAY_DAMPING: f32 = 1.5;
const SOURCE_WIDTH_SHARE: f32 = 4.0;
const VERTICAL_JITTER: f32 = 32.0;

/// Seed for one visit to a location. Every frame replays the same stream, so
/// the set of rays stays put while their animation moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RayStream {
    seed: u64,
}

impl RayStream {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }

    #[must_use]
    pub fn field<'p>(&self, params: &'p DrawParameters, elapsed_seconds: f64) -> RayField<'p> {
        RayField {
            params,
            rng: self.rng(),
            indices: index_range(params),
            elapsed_seconds,
        }
    }
}

fn uniform(rng: &mut Pcg32, from: f32, to: f32) -> f32 {
    from + (to - from) * rng.random::<f32>()
}

fn ease_in_out_quad(x: f32) -> f32 {
    if x < 0.5 {
        2.0 * x * x
    } else {
        1.0 - (-2.0 * x + 2.0).powi(2) / 2.0
    }
}

/// First index sits one reference sprite off the left edge; the last covers
/// the map at the configured spacing. Empty when there is no zoom to lay
/// rays out with.
#[must_use]
pub fn index_range(params: &DrawParameters) -> Range<i32> {
    if !(params.zoom.is_finite() && params.zoom > 0.0) {
        return 0..0;
    }
    let start = -((128.0 / params.zoom) as i32);
    let end = params.map_width as i32 / params.spacing();
    start..end
}

/// Moves `x` right by whole periods of `map_width + extent` until it is no
/// further left than `-extent`.
#[must_use]
pub fn wrap_x(x: f32, extent: f32, map_width: f32) -> f32 {
    if x >= -extent {
        return x;
    }
    let period = map_width + extent;
    if period <= 0.0 {
        return x;
    }
    let mut wrapped = x + ((-extent - x) / period).ceil() * period;
    if wrapped < -extent {
        wrapped += period;
    }
    wrapped
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayInstance {
    pub index: i32,
    /// Degrees of animation travelled so far; grows with elapsed time.
    pub sweep: f32,
    /// `sweep` folded into one cycle and halved.
    pub phase: f32,
    pub fade: f32,
    pub variant: usize,
    pub source: Rect,
    pub origin: Vec2,
    pub position: Vec2,
    pub scale: f32,
    pub color: Tint,
}

/// Lazily yields one ray per index. Draws from the stream in a fixed order
/// per ray, so the same seed and parameters always produce the same field.
#[derive(Debug, Clone)]
pub struct RayField<'p> {
    params: &'p DrawParameters,
    rng: Pcg32,
    indices: Range<i32>,
    elapsed_seconds: f64,
}

impl RayField<'_> {
    fn vertical_compensation(&self) -> f32 {
        let p = self.params;
        let morning = p.viewport.y / p.zoom / FOLLOW_DAMPING;
        p.arc.interpolate(morning, 0.0, -morning)
    }

    fn ray(&mut self, index: i32) -> RayInstance {
        let p = self.params;
        let base_sweep = (self.elapsed_seconds * f64::from(p.animation_speed)) as f32;

        let desync = uniform(&mut self.rng, 0.75, 1.0);
        let spread = uniform(&mut self.rng, 0.2, 5.0);
        let sweep = base_sweep * desync * spread;
        let phase = (sweep % 360.0) / 2.0;
        let fade = ease_in_out_quad(phase.to_radians()).clamp(0.0, 1.0);

        let opacity_jitter = uniform(&mut self.rng, 0.25, 0.5);
        let color = p
            .tint
            .scaled(fade)
            .scaled((opacity_jitter + p.scale_correction).clamp(0.0, 1.0))
            .scaled(p.time_opacity)
            .scaled(p.opacity)
            .scaled(p.cloud_factor);

        let stagger = uniform(&mut self.rng, 24.0, 32.0);
        let mut offset = lerp(-stagger, 0.0, phase / 360.0);

        let variants = p.style.variants();
        let variant = self.rng.random_range(0..variants.len());
        let sprite = variants[variant];
        let source = sprite.source;

        let scale = p.zoom * p.scale * uniform(&mut self.rng, 0.85, 1.15);

        let mut follow = p.viewport.x / p.zoom / FOLLOW_DAMPING;
        let mut vertical = self.vertical_compensation();
        let coverage = source.height as f32 * scale / p.viewport.height;
        if coverage < 1.0 {
            vertical *= coverage / SMALL_RAY_DAMPING;
            follow *= coverage / SMALL_RAY_DAMPING;
        }
        offset += follow + vertical;

        let step = source.width as f32 / SOURCE_WIDTH_SHARE / p.intensity;
        let extent = source.width as f32 * scale;
        let x = wrap_x((index as f32 * step - offset) * p.zoom, extent, p.map_width);
        let y = uniform(&mut self.rng, 0.0, -VERTICAL_JITTER * p.zoom);

        RayInstance {
            index,
            sweep,
            phase,
            fade,
            variant,
            source,
            origin: sprite.origin(scale),
            position: Vec2::new(x, y),
            scale,
            color,
        }
    }
}

impl Iterator for RayField<'_> {
    type Item = RayInstance;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.indices.next()?;
        Some(self.ray(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl ExactSizeIterator for RayField<'_> {}
