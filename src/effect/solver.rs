use crate::{
    app::settings::Tuning,
    domain::{
        clock::{DAWN, DarknessThresholds, NOON},
        color::{Tint, lerp},
        geometry::Viewport,
        style::{AngleSet, RayStyle},
    },
    effect::sampler::EnvironmentSample,
};

pub const DAYTIME_TINT: Tint = Tint::rgb8(255, 255, 255);
pub const EARLY_SUNSET_TINT: Tint = Tint::rgb8(255, 229, 138);
pub const LATE_SUNSET_TINT: Tint = Tint::rgb8(238, 108, 69);
pub const NIGHT_TINT: Tint = Tint::WHITE;

/// Screen height share and sprite size the zoom factor is tuned against.
const ZOOM_HEIGHT_SHARE: f32 = 0.6;
const SPRITE_REFERENCE: f32 = 128.0;
const SPACING_REFERENCE: f32 = 32.0;

/// Where the sun is on its arc: how far from dawn to noon, or from noon to
/// full dark. Progress is clamped to `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DayArc {
    Morning(f32),
    Afternoon(f32),
}

fn progress(minutes: f32, from: f32, to: f32) -> f32 {
    let span = to - from;
    if span <= 0.0 {
        return 1.0;
    }
    ((minutes - from) / span).clamp(0.0, 1.0)
}

impl DayArc {
    #[must_use]
    pub fn at(minutes: f32, darkness: &DarknessThresholds) -> Self {
        let noon = NOON.minutes() as f32;
        if minutes <= noon {
            Self::Morning(progress(minutes, DAWN.minutes() as f32, noon))
        } else {
            Self::Afternoon(progress(minutes, noon, darkness.truly.minutes() as f32))
        }
    }

    #[must_use]
    pub fn interpolate(self, morning: f32, noon: f32, night: f32) -> f32 {
        match self {
            Self::Morning(p) => lerp(morning, noon, p),
            Self::Afternoon(p) => lerp(noon, night, p),
        }
    }
}

#[must_use]
pub fn rotation(arc: DayArc, angles: AngleSet) -> f32 {
    arc.interpolate(angles.morning, angles.noon, angles.night)
        .to_radians()
}

/// Day color until an hour before dusk, then through the two sunset colors
/// to night at full dark.
#[must_use]
pub fn tint_at(minutes: f32, darkness: &DarknessThresholds) -> Tint {
    let early = darkness.dusk_transition_start().minutes() as f32;
    let starting = darkness.starting.minutes() as f32;
    let moderate = darkness.moderate.minutes() as f32;
    let truly = darkness.truly.minutes() as f32;

    if minutes < early {
        DAYTIME_TINT
    } else if minutes < starting {
        DAYTIME_TINT.lerp(EARLY_SUNSET_TINT, progress(minutes, early, starting))
    } else if minutes < moderate {
        EARLY_SUNSET_TINT.lerp(LATE_SUNSET_TINT, progress(minutes, starting, moderate))
    } else if minutes < truly {
        LATE_SUNSET_TINT.lerp(NIGHT_TINT, progress(minutes, moderate, truly))
    } else {
        NIGHT_TINT
    }
}

#[must_use]
pub fn time_opacity(minutes: f32, darkness: &DarknessThresholds) -> f32 {
    let moderate = darkness.moderate.minutes() as f32;
    let truly = darkness.truly.minutes() as f32;
    if minutes >= truly {
        return 0.0;
    }
    lerp(1.0, 0.0, progress(minutes, moderate, truly))
}

/// Fades oversized rays. Keyed off a per-style baseline scale rather than
/// the rays' actual screen coverage.
#[must_use]
pub fn scale_correction(scale: f32, style: RayStyle) -> f32 {
    let baseline = style.baseline_scale();
    if scale <= baseline {
        return 1.0;
    }
    (1.0 - (scale - baseline).abs()).clamp(0.5, 1.0)
}

#[must_use]
pub fn zoom_factor(viewport_height: f32) -> f32 {
    viewport_height * ZOOM_HEIGHT_SHARE / SPRITE_REFERENCE
}

/// Map pixels between consecutive ray indices, before zoom is applied to
/// positions. Truncated to whole pixels and never zero.
#[must_use]
pub fn spacing(intensity: f32, zoom: f32) -> i32 {
    ((SPACING_REFERENCE / intensity * zoom) as i32).max(1)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawParameters {
    pub style: RayStyle,
    pub rotation: f32,
    pub arc: DayArc,
    /// Time-of-day tint with the scale correction already applied.
    pub tint: Tint,
    pub time_opacity: f32,
    pub scale_correction: f32,
    pub zoom: f32,
    pub intensity: f32,
    pub scale: f32,
    pub animation_speed: f32,
    pub opacity: f32,
    pub cloud_factor: f32,
    pub viewport: Viewport,
    pub map_width: f32,
}

impl DrawParameters {
    #[must_use]
    pub fn spacing(&self) -> i32 {
        spacing(self.intensity, self.zoom)
    }
}

#[must_use]
pub fn solve(sample: &EnvironmentSample, tuning: &Tuning, style: RayStyle) -> DrawParameters {
    let minutes = sample.minutes();
    let arc = DayArc::at(minutes, &sample.darkness);
    let scale = tuning.scale();
    let correction = scale_correction(scale, style);

    let mut tint = tint_at(minutes, &sample.darkness);
    if scale > style.baseline_scale() {
        tint = tint.scaled(correction * style.correction_gain());
    }

    DrawParameters {
        style,
        rotation: rotation(arc, style.angles()),
        arc,
        tint,
        time_opacity: time_opacity(minutes, &sample.darkness),
        scale_correction: correction,
        zoom: zoom_factor(sample.viewport.height),
        intensity: tuning.intensity(),
        scale,
        animation_speed: tuning.animation_speed(),
        opacity: tuning.opacity(),
        cloud_factor: if tuning.fade_under_clouds {
            sample.cloud_factor
        } else {
            1.0
        },
        viewport: sample.viewport,
        map_width: sample.map_width,
    }
}
