use crate::{
    domain::{
        clock::{ClockReading, DarknessThresholds},
        geometry::{Rect, Viewport},
    },
    host::{CloudShadow, LocationInfo, WorldView},
};

const CLOUD_STEP: f32 = 0.03;

/// Smoothed "standing under a cloud" signal. 1.0 is clear sky, 0.0 fully
/// shaded; each update moves one fixed step toward the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudCover {
    factor: f32,
}

impl Default for CloudCover {
    fn default() -> Self {
        Self { factor: 1.0 }
    }
}

impl CloudCover {
    #[must_use]
    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn step(&mut self, covered: bool) {
        self.factor = if covered {
            (self.factor - CLOUD_STEP).max(0.0)
        } else {
            (self.factor + CLOUD_STEP).min(1.0)
        };
    }

    #[must_use]
    pub fn is_covered(player: &Rect, shadows: &[CloudShadow]) -> bool {
        shadows
            .iter()
            .any(|shadow| shadow.shade_box().intersects(player))
    }

    /// Indoors there are no clouds to check and the factor holds still.
    pub fn observe(&mut self, world: &dyn WorldView, location: &LocationInfo) {
        if !location.is_outdoors {
            return;
        }
        let covered = Self::is_covered(&world.player_bounds(), &world.cloud_shadows());
        self.step(covered);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentSample {
    pub clock: ClockReading,
    pub darkness: DarknessThresholds,
    pub viewport: Viewport,
    pub map_width: f32,
    pub cloud_factor: f32,
}

impl EnvironmentSample {
    /// Reads the world once and advances the cloud smoothing by one step.
    pub fn capture(
        world: &dyn WorldView,
        location: &LocationInfo,
        cloud: &mut CloudCover,
    ) -> Self {
        cloud.observe(world, location);
        Self {
            clock: world.clock(),
            darkness: world.darkness(),
            viewport: world.viewport(),
            map_width: location.map_width,
            cloud_factor: cloud.factor(),
        }
    }

    #[must_use]
    pub fn minutes(&self) -> f32 {
        self.clock.continuous_minutes()
    }
}
