use std::path::PathBuf;

use tracing::{debug, warn};

use crate::{
    app::{overrides::OverrideBook, settings::RenderConfig},
    effect::{
        field::RayStream,
        render::draw_field,
        sampler::{CloudCover, EnvironmentSample},
        solver::{DrawParameters, solve},
        textures::TextureCache,
    },
    host::{
        AssetError, ContentLoader, Hud, HudKind, HudMessage, HudTag, SpriteSurface, WorldView,
    },
};

/// Live effect for one loaded save. Created when a save loads and dropped on
/// return to title.
#[derive(Debug)]
pub struct RayRenderer {
    stream: RayStream,
    cloud: CloudCover,
    overrides: OverrideBook,
    textures: TextureCache,
    params: Option<DrawParameters>,
}

impl RayRenderer {
    #[must_use]
    pub fn new(seed: u64, overrides_path: PathBuf) -> Self {
        Self {
            stream: RayStream::new(seed),
            cloud: CloudCover::default(),
            overrides: OverrideBook::new(overrides_path),
            textures: TextureCache::default(),
            params: None,
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.stream.seed()
    }

    #[must_use]
    pub fn parameters(&self) -> Option<&DrawParameters> {
        self.params.as_ref()
    }

    #[must_use]
    pub fn cloud_factor(&self) -> f32 {
        self.cloud.factor()
    }

    pub fn should_draw(&mut self, world: &dyn WorldView) -> bool {
        world
            .location()
            .is_some_and(|location| self.overrides.is_enabled(&location.name, location.is_outdoors))
    }

    /// Per-tick recompute. Leaves no parameters behind when rays are off for
    /// this location or weather.
    pub fn update(&mut self, world: &dyn WorldView, config: &RenderConfig) {
        let Some(location) = world.location() else {
            self.params = None;
            return;
        };
        if !self.overrides.is_enabled(&location.name, location.is_outdoors) {
            self.params = None;
            return;
        }
        let sample = EnvironmentSample::capture(world, &location, &mut self.cloud);
        if !sample.viewport.is_drawable() {
            self.params = None;
            return;
        }
        self.params = config
            .effective_tuning(&world.weather())
            .map(|tuning| solve(&sample, tuning, config.style));
    }

    pub fn render(
        &mut self,
        world: &dyn WorldView,
        loader: &mut dyn ContentLoader,
        surface: &mut dyn SpriteSurface,
    ) -> Result<usize, AssetError> {
        if !self.should_draw(world) {
            return Ok(0);
        }
        let Some(params) = self.params.as_ref() else {
            return Ok(0);
        };
        let texture = self.textures.get(loader, params.style)?;
        let elapsed = world.clock().elapsed_seconds();
        let rays = self.stream.field(params, elapsed);
        Ok(draw_field(surface, texture, params.rotation, rays))
    }

    /// A new visit gets a new arrangement of rays.
    pub fn on_warped(&mut self, world: &dyn WorldView, hud: &mut dyn Hud) {
        self.stream = RayStream::new(world.clock().arrival_seed());
        debug!(seed = self.stream.seed(), "ray field reseeded");
        hud.dismiss(HudTag::LocationToggle);
    }

    /// Flips the override for the current location and confirms on the HUD.
    /// Returns the new state, or `None` without a location.
    pub fn toggle_location(&mut self, world: &dyn WorldView, hud: &mut dyn Hud) -> Option<bool> {
        let location = world.location()?;
        let enabled = match self.overrides.toggle(&location.name, location.is_outdoors) {
            Ok(enabled) => enabled,
            Err(err) => {
                warn!(error = %err, "location overrides not saved");
                self.overrides.is_enabled(&location.name, location.is_outdoors)
            }
        };
        hud.dismiss(HudTag::LocationToggle);
        hud.show(HudMessage {
            tag: HudTag::LocationToggle,
            kind: if enabled {
                HudKind::Positive
            } else {
                HudKind::Negative
            },
            text: format!(
                "Light rays {} in this location.",
                if enabled { "enabled" } else { "disabled" }
            ),
        });
        Some(enabled)
    }

    pub fn on_assets_invalidated(&mut self, names: &[String]) {
        if self.textures.invalidate(names) {
            debug!(?names, "ray textures invalidated");
        }
    }
}
