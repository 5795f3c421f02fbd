use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{
    app::{
        events::HostEvent,
        menu::{MenuHost, OptionValue, SettingError, SettingKey, build_menu},
        overrides::OVERRIDES_FILE,
        settings::{
            CONFIG_FILE, RenderConfig, SPEED_BOUNDS, load_render_config, save_render_config,
        },
    },
    domain::weather::WeatherRegistry,
    effect::{renderer::RayRenderer, textures::bundled_file},
    host::{
        AssetError, ContentLoader, Hud, HudKind, HudMessage, HudTag, SpriteSurface, WorldView,
    },
};

/// Owns the configuration and the live renderer, and routes host callbacks
/// to them. One per process.
#[derive(Debug)]
pub struct EffectController {
    data_dir: PathBuf,
    config: RenderConfig,
    renderer: Option<RayRenderer>,
    menu_registered: bool,
}

impl EffectController {
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        let config = load_render_config(&data_dir.join(CONFIG_FILE));
        Self {
            data_dir,
            config,
            renderer: None,
            menu_registered: false,
        }
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    #[must_use]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    #[must_use]
    pub fn renderer(&self) -> Option<&RayRenderer> {
        self.renderer.as_ref()
    }

    #[must_use]
    pub fn menu_registered(&self) -> bool {
        self.menu_registered
    }

    /// Serves the bundled texture files under their logical asset names.
    #[must_use]
    pub fn asset_file(asset_name: &str) -> Option<&'static str> {
        bundled_file(asset_name)
    }

    /// One-time setup. Without a menu host the settings UI is skipped and the
    /// effect runs on the saved configuration.
    pub fn on_game_launched(
        &mut self,
        menu: Option<&mut dyn MenuHost>,
        registry: Option<&dyn WeatherRegistry>,
    ) {
        let Some(menu) = menu else {
            debug!("no settings menu available");
            return;
        };
        if registry.is_none() {
            debug!("weather extension not installed, modded weather page omitted");
        }
        menu.register(build_menu(registry));
        self.menu_registered = true;
    }

    pub fn handle_event(&mut self, event: HostEvent, world: &dyn WorldView, hud: &mut dyn Hud) {
        match event {
            HostEvent::SaveLoaded => {
                let seed = world.clock().arrival_seed();
                let mut renderer = RayRenderer::new(seed, self.data_dir.join(OVERRIDES_FILE));
                renderer.update(world, &self.config);
                self.renderer = Some(renderer);
                info!(seed, "ray renderer started");
            }
            HostEvent::ReturnedToTitle => {
                if self.renderer.take().is_some() {
                    info!("ray renderer disposed");
                }
            }
            HostEvent::Warped => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.on_warped(world, hud);
                }
            }
            HostEvent::UpdateTicked => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.update(world, &self.config);
                }
            }
            HostEvent::ButtonPressed { button, held } => {
                self.on_button_pressed(&button, &held, world, hud);
            }
            HostEvent::AssetsInvalidated(names) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.on_assets_invalidated(&names);
                }
            }
        }
    }

    pub fn render(
        &mut self,
        world: &dyn WorldView,
        loader: &mut dyn ContentLoader,
        surface: &mut dyn SpriteSurface,
    ) -> Result<usize, AssetError> {
        match self.renderer.as_mut() {
            Some(renderer) => renderer.render(world, loader, surface),
            None => Ok(0),
        }
    }

    fn on_button_pressed(
        &mut self,
        button: &str,
        held: &[String],
        world: &dyn WorldView,
        hud: &mut dyn Hud,
    ) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        if self.config.toggle_location_key.just_pressed(button, held) {
            renderer.toggle_location(world, hud);
        }
        if self.config.toggle_weather_key.just_pressed(button, held) {
            self.toggle_weather(world, hud);
        }
        if self.config.speed_up_key.just_pressed(button, held) {
            self.nudge_speed(SPEED_BOUNDS.step, world, hud);
        }
        if self.config.speed_down_key.just_pressed(button, held) {
            self.nudge_speed(-SPEED_BOUNDS.step, world, hud);
        }
    }

    fn toggle_weather(&mut self, world: &dyn WorldView, hud: &mut dyn Hud) {
        let weather = world.weather();
        let enabled = self.config.toggle_weather(&weather);
        info!(weather = %weather.id, enabled, "weather toggled");
        self.persist();
        self.refresh(world);

        hud.dismiss(HudTag::WeatherToggle);
        hud.show(HudMessage {
            tag: HudTag::WeatherToggle,
            kind: if enabled {
                HudKind::Positive
            } else {
                HudKind::Negative
            },
            text: format!(
                "Light rays {} for {} weather.",
                if enabled { "enabled" } else { "disabled" },
                weather.id
            ),
        });
    }

    fn nudge_speed(&mut self, delta: f32, world: &dyn WorldView, hud: &mut dyn Hud) {
        let weather = world.weather();
        let tuning = self.config.active_tuning_mut(&weather.id);
        tuning.set_animation_speed(tuning.animation_speed() + delta);
        let speed = tuning.animation_speed();
        debug!(weather = %weather.id, speed, "animation speed changed");
        self.persist();
        self.refresh(world);

        hud.dismiss(HudTag::AnimationSpeed);
        hud.show(HudMessage {
            tag: HudTag::AnimationSpeed,
            kind: HudKind::Positive,
            text: format!("Ray animation speed: {speed}"),
        });
    }

    fn refresh(&mut self, world: &dyn WorldView) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.update(world, &self.config);
        }
    }

    fn persist(&self) {
        if let Err(err) = self.save_config() {
            warn!(error = %err, "config not saved");
        }
    }

    #[must_use]
    pub fn menu_value(&self, key: &SettingKey) -> OptionValue {
        self.config.value(key)
    }

    pub fn set_menu_value(
        &mut self,
        key: &SettingKey,
        value: OptionValue,
    ) -> Result<(), SettingError> {
        self.config.set_value(key, value)
    }

    /// Menu "reset" button.
    pub fn reset_config(&mut self) {
        self.config.reset();
    }

    /// Menu "save" button. The renderer reads the configuration on every
    /// tick, so the next update picks the new values up.
    pub fn save_config(&self) -> anyhow::Result<()> {
        save_render_config(&self.data_dir.join(CONFIG_FILE), &self.config)
    }
}
