#![allow(dead_code)]

use std::time::Duration;

use lightshafts::{
    app::{
        controller::EffectController,
        keybind::KeybindList,
        menu::{Field, OptionValue, SettingKey},
    },
    domain::{
        clock::{ClockReading, DarknessThresholds, GameTime},
        geometry::{Rect, Viewport},
        weather::WeatherState,
    },
    host::{
        AssetError, BlendMode, CloudShadow, ContentLoader, Hud, HudMessage, HudTag, LocationInfo,
        SpriteDraw, SpriteSurface, TextureHandle, WorldView,
    },
};

pub struct StubWorld {
    pub location: Option<LocationInfo>,
    pub clock: ClockReading,
    pub viewport: Viewport,
    pub clouds: Vec<CloudShadow>,
    pub weather: WeatherState,
}

impl StubWorld {
    pub fn outdoors(name: &str, time: GameTime) -> Self {
        Self {
            location: Some(LocationInfo {
                name: name.to_string(),
                is_outdoors: true,
                map_width: 3200.0,
            }),
            clock: ClockReading {
                total_elapsed: Duration::from_millis(45_500),
                ..ClockReading::at(time)
            },
            viewport: Viewport {
                x: 0.0,
                y: 0.0,
                width: 1280.0,
                height: 720.0,
            },
            clouds: Vec::new(),
            weather: WeatherState::sunny(),
        }
    }

    pub fn indoors(name: &str, time: GameTime) -> Self {
        let mut world = Self::outdoors(name, time);
        if let Some(location) = world.location.as_mut() {
            location.is_outdoors = false;
        }
        world
    }

    pub fn later(&mut self, seconds: u64) {
        self.clock.total_elapsed += Duration::from_secs(seconds);
    }
}

impl WorldView for StubWorld {
    fn location(&self) -> Option<LocationInfo> {
        self.location.clone()
    }

    fn clock(&self) -> ClockReading {
        self.clock
    }

    fn darkness(&self) -> DarknessThresholds {
        DarknessThresholds::default()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn player_bounds(&self) -> Rect {
        Rect::new(608, 296, 64, 128)
    }

    fn cloud_shadows(&self) -> Vec<CloudShadow> {
        self.clouds.clone()
    }

    fn weather(&self) -> WeatherState {
        self.weather.clone()
    }
}

#[derive(Default)]
pub struct StubLoader {
    pub loads: Vec<String>,
}

impl ContentLoader for StubLoader {
    fn load_texture(&mut self, asset_name: &str) -> Result<TextureHandle, AssetError> {
        self.loads.push(asset_name.to_string());
        Ok(TextureHandle(self.loads.len() as u32))
    }
}

pub struct CountingSurface {
    pub mode: BlendMode,
    pub additive_draws: Vec<SpriteDraw>,
}

impl Default for CountingSurface {
    fn default() -> Self {
        Self {
            mode: BlendMode::AlphaBlend,
            additive_draws: Vec::new(),
        }
    }
}

impl SpriteSurface for CountingSurface {
    fn blend_mode(&self) -> BlendMode {
        self.mode
    }

    fn begin(&mut self, mode: BlendMode) {
        self.mode = mode;
    }

    fn end(&mut self) {}

    fn draw(&mut self, _texture: TextureHandle, sprite: &SpriteDraw) {
        if self.mode == BlendMode::Additive {
            self.additive_draws.push(*sprite);
        }
    }
}

#[derive(Default)]
pub struct LogHud {
    pub lines: Vec<HudMessage>,
}

impl Hud for LogHud {
    fn dismiss(&mut self, tag: HudTag) {
        self.lines.retain(|line| line.tag != tag);
    }

    fn show(&mut self, message: HudMessage) {
        self.lines.push(message);
    }
}

/// Controller on a scratch directory with every action bound to a plain key.
pub fn bound_controller(dir: &tempfile::TempDir) -> EffectController {
    let mut controller = EffectController::new(dir.path().to_path_buf());
    for (field, button) in [
        (Field::ToggleLocationKey, "F6"),
        (Field::ToggleWeatherKey, "F7"),
        (Field::SpeedUpKey, "F8"),
        (Field::SpeedDownKey, "F9"),
    ] {
        controller
            .set_menu_value(
                &SettingKey::generic(field),
                OptionValue::Keybind(KeybindList::single(button)),
            )
            .expect("keybind setting");
    }
    controller
}
