use std::time::Duration;

use crate::{
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

pub(crate) struct FakeWorld {
    pub location: Option<LocationInfo>,
    pub clock: ClockReading,
    pub darkness: DarknessThresholds,
    pub viewport: Viewport,
    pub player: Rect,
    pub clouds: Vec<CloudShadow>,
    pub weather: WeatherState,
}

impl FakeWorld {
    pub(crate) fn outdoors(name: &str) -> Self {
        Self {
            location: Some(LocationInfo {
                name: name.to_string(),
                is_outdoors: true,
                map_width: 2560.0,
            }),
            clock: ClockReading {
                total_elapsed: Duration::from_secs(90),
                ..ClockReading::at(GameTime(1000))
            },
            darkness: DarknessThresholds::default(),
            viewport: Viewport {
                x: 320.0,
                y: 160.0,
                width: 1280.0,
                height: 720.0,
            },
            player: Rect::new(900, 500, 64, 128),
            clouds: Vec::new(),
            weather: WeatherState::sunny(),
        }
    }

    pub(crate) fn indoors(name: &str) -> Self {
        let mut world = Self::outdoors(name);
        if let Some(location) = world.location.as_mut() {
            location.is_outdoors = false;
        }
        world
    }

    pub(crate) fn cloud_over_player(&self) -> CloudShadow {
        CloudShadow {
            bounds: self.player.inflate(100, 100),
            zoom: 4,
            sprite_width: 147,
            sprite_height: 67,
            flipped_horizontally: false,
            flipped_vertically: false,
        }
    }
}

impl WorldView for FakeWorld {
    fn location(&self) -> Option<LocationInfo> {
        self.location.clone()
    }

    fn clock(&self) -> ClockReading {
        self.clock
    }

    fn darkness(&self) -> DarknessThresholds {
        self.darkness
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn player_bounds(&self) -> Rect {
        self.player
    }

    fn cloud_shadows(&self) -> Vec<CloudShadow> {
        self.clouds.clone()
    }

    fn weather(&self) -> WeatherState {
        self.weather.clone()
    }
}

#[derive(Default)]
pub(crate) struct FakeLoader {
    pub requests: Vec<String>,
    pub missing: bool,
}

impl ContentLoader for FakeLoader {
    fn load_texture(&mut self, asset_name: &str) -> Result<TextureHandle, AssetError> {
        if self.missing {
            return Err(AssetError::NotFound(asset_name.to_string()));
        }
        self.requests.push(asset_name.to_string());
        Ok(TextureHandle(7))
    }
}

pub(crate) struct RecordingSurface {
    pub mode: BlendMode,
    pub open: bool,
    pub draws: Vec<(BlendMode, SpriteDraw)>,
    pub switches: usize,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            mode: BlendMode::AlphaBlend,
            open: true,
            draws: Vec::new(),
            switches: 0,
        }
    }
}

impl SpriteSurface for RecordingSurface {
    fn blend_mode(&self) -> BlendMode {
        self.mode
    }

    fn begin(&mut self, mode: BlendMode) {
        self.mode = mode;
        self.open = true;
        self.switches += 1;
    }

    fn end(&mut self) {
        self.open = false;
    }

    fn draw(&mut self, _texture: TextureHandle, sprite: &SpriteDraw) {
        assert!(self.open, "draw outside of an open batch");
        self.draws.push((self.mode, *sprite));
    }
}

#[derive(Default)]
pub(crate) struct RecordingHud {
    pub shown: Vec<HudMessage>,
    pub dismissed: Vec<HudTag>,
}

impl Hud for RecordingHud {
    fn dismiss(&mut self, tag: HudTag) {
        self.dismissed.push(tag);
        self.shown.retain(|message| message.tag != tag);
    }

    fn show(&mut self, message: HudMessage) {
        self.shown.push(message);
    }
}
