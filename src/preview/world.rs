use std::time::Duration;

use tracing::info;

use crate::{
    app::menu::{MenuHost, MenuLayout},
    domain::{
        clock::{ClockReading, DAWN, DarknessThresholds, END_OF_DAY, GameTime},
        geometry::{Rect, Viewport},
        style::RayStyle,
        weather::{WeatherFlags, WeatherRecord, WeatherRegistry, WeatherState},
    },
    effect::textures::asset_names_match,
    host::{
        AssetError, CloudShadow, ContentLoader, Hud, HudMessage, HudTag, LocationInfo,
        TextureHandle, WorldView,
    },
};

const MINUTES_PER_TICK: i32 = 10;
const CLOUD_ZOOM: i32 = 4;
const CLOUD_WIDTH: i32 = 147;
const CLOUD_HEIGHT: i32 = 67;
const CLOUD_DRIFT_PX_PER_SEC: f32 = 60.0;
const PLAYER_SIZE: (i32, i32) = (64, 128);
const HUD_LIFETIME: Duration = Duration::from_secs(3);
pub const MAX_TIME_SPEED: u32 = 64;

/// A small stand-in for the game: a clock in ten-minute ticks, a viewport
/// over a map, a player, and one cloud shadow drifting across the map.
#[derive(Debug, Clone)]
pub struct SimWorld {
    location: LocationInfo,
    time_of_day: GameTime,
    tick_elapsed_ms: u32,
    ms_per_minute: u32,
    total_elapsed: Duration,
    time_speed: u32,
    viewport: Viewport,
    cloud_x: f32,
    weather: WeatherState,
}

impl SimWorld {
    #[must_use]
    pub fn new(
        location: LocationInfo,
        time_of_day: GameTime,
        ms_per_minute: u32,
        weather: WeatherState,
        screen: (f32, f32),
    ) -> Self {
        Self {
            location,
            time_of_day,
            tick_elapsed_ms: 0,
            ms_per_minute: ms_per_minute.max(1),
            total_elapsed: Duration::ZERO,
            time_speed: 1,
            viewport: Viewport {
                x: 0.0,
                y: 0.0,
                width: screen.0,
                height: screen.1,
            },
            cloud_x: 0.0,
            weather,
        }
    }

    #[must_use]
    pub fn time_of_day(&self) -> GameTime {
        self.time_of_day
    }

    #[must_use]
    pub fn time_speed(&self) -> u32 {
        self.time_speed
    }

    #[must_use]
    pub fn location_info(&self) -> &LocationInfo {
        &self.location
    }

    #[must_use]
    pub fn weather_id(&self) -> &str {
        &self.weather.id
    }

    /// Real time always advances at 1x; only the game clock is sped up.
    pub fn advance(&mut self, dt: Duration) {
        self.total_elapsed += dt;
        let scaled = dt.as_millis() * u128::from(self.time_speed);
        let scaled = u32::try_from(scaled).unwrap_or(u32::MAX);
        self.tick_elapsed_ms = self.tick_elapsed_ms.saturating_add(scaled);

        let tick_ms = self.ms_per_minute * MINUTES_PER_TICK as u32;
        while self.tick_elapsed_ms >= tick_ms {
            self.tick_elapsed_ms -= tick_ms;
            self.time_of_day = self.time_of_day.add_minutes(MINUTES_PER_TICK);
            if self.time_of_day >= END_OF_DAY {
                info!("new day");
                self.time_of_day = DAWN;
            }
        }

        let period = self.location.map_width + (CLOUD_WIDTH * CLOUD_ZOOM) as f32;
        self.cloud_x -= CLOUD_DRIFT_PX_PER_SEC * dt.as_secs_f32();
        if self.cloud_x < -(CLOUD_WIDTH * CLOUD_ZOOM) as f32 {
            self.cloud_x += period;
        }
    }

    pub fn set_time_speed(&mut self, speed: u32) {
        self.time_speed = speed.clamp(1, MAX_TIME_SPEED);
    }

    pub fn skip_hour(&mut self) {
        self.time_of_day = self.time_of_day.add_minutes(60);
        if self.time_of_day >= END_OF_DAY {
            self.time_of_day = DAWN;
        }
        self.tick_elapsed_ms = 0;
    }

    pub fn toggle_outdoors(&mut self) {
        self.location.is_outdoors = !self.location.is_outdoors;
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        let max_x = (self.location.map_width - self.viewport.width).max(0.0);
        self.viewport.x = (self.viewport.x + dx).clamp(0.0, max_x);
        self.viewport.y = (self.viewport.y + dy).clamp(0.0, self.viewport.height * 2.0);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
        self.pan(0.0, 0.0);
    }

    /// Drops the cloud onto the player so the fade can be watched.
    pub fn summon_cloud(&mut self) {
        let player = self.player_bounds();
        self.cloud_x = (player.x - CLOUD_WIDTH * CLOUD_ZOOM / 2) as f32;
    }
}

impl WorldView for SimWorld {
    fn location(&self) -> Option<LocationInfo> {
        Some(self.location.clone())
    }

    fn clock(&self) -> ClockReading {
        ClockReading {
            time_of_day: self.time_of_day,
            tick_elapsed_ms: self.tick_elapsed_ms,
            ms_per_minute: self.ms_per_minute,
            total_elapsed: self.total_elapsed,
        }
    }

    fn darkness(&self) -> DarknessThresholds {
        DarknessThresholds::default()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn player_bounds(&self) -> Rect {
        let (w, h) = PLAYER_SIZE;
        let cx = (self.viewport.x + self.viewport.width / 2.0) as i32;
        let cy = (self.viewport.y + self.viewport.height / 2.0) as i32;
        Rect::new(cx - w / 2, cy - h / 2, w, h)
    }

    fn cloud_shadows(&self) -> Vec<CloudShadow> {
        let player = self.player_bounds();
        vec![CloudShadow {
            bounds: Rect::new(
                self.cloud_x as i32,
                player.y - CLOUD_HEIGHT * CLOUD_ZOOM / 2,
                CLOUD_WIDTH * CLOUD_ZOOM,
                CLOUD_HEIGHT * CLOUD_ZOOM,
            ),
            zoom: CLOUD_ZOOM,
            sprite_width: CLOUD_WIDTH,
            sprite_height: CLOUD_HEIGHT,
            flipped_horizontally: false,
            flipped_vertically: false,
        }]
    }

    fn weather(&self) -> WeatherState {
        self.weather.clone()
    }
}

/// Hands out a fixed handle per ray sheet. The preview draws procedural
/// beams, so no pixels are ever read.
#[derive(Debug, Default)]
pub struct SimContent {
    pub loads: usize,
}

impl ContentLoader for SimContent {
    fn load_texture(&mut self, asset_name: &str) -> Result<TextureHandle, AssetError> {
        let (_, id) = RayStyle::ALL
            .into_iter()
            .zip(1u32..)
            .find(|(style, _)| asset_names_match(style.asset_name(), asset_name))
            .ok_or_else(|| AssetError::NotFound(asset_name.to_string()))?;
        self.loads += 1;
        Ok(TextureHandle(id))
    }
}

#[derive(Debug, Default)]
pub struct SimHud {
    messages: Vec<(HudMessage, Duration)>,
}

impl SimHud {
    pub fn expire(&mut self, dt: Duration) {
        for (_, remaining) in &mut self.messages {
            *remaining = remaining.saturating_sub(dt);
        }
        self.messages.retain(|(_, remaining)| !remaining.is_zero());
    }

    pub fn messages(&self) -> impl Iterator<Item = &HudMessage> {
        self.messages.iter().map(|(message, _)| message)
    }
}

impl Hud for SimHud {
    fn dismiss(&mut self, tag: HudTag) {
        self.messages.retain(|(message, _)| message.tag != tag);
    }

    fn show(&mut self, message: HudMessage) {
        self.messages.push((message, HUD_LIFETIME));
    }
}

#[derive(Debug, Default)]
pub struct SimMenu {
    pub layout: Option<MenuLayout>,
}

impl MenuHost for SimMenu {
    fn register(&mut self, layout: MenuLayout) {
        self.layout = Some(layout);
    }
}

/// Custom weathers known to the preview: just the `--weather` id when it
/// isn't a vanilla one.
#[derive(Debug, Default)]
pub struct SimWeatherRegistry {
    records: Vec<WeatherRecord>,
}

impl SimWeatherRegistry {
    #[must_use]
    pub fn for_weather(id: &str) -> Self {
        if WeatherFlags::for_vanilla(id).is_some() {
            return Self::default();
        }
        Self {
            records: vec![WeatherRecord {
                id: id.to_string(),
                display_name: id.to_string(),
                flags: WeatherFlags::default(),
            }],
        }
    }
}

impl WeatherRegistry for SimWeatherRegistry {
    fn custom_weather(&self) -> Vec<WeatherRecord> {
        self.records.clone()
    }
}
