use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, warn};

use crate::{
    app::keybind::KeybindList,
    domain::{style::RayStyle, weather::WeatherState},
};

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Bounds {
    #[must_use]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }
}

pub const SCALE_BOUNDS: Bounds = Bounds {
    min: 0.1,
    max: 3.0,
    step: 0.01,
};
pub const INTENSITY_BOUNDS: Bounds = Bounds {
    min: 1.0,
    max: 32.0,
    step: 1.0,
};
pub const SPEED_BOUNDS: Bounds = Bounds {
    min: 1.0,
    max: 100.0,
    step: 1.0,
};
pub const OPACITY_BOUNDS: Bounds = Bounds {
    min: 0.1,
    max: 3.0,
    step: 0.1,
};

const DEFAULT_SCALE: f32 = 0.65;
const DEFAULT_INTENSITY: f32 = 4.0;
const DEFAULT_SPEED: f32 = 20.0;
const DEFAULT_OPACITY: f32 = 1.0;
/// Closer than this to a default counts as the default.
const DEFAULT_EPSILON: f32 = 0.001;

/// The knobs that can differ per weather.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Tuning {
    #[serde(rename = "EnableRays")]
    pub enabled: bool,
    #[serde(rename = "RayScale")]
    scale: f32,
    #[serde(rename = "RayIntensity")]
    intensity: f32,
    #[serde(rename = "RayAnimationSpeed")]
    animation_speed: f32,
    #[serde(rename = "RayOpacityModifier")]
    opacity: f32,
    pub fade_under_clouds: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            enabled: true,
            scale: DEFAULT_SCALE,
            intensity: DEFAULT_INTENSITY,
            animation_speed: DEFAULT_SPEED,
            opacity: DEFAULT_OPACITY,
            fade_under_clouds: true,
        }
    }
}

impl Tuning {
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[must_use]
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    #[must_use]
    pub fn animation_speed(&self) -> f32 {
        self.animation_speed
    }

    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn set_scale(&mut self, value: f32) {
        self.scale = SCALE_BOUNDS.clamp(value);
    }

    pub fn set_intensity(&mut self, value: f32) {
        self.intensity = INTENSITY_BOUNDS.clamp(value);
    }

    pub fn set_animation_speed(&mut self, value: f32) {
        self.animation_speed = SPEED_BOUNDS.clamp(value);
    }

    pub fn set_opacity(&mut self, value: f32) {
        self.opacity = OPACITY_BOUNDS.clamp(value);
    }

    fn sanitize(&mut self) {
        self.set_scale(self.scale);
        self.set_intensity(self.intensity);
        self.set_animation_speed(self.animation_speed);
        self.set_opacity(self.opacity);
    }

    #[must_use]
    pub fn matches_defaults(&self) -> bool {
        SparseTuning::from(self) == SparseTuning::default()
    }
}

fn changed<T: PartialEq>(value: T, default: T) -> Option<T> {
    (value != default).then_some(value)
}

fn changed_f32(value: f32, default: f32) -> Option<f32> {
    ((value - default).abs() >= DEFAULT_EPSILON).then_some(value)
}

/// The knobs of a weather entry that moved away from their defaults.
#[derive(Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SparseTuning {
    #[serde(rename = "EnableRays", skip_serializing_if = "Option::is_none")]
    enabled: Option<bool>,
    #[serde(rename = "RayScale", skip_serializing_if = "Option::is_none")]
    scale: Option<f32>,
    #[serde(rename = "RayIntensity", skip_serializing_if = "Option::is_none")]
    intensity: Option<f32>,
    #[serde(rename = "RayAnimationSpeed", skip_serializing_if = "Option::is_none")]
    animation_speed: Option<f32>,
    #[serde(rename = "RayOpacityModifier", skip_serializing_if = "Option::is_none")]
    opacity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fade_under_clouds: Option<bool>,
}

impl From<&Tuning> for SparseTuning {
    fn from(tuning: &Tuning) -> Self {
        let defaults = Tuning::default();
        Self {
            enabled: changed(tuning.enabled, defaults.enabled),
            scale: changed_f32(tuning.scale, defaults.scale),
            intensity: changed_f32(tuning.intensity, defaults.intensity),
            animation_speed: changed_f32(tuning.animation_speed, defaults.animation_speed),
            opacity: changed_f32(tuning.opacity, defaults.opacity),
            fade_under_clouds: changed(tuning.fade_under_clouds, defaults.fade_under_clouds),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SparseWeatherTuning {
    use_generic_settings: bool,
    #[serde(flatten)]
    tuning: SparseTuning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct WeatherTuning {
    pub use_generic_settings: bool,
    #[serde(flatten)]
    pub tuning: Tuning,
}

impl Default for WeatherTuning {
    fn default() -> Self {
        Self {
            use_generic_settings: true,
            tuning: Tuning::default(),
        }
    }
}

impl WeatherTuning {
    fn is_customized(&self) -> bool {
        !self.use_generic_settings || !self.tuning.matches_defaults()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RenderConfig {
    pub toggle_location_key: KeybindList,
    pub toggle_weather_key: KeybindList,
    pub speed_up_key: KeybindList,
    pub speed_down_key: KeybindList,
    #[serde(rename = "RayStyle")]
    pub style: RayStyle,
    pub only_when_sunny: bool,
    #[serde(flatten)]
    pub generic: Tuning,
    #[serde(
        rename = "WeatherSpecificConfigs",
        serialize_with = "serialize_customized_weather"
    )]
    pub weather: BTreeMap<String, WeatherTuning>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            toggle_location_key: KeybindList::unbound(),
            toggle_weather_key: KeybindList::unbound(),
            speed_up_key: KeybindList::unbound(),
            speed_down_key: KeybindList::unbound(),
            style: RayStyle::default(),
            only_when_sunny: true,
            generic: Tuning::default(),
            weather: BTreeMap::new(),
        }
    }
}

fn serialize_customized_weather<S: Serializer>(
    weather: &BTreeMap<String, WeatherTuning>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let customized = weather
        .iter()
        .filter(|(_, entry)| entry.is_customized())
        .map(|(id, entry)| {
            let sparse = SparseWeatherTuning {
                use_generic_settings: entry.use_generic_settings,
                tuning: SparseTuning::from(&entry.tuning),
            };
            (id, sparse)
        })
        .collect::<BTreeMap<_, _>>();
    customized.serialize(serializer)
}

impl RenderConfig {
    /// Restores defaults in place. Per-weather entries are kept but reset
    /// to follow the generic settings again.
    pub fn reset(&mut self) {
        let weather_ids = self.weather.keys().cloned().collect::<Vec<_>>();
        *self = Self::default();
        for id in weather_ids {
            self.weather.insert(id, WeatherTuning::default());
        }
    }

    pub fn sanitize(&mut self) {
        self.generic.sanitize();
        for entry in self.weather.values_mut() {
            entry.tuning.sanitize();
        }
    }

    #[must_use]
    pub fn weather_entry(&self, id: &str) -> Option<&WeatherTuning> {
        self.weather
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(id))
            .map(|(_, entry)| entry)
    }

    pub fn weather_entry_mut(&mut self, id: &str) -> &mut WeatherTuning {
        let key = self
            .weather
            .keys()
            .find(|key| key.eq_ignore_ascii_case(id))
            .cloned()
            .unwrap_or_else(|| id.to_string());
        self.weather.entry(key).or_default()
    }

    /// Tuning in force for the given weather, or `None` when rays are off.
    /// A weather detached from the generic settings decides for itself;
    /// everything else follows the generic tuning and the sunny-only rule.
    #[must_use]
    pub fn effective_tuning(&self, weather: &WeatherState) -> Option<&Tuning> {
        if let Some(entry) = self.weather_entry(&weather.id)
            && !entry.use_generic_settings
        {
            return entry.tuning.enabled.then_some(&entry.tuning);
        }
        if self.only_when_sunny && !weather.flags.is_clear() {
            return None;
        }
        self.generic.enabled.then_some(&self.generic)
    }

    /// The tuning a live adjustment should write to for this weather.
    pub fn active_tuning_mut(&mut self, weather_id: &str) -> &mut Tuning {
        let detached = self
            .weather_entry(weather_id)
            .is_some_and(|entry| !entry.use_generic_settings);
        if detached {
            &mut self.weather_entry_mut(weather_id).tuning
        } else {
            &mut self.generic
        }
    }

    /// Flips rays for one weather, detaching it from the generic settings
    /// first so its other values carry over. Returns the new state.
    pub fn toggle_weather(&mut self, weather: &WeatherState) -> bool {
        let enabled = self.effective_tuning(weather).is_none();
        let generic = self.generic.clone();
        let entry = self.weather_entry_mut(&weather.id);
        if entry.use_generic_settings {
            entry.tuning = generic;
            entry.use_generic_settings = false;
        }
        entry.tuning.enabled = enabled;
        enabled
    }
}

#[must_use]
pub fn load_render_config(path: &Path) -> RenderConfig {
    let mut config = match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<RenderConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "config unreadable, using defaults");
                RenderConfig::default()
            }
        },
        Err(err) => {
            debug!(path = %path.display(), error = %err, "no saved config");
            RenderConfig::default()
        }
    };
    config.sanitize();
    config
}

pub fn save_render_config(path: &Path, config: &RenderConfig) -> anyhow::Result<()> {
    let payload =
        serde_json::to_string_pretty(config).context("serializing config payload failed")?;
    write_private(path, &payload).context("writing config file failed")
}

pub fn clear_render_config(path: &Path) -> anyhow::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).context("removing config file failed"),
    }
}

pub(crate) fn write_private(path: &Path, payload: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, payload)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

/// Data directory for the preview host: `LIGHTSHAFTS_CONFIG_DIR` if set,
/// otherwise `~/.config/lightshafts`.
#[must_use]
pub fn default_data_dir() -> Option<PathBuf> {
    if let Some(base) = std::env::var_os("LIGHTSHAFTS_CONFIG_DIR") {
        return Some(PathBuf::from(base));
    }

    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".config").join("lightshafts"))
}
