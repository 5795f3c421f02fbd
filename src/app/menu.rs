//! Settings menu description handed to the host's menu builder, plus the
//! typed getters and setters the menu calls back into.

use thiserror::Error;

use crate::{
    app::{
        keybind::KeybindList,
        settings::{
            Bounds, INTENSITY_BOUNDS, OPACITY_BOUNDS, RenderConfig, SCALE_BOUNDS, SPEED_BOUNDS,
            Tuning,
        },
    },
    domain::{
        style::RayStyle,
        weather::{VANILLA_WEATHER_IDS, WeatherRegistry},
    },
};

pub const ROOT_PAGE: &str = "";
pub const GENERIC_PAGE: &str = "GenericSettings";
pub const VANILLA_PAGE: &str = "VanillaSettings";
pub const MODDED_PAGE: &str = "ModdedSettings";

#[must_use]
pub fn weather_page_id(weather_id: &str) -> String {
    format!("Weather_{weather_id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Generic,
    Weather(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ToggleLocationKey,
    ToggleWeatherKey,
    SpeedUpKey,
    SpeedDownKey,
    Style,
    OnlyWhenSunny,
    UseGenericSettings,
    Enabled,
    Scale,
    Intensity,
    AnimationSpeed,
    Opacity,
    FadeUnderClouds,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingKey {
    pub scope: Scope,
    pub field: Field,
}

impl SettingKey {
    #[must_use]
    pub fn generic(field: Field) -> Self {
        Self {
            scope: Scope::Generic,
            field,
        }
    }

    #[must_use]
    pub fn weather(id: &str, field: Field) -> Self {
        Self {
            scope: Scope::Weather(id.to_string()),
            field,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Number(f32),
    Choice(String),
    Keybind(KeybindList),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    Plain,
    Percent,
    Multiplier,
}

impl NumberFormat {
    #[must_use]
    pub fn format(self, value: f32) -> String {
        match self {
            Self::Plain => format!("{value}"),
            Self::Percent => format!("{:.0}%", value * 100.0),
            Self::Multiplier => format!("{value}x"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptionKind {
    Bool,
    Number { bounds: Bounds, format: NumberFormat },
    Choice(Vec<String>),
    Keybind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuOption {
    pub key: SettingKey,
    pub name: &'static str,
    pub tooltip: &'static str,
    pub kind: OptionKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuItem {
    PageLink { page_id: String, text: String },
    SectionTitle(String),
    Paragraph(String),
    Option(MenuOption),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuPage {
    pub id: String,
    pub title: String,
    pub items: Vec<MenuItem>,
}

impl MenuPage {
    fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            items: Vec::new(),
        }
    }

    pub fn options(&self) -> impl Iterator<Item = &MenuOption> {
        self.items.iter().filter_map(|item| match item {
            MenuItem::Option(option) => Some(option),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MenuLayout {
    pub pages: Vec<MenuPage>,
}

impl MenuLayout {
    #[must_use]
    pub fn page(&self, id: &str) -> Option<&MenuPage> {
        self.pages.iter().find(|page| page.id == id)
    }
}

/// The third-party settings menu, when installed. The host wires its reset
/// and save buttons to the controller.
pub trait MenuHost {
    fn register(&mut self, layout: MenuLayout);
}

fn option(
    key: SettingKey,
    name: &'static str,
    tooltip: &'static str,
    kind: OptionKind,
) -> MenuItem {
    MenuItem::Option(MenuOption {
        key,
        name,
        tooltip,
        kind,
    })
}

fn number(bounds: Bounds, format: NumberFormat) -> OptionKind {
    OptionKind::Number { bounds, format }
}

fn push_tuning_options(page: &mut MenuPage, key: impl Fn(Field) -> SettingKey) {
    page.items.extend([
        option(
            key(Field::Enabled),
            "Enable Rays",
            "Draw light rays for this weather.",
            OptionKind::Bool,
        ),
        option(
            key(Field::Scale),
            "Ray Scale",
            "Size of each ray. Larger rays are drawn fainter.",
            number(SCALE_BOUNDS, NumberFormat::Percent),
        ),
        option(
            key(Field::Intensity),
            "Ray Intensity",
            "How many rays are drawn across the map.",
            number(INTENSITY_BOUNDS, NumberFormat::Plain),
        ),
        option(
            key(Field::AnimationSpeed),
            "Ray Animation Speed",
            "How fast rays fade in and out.",
            number(SPEED_BOUNDS, NumberFormat::Plain),
        ),
        option(
            key(Field::Opacity),
            "Ray Opacity",
            "Brightness multiplier for every ray.",
            number(OPACITY_BOUNDS, NumberFormat::Multiplier),
        ),
        option(
            key(Field::FadeUnderClouds),
            "Fade Under Clouds",
            "Dim rays while standing in a cloud shadow.",
            OptionKind::Bool,
        ),
    ]);
}

fn push_weather_page(
    pages: &mut Vec<MenuPage>,
    parent: &mut MenuPage,
    id: &str,
    title: &str,
    section: Option<&str>,
) {
    let page_id = weather_page_id(id);
    parent.items.push(MenuItem::PageLink {
        page_id: page_id.clone(),
        text: title.to_string(),
    });

    let mut page = MenuPage::new(page_id, title);
    if let Some(section) = section {
        page.items.push(MenuItem::SectionTitle(section.to_string()));
    }
    page.items.push(option(
        SettingKey::weather(id, Field::UseGenericSettings),
        "Use Generic Settings",
        "Follow the generic settings instead of the values below.",
        OptionKind::Bool,
    ));
    push_tuning_options(&mut page, |field| SettingKey::weather(id, field));
    pages.push(page);
}

/// Lays out the root page, the generic page, one page per vanilla weather
/// and, when the weather extension is present, one page per custom weather.
#[must_use]
pub fn build_menu(registry: Option<&dyn WeatherRegistry>) -> MenuLayout {
    let mut root = MenuPage::new(ROOT_PAGE, "Lightshafts");
    root.items.extend([
        option(
            SettingKey::generic(Field::ToggleLocationKey),
            "Toggle Location",
            "Force rays on or off for the current location.",
            OptionKind::Keybind,
        ),
        option(
            SettingKey::generic(Field::ToggleWeatherKey),
            "Toggle Weather",
            "Turn rays on or off for the current weather.",
            OptionKind::Keybind,
        ),
        option(
            SettingKey::generic(Field::SpeedUpKey),
            "Speed Up",
            "Raise the animation speed of the current weather.",
            OptionKind::Keybind,
        ),
        option(
            SettingKey::generic(Field::SpeedDownKey),
            "Slow Down",
            "Lower the animation speed of the current weather.",
            OptionKind::Keybind,
        ),
        option(
            SettingKey::generic(Field::Style),
            "Ray Style",
            "Sprite sheet used for the rays.",
            OptionKind::Choice(RayStyle::ALL.iter().map(|s| s.label().to_string()).collect()),
        ),
        MenuItem::PageLink {
            page_id: GENERIC_PAGE.to_string(),
            text: "Generic Weather Settings".to_string(),
        },
        MenuItem::PageLink {
            page_id: VANILLA_PAGE.to_string(),
            text: "Vanilla Weather Settings".to_string(),
        },
    ]);
    if registry.is_some() {
        root.items.push(MenuItem::PageLink {
            page_id: MODDED_PAGE.to_string(),
            text: "Modded Weather Settings".to_string(),
        });
    }

    let mut generic = MenuPage::new(GENERIC_PAGE, "Generic Weather Settings");
    generic.items.push(option(
        SettingKey::generic(Field::OnlyWhenSunny),
        "Only When Sunny",
        "Skip rays in rain, snow, storms and wind unless a weather overrides it.",
        OptionKind::Bool,
    ));
    push_tuning_options(&mut generic, SettingKey::generic);

    let mut weather_pages = Vec::new();
    let mut vanilla = MenuPage::new(VANILLA_PAGE, "Vanilla Weather Settings");
    for id in VANILLA_WEATHER_IDS {
        push_weather_page(&mut weather_pages, &mut vanilla, id, id, None);
    }

    let mut pages = vec![root, generic, vanilla];
    if let Some(registry) = registry {
        let mut modded = MenuPage::new(MODDED_PAGE, "Modded Weather Settings");
        let records = registry.custom_weather();
        if records.is_empty() {
            modded
                .items
                .push(MenuItem::Paragraph("No modded weathers are installed.".to_string()));
        }
        for record in &records {
            push_weather_page(
                &mut weather_pages,
                &mut modded,
                &record.id,
                &record.display_name,
                Some(&record.id),
            );
        }
        pages.push(modded);
    }
    pages.extend(weather_pages);
    MenuLayout { pages }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SettingError {
    #[error("{field:?} does not accept {value:?}")]
    TypeMismatch { field: Field, value: OptionValue },
    #[error("unknown ray style '{0}'")]
    UnknownStyle(String),
    #[error("{0:?} is only available on weather pages")]
    WeatherOnly(Field),
}

impl RenderConfig {
    fn tuning_for(&self, scope: &Scope) -> Tuning {
        match scope {
            Scope::Generic => self.generic.clone(),
            Scope::Weather(id) => self
                .weather_entry(id)
                .map(|entry| entry.tuning.clone())
                .unwrap_or_default(),
        }
    }

    fn tuning_for_mut(&mut self, scope: &Scope) -> &mut Tuning {
        match scope {
            Scope::Generic => &mut self.generic,
            Scope::Weather(id) => &mut self.weather_entry_mut(id).tuning,
        }
    }

    /// Current value behind a menu option. Weather pages without a stored
    /// entry report the defaults.
    #[must_use]
    pub fn value(&self, key: &SettingKey) -> OptionValue {
        let tuning = self.tuning_for(&key.scope);
        match key.field {
            Field::ToggleLocationKey => OptionValue::Keybind(self.toggle_location_key.clone()),
            Field::ToggleWeatherKey => OptionValue::Keybind(self.toggle_weather_key.clone()),
            Field::SpeedUpKey => OptionValue::Keybind(self.speed_up_key.clone()),
            Field::SpeedDownKey => OptionValue::Keybind(self.speed_down_key.clone()),
            Field::Style => OptionValue::Choice(self.style.label().to_string()),
            Field::OnlyWhenSunny => OptionValue::Bool(self.only_when_sunny),
            Field::UseGenericSettings => OptionValue::Bool(match &key.scope {
                Scope::Generic => true,
                Scope::Weather(id) => self
                    .weather_entry(id)
                    .is_none_or(|entry| entry.use_generic_settings),
            }),
            Field::Enabled => OptionValue::Bool(tuning.enabled),
            Field::Scale => OptionValue::Number(tuning.scale()),
            Field::Intensity => OptionValue::Number(tuning.intensity()),
            Field::AnimationSpeed => OptionValue::Number(tuning.animation_speed()),
            Field::Opacity => OptionValue::Number(tuning.opacity()),
            Field::FadeUnderClouds => OptionValue::Bool(tuning.fade_under_clouds),
        }
    }

    /// Writes a menu value. Numbers are clamped to their bounds.
    pub fn set_value(&mut self, key: &SettingKey, value: OptionValue) -> Result<(), SettingError> {
        let field = key.field;
        match (field, value) {
            (Field::ToggleLocationKey, OptionValue::Keybind(bind)) => self.toggle_location_key = bind,
            (Field::ToggleWeatherKey, OptionValue::Keybind(bind)) => self.toggle_weather_key = bind,
            (Field::SpeedUpKey, OptionValue::Keybind(bind)) => self.speed_up_key = bind,
            (Field::SpeedDownKey, OptionValue::Keybind(bind)) => self.speed_down_key = bind,
            (Field::Style, OptionValue::Choice(label)) => {
                self.style =
                    RayStyle::from_label(&label).ok_or(SettingError::UnknownStyle(label))?;
            }
            (Field::OnlyWhenSunny, OptionValue::Bool(flag)) => self.only_when_sunny = flag,
            (Field::UseGenericSettings, OptionValue::Bool(flag)) => match &key.scope {
                Scope::Generic => return Err(SettingError::WeatherOnly(field)),
                Scope::Weather(id) => self.weather_entry_mut(id).use_generic_settings = flag,
            },
            (Field::Enabled, OptionValue::Bool(flag)) => {
                self.tuning_for_mut(&key.scope).enabled = flag;
            }
            (Field::FadeUnderClouds, OptionValue::Bool(flag)) => {
                self.tuning_for_mut(&key.scope).fade_under_clouds = flag;
            }
            (Field::Scale, OptionValue::Number(n)) => self.tuning_for_mut(&key.scope).set_scale(n),
            (Field::Intensity, OptionValue::Number(n)) => {
                self.tuning_for_mut(&key.scope).set_intensity(n);
            }
            (Field::AnimationSpeed, OptionValue::Number(n)) => {
                self.tuning_for_mut(&key.scope).set_animation_speed(n);
            }
            (Field::Opacity, OptionValue::Number(n)) => {
                self.tuning_for_mut(&key.scope).set_opacity(n);
            }
            (field, value) => return Err(SettingError::TypeMismatch { field, value }),
        }
        Ok(())
    }
}
