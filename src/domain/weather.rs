pub const SUNNY_WEATHER: &str = "Sun";

pub const VANILLA_WEATHER_IDS: [&str; 8] = [
    "Sun",
    "Rain",
    "Wind",
    "Storm",
    "Festival",
    "Snow",
    "Wedding",
    "GreenRain",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeatherFlags {
    pub raining: bool,
    pub snowing: bool,
    pub lightning: bool,
    pub debris: bool,
    pub green_rain: bool,
}

impl WeatherFlags {
    #[must_use]
    pub fn is_clear(&self) -> bool {
        !(self.raining || self.snowing || self.lightning || self.debris || self.green_rain)
    }

    #[must_use]
    pub fn for_vanilla(id: &str) -> Option<Self> {
        let id = VANILLA_WEATHER_IDS
            .into_iter()
            .find(|known| known.eq_ignore_ascii_case(id))?;
        let flags = match id {
            "Rain" => Self {
                raining: true,
                ..Self::default()
            },
            "Wind" => Self {
                debris: true,
                ..Self::default()
            },
            "Storm" => Self {
                raining: true,
                lightning: true,
                ..Self::default()
            },
            "Snow" => Self {
                snowing: true,
                ..Self::default()
            },
            "GreenRain" => Self {
                raining: true,
                green_rain: true,
                ..Self::default()
            },
            _ => Self::default(),
        };
        Some(flags)
    }
}

/// A custom weather definition published by the companion weather mod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRecord {
    pub id: String,
    pub display_name: String,
    pub flags: WeatherFlags,
}

/// The weather active at the player's location this frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherState {
    pub id: String,
    pub flags: WeatherFlags,
}

impl WeatherState {
    #[must_use]
    pub fn vanilla(id: &str) -> Self {
        Self {
            id: id.to_string(),
            flags: WeatherFlags::for_vanilla(id).unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn sunny() -> Self {
        Self::vanilla(SUNNY_WEATHER)
    }
}

/// Read-only view of the companion mod's weather registry.
pub trait WeatherRegistry {
    fn custom_weather(&self) -> Vec<WeatherRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn festival_and_wedding_days_are_clear() {
        for id in ["Sun", "Festival", "Wedding"] {
            assert!(WeatherState::vanilla(id).flags.is_clear(), "{id}");
        }
    }

    #[test]
    fn wet_and_windy_weather_is_not_clear() {
        for id in ["Rain", "Wind", "Storm", "Snow", "GreenRain"] {
            assert!(!WeatherState::vanilla(id).flags.is_clear(), "{id}");
        }
    }

    #[test]
    fn vanilla_lookup_ignores_case() {
        let flags = WeatherFlags::for_vanilla("storm").expect("known weather");
        assert!(flags.raining && flags.lightning);
        assert!(WeatherFlags::for_vanilla("Sandstorm").is_none());
    }
}
