use std::path::PathBuf;

use chrono::{NaiveTime, Timelike};
use clap::{Parser, ValueEnum};

use crate::domain::{
    clock::{DEFAULT_MS_PER_MINUTE, GameTime},
    style::RayStyle,
};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum StyleArg {
    Standard,
    HighDetail,
}

impl From<StyleArg> for RayStyle {
    fn from(value: StyleArg) -> Self {
        match value {
            StyleArg::Standard => RayStyle::Standard,
            StyleArg::HighDetail => RayStyle::HighDetail,
        }
    }
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "lightshafts",
    version,
    about = "Terminal preview of the light ray overlay"
)]
pub struct Cli {
    /// Starting time of day (HH:MM, 06:00..=23:59)
    #[arg(long, default_value = "09:00", value_parser = parse_time)]
    pub time: GameTime,

    /// Ray style for this session (default: the saved one)
    #[arg(long, value_enum)]
    pub style: Option<StyleArg>,

    /// Location name, used as the override key
    #[arg(long, default_value = "Farm")]
    pub location: String,

    /// Start indoors, where rays are off unless overridden
    #[arg(long)]
    pub indoors: bool,

    /// Map width in pixels
    #[arg(long, default_value_t = 4000, value_parser = clap::value_parser!(u32).range(256..))]
    pub map_width: u32,

    /// Weather id (Sun, Rain, Wind, Storm, Festival, Snow, Wedding, GreenRain or a custom id)
    #[arg(long, default_value = "Sun")]
    pub weather: String,

    /// Target FPS (15..60)
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u8).range(15..=60))]
    pub fps: u8,

    /// Real milliseconds per in-game minute
    #[arg(long, default_value_t = DEFAULT_MS_PER_MINUTE, value_parser = clap::value_parser!(u32).range(10..))]
    pub minute_ms: u32,

    /// Directory holding config.json and location_overrides.json
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Write logs here; the terminal itself belongs to the preview
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

pub fn parse_time(value: &str) -> Result<GameTime, String> {
    let time = NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|err| format!("expected HH:MM: {err}"))?;
    if time.hour() < 6 {
        return Err("the in-game day starts at 06:00".to_string());
    }
    Ok(GameTime::from_hm(time.hour() as i32, time.minute() as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clock_times() {
        assert_eq!(parse_time("09:30"), Ok(GameTime(930)));
        assert_eq!(parse_time(" 18:05 "), Ok(GameTime(1805)));
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("03:00").is_err());
        assert!(parse_time("noon").is_err());
    }

    #[test]
    fn defaults_are_sensible() {
        let cli = Cli::parse_from(["lightshafts"]);
        assert_eq!(cli.time, GameTime(900));
        assert_eq!(cli.weather, "Sun");
        assert_eq!(cli.minute_ms, DEFAULT_MS_PER_MINUTE);
        assert!(cli.style.is_none());
    }

    #[test]
    fn style_flag_maps_to_ray_style() {
        let cli = Cli::parse_from(["lightshafts", "--style", "high-detail", "--indoors"]);
        assert_eq!(cli.style.map(RayStyle::from), Some(RayStyle::HighDetail));
        assert!(cli.indoors);
    }
}
