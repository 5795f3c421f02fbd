use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeybindParseError {
    #[error("empty button name in keybind '{0}'")]
    EmptyButton(String),
}

/// Buttons that must all be down at once, e.g. `LeftShift + G`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybind {
    buttons: Vec<String>,
}

impl Keybind {
    fn contains(&self, button: &str) -> bool {
        self.buttons.iter().any(|b| b.eq_ignore_ascii_case(button))
    }

    fn satisfied_by(&self, pressed: &str, held: &[String]) -> bool {
        self.contains(pressed)
            && self.buttons.iter().all(|b| {
                b.eq_ignore_ascii_case(pressed) || held.iter().any(|h| h.eq_ignore_ascii_case(b))
            })
    }
}

/// Alternative keybinds, any of which triggers the action. Written as
/// comma-separated combos: `LeftShift + G, F6`. `None` means unbound.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeybindList {
    binds: Vec<Keybind>,
}

impl KeybindList {
    #[must_use]
    pub fn unbound() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn single(button: &str) -> Self {
        Self {
            binds: vec![Keybind {
                buttons: vec![button.to_string()],
            }],
        }
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        !self.binds.is_empty()
    }

    /// True when `pressed` just went down and completes one of the combos
    /// together with the buttons already held.
    #[must_use]
    pub fn just_pressed(&self, pressed: &str, held: &[String]) -> bool {
        self.binds.iter().any(|bind| bind.satisfied_by(pressed, held))
    }
}

impl FromStr for KeybindList {
    type Err = KeybindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(Self::unbound());
        }

        let mut binds = Vec::new();
        for combo in trimmed.split(',') {
            let mut buttons = Vec::new();
            for button in combo.split('+') {
                let button = button.trim();
                if button.is_empty() {
                    return Err(KeybindParseError::EmptyButton(s.to_string()));
                }
                buttons.push(button.to_string());
            }
            binds.push(Keybind { buttons });
        }
        Ok(Self { binds })
    }
}

impl TryFrom<String> for KeybindList {
    type Error = KeybindParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeybindList> for String {
    fn from(value: KeybindList) -> Self {
        value.to_string()
    }
}

impl fmt::Display for KeybindList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.binds.is_empty() {
            return f.write_str("None");
        }
        let combos = self
            .binds
            .iter()
            .map(|bind| bind.buttons.join(" + "))
            .collect::<Vec<_>>();
        f.write_str(&combos.join(", "))
    }
}
