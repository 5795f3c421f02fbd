pub mod controller;
pub mod events;
pub mod keybind;
pub mod menu;
pub mod overrides;
pub mod settings;
