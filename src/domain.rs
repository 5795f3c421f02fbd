pub mod clock;
pub mod color;
pub mod geometry;
pub mod style;
pub mod weather;
