//! The ray effect itself: sample the world, solve the frame's parameters,
//! lay out the field and draw it.

pub mod field;
pub mod render;
pub mod renderer;
pub mod sampler;
pub mod solver;
pub mod textures;
