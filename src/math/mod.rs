//! Math primitives for the simulation core

mod vec2;

pub use vec2::Vec2;
