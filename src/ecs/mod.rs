//! Entity-component registry
//!
//! Entities are generational handles into a dense arena; components live in
//! one typed column per type, closed at compile time.

pub mod component;
pub mod entity;
pub mod world;

pub use component::{Column, Component, ComponentStore};
pub use entity::Entity;
pub use world::World;
