//! HTTP handlers for the entity families.

pub mod entity;
pub use entity::*;
