//! Style value model shared by the scenesheet crates.
//!
//! Styles are flat maps from attribute names to scalar values. The map keeps
//! its keys sorted so canonical serialization and merging stay deterministic.

#![forbid(unsafe_code)]

mod map;
mod value;

pub use map::StyleMap;
pub use value::StyleValue;
