// src/interface/mod.rs
pub mod euler;
pub mod select;

pub use euler::EulerInterface;
pub use select::{DisplayMode, SelectInterface};
