// src/utils/mod.rs
pub mod color;
pub mod geometry;
pub mod linalg;
pub mod logger;
pub mod merge;
pub mod merger;
pub mod report;

pub use color::{color_scale, ColorScale, Colormap};
pub use merge::{deep_merge, merge_only};
pub use merger::CallbackMerger;
pub use report::table_row;
