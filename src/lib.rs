// src/lib.rs
pub mod config;
pub mod error;
pub mod interface;
pub mod model;
pub mod nmr;
pub mod selection;
pub mod state;
pub mod tensor;
pub mod utils;

pub use error::{Error, Result};
