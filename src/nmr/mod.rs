// src/nmr/mod.rs

pub mod dipolar;

pub use dipolar::{dipolar_coupling, gyromagnetic_ratio};
