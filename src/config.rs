// src/config.rs

use crate::selection::SelectionMode;
use crate::tensor::Convention;
use crate::utils::color::Colormap;
use crate::utils::merge::merge_only;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

// --- Main Config Struct ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
  pub euler_convention: Convention,

  // Selection defaults
  pub sphere_radius: f64,
  pub bond_hops: usize,
  pub bond_tolerance: f64,

  // Text tables
  pub table_width: usize,
  pub table_precision: usize,

  // Colour scales
  pub colormap: Colormap,
  pub cscale_shades: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      euler_convention: Convention::Zyz,
      sphere_radius: SelectionMode::DEFAULT_SPHERE_RADIUS,
      bond_hops: SelectionMode::DEFAULT_BOND_HOPS,
      bond_tolerance: 0.2,
      table_width: 20,
      table_precision: 5,
      colormap: Colormap::Jet,
      cscale_shades: 10,
    }
  }
}

impl Config {
  /// Loads config from standard OS location (e.g., ~/.config/magresview/settings.json)
  pub fn load() -> (Self, String) {
    Self::load_from(&Self::get_path())
  }

  pub fn load_from(path: &Path) -> (Self, String) {
    if !path.exists() {
      return (
        Self::default(),
        "No config found. Using defaults.".to_string(),
      );
    }

    match File::open(path) {
      Ok(file) => {
        let reader = BufReader::new(file);
        match serde_json::from_reader::<_, Value>(reader) {
          Ok(stored) => match Self::from_value(&stored) {
            Ok(cfg) => (cfg, format!("Config loaded from {:?}", path)),
            Err(e) => (Self::default(), format!("Error parsing config: {}", e)),
          },
          Err(e) => (Self::default(), format!("Error parsing config: {}", e)),
        }
      }
      Err(e) => (Self::default(), format!("Error opening config: {}", e)),
    }
  }

  /// Overlays stored values on the defaults. Keys missing from the file keep
  /// their default, keys unknown to this version are ignored.
  pub fn from_value(stored: &Value) -> Result<Self, serde_json::Error> {
    let defaults = serde_json::to_value(Self::default())?;
    let merged = match (defaults.as_object(), stored.as_object()) {
      (Some(d), Some(s)) => Value::Object(merge_only(d, s)),
      _ => defaults,
    };
    serde_json::from_value(merged)
  }

  /// Saves config to standard OS location
  pub fn save(&self) -> String {
    self.save_to(&Self::get_path())
  }

  pub fn save_to(&self, path: &Path) -> String {
    if let Some(parent) = path.parent() {
      let _ = fs::create_dir_all(parent);
    }

    match File::create(path) {
      Ok(file) => {
        let writer = BufWriter::new(file);
        match serde_json::to_writer_pretty(writer, self) {
          Ok(_) => format!("Config saved to {:?}", path),
          Err(e) => format!("Failed to save config: {}", e),
        }
      }
      Err(e) => format!("Could not create config file: {}", e),
    }
  }

  /// Sphere and bond selection modes carry the configured parameters
  pub fn apply_defaults(&self, mode: SelectionMode) -> SelectionMode {
    mode.with_radius(self.sphere_radius).with_hops(self.bond_hops)
  }

  fn get_path() -> PathBuf {
    if let Some(proj) = ProjectDirs::from("org", "magresview", "magresview") {
      proj.config_dir().join("settings.json")
    } else {
      PathBuf::from("settings.json")
    }
  }
}
