// src/utils/color.rs

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub type Rgb = (u8, u8, u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Jet,
    Hot,
    Greys,
    Bluered,
}

impl Colormap {
    /// Control points as (position in [0, 1], colour)
    fn stops(&self) -> &'static [(f64, Rgb)] {
        match self {
            Colormap::Jet => &[
                (0.0, (0, 0, 131)),
                (0.125, (0, 60, 170)),
                (0.375, (5, 255, 255)),
                (0.625, (255, 255, 0)),
                (0.875, (250, 0, 0)),
                (1.0, (128, 0, 0)),
            ],
            Colormap::Hot => &[
                (0.0, (0, 0, 0)),
                (0.3, (230, 0, 0)),
                (0.6, (255, 210, 0)),
                (1.0, (255, 255, 255)),
            ],
            Colormap::Greys => &[(0.0, (0, 0, 0)), (1.0, (255, 255, 255))],
            Colormap::Bluered => &[(0.0, (0, 0, 255)), (1.0, (255, 0, 0))],
        }
    }

    /// Colour at position `t` in [0, 1] (clamped)
    pub fn sample(&self, t: f64) -> Rgb {
        interpolate(self.stops(), t)
    }

    /// `n` evenly spaced shades from the low to the high end
    pub fn shades(&self, n: usize) -> Vec<Rgb> {
        match n {
            0 => Vec::new(),
            1 => vec![self.sample(0.0)],
            _ => (0..n).map(|i| self.sample(i as f64 / (n - 1) as f64)).collect(),
        }
    }
}

impl FromStr for Colormap {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jet" => Ok(Colormap::Jet),
            "hot" => Ok(Colormap::Hot),
            "greys" => Ok(Colormap::Greys),
            "bluered" => Ok(Colormap::Bluered),
            _ => Err(Error::UnknownColormap(s.to_string())),
        }
    }
}

/// Maps values in [min, max] onto a sequence of evenly spaced colours.
#[derive(Debug, Clone)]
pub struct ColorScale {
    min: f64,
    max: f64,
    colors: Vec<Rgb>,
}

impl ColorScale {
    pub fn color_at(&self, value: f64) -> Rgb {
        let t = (value - self.min) / (self.max - self.min);
        let n = self.colors.len();
        if n == 1 {
            return self.colors[0];
        }
        let stops: Vec<(f64, Rgb)> = self
            .colors
            .iter()
            .enumerate()
            .map(|(i, c)| (i as f64 / (n - 1) as f64, *c))
            .collect();
        interpolate(&stops, t)
    }

    pub fn hex_at(&self, value: f64) -> String {
        to_hex(self.color_at(value))
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }
}

/// Colour scale over [min, max] using `shades` colours of a colormap.
///
/// At least two shades are always used. Equal `min` and `max` are widened
/// slightly so every value still maps to a colour.
pub fn color_scale(min: f64, max: f64, colormap: Colormap, shades: usize) -> ColorScale {
    let max = if max == min { max + 1e-8 } else { max };
    ColorScale {
        min,
        max,
        colors: colormap.shades(shades.max(2)),
    }
}

pub fn to_hex(c: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", c.0, c.1, c.2)
}

fn interpolate(stops: &[(f64, Rgb)], t: f64) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

    for w in stops.windows(2) {
        let (t0, c0) = w[0];
        let (t1, c1) = w[1];
        if t <= t1 {
            let f = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
            return (lerp(c0.0, c1.0), lerp(c0.1, c1.1), lerp(c0.2, c1.2));
        }
    }
    stops.last().map(|s| s.1).unwrap_or((0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jet_endpoints() {
        let shades = Colormap::Jet.shades(10);
        assert_eq!(shades.len(), 10);
        assert_eq!(shades[0], (0, 0, 131));
        assert_eq!(shades[9], (128, 0, 0));
    }

    #[test]
    fn scale_maps_range() {
        let s = color_scale(-10.0, 10.0, Colormap::Greys, 2);
        assert_eq!(s.color_at(-10.0), (0, 0, 0));
        assert_eq!(s.color_at(0.0), (128, 128, 128));
        assert_eq!(s.hex_at(10.0), "#ffffff");
        // Out of range values are clamped
        assert_eq!(s.color_at(50.0), (255, 255, 255));
    }

    #[test]
    fn equal_bounds_do_not_divide_by_zero() {
        let s = color_scale(3.0, 3.0, Colormap::Jet, 10);
        assert_eq!(s.color_at(3.0), (0, 0, 131));
    }

    #[test]
    fn parse_names() {
        assert_eq!("HOT".parse::<Colormap>().unwrap(), Colormap::Hot);
        assert!(matches!("rainbow".parse::<Colormap>(), Err(Error::UnknownColormap(_))));
    }
}
