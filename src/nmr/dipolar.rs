// src/nmr/dipolar.rs

use crate::utils::geometry;
use nalgebra::Vector3;

/// Vacuum permeability (T·m/A)
const MU0: f64 = 1.256_637_062_12e-6;
/// Reduced Planck constant (J·s)
const HBAR: f64 = 1.054_571_817e-34;

/// Gyromagnetic ratio (rad s⁻¹ T⁻¹) of the NMR isotope usually observed for
/// an element.
pub fn gyromagnetic_ratio(element: &str) -> Option<f64> {
    let gamma = match element {
        "H" => 267.522_187_44e6,
        "Li" => 103.977e6,  // 7Li
        "B" => 85.847e6,    // 11B
        "C" => 67.2828e6,   // 13C
        "N" => -27.116e6,   // 15N
        "O" => -36.264e6,   // 17O
        "F" => 251.815e6,
        "Na" => 70.761e6,
        "Mg" => -16.39e6,   // 25Mg
        "Al" => 69.763e6,
        "Si" => -53.190e6,  // 29Si
        "P" => 108.291e6,
        "Cl" => 26.242e6,   // 35Cl
        "K" => 12.501e6,    // 39K
        "Ca" => -18.003e6,  // 43Ca
        _ => return None,
    };
    Some(gamma)
}

/// Dipolar coupling constant between two nuclei.
///
/// **Formula**: D = -(μ₀ ħ / 8π²) γ₁ γ₂ / r³
///
/// Positions are in Angstroms, gyromagnetic ratios in rad s⁻¹ T⁻¹.
/// Returns the coupling in Hz and the unit vector from `r1` to `r2`.
pub fn dipolar_coupling(r1: [f64; 3], gamma1: f64, r2: [f64; 3], gamma2: f64) -> (f64, [f64; 3]) {
    let d = Vector3::from(r2) - Vector3::from(r1);
    let r = geometry::calculate_distance(r1, r2);
    let r_m = r * 1e-10;

    let prefactor = -MU0 * HBAR / (8.0 * std::f64::consts::PI.powi(2));
    let coupling = prefactor * gamma1 * gamma2 / r_m.powi(3);

    let unit = if r > 0.0 { d / r } else { Vector3::zeros() };
    (coupling, [unit.x, unit.y, unit.z])
}
