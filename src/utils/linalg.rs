// src/utils/linalg.rs

use nalgebra::{Matrix3, Vector3};

fn lattice_matrix(lattice: &[[f64; 3]; 3]) -> Matrix3<f64> {
  Matrix3::from_row_slice(&[
    lattice[0][0],
    lattice[0][1],
    lattice[0][2],
    lattice[1][0],
    lattice[1][1],
    lattice[1][2],
    lattice[2][0],
    lattice[2][1],
    lattice[2][2],
  ])
}

/// Convert Cartesian coordinates to fractional using lattice matrix
///
/// # Arguments
/// * `cart` - Cartesian coordinates in Angstroms
/// * `lattice` - Lattice vectors as row matrix [[ax, ay, az], [bx, by, bz], [cx, cy, cz]]
///
/// # Returns
/// Fractional coordinates [x, y, z] or None if lattice is singular
///
/// # Formula
/// ```text
/// Fractional = (Lattice^T)^-1 × Cartesian
/// ```
pub fn cart_to_frac(cart: [f64; 3], lattice: &[[f64; 3]; 3]) -> Option<[f64; 3]> {
  let inv_lat = lattice_matrix(lattice).transpose().try_inverse()?;
  let frac_vec = inv_lat * Vector3::from(cart);

  Some([frac_vec.x, frac_vec.y, frac_vec.z])
}

/// Index of the periodic image cell containing a Cartesian point.
///
/// Fractional coordinates less than `1e-8` below an integer are rounded up
/// to it, so round-off cannot push an atom on a cell face into the previous cell.
pub fn image_cell(cart: [f64; 3], lattice: &[[f64; 3]; 3]) -> Option<[i32; 3]> {
  let frac = cart_to_frac(cart, lattice)?;
  Some(frac.map(|f| (f + 1e-8).floor() as i32))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_cubic_lattice() {
    // Simple cubic lattice 5.0 Å
    let lattice = [[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]];

    let frac = cart_to_frac([2.5, 2.5, 2.5], &lattice).unwrap();

    assert!((frac[0] - 0.5).abs() < 1e-10);
    assert!((frac[1] - 0.5).abs() < 1e-10);
    assert!((frac[2] - 0.5).abs() < 1e-10);
  }

  #[test]
  fn test_image_cell() {
    // Non-orthogonal lattice
    let lattice = [[4.0, 0.0, 0.0], [2.0, 3.46, 0.0], [0.0, 0.0, 5.0]];

    assert_eq!(image_cell([1.0, 1.0, 1.0], &lattice), Some([0, 0, 0]));
    assert_eq!(image_cell([5.0, 1.0, -1.0], &lattice), Some([1, 0, -1]));
    assert_eq!(image_cell([0.0, 0.0, 0.0], &lattice), Some([0, 0, 0]));
  }

  #[test]
  fn test_singular() {
    let lattice = [[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
    assert!(cart_to_frac([0.1, 0.1, 0.1], &lattice).is_none());
  }
}
