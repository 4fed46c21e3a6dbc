// src/tensor/mod.rs

pub mod euler;

pub use euler::{euler_between_tensors, relative_rotation, rotation_matrix, Convention, EulerAngles};

use crate::error::{invalid_tensor, Error, Result};
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest |a_ij - a_ji| accepted, relative to the largest component.
const SYMMETRY_TOLERANCE: f64 = 1e-6;

/// Eigenvalues closer than this (relative) are treated as one degenerate value.
const DEGENERACY_TOLERANCE: f64 = 1e-8;

/// Which NMR observable a tensor array holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorKind {
    /// Magnetic shielding
    Ms,
    /// Electric field gradient
    Efg,
}

impl TensorKind {
    pub fn tag(&self) -> &'static str {
        match self {
            TensorKind::Ms => "ms",
            TensorKind::Efg => "efg",
        }
    }
}

impl fmt::Display for TensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for TensorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ms" => Ok(TensorKind::Ms),
            "efg" => Ok(TensorKind::Efg),
            _ => Err(Error::UnsupportedTensorKind(s.to_string())),
        }
    }
}

/// A real symmetric 3x3 tensor measured at an atomic site.
///
/// Construction validates the input, so every `Tensor` in circulation is
/// finite and symmetric. Serialized as its three rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[[f64; 3]; 3]", into = "[[f64; 3]; 3]")]
pub struct Tensor {
    matrix: Matrix3<f64>,
}

impl Tensor {
    pub fn from_rows(rows: [[f64; 3]; 3]) -> Result<Self> {
        let matrix = Matrix3::from_row_slice(&[
            rows[0][0], rows[0][1], rows[0][2],
            rows[1][0], rows[1][1], rows[1][2],
            rows[2][0], rows[2][1], rows[2][2],
        ]);
        Self::from_matrix(matrix)
    }

    /// Nine numbers in row-major order.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        if values.len() != 9 {
            return Err(Error::InvalidTensor(format!(
                "expected 9 components, got {}",
                values.len()
            )));
        }
        Self::from_matrix(Matrix3::from_row_slice(values))
    }

    /// Rows of arbitrary length, as they come out of a parsed file.
    pub fn from_nested(rows: &[Vec<f64>]) -> Result<Self> {
        if rows.len() != 3 || rows.iter().any(|r| r.len() != 3) {
            return Err(invalid_tensor("expected a 3x3 matrix"));
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::from_slice(&flat)
    }

    /// The six independent components `[xx, yy, zz, xy, xz, yz]`.
    pub fn from_components(c: [f64; 6]) -> Result<Self> {
        let [xx, yy, zz, xy, xz, yz] = c;
        Self::from_rows([[xx, xy, xz], [xy, yy, yz], [xz, yz, zz]])
    }

    pub fn diagonal(values: [f64; 3]) -> Result<Self> {
        Self::from_matrix(Matrix3::from_diagonal(&Vector3::from(values)))
    }

    pub fn from_matrix(matrix: Matrix3<f64>) -> Result<Self> {
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(invalid_tensor("non-finite component"));
        }

        let scale = matrix.amax().max(1.0);
        let asym = (matrix - matrix.transpose()).amax();
        if asym > SYMMETRY_TOLERANCE * scale {
            return Err(Error::InvalidTensor(format!(
                "matrix is not symmetric (max |a_ij - a_ji| = {:.3e})",
                asym
            )));
        }

        // Drop the round-off asymmetry so the eigen solver sees an exact symmetric matrix
        Ok(Self {
            matrix: (matrix + matrix.transpose()) * 0.5,
        })
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    pub fn rows(&self) -> [[f64; 3]; 3] {
        let m = &self.matrix;
        [
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ]
    }

    /// Trace / 3
    pub fn isotropy(&self) -> f64 {
        self.matrix.trace() / 3.0
    }

    /// R · T · Rᵀ
    pub fn rotated(&self, rotation: &Matrix3<f64>) -> Self {
        let m = rotation * self.matrix * rotation.transpose();
        Self {
            matrix: (m + m.transpose()) * 0.5,
        }
    }

    pub fn frame(&self) -> OrientationFrame {
        OrientationFrame::of(self)
    }
}

impl TryFrom<[[f64; 3]; 3]> for Tensor {
    type Error = Error;

    fn try_from(rows: [[f64; 3]; 3]) -> Result<Self> {
        Tensor::from_rows(rows)
    }
}

impl From<Tensor> for [[f64; 3]; 3] {
    fn from(t: Tensor) -> Self {
        t.rows()
    }
}

/// Principal-axis frame of a tensor.
///
/// Eigenvalues are sorted ascending and `axes` holds the matching unit
/// eigenvectors as columns. The frame is always a proper rotation.
///
/// Conventions:
/// * each eigenvector is signed so that its largest-magnitude component is
///   positive (the first one on ties), then the third axis is flipped if
///   needed to make the frame right-handed;
/// * a degenerate pair of eigenvalues is resolved with the lab axis (x, y, z)
///   that projects most strongly onto the degenerate plane, and the frame is
///   completed with a cross product;
/// * a fully isotropic tensor gets the lab frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationFrame {
    pub eigenvalues: Vector3<f64>,
    pub axes: Matrix3<f64>,
}

impl OrientationFrame {
    pub fn of(tensor: &Tensor) -> Self {
        let eigen = tensor.matrix.symmetric_eigen();

        let mut order = [0usize, 1, 2];
        order.sort_by(|&i, &j| eigen.eigenvalues[i].total_cmp(&eigen.eigenvalues[j]));

        let values = Vector3::new(
            eigen.eigenvalues[order[0]],
            eigen.eigenvalues[order[1]],
            eigen.eigenvalues[order[2]],
        );
        let mut vectors: [Vector3<f64>; 3] =
            order.map(|i| canonical_sign(eigen.eigenvectors.column(i).into_owned()));

        let tol = DEGENERACY_TOLERANCE * values.amax().max(1.0);
        let low_pair = (values[1] - values[0]).abs() <= tol;
        let high_pair = (values[2] - values[1]).abs() <= tol;

        match (low_pair, high_pair) {
            (true, true) => {
                vectors = [Vector3::x(), Vector3::y(), Vector3::z()];
            }
            (true, false) => {
                let v0 = lab_axis_in_plane(&vectors[2]);
                vectors[1] = vectors[2].cross(&v0);
                vectors[0] = v0;
            }
            (false, true) => {
                let v1 = lab_axis_in_plane(&vectors[0]);
                vectors[2] = vectors[0].cross(&v1);
                vectors[1] = v1;
            }
            (false, false) => {
                if vectors[0].cross(&vectors[1]).dot(&vectors[2]) < 0.0 {
                    vectors[2] = -vectors[2];
                }
            }
        }

        Self {
            eigenvalues: values,
            axes: Matrix3::from_columns(&vectors),
        }
    }

    pub fn axis(&self, i: usize) -> Vector3<f64> {
        self.axes.column(i).into_owned()
    }
}

fn canonical_sign(v: Vector3<f64>) -> Vector3<f64> {
    let mut best = 0;
    for i in 1..3 {
        if v[i].abs() > v[best].abs() + 1e-12 {
            best = i;
        }
    }
    if v[best] < 0.0 {
        -v
    } else {
        v
    }
}

/// Unit vector in the plane orthogonal to `normal`, taken from the lab axis
/// with the largest projection onto that plane.
fn lab_axis_in_plane(normal: &Vector3<f64>) -> Vector3<f64> {
    let mut best = Vector3::zeros();
    let mut best_norm = -1.0;
    for axis in [Vector3::x(), Vector3::y(), Vector3::z()] {
        let p = axis - normal * normal.dot(&axis);
        let n = p.norm();
        if n > best_norm + 1e-12 {
            best = p;
            best_norm = n;
        }
    }
    best / best_norm
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Rotation3;

    #[test]
    fn rejects_asymmetric_matrix() {
        let r = Tensor::from_rows([[1.0, 2.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert!(matches!(r, Err(Error::InvalidTensor(_))));
    }

    #[test]
    fn rejects_bad_shape_and_nan() {
        assert!(Tensor::from_slice(&[1.0; 8]).is_err());
        assert!(Tensor::from_nested(&[vec![1.0, 0.0], vec![0.0, 1.0]]).is_err());
        let r = Tensor::diagonal([1.0, f64::NAN, 2.0]);
        assert!(matches!(r, Err(Error::InvalidTensor(_))));
    }

    #[test]
    fn components_fill_both_triangles() {
        let t = Tensor::from_components([1.0, 2.0, 3.0, 0.5, 0.25, 0.125]).unwrap();
        let rows = t.rows();
        assert_eq!(rows[0][1], rows[1][0]);
        assert_eq!(rows[0][2], 0.25);
        assert_eq!(rows[2][1], 0.125);
        assert_abs_diff_eq!(t.isotropy(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn kind_parses_tags() {
        assert_eq!("ms".parse::<TensorKind>().unwrap(), TensorKind::Ms);
        assert_eq!("EFG".parse::<TensorKind>().unwrap(), TensorKind::Efg);
        assert!(matches!(
            "j".parse::<TensorKind>(),
            Err(Error::UnsupportedTensorKind(_))
        ));
    }

    #[test]
    fn frame_is_sorted_and_proper() {
        let rot = Rotation3::from_euler_angles(0.3, -0.7, 1.1).into_inner();
        let t = Tensor::diagonal([5.0, -2.0, 1.0]).unwrap().rotated(&rot);
        let f = t.frame();

        assert!(f.eigenvalues[0] <= f.eigenvalues[1] && f.eigenvalues[1] <= f.eigenvalues[2]);
        assert_abs_diff_eq!(f.eigenvalues[0], -2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(f.axes.determinant(), 1.0, epsilon = 1e-9);

        // Each axis is an eigenvector of its eigenvalue
        for i in 0..3 {
            let v = f.axis(i);
            let tv = t.matrix() * v;
            assert_abs_diff_eq!((tv - v * f.eigenvalues[i]).norm(), 0.0, epsilon = 1e-8);
        }
    }

    #[test]
    fn isotropic_tensor_gets_lab_frame() {
        let f = Tensor::diagonal([4.0, 4.0, 4.0]).unwrap().frame();
        assert_abs_diff_eq!((f.axes - Matrix3::identity()).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_pair_is_deterministic() {
        // Axially symmetric along z: the in-plane pair must resolve to x, y
        let f = Tensor::diagonal([1.0, 1.0, 3.0]).unwrap().frame();
        assert_abs_diff_eq!((f.axis(0) - Vector3::x()).norm(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!((f.axis(1) - Vector3::y()).norm(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!((f.axis(2) - Vector3::z()).norm(), 0.0, epsilon = 1e-9);

        let g = Tensor::diagonal([3.0, 1.0, 1.0]).unwrap().frame();
        assert_abs_diff_eq!(g.eigenvalues[2], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(g.axes.determinant(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(g.axis(0).dot(&Vector3::x()).abs(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn serde_uses_rows() {
        let t = Tensor::diagonal([1.0, 2.0, 3.0]).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "[[1.0,0.0,0.0],[0.0,2.0,0.0],[0.0,0.0,3.0]]");

        let bad: std::result::Result<Tensor, _> =
            serde_json::from_str("[[1.0,5.0,0.0],[0.0,2.0,0.0],[0.0,0.0,3.0]]");
        assert!(bad.is_err());
    }
}
