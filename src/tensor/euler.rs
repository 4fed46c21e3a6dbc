// src/tensor/euler.rs

use super::{OrientationFrame, Tensor};
use crate::error::{Error, Result};
use nalgebra::{Matrix3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

/// Below this value of sin(beta) the first and last rotations share an axis
/// and gamma is pinned to zero.
const GIMBAL_TOLERANCE: f64 = 1e-6;

/// Traces closer than this count as the same rotation angle.
const TRACE_TOLERANCE: f64 = 1e-9;

/// Axis sign flips that keep a principal frame right-handed.
const FRAME_FLIPS: [[f64; 3]; 4] = [
    [1.0, 1.0, 1.0],
    [1.0, -1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Convention {
    #[default]
    Zyz,
    Zxz,
}

impl Convention {
    pub fn tag(&self) -> &'static str {
        match self {
            Convention::Zyz => "zyz",
            Convention::Zxz => "zxz",
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Convention {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zyz" => Ok(Convention::Zyz),
            "zxz" => Ok(Convention::Zxz),
            _ => Err(Error::UnsupportedConvention(s.to_string())),
        }
    }
}

/// Proper Euler angles in radians.
///
/// `alpha` and `gamma` lie in [0, 2π), `beta` in [0, π].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EulerAngles {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl EulerAngles {
    pub fn as_array(&self) -> [f64; 3] {
        [self.alpha, self.beta, self.gamma]
    }

    pub fn to_degrees(&self) -> [f64; 3] {
        self.as_array().map(f64::to_degrees)
    }

    fn lexically_before(&self, other: &EulerAngles) -> bool {
        for (a, b) in self.as_array().into_iter().zip(other.as_array()) {
            if a < b - TRACE_TOLERANCE {
                return true;
            }
            if a > b + TRACE_TOLERANCE {
                return false;
            }
        }
        false
    }
}

/// Euler angles of the rotation taking the principal frame of `a` onto the
/// principal frame of `b`.
///
/// Principal axes are only defined up to their sign, so of the four proper
/// frame variants of `b` the one reached by the smallest rotation is used.
/// Equal rotation angles are resolved by the smallest (alpha, beta, gamma),
/// taken with the pair in a fixed order: `(b, a)` always gives the inverse
/// rotation of `(a, b)`.
pub fn euler_between_tensors(a: &Tensor, b: &Tensor, convention: Convention) -> EulerAngles {
    closest_rotation(&a.frame(), &b.frame(), convention).1
}

/// The rotation matrix matching [`euler_between_tensors`].
pub fn relative_rotation(a: &Tensor, b: &Tensor, convention: Convention) -> Matrix3<f64> {
    closest_rotation(&a.frame(), &b.frame(), convention).0
}

/// Active rotation `Rz(α)·Ry(β)·Rz(γ)` for `zyz`, `Rz(α)·Rx(β)·Rz(γ)` for `zxz`.
pub fn rotation_matrix(angles: &EulerAngles, convention: Convention) -> Matrix3<f64> {
    let first = Rotation3::from_axis_angle(&Vector3::z_axis(), angles.alpha);
    let second = match convention {
        Convention::Zyz => Rotation3::from_axis_angle(&Vector3::y_axis(), angles.beta),
        Convention::Zxz => Rotation3::from_axis_angle(&Vector3::x_axis(), angles.beta),
    };
    let third = Rotation3::from_axis_angle(&Vector3::z_axis(), angles.gamma);

    (first * second * third).into_inner()
}

fn closest_rotation(
    a: &OrientationFrame,
    b: &OrientationFrame,
    convention: Convention,
) -> (Matrix3<f64>, EulerAngles) {
    // Ties are broken for one fixed order of the pair, so that swapping the
    // tensors always yields the inverse rotation.
    let r = if frame_precedes(b, a) {
        best_candidate(b, a, convention).transpose()
    } else {
        best_candidate(a, b, convention)
    };
    (r, decompose(&r, convention))
}

/// Lexicographically larger axis matrices (column-major) come first.
fn frame_precedes(x: &OrientationFrame, y: &OrientationFrame) -> bool {
    x.axes.iter().partial_cmp(y.axes.iter()) == Some(Ordering::Greater)
}

fn best_candidate(a: &OrientationFrame, b: &OrientationFrame, convention: Convention) -> Matrix3<f64> {
    let candidates = FRAME_FLIPS.map(|flip| {
        let d = Matrix3::from_diagonal(&Vector3::from(flip));
        let r = b.axes * d * a.axes.transpose();
        (r.trace(), r, decompose(&r, convention))
    });

    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        let (trace, _, angles) = candidate;
        if *trace > best.0 + TRACE_TOLERANCE
            || ((trace - best.0).abs() <= TRACE_TOLERANCE && angles.lexically_before(&best.2))
        {
            best = *candidate;
        }
    }
    best.1
}

fn decompose(r: &Matrix3<f64>, convention: Convention) -> EulerAngles {
    let beta = r[(2, 2)].clamp(-1.0, 1.0).acos();

    let (alpha, gamma) = if beta.sin() > GIMBAL_TOLERANCE {
        match convention {
            Convention::Zyz => (r[(1, 2)].atan2(r[(0, 2)]), r[(2, 1)].atan2(-r[(2, 0)])),
            Convention::Zxz => (r[(0, 2)].atan2(-r[(1, 2)]), r[(2, 0)].atan2(r[(2, 1)])),
        }
    } else if r[(2, 2)] > 0.0 {
        // beta = 0: a single rotation about z of alpha + gamma
        (r[(1, 0)].atan2(r[(0, 0)]), 0.0)
    } else {
        // beta = π: only alpha - gamma is defined
        match convention {
            Convention::Zyz => ((-r[(1, 0)]).atan2(r[(1, 1)]), 0.0),
            Convention::Zxz => (r[(0, 1)].atan2(r[(0, 0)]), 0.0),
        }
    };

    EulerAngles {
        alpha: wrap_angle(alpha),
        beta,
        gamma: wrap_angle(gamma),
    }
}

fn wrap_angle(angle: f64) -> f64 {
    let w = angle.rem_euclid(TAU);
    if TAU - w < 1e-12 {
        0.0
    } else {
        w
    }
}
