#![warn(missing_docs)]

//! Math types for panelcam.
//!
//! Thin wrappers around nalgebra providing the types the machining core is
//! written in: points, vectors, world axes, rigid motions, axis-aligned
//! bounding boxes and tolerance constants.

mod aabb;
mod motion;

pub use aabb::Aabb3;
pub use motion::RigidMotion;

use nalgebra::{Unit, Vector3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// Errors raised by geometric constructions that have no defined result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// A direction or rotation axis had (near) zero length.
    #[error("degenerate vector [{x}, {y}, {z}]: length below tolerance")]
    DegenerateVector {
        /// X component.
        x: f64,
        /// Y component.
        y: f64,
        /// Z component.
        z: f64,
    },
}

impl MathError {
    pub(crate) fn degenerate(v: &Vec3) -> Self {
        MathError::DegenerateVector {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// Normalize `v`, failing when it is too short to carry a direction.
pub fn normalize(v: &Vec3) -> Result<Dir3, MathError> {
    Unit::try_new(*v, Tolerance::DEFAULT.linear * 1e-3).ok_or_else(|| MathError::degenerate(v))
}

/// One of the three world axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// The X axis (index 0).
    X,
    /// The Y axis (index 1).
    Y,
    /// The Z axis (index 2).
    Z,
}

impl Axis {
    /// All three axes in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Coordinate index of this axis (`X = 0`, `Y = 1`, `Z = 2`).
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Axis for a coordinate index, `None` outside `0..3`.
    pub fn from_index(index: usize) -> Option<Axis> {
        Self::ALL.get(index).copied()
    }

    /// Unit vector along the positive direction of this axis.
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::x(),
            Axis::Y => Vec3::y(),
            Axis::Z => Vec3::z(),
        }
    }

    /// The third axis, distinct from both `a` and `b`.
    ///
    /// Returns `None` when `a == b`.
    pub fn remaining(a: Axis, b: Axis) -> Option<Axis> {
        if a == b {
            return None;
        }
        Self::ALL.into_iter().find(|&c| c != a && c != b)
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in mm.
    pub linear: f64,
}

impl Tolerance {
    /// Default tolerance: 1e-6 mm.
    pub const DEFAULT: Self = Self { linear: 1e-6 };

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
