#![warn(missing_docs)]

//! Solid modeling contract for panelcam.
//!
//! The machining core never builds B-rep geometry itself. It talks to a
//! solid modeling kernel through the [`GeometryKernel`] trait: primitive
//! construction, rigid transforms, booleans, ruled lofts between wires and
//! bounding boxes.
//!
//! [`CsgKernel`] is the bundled implementation. It records every call as an
//! expression tree ([`CsgShape`]) and answers bounding-box queries exactly,
//! which is all the joinery planner needs from geometry.
//!
//! # Example
//!
//! ```
//! use panelcam_kernel::{CsgKernel, GeometryKernel};
//! use panelcam_math::RigidMotion;
//!
//! let kernel = CsgKernel::new();
//! let plank = kernel.make_box(600.0, 300.0, 18.0).unwrap();
//! let hole = kernel.make_cylinder(3.0, 18.0).unwrap();
//! let hole = kernel.transform(&hole, &RigidMotion::translation_xyz(50.0, 50.0, 0.0));
//! let drilled = kernel.subtract(&plank, &hole).unwrap();
//! let bounds = kernel.bounding_box(&drilled);
//! assert_eq!(bounds.max.x, 600.0);
//! ```

mod bounds;
mod csg;

pub use csg::{CsgKernel, CsgNode, CsgShape, Wire};

use std::fmt::Debug;

use panelcam_math::{Aabb3, Point3, RigidMotion};
use thiserror::Error;

/// Errors reported by a geometry kernel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// A primitive was requested with a non-positive or non-finite size.
    #[error("invalid {what}: {value}")]
    InvalidDimension {
        /// Which dimension was rejected.
        what: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A polygon wire needs at least three vertices.
    #[error("polygon needs at least 3 points, got {0}")]
    TooFewPoints(usize),

    /// Loft profiles are not compatible.
    #[error("loft profiles do not match: {0}")]
    LoftMismatch(String),

    /// The kernel failed to evaluate an operation.
    #[error("kernel operation failed: {0}")]
    Failed(String),
}

/// The solid modeling operations the machining core relies on.
///
/// Shapes are immutable values: every operation returns a new shape and
/// leaves its inputs untouched. Implementations must be shareable across
/// threads so parts can be materialized in parallel.
pub trait GeometryKernel: Send + Sync {
    /// Solid shape handle.
    type Shape: Clone + Debug + Send + Sync;
    /// Closed wire (profile) handle.
    type Wire: Clone + Debug + Send + Sync;

    /// Box with one corner at the origin and the opposite corner at
    /// `(length, width, height)`.
    fn make_box(&self, length: f64, width: f64, height: f64) -> Result<Self::Shape, KernelError>;

    /// Cylinder along +Z with its base disc centred at the origin.
    fn make_cylinder(&self, radius: f64, height: f64) -> Result<Self::Shape, KernelError>;

    /// Closed polygon through `points` (the last point connects to the first).
    fn make_polygon(&self, points: &[Point3]) -> Result<Self::Wire, KernelError>;

    /// Circle of `radius` in the plane `z = center.z`, centred at `center`.
    fn make_circle(&self, radius: f64, center: Point3) -> Result<Self::Wire, KernelError>;

    /// The shape moved by `motion`.
    fn transform(&self, shape: &Self::Shape, motion: &RigidMotion) -> Self::Shape;

    /// Boolean union of all `shapes`. An empty slice yields an empty shape.
    fn union(&self, shapes: &[Self::Shape]) -> Result<Self::Shape, KernelError>;

    /// Boolean difference `shape - tool`.
    fn subtract(&self, shape: &Self::Shape, tool: &Self::Shape)
        -> Result<Self::Shape, KernelError>;

    /// Solid spanned between two profiles; `ruled` connects them with
    /// straight lines.
    fn loft(&self, from: &Self::Wire, to: &Self::Wire, ruled: bool)
        -> Result<Self::Shape, KernelError>;

    /// World axis-aligned bounding box.
    fn bounding_box(&self, shape: &Self::Shape) -> Aabb3;
}

pub(crate) fn check_positive(what: &'static str, value: f64) -> Result<(), KernelError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(KernelError::InvalidDimension { what, value })
    }
}
