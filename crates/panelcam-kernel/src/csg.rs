//! CSG expression kernel.
//!
//! Shapes are immutable, reference-counted expression trees. Building a
//! shape is cheap and never evaluates geometry; the only query answered is
//! the bounding box (see `bounds.rs`).

use std::sync::Arc;

use panelcam_math::{Aabb3, Point3, RigidMotion, Vec3};

use crate::bounds::shape_bounds;
use crate::{check_positive, GeometryKernel, KernelError};

/// A closed profile used as a loft section.
#[derive(Debug, Clone, PartialEq)]
pub enum Wire {
    /// Closed polygon through the given vertices.
    Polygon(Vec<Point3>),
    /// Circle in a plane parallel to XY.
    Circle {
        /// Centre of the circle.
        center: Point3,
        /// Radius.
        radius: f64,
    },
}

/// One node of a CSG expression.
#[derive(Debug, Clone, PartialEq)]
pub enum CsgNode {
    /// No geometry (identity for union).
    Empty,
    /// Box with a corner at the origin.
    Box {
        /// Size along each axis.
        size: Vec3,
    },
    /// Cylinder along +Z, base at the origin.
    Cylinder {
        /// Radius of the cylinder.
        radius: f64,
        /// Height of the cylinder.
        height: f64,
    },
    /// Solid spanned between two profiles.
    Loft {
        /// First profile.
        from: Wire,
        /// Second profile.
        to: Wire,
        /// Straight-line connection between the profiles.
        ruled: bool,
    },
    /// Boolean union of all children.
    Union(Vec<CsgShape>),
    /// Boolean difference (base minus tool).
    Difference {
        /// Shape being cut.
        base: CsgShape,
        /// Shape removed from the base.
        tool: CsgShape,
    },
    /// A child shape moved by a rigid motion.
    Transform {
        /// Child shape.
        child: CsgShape,
        /// Motion applied to the child.
        motion: RigidMotion,
    },
}

/// Shared handle to a CSG expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CsgShape(Arc<CsgNode>);

impl CsgShape {
    fn new(node: CsgNode) -> Self {
        Self(Arc::new(node))
    }

    /// The empty shape.
    pub fn empty() -> Self {
        Self::new(CsgNode::Empty)
    }

    /// Root node of the expression.
    pub fn node(&self) -> &CsgNode {
        &self.0
    }

    /// True for the empty shape.
    pub fn is_empty(&self) -> bool {
        matches!(self.node(), CsgNode::Empty)
    }

    /// Number of primitive leaves (boxes, cylinders, lofts) in the tree.
    pub fn primitive_count(&self) -> usize {
        match self.node() {
            CsgNode::Empty => 0,
            CsgNode::Box { .. } | CsgNode::Cylinder { .. } | CsgNode::Loft { .. } => 1,
            CsgNode::Union(children) => children.iter().map(CsgShape::primitive_count).sum(),
            CsgNode::Difference { base, tool } => base.primitive_count() + tool.primitive_count(),
            CsgNode::Transform { child, .. } => child.primitive_count(),
        }
    }
}

/// Kernel producing [`CsgShape`] expression trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsgKernel;

impl CsgKernel {
    /// Create a kernel.
    pub fn new() -> Self {
        Self
    }
}

impl GeometryKernel for CsgKernel {
    type Shape = CsgShape;
    type Wire = Wire;

    fn make_box(&self, length: f64, width: f64, height: f64) -> Result<CsgShape, KernelError> {
        check_positive("box length", length)?;
        check_positive("box width", width)?;
        check_positive("box height", height)?;
        Ok(CsgShape::new(CsgNode::Box {
            size: Vec3::new(length, width, height),
        }))
    }

    fn make_cylinder(&self, radius: f64, height: f64) -> Result<CsgShape, KernelError> {
        check_positive("cylinder radius", radius)?;
        check_positive("cylinder height", height)?;
        Ok(CsgShape::new(CsgNode::Cylinder { radius, height }))
    }

    fn make_polygon(&self, points: &[Point3]) -> Result<Wire, KernelError> {
        if points.len() < 3 {
            return Err(KernelError::TooFewPoints(points.len()));
        }
        Ok(Wire::Polygon(points.to_vec()))
    }

    fn make_circle(&self, radius: f64, center: Point3) -> Result<Wire, KernelError> {
        check_positive("circle radius", radius)?;
        Ok(Wire::Circle { center, radius })
    }

    fn transform(&self, shape: &CsgShape, motion: &RigidMotion) -> CsgShape {
        match shape.node() {
            CsgNode::Empty => shape.clone(),
            // Fold nested motions into one node.
            CsgNode::Transform {
                child,
                motion: inner,
            } => CsgShape::new(CsgNode::Transform {
                child: child.clone(),
                motion: inner.then(motion),
            }),
            _ => CsgShape::new(CsgNode::Transform {
                child: shape.clone(),
                motion: *motion,
            }),
        }
    }

    fn union(&self, shapes: &[CsgShape]) -> Result<CsgShape, KernelError> {
        let children: Vec<CsgShape> = shapes.iter().filter(|s| !s.is_empty()).cloned().collect();
        Ok(match children.len() {
            0 => CsgShape::empty(),
            1 => children[0].clone(),
            _ => CsgShape::new(CsgNode::Union(children)),
        })
    }

    fn subtract(&self, shape: &CsgShape, tool: &CsgShape) -> Result<CsgShape, KernelError> {
        if shape.is_empty() || tool.is_empty() {
            return Ok(shape.clone());
        }
        Ok(CsgShape::new(CsgNode::Difference {
            base: shape.clone(),
            tool: tool.clone(),
        }))
    }

    fn loft(&self, from: &Wire, to: &Wire, ruled: bool) -> Result<CsgShape, KernelError> {
        match (from, to) {
            (Wire::Polygon(a), Wire::Polygon(b)) if a.len() != b.len() => {
                Err(KernelError::LoftMismatch(format!(
                    "polygon vertex counts differ ({} vs {})",
                    a.len(),
                    b.len()
                )))
            }
            (Wire::Polygon(_), Wire::Polygon(_)) | (Wire::Circle { .. }, Wire::Circle { .. }) => {
                // Smooth lofts between two sections coincide with ruled ones.
                Ok(CsgShape::new(CsgNode::Loft {
                    from: from.clone(),
                    to: to.clone(),
                    ruled,
                }))
            }
            _ => Err(KernelError::LoftMismatch(
                "cannot loft a polygon onto a circle".to_string(),
            )),
        }
    }

    fn bounding_box(&self, shape: &CsgShape) -> Aabb3 {
        shape_bounds(shape, &RigidMotion::identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use panelcam_math::Axis;

    #[test]
    fn test_box_bounds() {
        let k = CsgKernel::new();
        let b = k.make_box(10.0, 20.0, 30.0).unwrap();
        let aabb = k.bounding_box(&b);
        assert_eq!(aabb.min, Point3::origin());
        assert_eq!(aabb.max, Point3::new(10.0, 20.0, 30.0));
    }

    #[test]
    fn test_invalid_primitives() {
        let k = CsgKernel::new();
        assert!(matches!(
            k.make_box(0.0, 1.0, 1.0),
            Err(KernelError::InvalidDimension { .. })
        ));
        assert!(k.make_cylinder(-1.0, 2.0).is_err());
        assert!(k.make_cylinder(1.0, f64::NAN).is_err());
        assert_eq!(
            k.make_polygon(&[Point3::origin(), Point3::new(1.0, 0.0, 0.0)]),
            Err(KernelError::TooFewPoints(2))
        );
    }

    #[test]
    fn test_rotated_cylinder_bounds_are_exact() {
        let k = CsgKernel::new();
        let c = k.make_cylinder(2.0, 10.0).unwrap();
        // +Z onto +X.
        let c = k.transform(&c, &RigidMotion::rotation_about(Axis::Y, 90.0));
        let aabb = k.bounding_box(&c);
        assert_relative_eq!(aabb.min.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(aabb.max.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(aabb.min.y, -2.0, epsilon = 1e-9);
        assert_relative_eq!(aabb.max.z, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_nested_transforms_fold() {
        let k = CsgKernel::new();
        let b = k.make_box(1.0, 1.0, 1.0).unwrap();
        let moved = k.transform(&b, &RigidMotion::translation_xyz(1.0, 0.0, 0.0));
        let moved = k.transform(&moved, &RigidMotion::translation_xyz(0.0, 2.0, 0.0));
        match moved.node() {
            CsgNode::Transform { child, motion } => {
                assert!(matches!(child.node(), CsgNode::Box { .. }));
                assert_relative_eq!(motion.translation_part(), Vec3::new(1.0, 2.0, 0.0));
            }
            other => panic!("expected a single transform node, got {other:?}"),
        }
    }

    #[test]
    fn test_union_and_difference() {
        let k = CsgKernel::new();
        let a = k.make_box(10.0, 10.0, 10.0).unwrap();
        let b = k.transform(
            &k.make_box(10.0, 10.0, 10.0).unwrap(),
            &RigidMotion::translation_xyz(5.0, 5.0, 5.0),
        );
        let u = k.union(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(u.primitive_count(), 2);
        assert_eq!(k.bounding_box(&u).max, Point3::new(15.0, 15.0, 15.0));

        // A difference never grows beyond its base.
        let d = k.subtract(&a, &b).unwrap();
        assert_eq!(k.bounding_box(&d), k.bounding_box(&a));

        assert!(k.union(&[]).unwrap().is_empty());
        assert_eq!(k.union(&[a.clone()]).unwrap(), a);
        assert_eq!(k.subtract(&a, &CsgShape::empty()).unwrap(), a);
    }

    #[test]
    fn test_loft_profiles() {
        let k = CsgKernel::new();
        let square = |z: f64| {
            k.make_polygon(&[
                Point3::new(0.0, 0.0, z),
                Point3::new(1.0, 0.0, z),
                Point3::new(1.0, 1.0, z),
                Point3::new(0.0, 1.0, z),
            ])
            .unwrap()
        };
        let tri = k
            .make_polygon(&[
                Point3::origin(),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ])
            .unwrap();
        let circle = k.make_circle(1.0, Point3::new(0.0, 0.0, 5.0)).unwrap();

        let solid = k.loft(&square(0.0), &square(4.0), true).unwrap();
        assert_relative_eq!(k.bounding_box(&solid).max.z, 4.0);
        assert!(matches!(
            k.loft(&square(0.0), &tri, true),
            Err(KernelError::LoftMismatch(_))
        ));
        assert!(k.loft(&square(0.0), &circle, true).is_err());

        let tube = k
            .loft(&k.make_circle(1.0, Point3::origin()).unwrap(), &circle, true)
            .unwrap();
        let aabb = k.bounding_box(&tube);
        assert_relative_eq!(aabb.min.x, -1.0);
        assert_relative_eq!(aabb.max.z, 5.0);
    }
}
