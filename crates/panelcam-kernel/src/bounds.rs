//! Exact axis-aligned bounds of CSG expressions.
//!
//! Bounds are computed by pushing the accumulated motion down to the
//! primitives, so rotated cylinders and circles get tight boxes instead of
//! the box of a transformed box.

use panelcam_math::{Aabb3, Axis, Point3, RigidMotion, Vec3};

use crate::csg::{CsgNode, CsgShape, Wire};

pub(crate) fn shape_bounds(shape: &CsgShape, motion: &RigidMotion) -> Aabb3 {
    match shape.node() {
        CsgNode::Empty => Aabb3::empty(),
        CsgNode::Box { size } => {
            Aabb3::new(Point3::origin(), Point3::from(*size)).transformed(motion)
        }
        CsgNode::Cylinder { radius, height } => {
            let base = motion.apply_point(&Point3::origin());
            let axis = motion.apply_vector(&Vec3::z());
            let top = base + axis * *height;
            disc_bounds(&base, &axis, *radius).merge(&disc_bounds(&top, &axis, *radius))
        }
        CsgNode::Loft { from, to, .. } => {
            // A ruled solid lies in the convex hull of its two sections.
            wire_bounds(from, motion).merge(&wire_bounds(to, motion))
        }
        CsgNode::Union(children) => children
            .iter()
            .fold(Aabb3::empty(), |acc, c| acc.merge(&shape_bounds(c, motion))),
        CsgNode::Difference { base, .. } => shape_bounds(base, motion),
        CsgNode::Transform {
            child,
            motion: inner,
        } => shape_bounds(child, &inner.then(motion)),
    }
}

fn wire_bounds(wire: &Wire, motion: &RigidMotion) -> Aabb3 {
    match wire {
        Wire::Polygon(points) => {
            let moved: Vec<Point3> = points.iter().map(|p| motion.apply_point(p)).collect();
            Aabb3::from_points(moved.iter())
        }
        Wire::Circle { center, radius } => disc_bounds(
            &motion.apply_point(center),
            &motion.apply_vector(&Vec3::z()),
            *radius,
        ),
    }
}

/// Bounds of a disc of `radius` centred at `center` with unit normal `normal`.
///
/// Along axis `i` the disc reaches `radius * sqrt(1 - n_i^2)` from its centre.
fn disc_bounds(center: &Point3, normal: &Vec3, radius: f64) -> Aabb3 {
    let mut reach = Vec3::zeros();
    for axis in Axis::ALL {
        let i = axis.index();
        reach[i] = radius * (1.0 - normal[i] * normal[i]).max(0.0).sqrt();
    }
    Aabb3::new(center - reach, center + reach)
}
