//! Solid tool shapes for CNC operations.
//!
//! Each pass becomes the volume its tool removes: a cylinder for a drill,
//! a capsule-like sweep for a mill. Shapes are built through a
//! [`GeometryKernel`] and expressed in the same frame as the operation.

use panelcam_kernel::{GeometryKernel, KernelError};
use panelcam_math::{MathError, Point3, RigidMotion, Tolerance, Vec3};
use thiserror::Error;
use tracing::trace;

use crate::{CncOperation, DrillOp, MillOp, ToolPass};

/// Errors from tool shape construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolShapeError {
    /// A direction could not be normalized.
    #[error("tool direction: {0}")]
    Math(#[from] MathError),

    /// The geometry kernel rejected a construction.
    #[error("kernel: {0}")]
    Kernel(#[from] KernelError),
}

/// Cylinder bored by a drill pass.
///
/// Built along +Z, turned onto the drilling direction, then moved to the
/// bore entry.
pub fn drill_shape<K: GeometryKernel>(
    kernel: &K,
    op: &DrillOp,
) -> Result<K::Shape, ToolShapeError> {
    let cylinder = kernel.make_cylinder(op.radius, op.length)?;
    let placement = RigidMotion::rotation_between(&Vec3::z(), &op.direction)?
        .then(&RigidMotion::translation(op.start.coords));
    Ok(kernel.transform(&cylinder, &placement))
}

/// Volume swept by a mill pass.
///
/// The sweep is built in a canonical frame where the tool axis is +Z and the
/// lateral part of the movement runs along +X, so the end of the path lands
/// at `(x, 0, z)`. There it is the union of the tool at both ends, a ruled
/// side wall joining them and, for paths that also move along the tool
/// axis, ruled top and bottom caps. The result is moved back into the
/// operation's frame.
///
/// # Panics
///
/// Panics if the canonical end point is off the XZ plane, which would mean
/// the frame rotations do not compose correctly.
pub fn mill_shape<K: GeometryKernel>(kernel: &K, op: &MillOp) -> Result<K::Shape, ToolShapeError> {
    let tol = Tolerance::DEFAULT;
    let travel = op.end - op.start;

    let to_axis = RigidMotion::rotation_between(&op.direction, &Vec3::z())?;
    let moved = to_axis.apply_vector(&travel);
    let lateral = Vec3::new(moved.x, moved.y, 0.0);
    let has_lateral = !tol.is_zero(lateral.norm());
    let to_lateral = if has_lateral {
        RigidMotion::rotation_between(&lateral, &Vec3::x())?
    } else {
        RigidMotion::identity()
    };
    let canonical = to_axis.then(&to_lateral);

    let end_c = canonical.apply_vector(&travel);
    assert!(
        end_c.y.abs() <= tol.linear,
        "mill canonical frame has lateral residual {} (direction {:?}, travel {:?})",
        end_c.y,
        op.direction,
        travel
    );

    let (r, len) = (op.radius, op.length);
    let end_motion = RigidMotion::translation(end_c);

    let tool = kernel.make_cylinder(r, len)?;
    let mut pieces = vec![tool.clone(), kernel.transform(&tool, &end_motion)];

    if has_lateral {
        let wall = |offset: &Vec3| -> Result<K::Wire, KernelError> {
            let corners = [
                Point3::new(0.0, -r, 0.0),
                Point3::new(0.0, r, 0.0),
                Point3::new(0.0, r, len),
                Point3::new(0.0, -r, len),
            ];
            kernel.make_polygon(&corners.map(|c| c + offset))
        };
        pieces.push(kernel.loft(&wall(&Vec3::zeros())?, &wall(&end_c)?, true)?);
    }

    if !tol.is_zero(end_c.z) {
        for z in [0.0, len] {
            let near = kernel.make_circle(r, Point3::new(0.0, 0.0, z))?;
            let far = kernel.make_circle(r, Point3::new(end_c.x, 0.0, end_c.z + z))?;
            pieces.push(kernel.loft(&near, &far, true)?);
        }
    }

    trace!(pieces = pieces.len(), ?end_c, "mill sweep");
    let sweep = kernel.union(&pieces)?;
    let back = canonical
        .inverse()
        .then(&RigidMotion::translation(op.start.coords));
    Ok(kernel.transform(&sweep, &back))
}

/// Tool shape of a single physical pass.
pub fn pass_shape<K: GeometryKernel>(
    kernel: &K,
    pass: &ToolPass,
) -> Result<K::Shape, ToolShapeError> {
    match pass {
        ToolPass::Drill(op) => drill_shape(kernel, op),
        ToolPass::Mill(op) => mill_shape(kernel, op),
    }
}

/// Tool shape of a whole operation tree.
///
/// `NoOp` and composites without passes have no shape; other composites
/// give the union of their children.
pub fn tool_shape<K: GeometryKernel>(
    kernel: &K,
    op: &CncOperation,
) -> Result<Option<K::Shape>, ToolShapeError> {
    match op {
        CncOperation::Drill(d) => Ok(Some(drill_shape(kernel, d)?)),
        CncOperation::Mill(m) => Ok(Some(mill_shape(kernel, m)?)),
        CncOperation::NoOp => Ok(None),
        CncOperation::Composite { children } => {
            let mut shapes = Vec::with_capacity(children.len());
            for child in children {
                if let Some(shape) = tool_shape(kernel, child)? {
                    shapes.push(shape);
                }
            }
            if shapes.is_empty() {
                Ok(None)
            } else {
                Ok(Some(kernel.union(&shapes)?))
            }
        }
    }
}
