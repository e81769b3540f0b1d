//! CNC operation definitions.

use std::fmt;

use panelcam_math::{Point3, RigidMotion, Vec3};
use serde::{Deserialize, Serialize};

/// A straight bored hole.
///
/// The bore is a cylinder of `radius` and `length` whose base disc sits at
/// `start` and which extends along `direction`. Only the direction of
/// `direction` matters, not its magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrillOp {
    /// Bore radius in mm.
    pub radius: f64,
    /// Bore depth in mm.
    pub length: f64,
    /// Centre of the bore entry.
    pub start: Point3,
    /// Drilling direction.
    pub direction: Vec3,
}

impl DrillOp {
    /// Create a drill operation.
    pub fn new(radius: f64, length: f64, start: Point3, direction: Vec3) -> Self {
        Self {
            radius,
            length,
            start,
            direction,
        }
    }

    /// The same bore expressed after `motion`.
    pub fn reframe(&self, motion: &RigidMotion) -> Self {
        Self {
            start: motion.apply_point(&self.start),
            direction: motion.rotation_only().apply_vector(&self.direction),
            ..*self
        }
    }
}

/// A swept slot.
///
/// A round-nosed tool of `radius` and active nose `length` moves from
/// `start` to `end` while its axis stays aligned with `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MillOp {
    /// Tool radius in mm.
    pub radius: f64,
    /// Active nose length in mm.
    pub length: f64,
    /// Tool axis.
    pub direction: Vec3,
    /// Start of the sweep.
    pub start: Point3,
    /// End of the sweep.
    pub end: Point3,
}

impl MillOp {
    /// Create a mill operation.
    pub fn new(radius: f64, length: f64, direction: Vec3, start: Point3, end: Point3) -> Self {
        Self {
            radius,
            length,
            direction,
            start,
            end,
        }
    }

    /// The same sweep expressed after `motion`.
    pub fn reframe(&self, motion: &RigidMotion) -> Self {
        Self {
            direction: motion.rotation_only().apply_vector(&self.direction),
            start: motion.apply_point(&self.start),
            end: motion.apply_point(&self.end),
            ..*self
        }
    }
}

/// One physical tool pass: a leaf of an operation tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolPass {
    /// Bored hole.
    Drill(DrillOp),
    /// Milled sweep.
    Mill(MillOp),
}

impl ToolPass {
    /// The pass expressed after `motion`.
    pub fn reframe(&self, motion: &RigidMotion) -> Self {
        match self {
            ToolPass::Drill(op) => ToolPass::Drill(op.reframe(motion)),
            ToolPass::Mill(op) => ToolPass::Mill(op.reframe(motion)),
        }
    }

    /// Tool radius.
    pub fn radius(&self) -> f64 {
        match self {
            ToolPass::Drill(op) => op.radius,
            ToolPass::Mill(op) => op.radius,
        }
    }

    /// Bore depth or nose length.
    pub fn length(&self) -> f64 {
        match self {
            ToolPass::Drill(op) => op.length,
            ToolPass::Mill(op) => op.length,
        }
    }

    /// Where the tool enters.
    pub fn start(&self) -> Point3 {
        match self {
            ToolPass::Drill(op) => op.start,
            ToolPass::Mill(op) => op.start,
        }
    }

    /// Tool axis direction.
    pub fn direction(&self) -> Vec3 {
        match self {
            ToolPass::Drill(op) => op.direction,
            ToolPass::Mill(op) => op.direction,
        }
    }

    /// Short name of the pass kind.
    pub fn name(&self) -> &'static str {
        match self {
            ToolPass::Drill(_) => "Drill",
            ToolPass::Mill(_) => "Mill",
        }
    }
}

/// A tree of CNC operations.
///
/// Children of a [`Composite`](CncOperation::Composite) keep their insertion
/// order. The order has no effect on the cut geometry but is kept so plans
/// list passes in the order they were authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CncOperation {
    /// Bored hole.
    Drill(DrillOp),
    /// Milled sweep.
    Mill(MillOp),
    /// No cut.
    NoOp,
    /// Ordered group of operations.
    Composite {
        /// Child operations.
        children: Vec<CncOperation>,
    },
}

impl CncOperation {
    /// Group operations into a composite node.
    pub fn composite(children: Vec<CncOperation>) -> Self {
        CncOperation::Composite { children }
    }

    /// A new tree with every leaf re-expressed after `motion`.
    ///
    /// Points take the full motion, directions only its rotation.
    pub fn reframe(&self, motion: &RigidMotion) -> Self {
        match self {
            CncOperation::Drill(op) => CncOperation::Drill(op.reframe(motion)),
            CncOperation::Mill(op) => CncOperation::Mill(op.reframe(motion)),
            CncOperation::NoOp => CncOperation::NoOp,
            CncOperation::Composite { children } => CncOperation::Composite {
                children: children.iter().map(|c| c.reframe(motion)).collect(),
            },
        }
    }

    /// All physical passes, depth-first and left to right.
    pub fn flatten(&self) -> Vec<ToolPass> {
        let mut out = Vec::with_capacity(self.leaf_count());
        self.collect_passes(&mut out);
        out
    }

    fn collect_passes(&self, out: &mut Vec<ToolPass>) {
        match self {
            CncOperation::Drill(op) => out.push(ToolPass::Drill(*op)),
            CncOperation::Mill(op) => out.push(ToolPass::Mill(*op)),
            CncOperation::NoOp => {}
            CncOperation::Composite { children } => {
                for child in children {
                    child.collect_passes(out);
                }
            }
        }
    }

    /// Number of physical passes in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            CncOperation::Drill(_) | CncOperation::Mill(_) => 1,
            CncOperation::NoOp => 0,
            CncOperation::Composite { children } => children.iter().map(Self::leaf_count).sum(),
        }
    }

    /// True when the tree contains no physical pass.
    pub fn is_noop(&self) -> bool {
        self.leaf_count() == 0
    }
}

impl From<DrillOp> for CncOperation {
    fn from(op: DrillOp) -> Self {
        CncOperation::Drill(op)
    }
}

impl From<MillOp> for CncOperation {
    fn from(op: MillOp) -> Self {
        CncOperation::Mill(op)
    }
}

impl From<ToolPass> for CncOperation {
    fn from(pass: ToolPass) -> Self {
        match pass {
            ToolPass::Drill(op) => CncOperation::Drill(op),
            ToolPass::Mill(op) => CncOperation::Mill(op),
        }
    }
}

impl FromIterator<CncOperation> for CncOperation {
    fn from_iter<I: IntoIterator<Item = CncOperation>>(iter: I) -> Self {
        CncOperation::Composite {
            children: iter.into_iter().collect(),
        }
    }
}

fn fmt_vec(f: &mut fmt::Formatter<'_>, x: f64, y: f64, z: f64) -> fmt::Result {
    write!(f, "[{}, {}, {}]", round(x), round(y), round(z))
}

// Drop float noise like 19.999999999999996 from listings.
fn round(v: f64) -> f64 {
    let r = (v * 1e6).round() / 1e6;
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

impl fmt::Display for DrillOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Drill(r={}): ", round(self.radius))?;
        fmt_vec(f, self.start.x, self.start.y, self.start.z)?;
        f.write_str(" -> ")?;
        fmt_vec(f, self.direction.x, self.direction.y, self.direction.z)?;
        write!(f, " * {}", round(self.length))
    }
}

impl fmt::Display for MillOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mill(r={}): ", round(self.radius))?;
        fmt_vec(f, self.start.x, self.start.y, self.start.z)?;
        f.write_str(" -> ")?;
        fmt_vec(f, self.end.x, self.end.y, self.end.z)?;
        f.write_str(" along ")?;
        fmt_vec(f, self.direction.x, self.direction.y, self.direction.z)?;
        write!(f, " * {}", round(self.length))
    }
}

impl fmt::Display for ToolPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolPass::Drill(op) => op.fmt(f),
            ToolPass::Mill(op) => op.fmt(f),
        }
    }
}

impl fmt::Display for CncOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CncOperation::Drill(op) => op.fmt(f),
            CncOperation::Mill(op) => op.fmt(f),
            CncOperation::NoOp => f.write_str("NoOp"),
            CncOperation::Composite { children } => {
                write!(f, "Composite({})", children.len())
            }
        }
    }
}
