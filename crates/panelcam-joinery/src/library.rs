//! Fastener definitions.
//!
//! Every generator works in the same canonical joint frame:
//!
//! - the origin is the joint's reference point on the shared face,
//! - +X points from the panel into its partner,
//! - +Z is up and Y runs along the shared edge.
//!
//! Generators return an [`OperationPair`]: the cuts for the panel and the
//! cuts for its partner. Callers move the pair into place with
//! [`OperationPair::reframe`].

use panelcam_cnc::{CncOperation, DrillOp, MillOp};
use panelcam_math::{Axis, Point3, RigidMotion, Vec3};
use serde::{Deserialize, Serialize};

use crate::JoineryError;

/// Operations for the two parts of one joint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationPair {
    /// Cuts on the panel side (negative X).
    pub panel: CncOperation,
    /// Cuts on the partner side (positive X).
    pub partner: CncOperation,
}

impl OperationPair {
    /// Pair up panel and partner operations.
    pub fn new(panel: impl Into<CncOperation>, partner: impl Into<CncOperation>) -> Self {
        Self {
            panel: panel.into(),
            partner: partner.into(),
        }
    }

    /// Both sides moved by `motion`.
    pub fn reframe(&self, motion: &RigidMotion) -> Self {
        Self {
            panel: self.panel.reframe(motion),
            partner: self.partner.reframe(motion),
        }
    }

    /// Both sides shifted by `(dx, dy, dz)`.
    pub fn translated(&self, dx: f64, dy: f64, dz: f64) -> Self {
        self.reframe(&RigidMotion::translation_xyz(dx, dy, dz))
    }

    /// Group several pairs side by side.
    pub fn merge(pairs: impl IntoIterator<Item = OperationPair>) -> Self {
        let (panel, partner): (Vec<_>, Vec<_>) =
            pairs.into_iter().map(|p| (p.panel, p.partner)).unzip();
        Self {
            panel: CncOperation::composite(panel),
            partner: CncOperation::composite(partner),
        }
    }
}

/// A fastener definition for both ends of a shared edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidePair {
    /// Used when the partner lies on the panel's negative X side.
    pub left: OperationPair,
    /// Used when the partner lies on the panel's positive X side.
    pub right: OperationPair,
}

/// Derive both sides from one definition.
///
/// `right` is the pair as authored, `left` the pair turned 180° about Z.
pub fn side_symmetric(pair: OperationPair) -> SidePair {
    SidePair {
        left: pair.reframe(&RigidMotion::rotation_about(Axis::Z, 180.0)),
        right: pair,
    }
}

/// Wooden dowel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DowelSpec {
    /// Dowel diameter.
    pub diameter: f64,
    /// Dowel length.
    pub length: f64,
    /// Extra bore depth on each side.
    pub clearance: f64,
}

impl Default for DowelSpec {
    fn default() -> Self {
        Self {
            diameter: 6.0,
            length: 35.0,
            clearance: 0.5,
        }
    }
}

/// Split a dowel between the two parts.
///
/// `left_extent` says how much of the dowel goes into the panel:
/// zero splits it evenly, a positive value is the panel extent and a
/// negative value is minus the partner extent. Each bore gets the
/// clearance on top, so the two bores always total
/// `length + 2 * clearance`.
pub fn dowel(spec: &DowelSpec, left_extent: f64) -> Result<OperationPair, JoineryError> {
    let l = spec.length;
    let (left, right) = if left_extent == 0.0 {
        (l / 2.0, l / 2.0)
    } else if left_extent > 0.0 {
        (left_extent, l - left_extent)
    } else {
        (l + left_extent, -left_extent)
    };
    if !(left >= 0.0 && right >= 0.0) {
        return Err(JoineryError::InvalidDowelSplit {
            length: l,
            left,
            right,
        });
    }
    let r = spec.diameter / 2.0;
    Ok(OperationPair::new(
        DrillOp::new(r, left + spec.clearance, Point3::origin(), -Vec3::x()),
        DrillOp::new(r, right + spec.clearance, Point3::origin(), Vec3::x()),
    ))
}

/// Shelf support pin.
///
/// A thin bore in the panel, a wider one in the shelf and a drop-in pocket
/// under the shelf so it can be lowered onto the pin.
pub fn shelf_pin() -> OperationPair {
    let (pin_in_d, pin_in_l) = (5.0, 7.0);
    let (pin_out_d, pin_out_l) = (7.0 + 0.5, 10.0 + 0.5);
    let r_out = pin_out_d / 2.0;
    let axis = Point3::new(0.0, 0.0, r_out);

    let pocket = MillOp::new(
        r_out,
        r_out,
        Vec3::z(),
        Point3::new(r_out, 0.0, 0.0),
        Point3::new(pin_out_l - r_out, 0.0, 0.0),
    );
    OperationPair::new(
        DrillOp::new(pin_in_d / 2.0, pin_in_l, axis, -Vec3::x()),
        CncOperation::composite(vec![
            DrillOp::new(r_out, pin_out_l, axis, Vec3::x()).into(),
            pocket.into(),
        ]),
    )
}

/// Six shelf pins along a shelf edge: three heights, near front and back.
pub fn pin_edge(shelf_width: f64) -> SidePair {
    let pin = shelf_pin();
    let y_shift = shelf_width / 2.0 - 40.0;
    let pins = [-40.0, 0.0, 40.0]
        .into_iter()
        .flat_map(|z| [-y_shift, y_shift].map(|y| (y, z)))
        .map(|(y, z)| pin.translated(0.0, y, z));
    side_symmetric(OperationPair::merge(pins))
}

/// How a fitting bore meets the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mounting {
    /// Blind bore; the panel keeps its far face.
    #[default]
    Blind,
    /// Bore through the whole panel, shared with a shelf on the other side.
    Through,
}

/// Two-part cam fittings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fitting {
    /// Cam housing with a pin, see [`rastex`].
    Rastex,
    /// Two-bore connector, see [`vb`].
    Vb,
}

impl Fitting {
    /// Operations for one fitting.
    pub fn pair(self, thickness: f64, mounting: Mounting) -> OperationPair {
        match self {
            Fitting::Rastex => rastex(thickness, mounting),
            Fitting::Vb => vb(thickness, mounting),
        }
    }
}

/// Cam fitting: pin bore in the panel, pin channel and vertical cam
/// housing in the shelf.
///
/// Blind mounting takes an M6 pin. Through mounting takes a double-ended
/// pin through the panel, which moves the housing closer to the edge.
pub fn rastex(thickness: f64, mounting: Mounting) -> OperationPair {
    let (hetix_d, hetix_l) = (15.5, 13.5);
    let (pin_in_d, pin_in_l, hetix_x) = match mounting {
        Mounting::Blind => (8.0, 11.5, 34.0),
        Mounting::Through => (8.5, thickness, 24.5),
    };
    let pin_out_d = 8.5;
    let axis = Point3::new(0.0, 0.0, thickness / 2.0);

    OperationPair::new(
        DrillOp::new(pin_in_d / 2.0, pin_in_l, axis, -Vec3::x()),
        CncOperation::composite(vec![
            DrillOp::new(pin_out_d / 2.0, hetix_x, axis, Vec3::x()).into(),
            DrillOp::new(
                hetix_d / 2.0,
                hetix_l,
                Point3::new(hetix_x, 0.0, 0.0),
                Vec3::z(),
            )
            .into(),
        ]),
    )
}

/// VB connector: pin bore in the panel, large and small housings drilled
/// up into the shelf.
pub fn vb(thickness: f64, mounting: Mounting) -> OperationPair {
    let (large_d, large_l, large_x) = (20.0, 12.5, 10.0);
    let (small_d, small_l, small_x) = (10.0, 10.5, 32.0 + 10.0);
    let pin_d = 8.0;
    let pin_l = match mounting {
        Mounting::Blind => 11.5,
        Mounting::Through => thickness,
    };
    let pin_z = 8.0;

    OperationPair::new(
        DrillOp::new(pin_d / 2.0, pin_l, Point3::new(0.0, 0.0, pin_z), -Vec3::x()),
        CncOperation::composite(vec![
            DrillOp::new(large_d / 2.0, large_l, Point3::new(large_x, 0.0, 0.0), Vec3::z())
                .into(),
            DrillOp::new(small_d / 2.0, small_l, Point3::new(small_x, 0.0, 0.0), Vec3::z())
                .into(),
        ]),
    )
}

/// Load-bearing shelf edge: a fitting 40 from the front and back edges and
/// three dowels in between.
pub fn strong_edge(
    thickness: f64,
    shelf_width: f64,
    fitting: Fitting,
    mounting: Mounting,
    dowel_spec: &DowelSpec,
) -> Result<SidePair, JoineryError> {
    let y_shift = shelf_width / 2.0 - 40.0;
    let fit = fitting.pair(thickness, mounting);
    let dw = dowel(dowel_spec, 14.0)?.translated(0.0, 0.0, thickness / 2.0);
    let placed = [
        fit.translated(0.0, -y_shift, 0.0),
        dw.translated(0.0, -120.0, 0.0),
        dw.translated(0.0, 20.0, 0.0),
        dw.translated(0.0, 160.0, 0.0),
        fit.translated(0.0, y_shift, 0.0),
    ];
    Ok(side_symmetric(OperationPair::merge(placed)))
}

/// Screw holes for a drawer rail, drilled into the panel only.
///
/// Left and right rails are not mirror images, so each side has its own
/// hole table of `(diameter, distance from the front, height offset)`.
pub fn rail(shelf_width: f64) -> SidePair {
    const RAIL_AXIS_Z: f64 = 47.0;
    const DEPTH: f64 = 12.0;
    const FRONT_GAP: f64 = 2.0;
    let holes_left = [(6.0, 35.0, 0.0), (7.0, 114.5, 0.0), (4.0, 259.0, 0.0), (4.0, 538.0, -9.0)];
    let holes_right = [(7.0, 50.0, 0.0), (6.0, 99.5, 0.0), (4.0, 323.0, 0.0), (4.0, 538.0, 9.0)];

    let side = |direction: Vec3, holes: &[(f64, f64, f64)]| {
        let drills: Vec<CncOperation> = holes
            .iter()
            .map(|&(d, y, z)| {
                let start = Point3::new(
                    0.0,
                    y - shelf_width / 2.0 + FRONT_GAP,
                    z + RAIL_AXIS_Z,
                );
                DrillOp::new((d - 2.5) / 2.0, DEPTH, start, direction).into()
            })
            .collect();
        OperationPair::new(CncOperation::composite(drills), CncOperation::NoOp)
    };
    SidePair {
        left: side(Vec3::x(), &holes_left),
        right: side(-Vec3::x(), &holes_right),
    }
}

/// Milled groove dimensions, such as a sliding door track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrooveSpec {
    /// Groove width (tool diameter).
    pub width: f64,
    /// Groove depth below the face.
    pub depth: f64,
}

impl Default for GrooveSpec {
    fn default() -> Self {
        Self {
            width: 6.0,
            depth: 8.0,
        }
    }
}

/// Groove of `length` along +X, cut down into the panel's top face at
/// `z = 0`. The partner gets nothing.
pub fn groove(spec: &GrooveSpec, length: f64) -> OperationPair {
    let r = spec.width / 2.0;
    OperationPair::new(
        MillOp::new(
            r,
            spec.depth,
            Vec3::z(),
            Point3::new(0.0, 0.0, -spec.depth),
            Point3::new(length, 0.0, -spec.depth),
        ),
        CncOperation::NoOp,
    )
}
