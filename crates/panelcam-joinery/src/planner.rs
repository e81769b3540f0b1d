//! Dowel rows between touching parts.

use panelcam_kernel::GeometryKernel;
use panelcam_math::{Aabb3, Axis, Point3, RigidMotion, Tolerance, Vec3};
use tracing::{debug, warn};

use crate::library::{dowel, OperationPair, SidePair};
use crate::{JoineryConfig, JoineryError, PlacedPart};

/// One dowel row request.
///
/// The first part must end where the second begins on `dowel_axis`. Dowels
/// are spread along `edge_axis` and centred on the third axis unless
/// `other_pos` pins them.
#[derive(Debug, Clone, PartialEq)]
pub struct DowelConnect {
    /// Axis the bores run along.
    pub dowel_axis: Axis,
    /// Axis the row runs along.
    pub edge_axis: Axis,
    /// Fixed coordinate on the remaining axis.
    pub other_pos: Option<f64>,
    /// Usable fraction `(lo, hi)` of the shared extent, per axis.
    pub rel_range: [Option<(f64, f64)>; 3],
    /// Dowel split, see [`dowel`].
    pub left_extent: f64,
}

impl DowelConnect {
    /// Row along `edge_axis` of dowels bored along `dowel_axis`.
    pub fn new(dowel_axis: Axis, edge_axis: Axis) -> Self {
        Self {
            dowel_axis,
            edge_axis,
            other_pos: None,
            rel_range: [None; 3],
            left_extent: 0.0,
        }
    }

    /// Put every dowel at `pos` on the remaining axis.
    pub fn other_pos(mut self, pos: f64) -> Self {
        self.other_pos = Some(pos);
        self
    }

    /// Only use the fraction `lo..hi` of the shared extent on `axis`.
    pub fn rel_range(mut self, axis: Axis, lo: f64, hi: f64) -> Self {
        self.rel_range[axis.index()] = Some((lo, hi));
        self
    }

    /// Dowel split passed to the dowel generator.
    pub fn left_extent(mut self, extent: f64) -> Self {
        self.left_extent = extent;
        self
    }

    /// Check the request and return the remaining axis.
    pub fn validate(&self) -> Result<Axis, JoineryError> {
        let third = Axis::remaining(self.dowel_axis, self.edge_axis).ok_or_else(|| {
            JoineryError::InvalidRequest(format!(
                "dowel and edge axis are both {}",
                self.dowel_axis
            ))
        })?;
        for (axis, range) in Axis::ALL.into_iter().zip(&self.rel_range) {
            if let Some((lo, hi)) = *range {
                if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo > hi {
                    return Err(JoineryError::InvalidRequest(format!(
                        "relative range on {axis} must satisfy 0 <= lo <= hi <= 1, got ({lo}, {hi})"
                    )));
                }
            }
        }
        Ok(third)
    }

    fn usable(&self, a: &Aabb3, b: &Aabb3, axis: Axis) -> (f64, f64) {
        let (lo, hi) = a.overlap(b, axis);
        match self.rel_range[axis.index()] {
            Some((r_lo, r_hi)) => {
                let len = hi - lo;
                (lo + r_lo * len, lo + r_hi * len)
            }
            None => (lo, hi),
        }
    }
}

/// Places dowel rows and edge fittings between placed parts.
///
/// The settings are checked once on construction, so a planner never runs
/// with a spacing that could not place a dowel.
#[derive(Debug, Clone, Default)]
pub struct JoineryPlanner {
    config: JoineryConfig,
}

impl JoineryPlanner {
    /// Planner with the given settings.
    pub fn new(config: JoineryConfig) -> Result<Self, JoineryError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Planner constants.
    pub fn config(&self) -> &JoineryConfig {
        &self.config
    }

    /// Bore a row of dowels between `a` and `b`.
    ///
    /// `a` gets the panel side of each dowel, `b` the partner side. Returns
    /// the number of dowels placed, which may be zero when the shared edge
    /// is too short or too thin.
    pub fn connect<K: GeometryKernel>(
        &self,
        a: &mut PlacedPart<K>,
        b: &mut PlacedPart<K>,
        request: &DowelConnect,
    ) -> Result<usize, JoineryError> {
        let third = request.validate()?;
        let (box_a, box_b) = (a.bounding_box(), b.bounding_box());

        let axis = request.dowel_axis;
        let plane = box_a.max[axis.index()];
        let gap = plane - box_b.min[axis.index()];
        if gap.abs() > Tolerance::DEFAULT.linear {
            return Err(JoineryError::NotTouching {
                first: a.name().to_string(),
                second: b.name().to_string(),
                axis,
                gap,
            });
        }

        let (lo, hi) = request.usable(&box_a, &box_b, request.edge_axis);
        if !(hi > lo) {
            debug!(a = a.name(), b = b.name(), lo, hi, "no shared edge");
            return Ok(0);
        }
        let positions = self.positions(lo, hi);

        let (c_lo, c_hi) = request.usable(&box_a, &box_b, third);
        if c_hi - c_lo < self.config.min_cross_overlap {
            warn!(
                a = a.name(),
                b = b.name(),
                overlap = c_hi - c_lo,
                skipped = positions.len(),
                "overlap across the edge too thin for dowels"
            );
            return Ok(0);
        }
        let cross = request.other_pos.unwrap_or((c_lo + c_hi) / 2.0);

        let pair = dowel(&self.config.dowel, request.left_extent)?;
        let orient = RigidMotion::rotation_between(&Vec3::x(), &axis.unit())?;
        for &pos in &positions {
            let mut at = Point3::origin();
            at[axis.index()] = plane;
            at[request.edge_axis.index()] = pos;
            at[third.index()] = cross;
            let placed = pair.reframe(&orient.then(&RigidMotion::translation(at.coords)));
            a.apply_operation(&placed.panel);
            b.apply_operation(&placed.partner);
        }
        debug!(
            a = a.name(),
            b = b.name(),
            dowels = positions.len(),
            "dowel row placed"
        );
        Ok(positions.len())
    }

    /// Dowel positions along an edge spanning `lo..hi`.
    ///
    /// Evenly spaced between the inset ends, both ends included. Edges
    /// with room for fewer than three dowels give back part of the margin
    /// and get two dowels at the ends, one in the middle, or none.
    pub fn positions(&self, lo: f64, hi: f64) -> Vec<f64> {
        let cfg = &self.config;
        let (start, end) = (lo + cfg.margin, hi - cfg.margin);
        let len = end - start;
        let n = if len > 0.0 {
            (len / cfg.spacing).floor() as usize
        } else {
            0
        };
        if n >= 3 {
            let step = len / (n - 1) as f64;
            return (0..n).map(|i| start + step * i as f64).collect();
        }

        let (start, end) = (start - cfg.fallback_widen, end + cfg.fallback_widen);
        let len = end - start;
        if len > cfg.pair_threshold {
            vec![start, end]
        } else if len > 0.0 {
            vec![(start + end) / 2.0]
        } else {
            Vec::new()
        }
    }

    /// Apply one side of an edge fitting to a panel and its partner.
    ///
    /// See [`edge_connect`].
    pub fn edge_connect<K: GeometryKernel>(
        &self,
        panel: &mut PlacedPart<K>,
        partner: &mut PlacedPart<K>,
        sides: &SidePair,
    ) -> usize {
        edge_connect(panel, partner, sides)
    }
}

/// Bore a row of dowels between `a` and `b` with the default settings.
pub fn dowel_connect<K: GeometryKernel>(
    a: &mut PlacedPart<K>,
    b: &mut PlacedPart<K>,
    request: &DowelConnect,
) -> Result<usize, JoineryError> {
    JoineryPlanner::default().connect(a, b, request)
}

/// Apply an edge fitting where `partner` meets the upright `panel`.
///
/// A partner to the right of the panel gets the `right` side at its own
/// left face, otherwise the `left` side goes at the panel's left face. The
/// fitting is centred on the panel along Y and sits on the partner's
/// bottom face. Returns the number of passes appended to both parts.
pub fn edge_connect<K: GeometryKernel>(
    panel: &mut PlacedPart<K>,
    partner: &mut PlacedPart<K>,
    sides: &SidePair,
) -> usize {
    let (pb, qb) = (panel.bounding_box(), partner.bounding_box());
    let (pair, x): (&OperationPair, f64) = if pb.min.x < qb.min.x {
        (&sides.right, qb.min.x)
    } else {
        (&sides.left, pb.min.x)
    };
    let at = RigidMotion::translation_xyz(x, pb.center().y, qb.min.z);
    let placed = pair.reframe(&at);
    debug!(
        panel = panel.name(),
        partner = partner.name(),
        x,
        "edge fitting"
    );
    panel.apply_operation(&placed.panel) + partner.apply_operation(&placed.partner)
}
