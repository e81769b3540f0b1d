//! An arena of placed parts and the joints between them.

use std::sync::Arc;

use panelcam_cnc::CncOperation;
use panelcam_joinery::{
    edge_connect, DowelConnect, JoineryConfig, JoineryError, JoineryPlanner, Machined, PlacedPart,
    SidePair, WPart,
};
use panelcam_kernel::GeometryKernel;
use panelcam_math::Vec3;
use rayon::prelude::*;
use slotmap::{new_key_type, SlotMap};
use thiserror::Error;
use tracing::{debug, info};

use crate::plan::{MachiningPlan, PartPlan};

new_key_type! {
    /// Key of a placed part within an [`Assembly`].
    pub struct PartKey;
}

/// Errors from assembly operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssemblyError {
    /// The key does not name a part of this assembly.
    #[error("unknown part {0:?}")]
    UnknownPart(PartKey),

    /// A joint needs two different parts.
    #[error("cannot join part {0:?} with itself")]
    SamePart(PartKey),

    /// Joinery failed.
    #[error(transparent)]
    Joinery(#[from] JoineryError),
}

/// Result type for assembly operations.
pub type Result<T> = std::result::Result<T, AssemblyError>;

/// Placed parts of one piece of furniture.
///
/// Parts are listed in the order they were placed.
pub struct Assembly<K: GeometryKernel> {
    kernel: K,
    planner: JoineryPlanner,
    parts: SlotMap<PartKey, PlacedPart<K>>,
    order: Vec<PartKey>,
}

impl<K: GeometryKernel> Assembly<K> {
    /// Empty assembly with default planner settings.
    pub fn new(kernel: K) -> Self {
        Self::with_planner(kernel, JoineryPlanner::default())
    }

    /// Empty assembly with the given planner settings.
    ///
    /// Fails when the settings are rejected by [`JoineryConfig::validate`].
    pub fn with_config(kernel: K, config: JoineryConfig) -> Result<Self> {
        Ok(Self::with_planner(kernel, JoineryPlanner::new(config)?))
    }

    fn with_planner(kernel: K, planner: JoineryPlanner) -> Self {
        Self {
            kernel,
            planner,
            parts: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// The geometry kernel.
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Planner settings.
    pub fn config(&self) -> &JoineryConfig {
        self.planner.config()
    }

    /// Number of placed parts.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when nothing has been placed.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Place the next instance of `part` at `position`.
    pub fn place(&mut self, part: &Arc<WPart<K>>, position: Vec3) -> Result<PartKey> {
        let placed = PlacedPart::new(part.clone(), position)?;
        debug!(name = placed.name(), ?position, "placed");
        let key = self.parts.insert(placed);
        self.order.push(key);
        Ok(key)
    }

    /// A placed part.
    pub fn get(&self, key: PartKey) -> Result<&PlacedPart<K>> {
        self.parts.get(key).ok_or(AssemblyError::UnknownPart(key))
    }

    /// Placed parts in placement order.
    pub fn iter(&self) -> impl Iterator<Item = (PartKey, &PlacedPart<K>)> {
        self.order.iter().map(move |&k| (k, &self.parts[k]))
    }

    fn pair_mut(&mut self, a: PartKey, b: PartKey) -> Result<[&mut PlacedPart<K>; 2]> {
        if a == b {
            return Err(AssemblyError::SamePart(a));
        }
        for key in [a, b] {
            if !self.parts.contains_key(key) {
                return Err(AssemblyError::UnknownPart(key));
            }
        }
        self.parts
            .get_disjoint_mut([a, b])
            .ok_or(AssemblyError::SamePart(a))
    }

    /// Bore a dowel row between `a` (panel side) and `b` (partner side).
    pub fn dowel_connect(
        &mut self,
        a: PartKey,
        b: PartKey,
        request: &DowelConnect,
    ) -> Result<usize> {
        let planner = self.planner.clone();
        let [pa, pb] = self.pair_mut(a, b)?;
        Ok(planner.connect(pa, pb, request)?)
    }

    /// Apply an edge fitting between an upright `panel` and its `partner`.
    pub fn edge_connect(
        &mut self,
        panel: PartKey,
        partner: PartKey,
        sides: &SidePair,
    ) -> Result<usize> {
        let [pa, pb] = self.pair_mut(panel, partner)?;
        Ok(edge_connect(pa, pb, sides))
    }

    /// Apply a world-frame operation to one part.
    pub fn apply(&mut self, key: PartKey, op: &CncOperation) -> Result<usize> {
        let part = self
            .parts
            .get_mut(key)
            .ok_or(AssemblyError::UnknownPart(key))?;
        Ok(part.apply_operation(op))
    }

    /// Every part followed by its passes, one per indented line.
    pub fn listing(&self) -> String {
        let mut out = String::new();
        for (_, part) in self.iter() {
            out.push_str(part.name());
            out.push('\n');
            for pass in part.operations() {
                out.push_str("    ");
                out.push_str(&pass.to_string());
                out.push('\n');
            }
        }
        out
    }

    /// Serializable snapshot of every part's passes.
    pub fn plan(&self) -> MachiningPlan {
        MachiningPlan {
            parts: self
                .iter()
                .map(|(_, p)| {
                    let at = p.position();
                    PartPlan {
                        name: p.name().to_string(),
                        part: p.part().name().to_string(),
                        position: [at.x, at.y, at.z],
                        dimensions: p.part().dimensions(),
                        passes: p.operations().to_vec(),
                    }
                })
                .collect(),
        }
    }

    /// Machine every part, in parallel, in placement order.
    pub fn materialize_all(&self) -> Result<Vec<Machined<K::Shape>>> {
        let parts: Vec<&PlacedPart<K>> = self.iter().map(|(_, p)| p).collect();
        info!(parts = parts.len(), "materializing");
        let machined = parts
            .par_iter()
            .map(|p| p.materialize(&self.kernel))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(machined)
    }
}
