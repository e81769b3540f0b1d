//! Parts placed in the world frame.

use std::sync::{Arc, OnceLock};

use panelcam_cnc::{pass_shape, CncOperation, ToolPass};
use panelcam_kernel::GeometryKernel;
use panelcam_math::{Aabb3, RigidMotion, Vec3};
use tracing::trace;

use crate::{JoineryError, WPart};

/// One physical instance of a [`WPart`] at a world position.
///
/// The pass log only grows. Passes are stored in the part's local frame,
/// so the log can be machined without knowing where the part sits.
#[derive(Debug)]
pub struct PlacedPart<K: GeometryKernel> {
    part: Arc<WPart<K>>,
    name: String,
    position: Vec3,
    operations: Vec<ToolPass>,
    bounds: OnceLock<Aabb3>,
}

/// A part with all of its passes cut.
#[derive(Debug, Clone)]
pub struct Machined<S> {
    /// Instance name.
    pub name: String,
    /// Reference shape minus every tool shape, in the local frame.
    pub shape: S,
    /// Where the shape sits in the world.
    pub placement: RigidMotion,
    /// Tool shapes in world coordinates.
    pub tools: Vec<S>,
}

impl<K: GeometryKernel> PlacedPart<K> {
    /// Place the next free instance of `part` at `position`.
    ///
    /// The instance is named `<part>_<index>`.
    pub fn new(part: Arc<WPart<K>>, position: Vec3) -> Result<Self, JoineryError> {
        let index = part.allocate()?;
        let name = format!("{}_{}", part.name(), index);
        Ok(Self {
            part,
            name,
            position,
            operations: Vec::new(),
            bounds: OnceLock::new(),
        })
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The reference part.
    pub fn part(&self) -> &Arc<WPart<K>> {
        &self.part
    }

    /// World position of the local origin.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Local-to-world motion.
    pub fn placement(&self) -> RigidMotion {
        RigidMotion::translation(self.position)
    }

    /// Passes applied so far, in the local frame.
    pub fn operations(&self) -> &[ToolPass] {
        &self.operations
    }

    /// Append a world-frame operation to the log.
    ///
    /// Returns the number of passes appended. Passes outside the part's
    /// envelope are kept; they simply cut nothing.
    pub fn apply_operation(&mut self, op: &CncOperation) -> usize {
        let local = op.reframe(&self.placement().inverse()).flatten();
        for pass in &local {
            trace!(part = %self.name, %pass, "append");
        }
        let count = local.len();
        self.operations.extend(local);
        count
    }

    /// World bounding box of the uncut part.
    ///
    /// Computed on first use; cuts never change it.
    pub fn bounding_box(&self) -> Aabb3 {
        *self
            .bounds
            .get_or_init(|| self.part.local_bounds().translated(&self.position))
    }

    /// Cut every logged pass out of the reference shape.
    ///
    /// All tool shapes are fused first and subtracted in a single boolean.
    pub fn materialize(&self, kernel: &K) -> Result<Machined<K::Shape>, JoineryError> {
        let tools = self
            .operations
            .iter()
            .map(|pass| pass_shape(kernel, pass))
            .collect::<Result<Vec<_>, _>>()?;
        let cut = kernel.union(&tools)?;
        let shape = kernel.subtract(self.part.shape(), &cut)?;
        let placement = self.placement();
        let tools = tools
            .iter()
            .map(|tool| kernel.transform(tool, &placement))
            .collect();
        Ok(Machined {
            name: self.name.clone(),
            shape,
            placement,
            tools,
        })
    }
}
