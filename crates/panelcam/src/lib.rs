#![warn(missing_docs)]

//! panelcam: machining plans for flat-panel furniture.
//!
//! Boards are placed in the world, joined with dowels and hardware, and
//! every placed part ends up with a list of tool passes in its own frame.
//!
//! This crate ties the pieces together:
//!
//! - [`Assembly`] keeps the placed parts of one piece of furniture and
//!   forwards joints to the planner.
//! - [`MachiningPlan`] is the serializable result, one entry per part.
//! - [`Assembly::materialize_all`] cuts every part through the geometry
//!   kernel in parallel.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use panelcam::{Assembly, Axis, CsgKernel, DowelConnect, PartDimensions, PlankLayout, Vec3, WPart};
//!
//! let mut asm = Assembly::new(CsgKernel::new());
//! let dims = PartDimensions::new(600.0, 300.0, 18.0);
//! let upright = PlankLayout::new(Axis::Y, Axis::X).unwrap();
//! let side = Arc::new(WPart::plank(asm.kernel(), "side", dims, upright, 2).unwrap());
//!
//! let left = asm.place(&side, Vec3::zeros()).unwrap();
//! let right = asm.place(&side, Vec3::new(18.0, 0.0, 0.0)).unwrap();
//! let dowels = asm
//!     .dowel_connect(left, right, &DowelConnect::new(Axis::X, Axis::Y))
//!     .unwrap();
//! assert_eq!(dowels, 7);
//!
//! let plan = asm.plan();
//! assert_eq!(plan.pass_count(), 14);
//! println!("{}", asm.listing());
//! ```

mod assembly;
mod plan;

pub use assembly::{Assembly, AssemblyError, PartKey, Result};
pub use plan::{MachiningPlan, PartPlan};

pub use panelcam_cnc as cnc;
pub use panelcam_joinery as joinery;
pub use panelcam_kernel as kernel;
pub use panelcam_math as math;

pub use panelcam_cnc::{CncOperation, DrillOp, MillOp, ToolPass};
pub use panelcam_joinery::{
    library, DowelConnect, JoineryConfig, JoineryError, JoineryPlanner, Machined, PartDimensions,
    PlacedPart, PlankLayout, SidePair, WPart,
};
pub use panelcam_kernel::{CsgKernel, CsgShape, GeometryKernel, KernelError};
pub use panelcam_math::{Aabb3, Axis, Point3, RigidMotion, Vec3};
