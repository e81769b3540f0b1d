#![warn(missing_docs)]

//! CNC operation trees for panelcam.
//!
//! Operations are authored in a convenient local frame, moved around with
//! [`CncOperation::reframe`] and finally flattened into the physical
//! [`ToolPass`]es a part receives.
//!
//! # Operations
//!
//! - [`DrillOp`] - straight bore along a direction
//! - [`MillOp`] - round-nosed tool swept from a start to an end point
//! - [`CncOperation::NoOp`] - the side of a joint that receives no cut
//! - [`CncOperation::Composite`] - ordered group of operations
//!
//! # Example
//!
//! ```
//! use panelcam_cnc::{CncOperation, DrillOp};
//! use panelcam_math::{Point3, RigidMotion, Vec3};
//!
//! let hole = DrillOp::new(3.0, 12.0, Point3::origin(), Vec3::x());
//! let pair = CncOperation::composite(vec![hole.into(), CncOperation::NoOp]);
//! let moved = pair.reframe(&RigidMotion::translation_xyz(100.0, 0.0, 0.0));
//! let passes = moved.flatten();
//! assert_eq!(passes.len(), 1);
//! assert_eq!(passes[0].start().x, 100.0);
//! ```

mod operation;
pub mod tool_shape;

pub use operation::{CncOperation, DrillOp, MillOp, ToolPass};
pub use tool_shape::{drill_shape, mill_shape, pass_shape, tool_shape, ToolShapeError};
