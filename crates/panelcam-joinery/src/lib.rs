#![warn(missing_docs)]

//! Joinery for flat-panel furniture.
//!
//! Parts are placed in the world as [`PlacedPart`]s. The planner reads
//! their bounding boxes, decides where fasteners go and appends the
//! resulting tool passes to both parts, each in its own local frame.
//!
//! - [`library`] holds the fastener definitions (dowels, shelf pins, cam
//!   fittings, rail holes, grooves).
//! - [`JoineryPlanner::connect`] spreads a dowel row along a shared edge.
//! - [`edge_connect`] places a two-sided fitting where a shelf meets an
//!   upright panel.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use panelcam_joinery::{dowel_connect, DowelConnect, PartDimensions, PlacedPart, PlankLayout, WPart};
//! use panelcam_kernel::CsgKernel;
//! use panelcam_math::{Axis, Vec3};
//!
//! let kernel = CsgKernel::new();
//! let dims = PartDimensions::new(600.0, 300.0, 18.0);
//! let upright = PlankLayout::new(Axis::Y, Axis::X).unwrap();
//! let side = Arc::new(WPart::plank(&kernel, "side", dims, upright, 2).unwrap());
//!
//! let mut left = PlacedPart::new(side.clone(), Vec3::zeros()).unwrap();
//! let mut right = PlacedPart::new(side, Vec3::new(18.0, 0.0, 0.0)).unwrap();
//! let request = DowelConnect::new(Axis::X, Axis::Y);
//! let placed = dowel_connect(&mut left, &mut right, &request).unwrap();
//! assert_eq!(placed, 7);
//! assert_eq!(left.operations().len(), 7);
//! ```

mod config;
mod error;
pub mod library;
mod part;
mod placed;
mod planner;

pub use config::JoineryConfig;
pub use error::JoineryError;
pub use library::{
    dowel, groove, pin_edge, rail, rastex, shelf_pin, side_symmetric, strong_edge, vb, DowelSpec,
    Fitting, GrooveSpec, Mounting, OperationPair, SidePair,
};
pub use part::{PartDimensions, PlankLayout, WPart};
pub use placed::{Machined, PlacedPart};
pub use planner::{dowel_connect, edge_connect, DowelConnect, JoineryPlanner};
