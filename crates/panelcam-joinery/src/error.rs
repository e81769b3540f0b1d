//! Error types for joinery planning.

use panelcam_cnc::ToolShapeError;
use panelcam_kernel::KernelError;
use panelcam_math::{Axis, MathError};
use thiserror::Error;

/// Errors raised while placing parts or planning joints.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JoineryError {
    /// The two parts do not share a face on the dowel axis.
    #[error("{first} and {second} do not touch on the {axis} axis (gap {gap})")]
    NotTouching {
        /// Part on the panel side.
        first: String,
        /// Part on the partner side.
        second: String,
        /// Dowel axis.
        axis: Axis,
        /// `first.max - second.min` on that axis.
        gap: f64,
    },

    /// The joint request is malformed.
    #[error("invalid joint request: {0}")]
    InvalidRequest(String),

    /// A dowel split would give a bore of negative length.
    #[error("invalid dowel split of length {length}: left {left}, right {right}")]
    InvalidDowelSplit {
        /// Total dowel length.
        length: f64,
        /// Panel-side extent.
        left: f64,
        /// Partner-side extent.
        right: f64,
    },

    /// More instances were requested than the part allows.
    #[error("all {limit} instances of part {part} are already placed")]
    AllocationExhausted {
        /// Reference part name.
        part: String,
        /// Allocation limit.
        limit: usize,
    },

    /// Plank layout uses the same axis twice.
    #[error("plank length and thickness both run along {0}")]
    InvalidLayout(Axis),

    /// A frame rotation was undefined.
    #[error(transparent)]
    Math(#[from] MathError),

    /// The geometry kernel failed.
    #[error(transparent)]
    Kernel(#[from] KernelError),

    /// A tool shape could not be built.
    #[error(transparent)]
    ToolShape(#[from] ToolShapeError),
}
