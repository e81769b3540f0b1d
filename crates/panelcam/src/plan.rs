//! Serializable machining plans.

use panelcam_cnc::ToolPass;
use panelcam_joinery::PartDimensions;
use serde::{Deserialize, Serialize};

/// Passes of one placed part, in its local frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartPlan {
    /// Instance name, `<part>_<index>`.
    pub name: String,
    /// Reference part name.
    pub part: String,
    /// World position of the local origin.
    pub position: [f64; 3],
    /// Declared envelope.
    pub dimensions: PartDimensions,
    /// Passes in application order.
    pub passes: Vec<ToolPass>,
}

/// Everything the machine has to cut, part by part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MachiningPlan {
    /// Parts in placement order.
    pub parts: Vec<PartPlan>,
}

impl MachiningPlan {
    /// Total number of passes.
    pub fn pass_count(&self) -> usize {
        self.parts.iter().map(|p| p.passes.len()).sum()
    }

    /// Plan for one instance.
    pub fn part(&self, name: &str) -> Option<&PartPlan> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a plan written by [`MachiningPlan::to_json`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
