//! TOML job files.
//!
//! A job lists reference parts, where their instances go and which joints
//! to cut between them:
//!
//! ```toml
//! [joinery]
//! spacing = 100.0
//!
//! [[part]]
//! name = "side"
//! length = 800.0
//! width = 600.0
//! thickness = 18.0
//! length_axis = "z"
//! thickness_axis = "x"
//! count = 2
//!
//! [[place]]
//! id = "left"
//! part = "side"
//! position = [0.0, 0.0, 0.0]
//!
//! [[dowel]]
//! a = "left"
//! b = "bottom"
//! dowel_axis = "x"
//! edge_axis = "y"
//! rel_range = { y = [0.0, 0.5] }
//!
//! [[edge]]
//! panel = "left"
//! partner = "shelf"
//! kind = "strong"
//! fitting = "rastex"
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use panelcam::library::{pin_edge, rail, strong_edge, Fitting, Mounting};
use panelcam::{
    Assembly, Axis, CsgKernel, DowelConnect, JoineryConfig, PartDimensions, PartKey, PlankLayout,
    SidePair, Vec3, WPart,
};
use serde::Deserialize;
use tracing::{debug, info};

/// A whole job file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Job {
    #[serde(default)]
    pub joinery: JoineryConfig,
    #[serde(default, rename = "part")]
    pub parts: Vec<PartJob>,
    #[serde(default, rename = "place")]
    pub places: Vec<PlaceJob>,
    #[serde(default, rename = "dowel")]
    pub dowels: Vec<DowelJob>,
    #[serde(default, rename = "edge")]
    pub edges: Vec<EdgeJob>,
}

/// A reference board.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartJob {
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub thickness: f64,
    #[serde(default = "default_length_axis")]
    pub length_axis: Axis,
    #[serde(default = "default_thickness_axis")]
    pub thickness_axis: Axis,
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_length_axis() -> Axis {
    Axis::X
}

fn default_thickness_axis() -> Axis {
    Axis::Z
}

fn default_count() -> usize {
    1
}

/// One placed instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlaceJob {
    pub id: String,
    pub part: String,
    pub position: [f64; 3],
}

/// A dowel row between two instances.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DowelJob {
    pub a: String,
    pub b: String,
    pub dowel_axis: Axis,
    pub edge_axis: Axis,
    pub other_pos: Option<f64>,
    #[serde(default)]
    pub rel_range: HashMap<Axis, (f64, f64)>,
    #[serde(default)]
    pub left_extent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Pins,
    Rail,
    Strong,
}

/// A shelf edge fitting between an upright and a shelf.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeJob {
    pub panel: String,
    pub partner: String,
    pub kind: EdgeKind,
    /// Defaults to the partner's depth along Y.
    pub shelf_width: Option<f64>,
    pub fitting: Option<Fitting>,
    #[serde(default)]
    pub mounting: Mounting,
}

/// What a job run produced.
pub struct JobOutcome {
    pub assembly: Assembly<CsgKernel>,
    pub dowels: usize,
    pub edge_passes: usize,
}

impl Job {
    /// Read and parse a job file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse job TOML.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Place every part and cut every joint, in file order.
    pub fn run(&self) -> Result<JobOutcome> {
        let mut assembly = Assembly::with_config(CsgKernel::new(), self.joinery)
            .context("[joinery] settings")?;
        let kernel = *assembly.kernel();

        let mut parts = HashMap::new();
        for p in &self.parts {
            let layout = PlankLayout::new(p.length_axis, p.thickness_axis)
                .with_context(|| format!("part {}", p.name))?;
            let dims = PartDimensions::new(p.length, p.width, p.thickness);
            let part = WPart::plank(&kernel, p.name.as_str(), dims, layout, p.count)
                .with_context(|| format!("part {}", p.name))?;
            if parts.insert(p.name.as_str(), Arc::new(part)).is_some() {
                bail!("part {} defined twice", p.name);
            }
        }

        let mut ids: HashMap<&str, PartKey> = HashMap::new();
        for place in &self.places {
            let part = parts
                .get(place.part.as_str())
                .ok_or_else(|| anyhow!("place {}: unknown part {}", place.id, place.part))?;
            let [x, y, z] = place.position;
            let key = assembly
                .place(part, Vec3::new(x, y, z))
                .with_context(|| format!("place {}", place.id))?;
            if ids.insert(place.id.as_str(), key).is_some() {
                bail!("instance id {} used twice", place.id);
            }
        }
        let lookup = |id: &str| {
            ids.get(id)
                .copied()
                .ok_or_else(|| anyhow!("unknown instance {id}"))
        };

        let mut dowels = 0;
        for d in &self.dowels {
            let (a, b) = (lookup(&d.a)?, lookup(&d.b)?);
            let request = d.request();
            let placed = assembly
                .dowel_connect(a, b, &request)
                .with_context(|| format!("dowels {} -> {}", d.a, d.b))?;
            debug!(a = %d.a, b = %d.b, placed, "dowel row");
            dowels += placed;
        }

        let mut edge_passes = 0;
        for e in &self.edges {
            let (panel, partner) = (lookup(&e.panel)?, lookup(&e.partner)?);
            let shelf = assembly.get(partner)?.bounding_box();
            let sides = e
                .sides(&self.joinery, shelf.size(Axis::Y), shelf.size(Axis::Z))
                .with_context(|| format!("edge {} -> {}", e.panel, e.partner))?;
            edge_passes += assembly
                .edge_connect(panel, partner, &sides)
                .with_context(|| format!("edge {} -> {}", e.panel, e.partner))?;
        }

        info!(parts = assembly.len(), dowels, edge_passes, "job done");
        Ok(JobOutcome {
            assembly,
            dowels,
            edge_passes,
        })
    }
}

impl DowelJob {
    fn request(&self) -> DowelConnect {
        let mut request = DowelConnect::new(self.dowel_axis, self.edge_axis)
            .left_extent(self.left_extent);
        if let Some(pos) = self.other_pos {
            request = request.other_pos(pos);
        }
        for (&axis, &(lo, hi)) in &self.rel_range {
            request = request.rel_range(axis, lo, hi);
        }
        request
    }
}

impl EdgeJob {
    fn sides(&self, joinery: &JoineryConfig, depth: f64, thickness: f64) -> Result<SidePair> {
        let width = self.shelf_width.unwrap_or(depth);
        Ok(match self.kind {
            EdgeKind::Pins => pin_edge(width),
            EdgeKind::Rail => rail(width),
            EdgeKind::Strong => {
                let fitting = self
                    .fitting
                    .ok_or_else(|| anyhow!("strong edge needs a fitting"))?;
                strong_edge(thickness, width, fitting, self.mounting, &joinery.dowel)?
            }
        })
    }
}
