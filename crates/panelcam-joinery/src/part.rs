//! Reference parts.

use std::sync::atomic::{AtomicUsize, Ordering};

use panelcam_kernel::GeometryKernel;
use panelcam_math::{Aabb3, Axis, Vec3};
use serde::{Deserialize, Serialize};

use crate::JoineryError;

/// Declared envelope of a part in mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartDimensions {
    /// Longest side.
    pub length: f64,
    /// Middle side.
    pub width: f64,
    /// Board thickness.
    pub thickness: f64,
}

impl PartDimensions {
    /// Create a dimension record.
    pub fn new(length: f64, width: f64, thickness: f64) -> Self {
        Self {
            length,
            width,
            thickness,
        }
    }
}

/// How a plank's sides map onto the world axes.
///
/// The width runs along whichever axis is left over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlankLayout {
    /// Axis of the length.
    pub length_axis: Axis,
    /// Axis of the thickness.
    pub thickness_axis: Axis,
}

impl PlankLayout {
    /// Layout with length along `length_axis` and thickness along
    /// `thickness_axis`.
    pub fn new(length_axis: Axis, thickness_axis: Axis) -> Result<Self, JoineryError> {
        let layout = Self {
            length_axis,
            thickness_axis,
        };
        layout.width_axis()?;
        Ok(layout)
    }

    /// The axis the width runs along.
    pub fn width_axis(&self) -> Result<Axis, JoineryError> {
        Axis::remaining(self.length_axis, self.thickness_axis)
            .ok_or(JoineryError::InvalidLayout(self.length_axis))
    }

    /// Box size for `dims` under this layout.
    pub fn size(&self, dims: &PartDimensions) -> Result<Vec3, JoineryError> {
        let mut size = Vec3::zeros();
        size[self.length_axis.index()] = dims.length;
        size[self.width_axis()?.index()] = dims.width;
        size[self.thickness_axis.index()] = dims.thickness;
        Ok(size)
    }
}

impl Default for PlankLayout {
    /// Lying flat: length along X, width along Y.
    fn default() -> Self {
        Self {
            length_axis: Axis::X,
            thickness_axis: Axis::Z,
        }
    }
}

/// A reference part: one shape that may be cut a limited number of times.
///
/// Any rotation of the part lives in its shape; placing it only
/// translates it.
#[derive(Debug)]
pub struct WPart<K: GeometryKernel> {
    name: String,
    shape: K::Shape,
    bounds: Aabb3,
    dimensions: PartDimensions,
    limit: usize,
    allocated: AtomicUsize,
}

impl<K: GeometryKernel> WPart<K> {
    /// Wrap an existing shape. Its local bounds are taken from `kernel`.
    pub fn new(
        kernel: &K,
        name: impl Into<String>,
        shape: K::Shape,
        dimensions: PartDimensions,
        limit: usize,
    ) -> Self {
        Self {
            name: name.into(),
            bounds: kernel.bounding_box(&shape),
            shape,
            dimensions,
            limit,
            allocated: AtomicUsize::new(0),
        }
    }

    /// A rectangular board with its sides laid along the axes of `layout`.
    pub fn plank(
        kernel: &K,
        name: impl Into<String>,
        dimensions: PartDimensions,
        layout: PlankLayout,
        limit: usize,
    ) -> Result<Self, JoineryError> {
        let size = layout.size(&dimensions)?;
        let shape = kernel.make_box(size.x, size.y, size.z)?;
        Ok(Self::new(kernel, name, shape, dimensions, limit))
    }

    /// Take the next free instance index.
    pub fn allocate(&self) -> Result<usize, JoineryError> {
        self.allocated
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.limit).then_some(n + 1)
            })
            .map_err(|_| JoineryError::AllocationExhausted {
                part: self.name.clone(),
                limit: self.limit,
            })
    }

    /// Part name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reference shape in the part's local frame.
    pub fn shape(&self) -> &K::Shape {
        &self.shape
    }

    /// Bounds of the reference shape in the local frame.
    pub fn local_bounds(&self) -> Aabb3 {
        self.bounds
    }

    /// Declared envelope.
    pub fn dimensions(&self) -> PartDimensions {
        self.dimensions
    }

    /// Maximum number of instances.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of instances handed out so far.
    pub fn allocated(&self) -> usize {
        self.allocated.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelcam_kernel::CsgKernel;
    use panelcam_math::Point3;

    #[test]
    fn test_plank_layout() {
        let k = CsgKernel::new();
        let dims = PartDimensions::new(800.0, 600.0, 18.0);
        let upright = PlankLayout::new(Axis::Z, Axis::X).unwrap();
        assert_eq!(upright.width_axis().unwrap(), Axis::Y);
        let part = WPart::plank(&k, "side", dims, upright, 2).unwrap();
        assert_eq!(part.local_bounds().max, Point3::new(18.0, 600.0, 800.0));
        assert_eq!(part.dimensions(), dims);
    }

    #[test]
    fn test_layout_rejects_repeated_axis() {
        assert_eq!(
            PlankLayout::new(Axis::Y, Axis::Y),
            Err(JoineryError::InvalidLayout(Axis::Y))
        );
    }

    #[test]
    fn test_allocation_limit() {
        let k = CsgKernel::new();
        let dims = PartDimensions::new(100.0, 50.0, 18.0);
        let part = WPart::plank(&k, "shelf", dims, PlankLayout::default(), 2).unwrap();
        assert_eq!(part.allocate(), Ok(0));
        assert_eq!(part.allocate(), Ok(1));
        assert!(matches!(
            part.allocate(),
            Err(JoineryError::AllocationExhausted { limit: 2, .. })
        ));
        assert_eq!(part.allocated(), 2);
    }
}
