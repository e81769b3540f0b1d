//! Axis-aligned bounding boxes.

use crate::{Axis, Point3, RigidMotion, Vec3};

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) AABB suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Smallest AABB containing all `points`.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Self {
        let mut aabb = Self::empty();
        for p in points {
            aabb.include_point(p);
        }
        aabb
    }

    /// True when no point has been included yet (min > max on some axis).
    pub fn is_empty(&self) -> bool {
        Axis::ALL
            .into_iter()
            .any(|a| self.min[a.index()] > self.max[a.index()])
    }

    /// Expand this AABB to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Smallest AABB containing both boxes. Empty boxes are ignored.
    pub fn merge(&self, other: &Aabb3) -> Aabb3 {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let mut out = *self;
        out.include_point(&other.min);
        out.include_point(&other.max);
        out
    }

    /// Test if two AABBs overlap (touching counts as overlap).
    pub fn overlaps(&self, other: &Aabb3) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Expand the AABB by a tolerance in all directions.
    pub fn expand(&mut self, tol: f64) {
        self.min.x -= tol;
        self.min.y -= tol;
        self.min.z -= tol;
        self.max.x += tol;
        self.max.y += tol;
        self.max.z += tol;
    }

    /// `(min, max)` along `axis`.
    pub fn extent(&self, axis: Axis) -> (f64, f64) {
        (self.min[axis.index()], self.max[axis.index()])
    }

    /// Length along `axis` (negative for empty boxes).
    pub fn size(&self, axis: Axis) -> f64 {
        self.max[axis.index()] - self.min[axis.index()]
    }

    /// Centre point.
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Intersection of the two extents along `axis`.
    ///
    /// The result is inverted (`lo > hi`) when the boxes are disjoint on
    /// that axis; callers decide what an empty overlap means.
    pub fn overlap(&self, other: &Aabb3, axis: Axis) -> (f64, f64) {
        let (a_lo, a_hi) = self.extent(axis);
        let (b_lo, b_hi) = other.extent(axis);
        (a_lo.max(b_lo), a_hi.min(b_hi))
    }

    /// The box shifted by `offset`.
    pub fn translated(&self, offset: &Vec3) -> Aabb3 {
        if self.is_empty() {
            return *self;
        }
        Aabb3::new(self.min + *offset, self.max + *offset)
    }

    /// Bounding box of this box's eight corners after `motion`.
    pub fn transformed(&self, motion: &RigidMotion) -> Aabb3 {
        if self.is_empty() {
            return *self;
        }
        let corners = self.corners().map(|c| motion.apply_point(&c));
        Aabb3::from_points(corners.iter())
    }

    /// The eight corners.
    pub fn corners(&self) -> [Point3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(hi.x, hi.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
        ]
    }

    /// Corner-wise comparison within `tol`.
    pub fn approx_eq(&self, other: &Aabb3, tol: f64) -> bool {
        (self.min - other.min).norm() <= tol && (self.max - other.max).norm() <= tol
    }
}

impl Default for Aabb3 {
    fn default() -> Self {
        Self::empty()
    }
}
