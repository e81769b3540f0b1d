//! Rigid motions (rotation + translation) and their composition law.

use std::f64::consts::PI;

use nalgebra::{Isometry3, Translation3, UnitQuaternion};

use crate::{normalize, Axis, Dir3, MathError, Point3, Tolerance, Vec3};

/// A proper rigid motion of 3D space: a rotation followed by a translation.
///
/// Motions are immutable values. Composition follows the "apply left first"
/// convention: `a.then(&b)` maps `x` to `b(a(x))`, so for every point
/// `b.apply_point(&a.apply_point(&p)) == a.then(&b).apply_point(&p)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidMotion {
    iso: Isometry3<f64>,
}

impl RigidMotion {
    /// The identity motion.
    pub fn identity() -> Self {
        Self {
            iso: Isometry3::identity(),
        }
    }

    /// Pure translation by `v`.
    pub fn translation(v: Vec3) -> Self {
        Self {
            iso: Isometry3::from_parts(Translation3::from(v), UnitQuaternion::identity()),
        }
    }

    /// Pure translation by `(dx, dy, dz)`.
    pub fn translation_xyz(dx: f64, dy: f64, dz: f64) -> Self {
        Self::translation(Vec3::new(dx, dy, dz))
    }

    /// Rotation by `angle_degrees` about `axis` through the origin.
    pub fn rotation(axis: &Vec3, angle_degrees: f64) -> Result<Self, MathError> {
        let axis = normalize(axis)?;
        Ok(Self::from_rotation(UnitQuaternion::from_axis_angle(
            &axis,
            angle_degrees.to_radians(),
        )))
    }

    /// Rotation by `angle_degrees` about one of the world axes.
    pub fn rotation_about(axis: Axis, angle_degrees: f64) -> Self {
        let axis = Dir3::new_unchecked(axis.unit());
        Self::from_rotation(UnitQuaternion::from_axis_angle(
            &axis,
            angle_degrees.to_radians(),
        ))
    }

    /// Shortest-arc rotation taking the direction of `from` onto `to`.
    ///
    /// Antiparallel inputs rotate by 180° about `from × X`, or `from × Y`
    /// when `from` is parallel to X.
    pub fn rotation_between(from: &Vec3, to: &Vec3) -> Result<Self, MathError> {
        let from = normalize(from)?;
        let to = normalize(to)?;
        let rotation = UnitQuaternion::rotation_between_axis(&from, &to).unwrap_or_else(|| {
            UnitQuaternion::from_axis_angle(&perpendicular(&from), PI)
        });
        Ok(Self::from_rotation(rotation))
    }

    fn from_rotation(rotation: UnitQuaternion<f64>) -> Self {
        Self {
            iso: Isometry3::from_parts(Translation3::identity(), rotation),
        }
    }

    /// Compose: apply `self` first, then `other`.
    pub fn then(&self, other: &RigidMotion) -> Self {
        Self {
            iso: other.iso * self.iso,
        }
    }

    /// Compose `first` then `second`; same as `first.then(second)`.
    pub fn compose(first: &RigidMotion, second: &RigidMotion) -> Self {
        first.then(second)
    }

    /// The inverse motion. `m.then(&m.inverse())` is the identity.
    pub fn inverse(&self) -> Self {
        Self {
            iso: self.iso.inverse(),
        }
    }

    /// The rotational part only, with the translation discarded.
    ///
    /// Used to re-express direction vectors, which rotate but never move.
    pub fn rotation_only(&self) -> Self {
        Self::from_rotation(self.iso.rotation)
    }

    /// Translation component.
    pub fn translation_part(&self) -> Vec3 {
        self.iso.translation.vector
    }

    /// Rotation component.
    pub fn rotation_part(&self) -> UnitQuaternion<f64> {
        self.iso.rotation
    }

    /// Transform a point (rotation and translation).
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        self.iso.transform_point(p)
    }

    /// Transform a direction vector (rotation only).
    pub fn apply_vector(&self, v: &Vec3) -> Vec3 {
        self.iso.transform_vector(v)
    }

    /// The underlying nalgebra isometry.
    pub fn as_isometry(&self) -> &Isometry3<f64> {
        &self.iso
    }

    /// Check whether two motions agree within `tol` on translation and on
    /// every rotated basis vector.
    pub fn approx_eq(&self, other: &RigidMotion, tol: f64) -> bool {
        if (self.translation_part() - other.translation_part()).norm() > tol {
            return false;
        }
        Axis::ALL.into_iter().all(|axis| {
            let v = axis.unit();
            (self.apply_vector(&v) - other.apply_vector(&v)).norm() <= tol
        })
    }
}

impl Default for RigidMotion {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Isometry3<f64>> for RigidMotion {
    fn from(iso: Isometry3<f64>) -> Self {
        Self { iso }
    }
}

fn perpendicular(dir: &Dir3) -> Dir3 {
    let candidate = dir.cross(&Vec3::x());
    let axis = if Tolerance::DEFAULT.is_zero(candidate.norm()) {
        dir.cross(&Vec3::y())
    } else {
        candidate
    };
    Dir3::new_normalize(axis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn assert_points_close(a: &Point3, b: &Point3, eps: f64) {
        assert!((a - b).norm() < eps, "{a:?} != {b:?}");
    }

    #[test]
    fn test_identity() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_points_close(&RigidMotion::identity().apply_point(&p), &p, 1e-12);
    }

    #[test]
    fn test_translation() {
        let t = RigidMotion::translation_xyz(10.0, 20.0, 30.0);
        let r = t.apply_point(&Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(r.x, 11.0);
        assert_relative_eq!(r.y, 22.0);
        assert_relative_eq!(r.z, 33.0);
        // Directions are not moved by translations.
        assert_relative_eq!(t.apply_vector(&Vec3::x()), Vec3::x());
    }

    #[test]
    fn test_rotation_z_90() {
        let r = RigidMotion::rotation_about(Axis::Z, 90.0);
        let p = r.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_y_90_maps_z_to_x() {
        let r = RigidMotion::rotation(&Vec3::y(), 90.0).unwrap();
        let v = r.apply_vector(&Vec3::z());
        assert_relative_eq!(v, Vec3::x(), epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_zero_axis_fails() {
        assert!(RigidMotion::rotation(&Vec3::zeros(), 45.0).is_err());
    }

    #[test]
    fn test_compose_order() {
        // Translate first, then rotate about Z: (0,0,0) -> (1,0,0) -> (0,1,0).
        let t = RigidMotion::translation_xyz(1.0, 0.0, 0.0);
        let r = RigidMotion::rotation_about(Axis::Z, 90.0);
        let p = t.then(&r).apply_point(&Point3::origin());
        assert_points_close(&p, &Point3::new(0.0, 1.0, 0.0), 1e-12);

        // Rotate first, then translate: (0,0,0) stays, then moves to (1,0,0).
        let q = RigidMotion::compose(&r, &t).apply_point(&Point3::origin());
        assert_points_close(&q, &Point3::new(1.0, 0.0, 0.0), 1e-12);
    }

    #[test]
    fn test_inverse() {
        let m = RigidMotion::rotation_about(Axis::X, 30.0)
            .then(&RigidMotion::translation_xyz(1.0, 2.0, 3.0));
        let p = Point3::new(5.0, 6.0, 7.0);
        assert_points_close(&m.then(&m.inverse()).apply_point(&p), &p, 1e-12);
        assert_points_close(&m.inverse().then(&m).apply_point(&p), &p, 1e-12);
    }

    #[test]
    fn test_rotation_only_drops_translation() {
        let m = RigidMotion::rotation_about(Axis::Z, 90.0)
            .then(&RigidMotion::translation_xyz(5.0, 0.0, 0.0));
        let r = m.rotation_only();
        assert_relative_eq!(r.translation_part(), Vec3::zeros());
        assert_relative_eq!(
            r.apply_vector(&Vec3::x()),
            m.apply_vector(&Vec3::x()),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_rotation_between() {
        let r = RigidMotion::rotation_between(&Vec3::z(), &Vec3::new(0.0, 2.0, 0.0)).unwrap();
        assert_relative_eq!(r.apply_vector(&Vec3::z()), Vec3::y(), epsilon = 1e-12);

        let same = RigidMotion::rotation_between(&Vec3::x(), &Vec3::x()).unwrap();
        assert!(same.approx_eq(&RigidMotion::identity(), 1e-12));
    }

    #[test]
    fn test_rotation_between_antiparallel_is_deterministic() {
        for from in [Vec3::x(), Vec3::y(), Vec3::z(), Vec3::new(1.0, 2.0, 3.0)] {
            let a = RigidMotion::rotation_between(&from, &-from).unwrap();
            let b = RigidMotion::rotation_between(&from, &-from).unwrap();
            assert!(a.approx_eq(&b, 0.0));
            let mapped = a.apply_vector(&from.normalize());
            assert_relative_eq!(mapped, -from.normalize(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rotation_between_degenerate() {
        assert!(RigidMotion::rotation_between(&Vec3::zeros(), &Vec3::x()).is_err());
        assert!(RigidMotion::rotation_between(&Vec3::x(), &Vec3::zeros()).is_err());
    }

    fn arb_motion() -> impl Strategy<Value = RigidMotion> {
        (
            prop::array::uniform3(-1.0f64..1.0),
            -180.0f64..180.0,
            prop::array::uniform3(-1000.0f64..1000.0),
        )
            .prop_filter("rotation axis must not vanish", |(axis, _, _)| {
                Vec3::from(*axis).norm() > 1e-3
            })
            .prop_map(|(axis, angle, t)| {
                RigidMotion::rotation(&Vec3::from(axis), angle)
                    .unwrap()
                    .then(&RigidMotion::translation(Vec3::from(t)))
            })
    }

    fn arb_point() -> impl Strategy<Value = Point3> {
        prop::array::uniform3(-1000.0f64..1000.0).prop_map(|c| Point3::new(c[0], c[1], c[2]))
    }

    proptest! {
        #[test]
        fn prop_composition_law(a in arb_motion(), b in arb_motion(), p in arb_point()) {
            let stepwise = b.apply_point(&a.apply_point(&p));
            let composed = a.then(&b).apply_point(&p);
            prop_assert!((stepwise - composed).norm() < 1e-8);
        }

        #[test]
        fn prop_associativity(
            a in arb_motion(),
            b in arb_motion(),
            c in arb_motion(),
            p in arb_point(),
        ) {
            let stepwise = c.apply_point(&b.apply_point(&a.apply_point(&p)));
            let left = a.then(&b).then(&c).apply_point(&p);
            let right = a.then(&b.then(&c)).apply_point(&p);
            prop_assert!((stepwise - left).norm() < 1e-8);
            prop_assert!((stepwise - right).norm() < 1e-8);
        }

        #[test]
        fn prop_inverse_law(a in arb_motion(), p in arb_point()) {
            let back = a.then(&a.inverse()).apply_point(&p);
            prop_assert!((back - p).norm() < 1e-8);
        }

        #[test]
        fn prop_vectors_ignore_translation(a in arb_motion(), v in arb_point()) {
            let v = v.coords;
            let full = a.apply_vector(&v);
            let rot = a.rotation_only().apply_vector(&v);
            prop_assert!((full - rot).norm() < 1e-8);
        }
    }
}
