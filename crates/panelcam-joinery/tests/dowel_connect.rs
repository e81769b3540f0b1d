use std::sync::Arc;

use approx::assert_relative_eq;
use panelcam_cnc::ToolPass;
use panelcam_joinery::{
    dowel_connect, edge_connect, pin_edge, rail, DowelConnect, JoineryConfig, JoineryError,
    JoineryPlanner, PartDimensions, PlacedPart, PlankLayout, WPart,
};
use panelcam_kernel::CsgKernel;
use panelcam_math::{Axis, Point3, Vec3};

fn board(
    k: &CsgKernel,
    name: &str,
    length: f64,
    width: f64,
    layout: PlankLayout,
) -> Arc<WPart<CsgKernel>> {
    let dims = PartDimensions::new(length, width, 18.0);
    Arc::new(WPart::plank(k, name, dims, layout, 8).unwrap())
}

/// Two flat boards side by side along X sharing a face of `overlap` on Y.
fn side_by_side(overlap: f64) -> (PlacedPart<CsgKernel>, PlacedPart<CsgKernel>) {
    let k = CsgKernel::new();
    let a = board(&k, "a", 400.0, overlap, PlankLayout::default());
    let b = board(&k, "b", 300.0, overlap + 100.0, PlankLayout::default());
    (
        PlacedPart::new(a, Vec3::zeros()).unwrap(),
        PlacedPart::new(b, Vec3::new(400.0, 0.0, 0.0)).unwrap(),
    )
}

fn starts(part: &PlacedPart<CsgKernel>) -> Vec<Point3> {
    part.operations().iter().map(ToolPass::start).collect()
}

#[test]
fn wide_face_gets_seven_dowels() {
    let (mut a, mut b) = side_by_side(600.0);
    let placed = dowel_connect(&mut a, &mut b, &DowelConnect::new(Axis::X, Axis::Y)).unwrap();
    assert_eq!(placed, 7);
    assert_eq!(a.operations().len(), 7);
    assert_eq!(b.operations().len(), 7);

    let ys: Vec<f64> = starts(&a).iter().map(|p| p.y).collect();
    assert_relative_eq!(ys[0], 20.0, epsilon = 1e-9);
    assert_relative_eq!(ys[6], 580.0, epsilon = 1e-9);

    // Local frames: a sits at the origin, b starts at x = 400.
    for (pa, pb) in a.operations().iter().zip(b.operations()) {
        assert_relative_eq!(pa.start().x, 400.0, epsilon = 1e-9);
        assert_relative_eq!(pb.start().x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(pa.start().z, 9.0, epsilon = 1e-9);
        assert_relative_eq!(pa.direction(), -Vec3::x(), epsilon = 1e-12);
        assert_relative_eq!(pb.direction(), Vec3::x(), epsilon = 1e-12);
        assert_relative_eq!(pa.length() + pb.length(), 36.0, epsilon = 1e-9);
    }
}

#[test]
fn narrow_face_falls_back() {
    let (mut a, mut b) = side_by_side(30.0);
    let request = DowelConnect::new(Axis::X, Axis::Y);
    assert_eq!(dowel_connect(&mut a, &mut b, &request).unwrap(), 1);
    assert_relative_eq!(a.operations()[0].start().y, 15.0, epsilon = 1e-9);

    let (mut a, mut b) = side_by_side(50.0);
    assert_eq!(dowel_connect(&mut a, &mut b, &request).unwrap(), 2);

    // Same input, same outcome.
    let (mut c, mut d) = side_by_side(50.0);
    dowel_connect(&mut c, &mut d, &request).unwrap();
    assert_eq!(a.operations(), c.operations());
    assert_eq!(b.operations(), d.operations());
}

#[test]
fn degenerate_edge_leaves_parts_untouched() {
    let (mut a, mut b) = side_by_side(15.0);
    let request = DowelConnect::new(Axis::X, Axis::Y);
    assert_eq!(dowel_connect(&mut a, &mut b, &request).unwrap(), 0);
    assert!(a.operations().is_empty());
    assert!(b.operations().is_empty());

    // Boxes touching on X but disjoint on Y.
    let k = CsgKernel::new();
    let part = board(&k, "p", 100.0, 100.0, PlankLayout::default());
    let mut c = PlacedPart::new(part.clone(), Vec3::zeros()).unwrap();
    let mut d = PlacedPart::new(part, Vec3::new(100.0, 500.0, 0.0)).unwrap();
    assert_eq!(dowel_connect(&mut c, &mut d, &request).unwrap(), 0);
    assert!(c.operations().is_empty());
}

#[test]
fn parts_must_touch() {
    let k = CsgKernel::new();
    let part = board(&k, "p", 100.0, 600.0, PlankLayout::default());
    let mut a = PlacedPart::new(part.clone(), Vec3::zeros()).unwrap();
    let mut b = PlacedPart::new(part, Vec3::new(101.0, 0.0, 0.0)).unwrap();
    let err = dowel_connect(&mut a, &mut b, &DowelConnect::new(Axis::X, Axis::Y)).unwrap_err();
    assert!(matches!(
        err,
        JoineryError::NotTouching { axis: Axis::X, .. }
    ));
    assert!(a.operations().is_empty());

    // Reversed order: a would have to end where b begins.
    let err = dowel_connect(&mut b, &mut a, &DowelConnect::new(Axis::X, Axis::Y)).unwrap_err();
    assert!(matches!(err, JoineryError::NotTouching { .. }));
}

#[test]
fn thin_cross_overlap_skips_dowels() {
    let k = CsgKernel::new();
    let thin = Arc::new(
        WPart::plank(
            &k,
            "strip",
            PartDimensions::new(600.0, 12.0, 10.0),
            PlankLayout::new(Axis::Y, Axis::Z).unwrap(),
            1,
        )
        .unwrap(),
    );
    let wide = board(&k, "wide", 100.0, 600.0, PlankLayout::default());
    // The strip is 12 along X and only 10 high.
    let mut a = PlacedPart::new(thin, Vec3::zeros()).unwrap();
    let mut b = PlacedPart::new(wide, Vec3::new(12.0, 0.0, 0.0)).unwrap();
    let request = DowelConnect::new(Axis::X, Axis::Y);
    assert_eq!(dowel_connect(&mut a, &mut b, &request).unwrap(), 0);
    assert!(b.operations().is_empty());

    // An explicit position does not bypass the check.
    let request = request.other_pos(5.0);
    assert_eq!(dowel_connect(&mut a, &mut b, &request).unwrap(), 0);
}

#[test]
fn rel_range_and_other_pos() {
    let (mut a, mut b) = side_by_side(600.0);
    let request = DowelConnect::new(Axis::X, Axis::Y)
        .rel_range(Axis::Y, 0.0, 0.5)
        .other_pos(4.0)
        .left_extent(14.0);
    // Usable edge 0..300: inset 20..280 holds three.
    assert_eq!(dowel_connect(&mut a, &mut b, &request).unwrap(), 3);
    let ys: Vec<f64> = starts(&a).iter().map(|p| p.y).collect();
    assert_relative_eq!(ys[2], 280.0, epsilon = 1e-9);
    assert!(starts(&a).iter().all(|p| (p.z - 4.0).abs() < 1e-9));
    assert_relative_eq!(a.operations()[0].length(), 14.5, epsilon = 1e-9);
    assert_relative_eq!(b.operations()[0].length(), 21.5, epsilon = 1e-9);
}

#[test]
fn vertical_joint_bores_along_z() {
    let k = CsgKernel::new();
    let shelf = board(&k, "bottom", 600.0, 300.0, PlankLayout::default());
    let side = board(&k, "side", 800.0, 300.0, PlankLayout::new(Axis::Z, Axis::X).unwrap());
    let mut bottom = PlacedPart::new(shelf, Vec3::zeros()).unwrap();
    let mut upright = PlacedPart::new(side, Vec3::new(0.0, 0.0, 18.0)).unwrap();
    let request = DowelConnect::new(Axis::Z, Axis::Y);
    assert_eq!(dowel_connect(&mut bottom, &mut upright, &request).unwrap(), 3);
    for pass in upright.operations() {
        assert_relative_eq!(pass.direction(), Vec3::z(), epsilon = 1e-12);
        assert_relative_eq!(pass.start().z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(pass.start().x, 9.0, epsilon = 1e-9);
    }
}

#[test]
fn chained_connections_accumulate() {
    let k = CsgKernel::new();
    let part = board(&k, "p", 200.0, 600.0, PlankLayout::default());
    let mut a = PlacedPart::new(part.clone(), Vec3::zeros()).unwrap();
    let mut b = PlacedPart::new(part.clone(), Vec3::new(200.0, 0.0, 0.0)).unwrap();
    let mut c = PlacedPart::new(part, Vec3::new(400.0, 0.0, 0.0)).unwrap();
    let request = DowelConnect::new(Axis::X, Axis::Y);
    let planner = JoineryPlanner::new(JoineryConfig {
        spacing: 100.0,
        ..JoineryConfig::default()
    })
    .unwrap();
    assert_eq!(planner.connect(&mut a, &mut b, &request).unwrap(), 5);
    assert_eq!(planner.connect(&mut b, &mut c, &request).unwrap(), 5);
    assert_eq!(b.operations().len(), 10);
    let bbox = b.bounding_box();
    assert_relative_eq!(bbox.min.x, 200.0);
}

#[test]
fn edge_fittings_pick_the_side() {
    let k = CsgKernel::new();
    let upright = board(&k, "side", 800.0, 600.0, PlankLayout::new(Axis::Z, Axis::X).unwrap());
    let shelf = board(&k, "shelf", 400.0, 600.0, PlankLayout::default());
    let mut panel = PlacedPart::new(upright, Vec3::new(400.0, 0.0, 0.0)).unwrap();
    let mut right = PlacedPart::new(shelf.clone(), Vec3::new(418.0, 0.0, 300.0)).unwrap();
    let mut left = PlacedPart::new(shelf, Vec3::new(0.0, 0.0, 300.0)).unwrap();

    let pins = pin_edge(600.0);
    assert_eq!(edge_connect(&mut panel, &mut right, &pins), 18);
    assert_eq!(edge_connect(&mut panel, &mut left, &pins), 18);
    let ops = panel.operations();
    assert_eq!(ops.len(), 12);
    // Right-hand shelf: bores run -X from the panel's right face.
    assert_relative_eq!(ops[0].start().x, 18.0, epsilon = 1e-9);
    assert_relative_eq!(ops[0].direction(), -Vec3::x(), epsilon = 1e-12);
    // Left-hand shelf: bores run +X from the panel's left face.
    assert_relative_eq!(ops[6].start().x, 0.0, epsilon = 1e-9);
    assert_relative_eq!(ops[6].direction(), Vec3::x(), epsilon = 1e-12);
    assert_relative_eq!(ops[0].start().z, 300.0 - 40.0 + 3.75, epsilon = 1e-9);

    let mut drawer = PlacedPart::new(
        board(&k, "drawer", 400.0, 600.0, PlankLayout::default()),
        Vec3::new(418.0, 0.0, 100.0),
    )
    .unwrap();
    assert_eq!(edge_connect(&mut panel, &mut drawer, &rail(600.0)), 4);
    assert!(drawer.operations().is_empty());
    assert_relative_eq!(panel.operations()[12].start().z, 147.0, epsilon = 1e-9);
}
