use loam_geom::{Aabb, Vec3};
use proptest::num::f32::NORMAL;
use proptest::prelude::*;

fn approx_abs_rel(a: f32, b: f32, atol: f32, rtol: f32) -> bool {
    let diff = (a - b).abs();
    let scale = a.abs().max(b.abs());
    diff <= atol + rtol * scale
}

fn coord() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded", |v| v.is_finite() && v.abs() <= 1e4)
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (coord(), coord(), coord()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

#[test]
fn unit_axes_cross_to_the_third_axis() {
    let x = Vec3::new(1.0, 0.0, 0.0);
    let y = Vec3::new(0.0, 1.0, 0.0);
    assert_eq!(x.cross(y), Vec3::new(0.0, 0.0, 1.0));
    assert_eq!(y.cross(x), Vec3::new(0.0, 0.0, -1.0));
}

#[test]
fn aabb_from_no_points_is_none() {
    assert!(Aabb::from_points(std::iter::empty()).is_none());
}

proptest! {
    // The cross product is orthogonal to both operands.
    #[test]
    fn cross_is_orthogonal(a in arb_vec3(), b in arb_vec3()) {
        let c = a.cross(b);
        let scale = a.length() * b.length() * (a.length() + b.length()).max(1.0);
        prop_assert!(a.dot(c).abs() <= 1e-3 * scale.max(1.0));
        prop_assert!(b.dot(c).abs() <= 1e-3 * scale.max(1.0));
    }

    #[test]
    fn normalized_has_unit_length(v in arb_vec3()) {
        prop_assume!(v.length() > 1e-3);
        prop_assert!(approx_abs_rel(v.normalized().length(), 1.0, 1e-5, 1e-4));
    }

    #[test]
    fn aabb_contains_every_source_point(points in prop::collection::vec(arb_vec3(), 1..32)) {
        let bb = Aabb::from_points(points.iter().copied()).unwrap();
        for p in &points {
            prop_assert!(bb.contains(*p));
        }
        let e = bb.extents();
        prop_assert!(e.x >= 0.0 && e.y >= 0.0 && e.z >= 0.0);
    }
}
