mod util;

use mesh_field::prelude::*;
use proptest::prelude::*;
use std::sync::Arc;
use util::{assert_close, grid};

#[test]
fn field1d_matches_hand_values() {
    let mut f = Field1D::new();
    f.define_at(1.1, 1.0).unwrap();
    f.define_at(3.3, 2.0).unwrap();
    f.define_at(7.7, 3.0).unwrap();

    assert_eq!(f.value(0.0), 1.0);
    assert_close(f.value(2.2), 1.5);
    assert_close(f.value(5.5), 2.5);
    assert_close(f.value(5.6), 2.5 + 0.1 / 4.4);
    assert_close(f.value(7.6), 3.0 - 0.1 / 4.4);
    assert_eq!(f.value(7.7), 3.0);
    assert_eq!(f.value(8.8), 3.0);
    assert_eq!(f.value_min(), 1.0);
    assert_eq!(f.value_max(), 3.0);
}

#[test]
fn fields_share_a_mesh() {
    let mesh = Arc::new(grid(2, 2, 1.0, 1.0));
    let mut a = FieldTri2D::new(Arc::clone(&mesh));
    let mut b = FieldTri2D::new(Arc::clone(&mesh));
    for id in 0..mesh.size_nodes() {
        a.define(id, 1.0);
        b.define(id, id as f64);
    }
    assert!(Arc::ptr_eq(a.mesh(), b.mesh()));
    assert_eq!(a.value(0.3, 0.3), 1.0);
    assert_close(b.value(0.5, 0.5), 4.0);
}

#[test]
fn undefined_nodes_read_as_zero() {
    let mut f = FieldTri2D::new(grid(1, 1, 1.0, 1.0));
    f.define(3, 2.0);
    assert_close(f.value(1.0, 1.0), 2.0);
    assert_eq!(f.value(0.0, 0.0), 0.0);
}

#[test]
fn tri2d_axis_ranges() {
    let f = FieldTri2D::new(grid(3, 2, 6.0, 4.0));
    assert_eq!(f.range_min(Axis::X), Ok(0.0));
    assert_eq!(f.range_max(Axis::Y), Ok(4.0));
    assert_eq!(f.range_max(Axis::Z), Err(MeshError::UnsupportedAxis('z')));
}

proptest! {
    #[test]
    fn tri2d_reproduces_planes(
        a in -5.0f64..5.0,
        b in -5.0f64..5.0,
        c in -5.0f64..5.0,
        px in 0.0f64..3.0,
        py in 0.0f64..2.0,
    ) {
        let mesh = grid(3, 2, 3.0, 2.0);
        let mut f = FieldTri2D::new(mesh.clone());
        for (pos, node) in mesh.nodes().iter().enumerate() {
            f.define(pos, a * node.x() + b * node.y() + c);
        }
        let want = a * px + b * py + c;
        prop_assert!((f.value(px, py) - want).abs() < 1e-9);
    }

    #[test]
    fn field1d_stays_within_neighbor_values(
        xs in prop::collection::vec(-50.0f64..50.0, 2..16),
        q in -60.0f64..60.0,
    ) {
        let mut f = Field1D::new();
        for (i, &x) in xs.iter().enumerate() {
            f.define_at(x, i as f64).unwrap();
        }
        let v = f.value(q);
        prop_assert!(v >= f.value_min() - 1e-9 && v <= f.value_max() + 1e-9);
    }
}
