mod util;

use mesh_field::prelude::*;
use std::sync::Arc;
use util::{assert_close, strip};

#[test]
fn uniform_mesh_survives_a_serializer_round_trip() {
    let mesh = Arc::new(Mesh1D::uniform(1.0, 5.0, 16).unwrap());
    let mut objs = Serializer::new();
    objs.add(mesh.clone());
    let buffer = objs.serialize().unwrap();

    let mut objs2 = Serializer::new();
    objs2.deserialize(buffer.bytes()).unwrap();
    assert_eq!(objs2.size(), 1);

    let back = objs2.get_as::<Mesh1D>(0).unwrap();
    let pairs: Vec<(i32, f64)> = back.iter().map(|n| (n.id(), n.x())).collect();
    let want: Vec<(i32, f64)> = mesh.iter().map(|n| (n.id(), n.x())).collect();
    assert_eq!(pairs, want);
    assert_eq!(pairs[0], (0, 1.0));
    assert!((pairs[1].1 - 1.2667).abs() < 1e-4);
    assert_eq!(pairs[15], (15, 5.0));
}

fn xyz_field() -> FieldRect3D {
    let mut f3d = FieldRect3D::from_axes(
        Mesh1D::uniform(1.0, 5.0, 16).unwrap(),
        Mesh1D::uniform(0.0, 2.0, 10).unwrap(),
        Mesh1D::uniform(-1.0, 1.0, 20).unwrap(),
    );
    let mut n = 0;
    for iz in 0..f3d.size(Axis::Z) {
        let z = f3d.at_node(Axis::Z, iz).unwrap().x();
        for iy in 0..f3d.size(Axis::Y) {
            let y = f3d.at_node(Axis::Y, iy).unwrap().x();
            for ix in 0..f3d.size(Axis::X) {
                let x = f3d.at_node(Axis::X, ix).unwrap().x();
                f3d.define(n, x * y * z);
                n += 1;
            }
        }
    }
    f3d
}

#[test]
fn rect3d_field_of_xyz() {
    let f3d = xyz_field();
    assert_eq!(f3d.value(1.0, 0.0, -0.5), 0.0);
    assert_eq!(f3d.value(5.0, 2.0, 1.0), 10.0);
    // x*y*z is trilinear, so interpolation reproduces it
    assert_close(f3d.value(2.0, 1.0, -0.5), -1.0);
    assert_close(f3d.value(3.0, 0.7, -0.2), -0.42);
    assert!(f3d.value(5.5, 1.0, 0.0).is_nan());
}

#[test]
fn rect3d_field_reproduces_every_node_value() {
    let f3d = xyz_field();
    let mesh = f3d.mesh();
    for iz in 0..f3d.size(Axis::Z) {
        for iy in 0..f3d.size(Axis::Y) {
            for ix in 0..f3d.size(Axis::X) {
                let id = mesh.node_index(ix, iy, iz);
                let p = mesh.node_coords(id).unwrap();
                let want = f3d.values().get(id as i32);
                assert_close(f3d.value(p.x(), p.y(), p.z()), want);
            }
        }
    }
}

fn strip_field() -> FieldTri2D {
    let mut f2d = FieldTri2D::new(strip());
    for (id, v) in [0.0, 1.0, 1.0, 4.0, 2.0, 2.0].into_iter().enumerate() {
        f2d.define(id, v);
    }
    f2d
}

#[test]
fn tri2d_field_stays_within_corner_values() {
    let f2d = strip_field();
    let v = f2d.value(0.1, 0.1);
    // enclosing triangle has corner values 0, 1, 1
    assert!(v > 0.0 && v < 1.0, "{v}");
    assert_close(v, 0.2);
    assert_close(f2d.value(0.99, 0.99), 3.94);
    assert!(f2d.value(2.01, 1.02).is_nan());
}

fn layered_prism_field() -> FieldPrism3D {
    let mut fp3d = FieldPrism3D::extruded(strip(), Mesh1D::uniform(0.0, 2.0, 10).unwrap());
    for i in 0..10 {
        let scale = (i + 1) as f64;
        for (k, v) in [0.0, 1.0, 1.0, 4.0, 2.0, 2.0].into_iter().enumerate() {
            fp3d.define(i * 6 + k, scale * v);
        }
    }
    fp3d
}

#[test]
fn prism_field_scales_by_layer() {
    let fp3d = layered_prism_field();
    // 0.2 on layer 0, 0.4 on layer 1, z = 0.01 is 4.5% of the way up
    assert_close(fp3d.value(0.1, 0.1, 0.01), 0.2 + 0.2 * 0.045);
    assert_close(fp3d.value(0.1, 0.1, 2.0), 2.0);
    assert!(fp3d.value(0.1, 0.1, 2.5).is_nan());
    assert!(fp3d.value(3.0, 0.1, 1.0).is_nan());
}

#[test]
fn prism_field_reproduces_every_node_value() {
    let fp3d = layered_prism_field();
    let mesh = fp3d.mesh();
    for iz in 0..mesh.z().size() {
        let z = mesh.z().at(iz).unwrap().x();
        for ixy in 0..mesh.xy().size_nodes() {
            let node = mesh.xy().at_node(ixy).unwrap();
            let want = fp3d.values().get(mesh.node_index(ixy, iz) as i32);
            assert_close(fp3d.value(node.x(), node.y(), z), want);
        }
    }
}

#[test]
fn tri2d_field_reproduces_every_node_value() {
    let f2d = strip_field();
    for node in f2d.mesh().nodes() {
        assert_close(f2d.value(node.x(), node.y()), f2d.values().get(node.id()));
    }
}
