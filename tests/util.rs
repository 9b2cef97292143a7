#![allow(dead_code)]
use mesh_field::prelude::*;

/// Six nodes, four triangles: two unit squares side by side, each split on
/// a diagonal.
///
/// ```text
/// 2 --- 3 --- 5
/// |  \  |  \  |
/// 0 --- 1 --- 4
/// ```
pub fn strip() -> MeshTri2D {
    let mut mesh = MeshTri2D::new();
    for (x, y) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0), (2.0, 0.0), (2.0, 1.0)] {
        mesh.add_node(Node2D::new(x, y)).unwrap();
    }
    for [a, b, c] in [[0, 1, 2], [1, 2, 3], [1, 3, 4], [3, 4, 5]] {
        mesh.add_cell(a, b, c).unwrap();
    }
    mesh
}

/// `nx` by `ny` grid on `[0, w] x [0, h]`, each square split in two.
pub fn grid(nx: usize, ny: usize, w: f64, h: f64) -> MeshTri2D {
    let mut mesh = MeshTri2D::new();
    for j in 0..=ny {
        for i in 0..=nx {
            let x = w * i as f64 / nx as f64;
            let y = h * j as f64 / ny as f64;
            mesh.add_node(Node2D::new(x, y)).unwrap();
        }
    }
    let id = |i: usize, j: usize| (j * (nx + 1) + i) as i32;
    for j in 0..ny {
        for i in 0..nx {
            mesh.add_cell(id(i, j), id(i + 1, j), id(i, j + 1)).unwrap();
            mesh.add_cell(id(i + 1, j), id(i + 1, j + 1), id(i, j + 1)).unwrap();
        }
    }
    mesh
}

pub fn assert_close(got: f64, want: f64) {
    assert!(
        (got - want).abs() <= 1e-9 * want.abs().max(1.0),
        "got {got}, want {want}"
    );
}
