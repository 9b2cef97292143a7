use mesh_field::prelude::*;
use proptest::prelude::*;

fn mesh_from(xs: &[f64]) -> Mesh1D {
    let mut mesh = Mesh1D::new();
    for &x in xs {
        mesh.add(Node1D::new(x)).unwrap();
    }
    mesh
}

#[test]
fn uniform_mesh_matches_hand_computed_nodes() {
    let mesh = Mesh1D::uniform(1.0, 5.0, 16).unwrap();
    assert_eq!(mesh.size(), 16);
    assert_eq!(mesh.at(0).map(Node1D::x), Some(1.0));
    assert!((mesh.at(1).unwrap().x() - 1.266_666_666_666_7).abs() < 1e-12);
    assert_eq!(mesh.at(15).map(Node1D::x), Some(5.0));
    let ids: Vec<i32> = mesh.iter().map(Node1D::id).collect();
    assert_eq!(ids, (0..16).collect::<Vec<_>>());
}

#[test]
fn too_few_points_is_an_error() {
    assert_eq!(
        Mesh1D::uniform(0.0, 1.0, 1),
        Err(MeshError::TooFewPoints { requested: 1 })
    );
}

#[test]
fn removal_keeps_remaining_ids_stable() {
    let mut mesh = mesh_from(&[3.0, 1.0, 2.0]);
    // ids follow insertion order, positions follow x
    assert_eq!(mesh.position_of(0), Some(2));
    let gone = mesh.remove(2).unwrap();
    assert_eq!(gone.x(), 2.0);
    assert_eq!(mesh.position_of(0), Some(1));
    assert_eq!(mesh.node_by_id(1).map(Node1D::x), Some(1.0));
    assert_eq!(mesh.add(Node1D::new(9.0)).unwrap().id(), 3);
}

proptest! {
    #[test]
    fn insertion_keeps_nodes_sorted(xs in prop::collection::vec(-1e6f64..1e6, 1..64)) {
        let mesh = mesh_from(&xs);
        prop_assert_eq!(mesh.size(), xs.len());
        prop_assert!(mesh.nodes().windows(2).all(|w| w[0].x() <= w[1].x()));
        prop_assert!(mesh.validate_invariants().is_ok());
        for (id, &x) in xs.iter().enumerate() {
            prop_assert_eq!(mesh.node_by_id(id as i32).map(Node1D::x), Some(x));
        }
    }

    #[test]
    fn located_interval_brackets_query(
        xs in prop::collection::vec(-100.0f64..100.0, 2..32),
        q in -120.0f64..120.0,
    ) {
        let mesh = mesh_from(&xs);
        let cell = mesh.locate(&Node1D::new(q));
        if q < mesh.range_min() {
            prop_assert!(cell.is_outside());
            prop_assert_eq!(cell.node_id(0), -1);
            prop_assert_eq!(cell.x(1), mesh.range_min());
        } else if q > mesh.range_max() {
            prop_assert!(cell.is_outside());
            prop_assert_eq!(cell.node_id(1), -1);
            prop_assert_eq!(cell.x(0), mesh.range_max());
        } else {
            prop_assert!(!cell.is_outside());
            prop_assert!(cell.x(0) <= q && q <= cell.x(1));
            let lo = mesh.position_of(cell.node_id(0)).unwrap();
            let hi = mesh.position_of(cell.node_id(1)).unwrap();
            prop_assert_eq!(hi, lo + 1);
        }
    }
}
