//! Ordered, non-uniform 1D mesh.
//!
//! Nodes are kept sorted by `x` so the interval containing a coordinate can
//! be found by binary search. Ids are stable across insertions and removals;
//! positions are not, so id lookups go through a lazily rebuilt
//! [`IdIndexCache`].

use super::cache::{IdIndexCache, InvalidateCache};
use super::cell::Cell1D;
use super::node::{Node1D, claim_id};
use crate::debug_invariants::{DebugInvariants, ensure};
use crate::mesh_error::MeshError;
use hashbrown::{HashMap, HashSet};

#[derive(Clone, Debug, Default)]
pub struct Mesh1D {
    nodes: Vec<Node1D>,
    counter: i32,
    ids: IdIndexCache,
}

impl Mesh1D {
    pub fn new() -> Self {
        Self::default()
    }

    /// `npts` evenly spaced nodes from `x0` to `x1`, ids `0..npts`.
    ///
    /// The last node sits exactly at `x1` regardless of round-off in the
    /// spacing.
    pub fn uniform(x0: f64, x1: f64, npts: usize) -> Result<Self, MeshError> {
        if npts < 2 {
            return Err(MeshError::TooFewPoints { requested: npts });
        }
        check_coordinate(x0)?;
        check_coordinate(x1)?;
        let counter = i32::try_from(npts).map_err(|_| MeshError::IdOverflow(i32::MAX))?;

        let dx = (x1 - x0) / (npts - 1) as f64;
        check_coordinate(dx)?;
        let nodes: Vec<Node1D> = (0..npts)
            .map(|i| {
                let x = if i + 1 == npts { x1 } else { x0 + i as f64 * dx };
                Node1D::with_id(i as i32, x)
            })
            .collect();
        let mut mesh = Self {
            nodes,
            counter,
            ids: IdIndexCache::new(),
        };
        if x1 < x0 {
            mesh.nodes.reverse();
        }
        Ok(mesh)
    }

    /// Rebuild a mesh from already-sorted nodes, as read back from a stream.
    pub fn from_parts(nodes: Vec<Node1D>, counter: i32) -> Result<Self, MeshError> {
        let mesh = Self {
            nodes,
            counter,
            ids: IdIndexCache::new(),
        };
        mesh.validate_invariants()?;
        Ok(mesh)
    }

    /// Insert `node`, keeping the sequence sorted by `x`.
    ///
    /// An anonymous node gets the next id from the internal counter. Nodes
    /// with equal `x` are kept in insertion order. Returns the stored node;
    /// if a node with the same id already exists it is returned unchanged
    /// and nothing is inserted.
    pub fn add(&mut self, node: Node1D) -> Result<&Node1D, MeshError> {
        check_coordinate(node.x())?;
        if let Some(pos) = node.has_id().then(|| self.position_of(node.id())).flatten() {
            return Ok(&self.nodes[pos]);
        }

        let (id, counter) = claim_id(self.counter, node.has_id().then_some(node.id()))?;
        let mut node = node;
        node.set_id(id);
        self.counter = counter;

        let pos = self.nodes.partition_point(|n| n.x() <= node.x());
        self.nodes.insert(pos, node);
        self.invalidate_cache();
        crate::debug_invariants!(self.validate_invariants(), "Mesh1D::add");
        Ok(&self.nodes[pos])
    }

    /// Remove the node with `id`, returning it if it was present.
    pub fn remove(&mut self, id: i32) -> Option<Node1D> {
        let pos = self.position_of(id)?;
        let node = self.nodes.remove(pos);
        self.invalidate_cache();
        Some(node)
    }

    /// Remove `node` by id, or for an anonymous node by exact coordinate.
    ///
    /// A coordinate removal only matches an end of the interval that
    /// contains `node.x()`; an inexact coordinate removes nothing.
    pub fn remove_node(&mut self, node: &Node1D) -> Option<Node1D> {
        if node.has_id() {
            return self.remove(node.id());
        }
        let pos = self.position_at(node.x())?;
        let removed = self.nodes.remove(pos);
        self.invalidate_cache();
        Some(removed)
    }

    /// Drop every node and restart id assignment from zero.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.counter = 0;
        self.invalidate_cache();
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node at sorted position `pos`.
    #[inline]
    pub fn at(&self, pos: usize) -> Option<&Node1D> {
        self.nodes.get(pos)
    }

    #[inline]
    pub fn nodes(&self) -> &[Node1D] {
        &self.nodes
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Node1D> {
        self.nodes.iter()
    }

    /// Next id handed to an anonymous node.
    #[inline]
    pub fn counter(&self) -> i32 {
        self.counter
    }

    pub fn node_by_id(&self, id: i32) -> Option<&Node1D> {
        self.position_of(id).map(|pos| &self.nodes[pos])
    }

    /// Sorted position of the node with `id`.
    pub fn position_of(&self, id: i32) -> Option<usize> {
        self.ids.position(id, || (index_ids(&self.nodes), ()))
    }

    /// Sorted position of a node sitting exactly at `x`, if any.
    ///
    /// Only the two ends of the interval containing `x` are considered.
    pub fn position_at(&self, x: f64) -> Option<usize> {
        if let [only] = self.nodes.as_slice() {
            return (only.x() == x).then_some(0);
        }
        let n = self.locate_interval(x)?;
        if self.nodes[n].x() == x {
            Some(n)
        } else if self.nodes[n + 1].x() == x {
            Some(n + 1)
        } else {
            None
        }
    }

    /// Lowest coordinate, or 0.0 for an empty mesh.
    #[inline]
    pub fn range_min(&self) -> f64 {
        self.nodes.first().map_or(0.0, Node1D::x)
    }

    /// Highest coordinate, or 0.0 for an empty mesh.
    #[inline]
    pub fn range_max(&self) -> f64 {
        self.nodes.last().map_or(0.0, Node1D::x)
    }

    /// Find the interval containing `node.x()`.
    ///
    /// Inside the range both ends are set; a query exactly on the last node
    /// yields the final interval. Below the range only slot 1 holds the
    /// first node, above it only slot 0 holds the last node. An empty mesh
    /// gives a cell with neither slot set.
    pub fn locate(&self, node: &Node1D) -> Cell1D {
        let x = node.x();
        let mut cell = Cell1D::default();

        if let Some(n) = self.locate_interval(x) {
            let (lo, hi) = (&self.nodes[n], &self.nodes[n + 1]);
            cell.set(0, lo.id(), lo.x());
            cell.set(1, hi.id(), hi.x());
            return cell;
        }

        match (self.nodes.first(), self.nodes.last()) {
            (Some(first), _) if x <= first.x() => cell.set(1, first.id(), first.x()),
            (_, Some(last)) if x >= last.x() => cell.set(0, last.id(), last.x()),
            _ => {}
        }
        cell
    }

    /// Index `n` with `x` in `[x_n, x_{n+1}]`, or `None` outside the range
    /// or when fewer than two nodes exist.
    pub fn locate_interval(&self, x: f64) -> Option<usize> {
        let len = self.nodes.len();
        if len < 2 {
            return None;
        }
        if !(x >= self.nodes[0].x() && x <= self.nodes[len - 1].x()) {
            return None;
        }
        // first node strictly above x; x >= nodes[0] so this is at least 1
        let above = self.nodes.partition_point(|n| n.x() <= x);
        Some((above - 1).min(len - 2))
    }
}

impl InvalidateCache for Mesh1D {
    #[inline]
    fn invalidate_cache(&mut self) {
        self.ids.invalidate_cache();
    }
}

impl PartialEq for Mesh1D {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.counter == other.counter
    }
}

impl DebugInvariants for Mesh1D {
    fn validate_invariants(&self) -> Result<(), MeshError> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for (i, node) in self.nodes.iter().enumerate() {
            ensure(node.has_id(), || format!("node at position {i} has no id"))?;
            ensure(node.id() < self.counter, || {
                format!("node id {} not below counter {}", node.id(), self.counter)
            })?;
            ensure(seen.insert(node.id()), || {
                format!("node id {} appears twice", node.id())
            })?;
        }
        for (i, pair) in self.nodes.windows(2).enumerate() {
            ensure(pair[0].x() <= pair[1].x(), || {
                format!(
                    "nodes out of order at position {i}: {} > {}",
                    pair[0].x(),
                    pair[1].x()
                )
            })?;
        }
        Ok(())
    }
}

fn index_ids(nodes: &[Node1D]) -> HashMap<i32, usize> {
    nodes.iter().enumerate().map(|(i, n)| (n.id(), i)).collect()
}

#[inline]
fn check_coordinate(x: f64) -> Result<(), MeshError> {
    if !x.is_finite() {
        return Err(MeshError::NonFiniteCoordinate { axis: 'x', value: x });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xs(mesh: &Mesh1D) -> Vec<f64> {
        mesh.iter().map(Node1D::x).collect()
    }

    #[test]
    fn uniform_spans_endpoints_exactly() {
        let mesh = Mesh1D::uniform(1.0, 5.0, 16).unwrap();
        assert_eq!(mesh.size(), 16);
        assert_eq!(mesh.range_min(), 1.0);
        assert_eq!(mesh.range_max(), 5.0);
        assert_eq!(mesh.counter(), 16);
        assert!((mesh.at(1).unwrap().x() - 1.266_666_666_7).abs() < 1e-9);
    }

    #[test]
    fn uniform_rejects_single_point() {
        assert_eq!(
            Mesh1D::uniform(0.0, 1.0, 1).unwrap_err(),
            MeshError::TooFewPoints { requested: 1 }
        );
    }

    #[test]
    fn add_keeps_sorted_and_assigns_ids() {
        let mut mesh = Mesh1D::new();
        for x in [3.0, 1.0, 2.0, 5.0, 0.5] {
            mesh.add(Node1D::new(x)).unwrap();
        }
        assert_eq!(xs(&mesh), vec![0.5, 1.0, 2.0, 3.0, 5.0]);
        assert_eq!(mesh.node_by_id(0).unwrap().x(), 3.0);
        assert_eq!(mesh.node_by_id(4).unwrap().x(), 0.5);
        assert_eq!(mesh.position_of(1), Some(1));
    }

    #[test]
    fn duplicate_coordinates_keep_insertion_order() {
        let mut mesh = Mesh1D::new();
        mesh.add(Node1D::new(1.0)).unwrap();
        mesh.add(Node1D::new(2.0)).unwrap();
        mesh.add(Node1D::new(1.0)).unwrap();
        let ids: Vec<i32> = mesh.iter().map(Node1D::id).collect();
        assert_eq!(ids, vec![0, 2, 1]);
    }

    #[test]
    fn explicit_id_advances_counter() {
        let mut mesh = Mesh1D::new();
        mesh.add(Node1D::with_id(10, 1.0)).unwrap();
        let n = mesh.add(Node1D::new(2.0)).unwrap();
        assert_eq!(n.id(), 11);
    }

    #[test]
    fn nan_coordinate_is_rejected() {
        let mut mesh = Mesh1D::new();
        assert!(matches!(
            mesh.add(Node1D::new(f64::NAN)),
            Err(MeshError::NonFiniteCoordinate { .. })
        ));
        assert!(mesh.is_empty());
    }

    #[test]
    fn infinite_coordinates_are_rejected() {
        let mut mesh = Mesh1D::new();
        assert!(matches!(
            mesh.add(Node1D::new(f64::INFINITY)),
            Err(MeshError::NonFiniteCoordinate { .. })
        ));
        assert!(matches!(
            Mesh1D::uniform(f64::NEG_INFINITY, f64::INFINITY, 3),
            Err(MeshError::NonFiniteCoordinate { .. })
        ));
        // finite ends whose span overflows
        assert!(matches!(
            Mesh1D::uniform(-f64::MAX, f64::MAX, 3),
            Err(MeshError::NonFiniteCoordinate { .. })
        ));
    }

    #[test]
    fn existing_id_returns_stored_node() {
        let mut mesh = Mesh1D::uniform(0.0, 1.0, 3).unwrap();
        let n = *mesh.add(Node1D::with_id(0, 5.0)).unwrap();
        assert_eq!((n.id(), n.x()), (0, 0.0));
        assert_eq!(mesh.size(), 3);
        assert_eq!(mesh.range_max(), 1.0);
        mesh.validate_invariants().unwrap();
    }

    #[test]
    fn id_counter_refuses_to_overflow() {
        let mut mesh = Mesh1D::new();
        assert_eq!(
            mesh.add(Node1D::with_id(i32::MAX, 0.0)),
            Err(MeshError::IdOverflow(i32::MAX))
        );
        assert!(mesh.is_empty());

        let last = mesh.add(Node1D::with_id(i32::MAX - 1, 0.0)).unwrap().id();
        assert_eq!(last, i32::MAX - 1);
        assert_eq!(mesh.counter(), i32::MAX);
        assert_eq!(
            mesh.add(Node1D::new(1.0)),
            Err(MeshError::IdOverflow(i32::MAX))
        );
        assert_eq!(mesh.size(), 1);
        mesh.validate_invariants().unwrap();
    }

    #[test]
    fn remove_by_id_and_by_coordinate() {
        let mut mesh = Mesh1D::uniform(0.0, 4.0, 5).unwrap();
        assert_eq!(mesh.remove(2).map(|n| n.x()), Some(2.0));
        assert!(mesh.remove(2).is_none());

        assert!(mesh.remove_node(&Node1D::new(3.5)).is_none());
        assert_eq!(mesh.remove_node(&Node1D::new(3.0)).map(|n| n.id()), Some(3));
        assert_eq!(mesh.remove_node(&Node1D::new(4.0)).map(|n| n.id()), Some(4));
        assert_eq!(xs(&mesh), vec![0.0, 1.0]);
    }

    #[test]
    fn locate_inside_and_at_last_node() {
        let mesh = Mesh1D::uniform(0.0, 3.0, 4).unwrap();
        let c = mesh.locate(&Node1D::new(1.5));
        assert_eq!(c.node_ids(), [1, 2]);
        let c = mesh.locate(&Node1D::new(3.0));
        assert_eq!(c.node_ids(), [2, 3]);
        assert!(!c.is_outside());
        let c = mesh.locate(&Node1D::new(0.0));
        assert_eq!(c.node_ids(), [0, 1]);
    }

    #[test]
    fn locate_outside_fills_one_slot() {
        let mesh = Mesh1D::uniform(0.0, 3.0, 4).unwrap();
        let below = mesh.locate(&Node1D::new(-1.0));
        assert_eq!(below.node_ids(), [-1, 0]);
        let above = mesh.locate(&Node1D::new(9.0));
        assert_eq!(above.node_ids(), [3, -1]);
        assert!(below.is_outside() && above.is_outside());
    }

    #[test]
    fn locate_on_empty_and_single_node_mesh() {
        let mut mesh = Mesh1D::new();
        assert!(mesh.locate(&Node1D::new(0.0)).is_empty());
        assert_eq!(mesh.range_min(), 0.0);
        assert_eq!(mesh.range_max(), 0.0);

        mesh.add(Node1D::new(2.0)).unwrap();
        let c = mesh.locate(&Node1D::new(2.0));
        assert!(c.is_outside());
        assert_eq!(c.node_ids(), [-1, 0]);
    }

    #[test]
    fn clear_resets_counter() {
        let mut mesh = Mesh1D::uniform(0.0, 1.0, 3).unwrap();
        mesh.clear();
        assert!(mesh.is_empty());
        assert_eq!(mesh.add(Node1D::new(1.0)).unwrap().id(), 0);
    }

    #[test]
    fn from_parts_rejects_unsorted() {
        let nodes = vec![Node1D::with_id(0, 2.0), Node1D::with_id(1, 1.0)];
        assert!(matches!(
            Mesh1D::from_parts(nodes, 2),
            Err(MeshError::InvariantViolation(_))
        ));
    }
}
