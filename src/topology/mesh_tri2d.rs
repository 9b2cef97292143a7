//! Unstructured triangular 2D mesh with walking point location.
//!
//! Triangles store their three node ids and, for each corner `k`, the
//! triangle across the edge opposite that corner. Adjacency is discovered
//! while triangles are added: an edge seen once waits in `open_edges` until
//! its second owner arrives, at which point both sides are wired together
//! and the edge is closed.
//!
//! [`MeshTri2D::locate`] walks from the last hit toward the query by
//! crossing the edge with the most negative barycentric coordinate, so
//! spatially coherent query sweeps cost O(1) steps each.

use super::cache::{IdIndexCache, InvalidateCache};
use super::cell::CellTri2D;
use super::node::{Axis, Node2D, claim_id};
use crate::debug_invariants::{DebugInvariants, ensure};
use crate::mesh_error::MeshError;
use hashbrown::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Tuning for the triangle walk.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LocateOptions {
    /// A point is inside when no barycentric weight is below `-tolerance`.
    pub tolerance: f64,
    /// Maximum triangles visited per query; `None` means `2 * cells + 1`.
    /// Exhausting the budget reports the point as outside.
    pub max_steps: Option<usize>,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            tolerance: f64::EPSILON,
            max_steps: None,
        }
    }
}

/// A stored triangle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tri2D {
    pub nodes: [i32; 3],
    /// `neighbors[k]` lies across the edge opposite `nodes[k]`.
    pub neighbors: [Option<usize>; 3],
}

impl Tri2D {
    fn new(nodes: [i32; 3]) -> Self {
        Self {
            nodes,
            neighbors: [None; 3],
        }
    }

    /// Node ids of the edge opposite corner `k`, in canonical order.
    #[inline]
    fn edge_opposite(&self, k: usize) -> (i32, i32) {
        edge_key(self.nodes[(k + 1) % 3], self.nodes[(k + 2) % 3])
    }
}

#[inline]
fn edge_key(a: i32, b: i32) -> (i32, i32) {
    if a < b { (a, b) } else { (b, a) }
}

/// Per-axis bounds, recomputed with the id index.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Bounds {
    min: [f64; 2],
    max: [f64; 2],
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: [f64::NAN; 2],
            max: [f64::NAN; 2],
        }
    }
}

impl Bounds {
    fn include(&mut self, node: &Node2D) {
        for (axis, v) in [node.x(), node.y()].into_iter().enumerate() {
            if self.min[axis].is_nan() {
                self.min[axis] = v;
                self.max[axis] = v;
            } else {
                self.min[axis] = self.min[axis].min(v);
                self.max[axis] = self.max[axis].max(v);
            }
        }
    }
}

/// Last triangle hit by `locate`, shared across `&self` queries.
#[derive(Debug)]
struct LocateHint(AtomicUsize);

impl LocateHint {
    const NONE: usize = usize::MAX;

    fn new() -> Self {
        Self(AtomicUsize::new(Self::NONE))
    }

    fn get(&self) -> Option<usize> {
        match self.0.load(Ordering::Relaxed) {
            Self::NONE => None,
            v => Some(v),
        }
    }

    fn set(&self, cell: usize) {
        self.0.store(cell, Ordering::Relaxed);
    }

    fn reset(&mut self) {
        *self.0.get_mut() = Self::NONE;
    }
}

impl Clone for LocateHint {
    fn clone(&self) -> Self {
        Self(AtomicUsize::new(self.0.load(Ordering::Relaxed)))
    }
}

#[derive(Clone, Debug)]
pub struct MeshTri2D {
    nodes: Vec<Node2D>,
    counter: i32,
    cells: Vec<Tri2D>,
    open_edges: HashMap<(i32, i32), (usize, usize)>,
    ids: IdIndexCache<Bounds>,
    last_located: LocateHint,
    options: LocateOptions,
}

impl Default for MeshTri2D {
    fn default() -> Self {
        Self::with_options(LocateOptions::default())
    }
}

impl MeshTri2D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LocateOptions) -> Self {
        let ids = IdIndexCache::new();
        ids.get_or_rebuild(|| (HashMap::new(), Bounds::default()));
        Self {
            nodes: Vec::new(),
            counter: 0,
            cells: Vec::new(),
            open_edges: HashMap::new(),
            ids,
            last_located: LocateHint::new(),
            options,
        }
    }

    #[inline]
    pub fn options(&self) -> &LocateOptions {
        &self.options
    }

    #[inline]
    pub fn set_options(&mut self, options: LocateOptions) {
        self.options = options;
    }

    /// Add a node, assigning an id if it has none.
    ///
    /// If a node with the same id already exists it is returned unchanged
    /// and nothing is inserted.
    pub fn add_node(&mut self, node: Node2D) -> Result<&Node2D, MeshError> {
        for (axis, v) in [('x', node.x()), ('y', node.y())] {
            if !v.is_finite() {
                return Err(MeshError::NonFiniteCoordinate { axis, value: v });
            }
        }

        if let Some(pos) = node.has_id().then(|| self.position_of(node.id())).flatten() {
            return Ok(&self.nodes[pos]);
        }

        let (id, counter) = claim_id(self.counter, node.has_id().then_some(node.id()))?;
        let mut node = node;
        node.set_id(id);
        self.counter = counter;

        let pos = self.nodes.len();
        self.nodes.push(node);
        self.ids
            .record_append(node.id(), pos, |bounds| bounds.include(&node));
        Ok(&self.nodes[pos])
    }

    /// Add the triangle `(n1, n2, n3)` by node id and wire its neighbors.
    ///
    /// Returns the new triangle's index. Every id must already be in the
    /// mesh and the corners must not be collinear. An edge shared by more
    /// than two triangles is not detected.
    pub fn add_cell(&mut self, n1: i32, n2: i32, n3: i32) -> Result<usize, MeshError> {
        let mut corners = [(0.0, 0.0); 3];
        for (slot, id) in [n1, n2, n3].into_iter().enumerate() {
            let node = self.node_by_id(id).ok_or(MeshError::UnknownNode(id))?;
            corners[slot] = (node.x(), node.y());
        }
        let tri_id = self.cells.len();
        if is_degenerate(corners) {
            return Err(MeshError::DegenerateTriangle { cell: tri_id });
        }

        self.cells.push(Tri2D::new([n1, n2, n3]));
        for k in 0..3 {
            let edge = self.cells[tri_id].edge_opposite(k);
            match self.open_edges.remove(&edge) {
                None => {
                    self.open_edges.insert(edge, (tri_id, k));
                }
                Some((other, other_slot)) => {
                    self.cells[tri_id].neighbors[k] = Some(other);
                    self.cells[other].neighbors[other_slot] = Some(tri_id);
                }
            }
        }
        crate::debug_invariants!(self.validate_invariants(), "MeshTri2D::add_cell");
        Ok(tri_id)
    }

    /// Add three nodes (reusing any that already exist by id) and the
    /// triangle joining them.
    pub fn add_cell_nodes(
        &mut self,
        a: Node2D,
        b: Node2D,
        c: Node2D,
    ) -> Result<usize, MeshError> {
        let n1 = self.add_node(a)?.id();
        let n2 = self.add_node(b)?.id();
        let n3 = self.add_node(c)?.id();
        self.add_cell(n1, n2, n3)
    }

    /// Drop all nodes and triangles and restart id assignment.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.cells.clear();
        self.open_edges.clear();
        self.counter = 0;
        self.last_located.reset();
        self.invalidate_cache();
    }

    #[inline]
    pub fn size_nodes(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn size_cells(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn counter(&self) -> i32 {
        self.counter
    }

    /// Raise the id counter to at least `counter`; used when reading a mesh
    /// back whose counter ran past its largest surviving id.
    pub(crate) fn restore_counter(&mut self, counter: i32) {
        self.counter = self.counter.max(counter);
    }

    /// Node at insertion position `pos`.
    #[inline]
    pub fn at_node(&self, pos: usize) -> Option<&Node2D> {
        self.nodes.get(pos)
    }

    #[inline]
    pub fn nodes(&self) -> &[Node2D] {
        &self.nodes
    }

    #[inline]
    pub fn cells(&self) -> &[Tri2D] {
        &self.cells
    }

    pub fn node_by_id(&self, id: i32) -> Option<&Node2D> {
        self.position_of(id).map(|pos| &self.nodes[pos])
    }

    pub fn position_of(&self, id: i32) -> Option<usize> {
        self.index().0.get(&id).copied()
    }

    /// Triangle `pos` with its corner coordinates.
    pub fn at_cell(&self, pos: usize) -> Option<CellTri2D> {
        let tri = self.cells.get(pos)?;
        let mut corners = [Node2D::new(0.0, 0.0); 3];
        for (slot, id) in tri.nodes.iter().enumerate() {
            corners[slot] = *self.node_by_id(*id)?;
        }
        Some(CellTri2D::new(pos, corners))
    }

    /// Neighbor triangles of `pos`, indexed by opposite corner.
    #[inline]
    pub fn neighbors(&self, pos: usize) -> Option<[Option<usize>; 3]> {
        self.cells.get(pos).map(|t| t.neighbors)
    }

    /// Smallest coordinate along `which`; NaN for an empty mesh.
    pub fn range_min(&self, which: Axis) -> Result<f64, MeshError> {
        let axis = planar_axis(which)?;
        Ok(self.index().1.min[axis])
    }

    /// Largest coordinate along `which`; NaN for an empty mesh.
    pub fn range_max(&self, which: Axis) -> Result<f64, MeshError> {
        let axis = planar_axis(which)?;
        Ok(self.index().1.max[axis])
    }

    /// Find the triangle containing `node`.
    ///
    /// Starts at the previously located triangle, or triangle 0. Returns
    /// [`CellTri2D::outside`] when the walk leaves the mesh through a
    /// boundary edge, or when it exceeds the step budget.
    pub fn locate(&self, node: &Node2D) -> CellTri2D {
        if self.cells.is_empty() {
            return CellTri2D::outside();
        }
        let mut current = match self.last_located.get() {
            Some(c) if c < self.cells.len() => c,
            _ => 0,
        };
        let budget = self
            .options
            .max_steps
            .unwrap_or(2 * self.cells.len() + 1);

        for _ in 0..budget {
            let Some(cell) = self.at_cell(current) else {
                return CellTri2D::outside();
            };
            let phi = cell.barycentrics(node);
            if phi.iter().all(|w| *w >= -self.options.tolerance) {
                self.last_located.set(current);
                return cell;
            }

            let dir = most_negative(phi);
            match self.cells[current].neighbors[dir] {
                Some(next) => current = next,
                None => return CellTri2D::outside(),
            }
        }

        log::warn!(
            "triangle walk for ({}, {}) gave up after {budget} steps",
            node.x(),
            node.y()
        );
        CellTri2D::outside()
    }

    fn index(&self) -> &(HashMap<i32, usize>, Bounds) {
        self.ids.get_or_rebuild(|| {
            let mut bounds = Bounds::default();
            let mut map = HashMap::with_capacity(self.nodes.len());
            for (pos, node) in self.nodes.iter().enumerate() {
                map.insert(node.id(), pos);
                bounds.include(node);
            }
            (map, bounds)
        })
    }
}

impl InvalidateCache for MeshTri2D {
    #[inline]
    fn invalidate_cache(&mut self) {
        self.ids.invalidate_cache();
    }
}

impl PartialEq for MeshTri2D {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.cells == other.cells && self.counter == other.counter
    }
}

impl DebugInvariants for MeshTri2D {
    fn validate_invariants(&self) -> Result<(), MeshError> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            ensure(node.has_id(), || "node without id".into())?;
            ensure(seen.insert(node.id()), || {
                format!("node id {} appears twice", node.id())
            })?;
        }

        for (t, tri) in self.cells.iter().enumerate() {
            for id in tri.nodes {
                ensure(seen.contains(&id), || {
                    format!("triangle #{t} references missing node {id}")
                })?;
            }
            for k in 0..3 {
                let Some(u) = tri.neighbors[k] else { continue };
                let other = self.cells.get(u).ok_or_else(|| {
                    MeshError::InvariantViolation(format!(
                        "triangle #{t} points at missing neighbor #{u}"
                    ))
                })?;
                let edge = tri.edge_opposite(k);
                let back = (0..3)
                    .any(|j| other.neighbors[j] == Some(t) && other.edge_opposite(j) == edge);
                ensure(back, || {
                    format!("neighbor #{u} of triangle #{t} does not point back across {edge:?}")
                })?;
            }
        }
        Ok(())
    }
}

#[inline]
fn planar_axis(which: Axis) -> Result<usize, MeshError> {
    match which {
        Axis::Z => Err(MeshError::UnsupportedAxis(which.label())),
        _ => Ok(which.index()),
    }
}

#[inline]
fn is_degenerate(corners: [(f64, f64); 3]) -> bool {
    let (x0, y0) = corners[0];
    let det = (corners[1].0 - x0) * (corners[2].1 - y0)
        - (corners[2].0 - x0) * (corners[1].1 - y0);
    det == 0.0 || !det.is_finite()
}

/// Index of the smallest weight. NaN weights never win.
#[inline]
fn most_negative(phi: [f64; 3]) -> usize {
    let mut dir = 0;
    for i in 1..3 {
        if phi[i] < phi[dir] {
            dir = i;
        }
    }
    dir
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two unit squares side by side, each split into two triangles.
    fn strip() -> MeshTri2D {
        let mut mesh = MeshTri2D::new();
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0), (2.0, 0.0), (2.0, 1.0)] {
            mesh.add_node(Node2D::new(x, y)).unwrap();
        }
        mesh.add_cell(0, 1, 2).unwrap();
        mesh.add_cell(1, 2, 3).unwrap();
        mesh.add_cell(1, 3, 4).unwrap();
        mesh.add_cell(3, 4, 5).unwrap();
        mesh
    }

    #[test]
    fn adjacency_is_symmetric() {
        let mesh = strip();
        mesh.validate_invariants().unwrap();
        // edge 1-2 is opposite corner 0 of tri 0 and corner 2 of tri 1
        assert_eq!(mesh.neighbors(0).unwrap(), [Some(1), None, None]);
        assert_eq!(mesh.neighbors(1).unwrap()[2], Some(0));
        assert_eq!(mesh.neighbors(3).unwrap(), [None, None, Some(2)]);
    }

    #[test]
    fn locate_walks_to_containing_triangle() {
        let mesh = strip();
        let cell = mesh.locate(&Node2D::new(1.8, 0.9));
        assert_eq!(cell.cell_id(), Some(3));
        // next query starts from triangle 3 and walks back
        let cell = mesh.locate(&Node2D::new(0.1, 0.1));
        assert_eq!(cell.cell_id(), Some(0));
    }

    #[test]
    fn locate_outside_returns_sentinel() {
        let mesh = strip();
        assert!(mesh.locate(&Node2D::new(5.0, 5.0)).is_outside());
        assert!(mesh.locate(&Node2D::new(-0.5, 0.5)).is_outside());
        assert!(MeshTri2D::new().locate(&Node2D::new(0.0, 0.0)).is_outside());
    }

    #[test]
    fn duplicate_node_id_returns_existing() {
        let mut mesh = strip();
        let n = *mesh.add_node(Node2D::with_id(1, 9.0, 9.0)).unwrap();
        assert_eq!((n.x(), n.y()), (1.0, 0.0));
        assert_eq!(mesh.size_nodes(), 6);
    }

    #[test]
    fn id_counter_refuses_to_overflow() {
        let mut mesh = MeshTri2D::new();
        mesh.add_node(Node2D::with_id(i32::MAX - 1, 0.0, 0.0)).unwrap();
        assert_eq!(mesh.counter(), i32::MAX);
        assert_eq!(
            mesh.add_node(Node2D::new(1.0, 0.0)),
            Err(MeshError::IdOverflow(i32::MAX))
        );
        assert_eq!(
            mesh.add_node(Node2D::with_id(i32::MAX, 1.0, 0.0)),
            Err(MeshError::IdOverflow(i32::MAX))
        );
        assert_eq!(mesh.size_nodes(), 1);
    }

    #[test]
    fn weight_exactly_at_tolerance_is_inside() {
        let mut mesh = MeshTri2D::with_options(LocateOptions {
            tolerance: 0.25,
            ..LocateOptions::default()
        });
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)] {
            mesh.add_node(Node2D::new(x, y)).unwrap();
        }
        mesh.add_cell(0, 1, 2).unwrap();
        // weights (0.75, -0.25, 0.5)
        assert_eq!(mesh.locate(&Node2D::new(-0.25, 0.5)).cell_id(), Some(0));
        assert!(mesh.locate(&Node2D::new(-0.5, 0.5)).is_outside());
    }

    #[test]
    fn ranges_track_added_nodes() {
        let mut mesh = strip();
        assert_eq!(mesh.range_max(Axis::X).unwrap(), 2.0);
        mesh.add_node(Node2D::new(-3.0, 4.0)).unwrap();
        assert_eq!(mesh.range_min(Axis::X).unwrap(), -3.0);
        assert_eq!(mesh.range_max(Axis::Y).unwrap(), 4.0);
        assert!(mesh.range_min(Axis::Z).is_err());
        assert!(MeshTri2D::new().range_min(Axis::X).unwrap().is_nan());
    }

    #[test]
    fn bad_cells_are_rejected() {
        let mut mesh = strip();
        assert_eq!(mesh.add_cell(0, 1, 42), Err(MeshError::UnknownNode(42)));
        mesh.add_node(Node2D::new(3.0, 0.0)).unwrap();
        assert!(matches!(
            mesh.add_cell(0, 1, 6),
            Err(MeshError::DegenerateTriangle { .. })
        ));
        assert_eq!(mesh.size_cells(), 4);
    }

    #[test]
    fn step_budget_stops_walk() {
        let mut mesh = strip();
        mesh.set_options(LocateOptions {
            max_steps: Some(1),
            ..LocateOptions::default()
        });
        assert!(mesh.locate(&Node2D::new(1.8, 0.9)).is_outside());
        assert_eq!(mesh.locate(&Node2D::new(0.1, 0.1)).cell_id(), Some(0));
    }

    #[test]
    fn clear_drops_everything() {
        let mut mesh = strip();
        mesh.clear();
        assert_eq!(mesh.size_nodes(), 0);
        assert_eq!(mesh.size_cells(), 0);
        assert_eq!(mesh.add_node(Node2D::new(0.0, 0.0)).unwrap().id(), 0);
    }
}
