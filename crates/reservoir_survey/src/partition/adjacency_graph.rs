//! Explicit adjacency-graph strategy: build an undirected graph over active cells, then
//! label its connected components.
//!
//! The graph pays for one stored edge per adjacent pair, which is what separates it
//! from flood fill on dense grids; [`TraversalStats::edges_created`] reports that cost.
use std::collections::VecDeque;

use crate::grid::{neighbors, Cell, Grid};
use crate::partition::{Reservoir, ReservoirStrategy, TraversalStats};

const UNLABELED: u32 = u32::MAX;

/// Component labeling algorithm run over a [`CellGraph`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Labeling {
    /// Disjoint-set forest over the edge list.
    #[default]
    UnionFind,
    /// Queue-driven traversal over the compressed adjacency lists.
    BreadthFirst,
}

/// Partitions by building a [`CellGraph`] and labeling it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdjacencyGraph {
    pub labeling: Labeling,
}

impl AdjacencyGraph {
    pub fn new(labeling: Labeling) -> Self {
        Self { labeling }
    }
}

impl ReservoirStrategy for AdjacencyGraph {
    fn name(&self) -> &'static str {
        match self.labeling {
            Labeling::UnionFind => "adjacency_graph",
            Labeling::BreadthFirst => "adjacency_graph_bfs",
        }
    }

    fn find_reservoirs(&self, grid: &Grid, stats: &mut TraversalStats) -> Vec<Reservoir> {
        let graph = CellGraph::build(grid);
        stats.vertices = graph.vertex_count();
        stats.edges_created = graph.edge_count();

        let labels = match self.labeling {
            Labeling::UnionFind => graph.label_union_find(stats),
            Labeling::BreadthFirst => graph.label_breadth_first(stats),
        };
        graph.components(&labels)
    }
}

/// Undirected graph whose vertices are active cells and whose edges join 8-adjacent
/// pairs. Each unordered pair is stored once in `edges`; the compressed row arrays
/// hold both directions.
#[derive(Debug, Clone)]
pub struct CellGraph {
    vertices: Vec<Cell>,
    edges: Vec<(u32, u32)>,
    offsets: Vec<usize>,
    adjacency: Vec<u32>,
}

impl CellGraph {
    pub fn build(grid: &Grid) -> Self {
        // Sorted, so vertex ids can be recovered by binary search.
        let vertices = grid.to_cells();

        let mut edges = Vec::new();
        for (i, &cell) in vertices.iter().enumerate() {
            for n in neighbors(cell, grid) {
                if n > cell {
                    if let Ok(j) = vertices.binary_search(&n) {
                        edges.push((i as u32, j as u32));
                    }
                }
            }
        }

        let mut degree = vec![0usize; vertices.len()];
        for &(a, b) in &edges {
            degree[a as usize] += 1;
            degree[b as usize] += 1;
        }
        let mut offsets = Vec::with_capacity(vertices.len() + 1);
        let mut acc = 0;
        offsets.push(acc);
        for d in &degree {
            acc += d;
            offsets.push(acc);
        }
        let mut adjacency = vec![0u32; acc];
        let mut write_pos = offsets.clone();
        for &(a, b) in &edges {
            adjacency[write_pos[a as usize]] = b;
            write_pos[a as usize] += 1;
            adjacency[write_pos[b as usize]] = a;
            write_pos[b as usize] += 1;
        }

        Self {
            vertices,
            edges,
            offsets,
            adjacency,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertex(&self, id: u32) -> Cell {
        self.vertices[id as usize]
    }

    /// Unordered edge list, each adjacent pair once as `(lower, higher)` vertex ids.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    #[inline]
    pub fn neighbors_of(&self, id: u32) -> &[u32] {
        let v = id as usize;
        &self.adjacency[self.offsets[v]..self.offsets[v + 1]]
    }

    #[inline]
    pub fn degree(&self, id: u32) -> usize {
        let v = id as usize;
        self.offsets[v + 1] - self.offsets[v]
    }

    /// Labels every vertex with the root of its disjoint-set tree.
    pub fn label_union_find(&self, stats: &mut TraversalStats) -> Vec<u32> {
        let mut sets = DisjointSets::new(self.vertex_count());
        for &(a, b) in &self.edges {
            sets.union(a, b);
        }
        let labels: Vec<u32> = (0..self.vertex_count() as u32)
            .map(|v| sets.find(v))
            .collect();
        stats.label_operations += sets.operations;
        stats.cells_visited += labels.len();
        labels
    }

    /// Labels every vertex with the id of the first vertex of its component.
    pub fn label_breadth_first(&self, stats: &mut TraversalStats) -> Vec<u32> {
        let mut labels = vec![UNLABELED; self.vertex_count()];
        let mut queue = VecDeque::new();
        for root in 0..self.vertex_count() as u32 {
            if labels[root as usize] != UNLABELED {
                continue;
            }
            labels[root as usize] = root;
            queue.push_back(root);
            while let Some(v) = queue.pop_front() {
                stats.label_operations += 1;
                stats.cells_visited += 1;
                for &n in self.neighbors_of(v) {
                    if labels[n as usize] == UNLABELED {
                        labels[n as usize] = root;
                        queue.push_back(n);
                    }
                }
            }
        }
        labels
    }

    /// Groups vertices by label into reservoirs, in order of first appearance.
    pub fn components(&self, labels: &[u32]) -> Vec<Reservoir> {
        let mut slot = vec![UNLABELED; self.vertex_count()];
        let mut groups: Vec<Vec<Cell>> = Vec::new();
        for (v, &label) in labels.iter().enumerate() {
            let s = &mut slot[label as usize];
            if *s == UNLABELED {
                *s = groups.len() as u32;
                groups.push(Vec::new());
            }
            groups[*s as usize].push(self.vertices[v]);
        }
        groups.into_iter().map(Reservoir::from_cells).collect()
    }
}

/// Disjoint-set forest with union by size and path halving.
struct DisjointSets {
    parent: Vec<u32>,
    size: Vec<u32>,
    operations: usize,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
            size: vec![1; n],
            operations: 0,
        }
    }

    fn find(&mut self, mut v: u32) -> u32 {
        self.operations += 1;
        while self.parent[v as usize] != v {
            let grandparent = self.parent[self.parent[v as usize] as usize];
            self.parent[v as usize] = grandparent;
            v = grandparent;
        }
        v
    }

    fn union(&mut self, a: u32, b: u32) {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        self.operations += 1;
        if self.size[ra as usize] < self.size[rb as usize] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb as usize] = ra;
        self.size[ra as usize] += self.size[rb as usize];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_block_edge_count() {
        // 3x3 block: 12 orthogonal + 8 diagonal adjacent pairs.
        let grid = Grid::generate(3, 0.0, Some(0)).unwrap();
        let graph = CellGraph::build(&grid);
        assert_eq!(graph.vertex_count(), 9);
        assert_eq!(graph.edge_count(), 20);
        let center = graph
            .vertices
            .binary_search(&Cell::new(1, 1))
            .unwrap() as u32;
        assert_eq!(graph.degree(center), 8);
    }

    #[test]
    fn edges_are_unique_and_adjacent() {
        let grid = Grid::generate(20, 0.55, Some(8)).unwrap();
        let graph = CellGraph::build(&grid);
        let mut seen = std::collections::HashSet::new();
        for &(a, b) in graph.edges() {
            assert!(a < b);
            assert!(graph.vertex(a).is_adjacent(graph.vertex(b)));
            assert!(seen.insert((a, b)));
        }
        let degree_sum: usize = (0..graph.vertex_count() as u32)
            .map(|v| graph.degree(v))
            .sum();
        assert_eq!(degree_sum, 2 * graph.edge_count());
    }

    #[test]
    fn labelings_agree() {
        let grid = Grid::generate(40, 0.6, Some(21)).unwrap();
        let mut stats = TraversalStats::new();
        let uf = AdjacencyGraph::new(Labeling::UnionFind).find_reservoirs(&grid, &mut stats);
        let mut stats_bfs = TraversalStats::new();
        let bfs =
            AdjacencyGraph::new(Labeling::BreadthFirst).find_reservoirs(&grid, &mut stats_bfs);
        let mut uf_cells: Vec<_> = uf.iter().map(|r| r.cells().to_vec()).collect();
        let mut bfs_cells: Vec<_> = bfs.iter().map(|r| r.cells().to_vec()).collect();
        uf_cells.sort();
        bfs_cells.sort();
        assert_eq!(uf_cells, bfs_cells);
        assert_eq!(stats.edges_created, stats_bfs.edges_created);
        assert_eq!(stats.cells_visited, grid.len());
        assert_eq!(stats_bfs.cells_visited, grid.len());
    }

    #[test]
    fn isolated_vertices_form_singletons() {
        let grid = Grid::from_cells(10, [(0, 0), (5, 5), (9, 0)]).unwrap();
        let mut stats = TraversalStats::new();
        let found = AdjacencyGraph::default().find_reservoirs(&grid, &mut stats);
        assert_eq!(found.len(), 3);
        assert_eq!(stats.edges_created, 0);
        assert_eq!(stats.vertices, 3);
    }

    #[test]
    fn disjoint_sets_merge_transitively() {
        let mut sets = DisjointSets::new(5);
        sets.union(0, 1);
        sets.union(3, 4);
        sets.union(1, 4);
        let root = sets.find(0);
        assert_eq!(sets.find(3), root);
        assert_ne!(sets.find(2), root);
    }
}
