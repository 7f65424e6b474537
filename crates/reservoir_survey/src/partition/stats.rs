//! Work counters reported by traversal strategies.

/// Observable cost of one partitioning run.
///
/// Flood fill fills the stack counters; the adjacency graph fills the vertex, edge
/// and labeling counters. `cells_visited` is reported by every strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraversalStats {
    /// Cells assigned to a reservoir. Equals the active cell count after a run.
    pub cells_visited: usize,
    /// Cells pushed onto the explicit flood-fill stack.
    pub stack_pushes: usize,
    /// Largest flood-fill stack length observed.
    pub peak_stack_len: usize,
    /// Vertices in the explicit adjacency graph.
    pub vertices: usize,
    /// Undirected edges in the explicit adjacency graph.
    pub edges_created: usize,
    /// Finds and unions (union-find) or queue pops (breadth-first).
    pub label_operations: usize,
}

impl TraversalStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a stack length, keeping the maximum.
    #[inline]
    pub(crate) fn observe_stack(&mut self, len: usize) {
        if len > self.peak_stack_len {
            self.peak_stack_len = len;
        }
    }

    /// Edges per vertex, 0 for an empty graph.
    pub fn edges_per_vertex(&self) -> f64 {
        if self.vertices == 0 {
            0.0
        } else {
            self.edges_created as f64 / self.vertices as f64
        }
    }
}
