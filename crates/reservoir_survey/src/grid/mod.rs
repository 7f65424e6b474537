//! Square occupancy grids of oil sites and the Moore-neighborhood lookup shared by
//! generation and partitioning.
//!
//! A [`Grid`] is the set of active [`Cell`]s for a `size × size` domain. It is stored as a
//! dense row-major mask (`index = x * size + y`), so membership tests are O(1) and
//! iteration visits cells in lexicographic `(x, y)` order.
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use glam::IVec2;

use crate::error::{Error, Result};

pub mod generator;

pub use generator::{generate, GenerateConfig, DEFAULT_PROBABILITY};

/// Largest accepted grid edge length. Keeps `size * size` within `i32` range.
pub const MAX_GRID_SIZE: usize = 46_340;

/// Offsets of the eight Moore neighbors, row-major around the center.
pub const MOORE_OFFSETS: [IVec2; 8] = [
    IVec2::new(-1, -1),
    IVec2::new(-1, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, -1),
    IVec2::new(0, 1),
    IVec2::new(1, -1),
    IVec2::new(1, 0),
    IVec2::new(1, 1),
];

/// Integer grid coordinate. Ordered lexicographically by `(x, y)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the cell displaced by `offset`, or `None` on coordinate overflow.
    #[inline]
    pub fn offset(self, offset: IVec2) -> Option<Cell> {
        Some(Cell {
            x: self.x.checked_add(offset.x)?,
            y: self.y.checked_add(offset.y)?,
        })
    }

    /// Iterates the up-to-8 Moore neighborhood coordinates, regardless of membership.
    pub fn moore_neighborhood(self) -> impl Iterator<Item = Cell> {
        MOORE_OFFSETS.into_iter().filter_map(move |o| self.offset(o))
    }

    /// True when `other` is one of the eight Moore neighbors of `self`.
    pub fn is_adjacent(self, other: Cell) -> bool {
        let dx = (self.x as i64 - other.x as i64).abs();
        let dy = (self.y as i64 - other.y as i64).abs();
        dx <= 1 && dy <= 1 && (dx, dy) != (0, 0)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Cell { x, y }
    }
}

impl From<Cell> for (i32, i32) {
    fn from(c: Cell) -> Self {
        (c.x, c.y)
    }
}

impl From<IVec2> for Cell {
    fn from(v: IVec2) -> Self {
        Cell { x: v.x, y: v.y }
    }
}

impl From<Cell> for IVec2 {
    fn from(c: Cell) -> Self {
        IVec2::new(c.x, c.y)
    }
}

impl From<mint::Point2<i32>> for Cell {
    fn from(p: mint::Point2<i32>) -> Self {
        Cell { x: p.x, y: p.y }
    }
}

impl From<Cell> for mint::Point2<i32> {
    fn from(c: Cell) -> Self {
        mint::Point2 { x: c.x, y: c.y }
    }
}

/// Membership test used by the neighbor primitive.
pub trait CellLookup {
    fn contains_cell(&self, cell: Cell) -> bool;
}

impl CellLookup for HashSet<Cell> {
    #[inline]
    fn contains_cell(&self, cell: Cell) -> bool {
        self.contains(&cell)
    }
}

impl CellLookup for BTreeSet<Cell> {
    #[inline]
    fn contains_cell(&self, cell: Cell) -> bool {
        self.contains(&cell)
    }
}

/// Returns the Moore neighbors of `cell` that are members of `lookup`.
///
/// Order is unspecified. Never contains duplicates or `cell` itself; empty when no
/// neighbor is a member.
pub fn neighbors<L: CellLookup + ?Sized>(cell: Cell, lookup: &L) -> Vec<Cell> {
    cell.moore_neighborhood()
        .filter(|n| lookup.contains_cell(*n))
        .collect()
}

/// Number of Moore neighbors of `cell` that are members of `lookup`.
#[inline]
pub fn neighbor_count<L: CellLookup + ?Sized>(cell: Cell, lookup: &L) -> usize {
    cell.moore_neighborhood()
        .filter(|n| lookup.contains_cell(*n))
        .count()
}

/// Parameters a grid was generated with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridOrigin {
    /// Threshold a draw had to exceed for a site to be provisionally active.
    pub probability: f64,
    /// Seed of the random stream that produced the grid.
    pub seed: u64,
}

/// The set of active cells on a `size × size` square.
#[derive(Clone)]
pub struct Grid {
    size: usize,
    mask: Vec<bool>,
    active: usize,
    origin: Option<GridOrigin>,
}

impl Grid {
    /// Creates an empty grid. Fails for `size == 0` or `size > MAX_GRID_SIZE`.
    pub fn empty(size: usize) -> Result<Self> {
        validate_size(size)?;
        Ok(Self::blank(size))
    }

    /// Unvalidated empty grid for callers that already checked `size`.
    pub(crate) fn blank(size: usize) -> Self {
        Self {
            size,
            mask: vec![false; size * size],
            active: 0,
            origin: None,
        }
    }

    /// Builds a grid from explicit active cells. Duplicates are collapsed.
    pub fn from_cells<I, C>(size: usize, cells: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        let mut grid = Self::empty(size)?;
        for c in cells {
            let cell = c.into();
            if !grid.in_bounds(cell) {
                return Err(Error::InvalidArgument(format!(
                    "cell {cell} lies outside a grid of size {size}"
                )));
            }
            grid.insert(cell);
        }
        Ok(grid)
    }

    /// Generates a grid; see [`generate`].
    pub fn generate(size: usize, probability: f64, seed: Option<u64>) -> Result<Self> {
        let mut config = GenerateConfig::new(size).with_probability(probability);
        config.seed = seed;
        generate(&config)
    }

    /// Edge length of the square.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of active cells.
    pub fn len(&self) -> usize {
        self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// Fraction of the `size × size` domain that is active.
    pub fn density(&self) -> f64 {
        self.active as f64 / self.mask.len() as f64
    }

    /// Generation parameters, when the grid came from [`generate`].
    pub fn origin(&self) -> Option<GridOrigin> {
        self.origin
    }

    pub fn seed(&self) -> Option<u64> {
        self.origin.map(|o| o.seed)
    }

    pub fn probability(&self) -> Option<f64> {
        self.origin.map(|o| o.probability)
    }

    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < self.size && (cell.y as usize) < self.size
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && self.mask[self.index(cell)]
    }

    /// Iterates active cells in lexicographic `(x, y)` order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        let size = self.size;
        self.mask
            .iter()
            .enumerate()
            .filter(|(_, active)| **active)
            .map(move |(i, _)| Cell::new((i / size) as i32, (i % size) as i32))
    }

    /// Active cells collected into a vector, in lexicographic order.
    pub fn to_cells(&self) -> Vec<Cell> {
        let mut out = Vec::with_capacity(self.active);
        out.extend(self.iter());
        out
    }

    /// Row-major mask index of an in-bounds cell.
    #[inline]
    pub(crate) fn index(&self, cell: Cell) -> usize {
        cell.x as usize * self.size + cell.y as usize
    }

    /// Marks an in-bounds cell active. Caller guarantees bounds.
    pub(crate) fn insert(&mut self, cell: Cell) {
        let idx = self.index(cell);
        if !self.mask[idx] {
            self.mask[idx] = true;
            self.active += 1;
        }
    }

    pub(crate) fn set_origin(&mut self, origin: GridOrigin) {
        self.origin = Some(origin);
    }
}

impl CellLookup for Grid {
    #[inline]
    fn contains_cell(&self, cell: Cell) -> bool {
        self.contains(cell)
    }
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.active == other.active && self.mask == other.mask
    }
}

impl Eq for Grid {}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("size", &self.size)
            .field("active", &self.active)
            .field("origin", &self.origin)
            .finish()
    }
}

pub(crate) fn validate_size(size: usize) -> Result<()> {
    if size == 0 {
        return Err(Error::InvalidArgument("size must be > 0".into()));
    }
    if size > MAX_GRID_SIZE {
        return Err(Error::InvalidArgument(format!(
            "size must be <= {MAX_GRID_SIZE}, got {size}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(cells: &[(i32, i32)]) -> HashSet<Cell> {
        cells.iter().copied().map(Cell::from).collect()
    }

    #[test]
    fn diagonal_neighbors_are_found() {
        let cells = set(&[(0, 0), (2, 0), (1, 1), (0, 2), (2, 2)]);
        let found: HashSet<Cell> = neighbors(Cell::new(1, 1), &cells).into_iter().collect();
        let mut expected = cells.clone();
        expected.remove(&Cell::new(1, 1));
        assert_eq!(found, expected);
    }

    #[test]
    fn lone_cell_has_no_neighbors() {
        let cells = set(&[(1, 1)]);
        assert!(neighbors(Cell::new(1, 1), &cells).is_empty());
        assert_eq!(neighbor_count(Cell::new(1, 1), &cells), 0);
    }

    #[test]
    fn full_block_center_sees_all_eight() {
        let grid = Grid::generate(3, 0.0, Some(0)).unwrap();
        let found = neighbors(Cell::new(1, 1), &grid);
        assert_eq!(found.len(), 8);
        let unique: BTreeSet<Cell> = found.iter().copied().collect();
        assert_eq!(unique.len(), 8);
        assert!(!unique.contains(&Cell::new(1, 1)));
    }

    #[test]
    fn corner_neighbors_stay_in_bounds() {
        let grid = Grid::from_cells(2, [(0, 0), (0, 1), (1, 0), (1, 1)]).unwrap();
        let found: BTreeSet<Cell> = neighbors(Cell::new(0, 0), &grid).into_iter().collect();
        assert_eq!(
            found,
            [Cell::new(0, 1), Cell::new(1, 0), Cell::new(1, 1)]
                .into_iter()
                .collect()
        );
    }

    #[test]
    fn lookup_impls_agree() {
        let cells = [(3, 3), (3, 4), (4, 4), (6, 6)];
        let grid = Grid::from_cells(8, cells).unwrap();
        let hash: HashSet<Cell> = cells.iter().copied().map(Cell::from).collect();
        let tree: BTreeSet<Cell> = hash.iter().copied().collect();
        for c in grid.iter() {
            let mut a = neighbors(c, &grid);
            let mut b = neighbors(c, &hash);
            let mut t = neighbors(c, &tree);
            a.sort();
            b.sort();
            t.sort();
            assert_eq!(a, b);
            assert_eq!(a, t);
        }
    }

    #[test]
    fn from_cells_rejects_out_of_range() {
        assert!(matches!(
            Grid::from_cells(3, [(0, 3)]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Grid::from_cells(3, [(-1, 0)]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Grid::from_cells(0, Vec::<Cell>::new()),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn from_cells_collapses_duplicates_and_iterates_sorted() {
        let grid = Grid::from_cells(4, [(2, 1), (0, 3), (2, 1), (0, 0)]).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(
            grid.to_cells(),
            vec![Cell::new(0, 0), Cell::new(0, 3), Cell::new(2, 1)]
        );
        assert!(grid.contains(Cell::new(0, 3)));
        assert!(!grid.contains(Cell::new(3, 0)));
        assert!(!grid.contains(Cell::new(9, 9)));
        assert_eq!(grid.origin(), None);
    }

    #[test]
    fn adjacency_is_symmetric_and_excludes_self() {
        let a = Cell::new(5, 5);
        assert!(a.is_adjacent(Cell::new(6, 6)));
        assert!(Cell::new(6, 6).is_adjacent(a));
        assert!(!a.is_adjacent(a));
        assert!(!a.is_adjacent(Cell::new(7, 5)));
    }

    #[test]
    fn conversions_roundtrip_through_interop_types() {
        let c = Cell::new(-2, 7);
        let v: IVec2 = c.into();
        assert_eq!(Cell::from(v), c);
        let p: mint::Point2<i32> = c.into();
        assert_eq!(Cell::from(p), c);
        assert_eq!(c.to_string(), "(-2, 7)");
    }

    #[test]
    fn moore_neighborhood_skips_overflowing_coordinates() {
        let edge = Cell::new(i32::MAX, 0);
        assert_eq!(edge.moore_neighborhood().count(), 5);
    }
}
