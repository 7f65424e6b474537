//! Box-drawing text rendering of small grids. Relies on a fixed-width font.
use std::fmt;

use reservoir_survey::grid::{Cell, Grid};
use reservoir_survey::partition::Partition;

/// Grids wider than this are not rendered.
pub const MAX_RENDER_SIZE: usize = 100;

const TOP_LEFT: char = '┌';
const TOP_RIGHT: char = '┐';
const TOP: char = '┬';
const BOTTOM_LEFT: char = '└';
const BOTTOM_RIGHT: char = '┘';
const BOTTOM: char = '┴';
const LEFT: char = '├';
const RIGHT: char = '┤';
const VERTICAL: char = '│';
const HORIZONTAL: char = '─';
const VERTEX: char = '┼';

const ACTIVE_MARKER: char = 'x';
const EMPTY_MARKER: char = ' ';

/// Outcome of [`render_ascii`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// The grid exceeded [`MAX_RENDER_SIZE`].
    Skipped,
    Text(String),
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rendered::Skipped => f.write_str("Too big to render!"),
            Rendered::Text(text) => f.write_str(text),
        }
    }
}

/// Renders `grid` as a table with one column per `x` and one row per `y`.
///
/// Row and column headers are zero-padded to the digit width of `size - 1`, and every
/// cell is that many characters wide. With a partition, each cell shows a letter
/// identifying its reservoir instead of `x`.
pub fn render_ascii(grid: &Grid, partition: Option<&Partition>) -> Rendered {
    let size = grid.size();
    if size > MAX_RENDER_SIZE {
        return Rendered::Skipped;
    }

    let width = (size - 1).to_string().len();
    let labels = partition.map(|p| reservoir_labels(grid, p));
    let rule = |n: usize| HORIZONTAL.to_string().repeat(n);

    let mut out = String::new();

    out.push(TOP_LEFT);
    for _ in 0..size {
        out.push_str(&rule(width));
        out.push(TOP);
    }
    out.push_str(&rule(width));
    out.push(TOP_RIGHT);
    out.push('\n');

    out.push(VERTICAL);
    out.push_str(&" ".repeat(width));
    out.push(VERTICAL);
    for x in 0..size {
        out.push_str(&format!("{x:0width$}"));
        out.push(VERTICAL);
    }
    out.push('\n');

    let mut divider = String::new();
    divider.push(LEFT);
    divider.push_str(&rule(width));
    for _ in 0..size {
        divider.push(VERTEX);
        divider.push_str(&rule(width));
    }
    divider.push(RIGHT);
    divider.push('\n');

    for y in 0..size {
        out.push_str(&divider);
        out.push(VERTICAL);
        out.push_str(&format!("{y:0width$}"));
        out.push(VERTICAL);
        for x in 0..size {
            let cell = Cell::new(x as i32, y as i32);
            let marker = match &labels {
                Some(labels) => labels[grid_index(size, cell)],
                None if grid.contains(cell) => ACTIVE_MARKER,
                None => EMPTY_MARKER,
            };
            for _ in 0..width {
                out.push(marker);
            }
            out.push(VERTICAL);
        }
        out.push('\n');
    }

    out.push(BOTTOM_LEFT);
    for _ in 0..size {
        out.push_str(&rule(width));
        out.push(BOTTOM);
    }
    out.push_str(&rule(width));
    out.push(BOTTOM_RIGHT);
    out.push('\n');

    Rendered::Text(out)
}

fn grid_index(size: usize, cell: Cell) -> usize {
    cell.x as usize * size + cell.y as usize
}

/// One letter per site: `a`..`z` cycling over reservoirs in canonical order.
fn reservoir_labels(grid: &Grid, partition: &Partition) -> Vec<char> {
    let size = grid.size();
    let mut sorted = partition.clone();
    sorted.canonicalize();
    let mut labels = vec![EMPTY_MARKER; size * size];
    for (i, reservoir) in sorted.iter().enumerate() {
        let letter = char::from(b'a' + (i % 26) as u8);
        for cell in reservoir.iter().filter(|c| grid.in_bounds(*c)) {
            labels[grid_index(size, cell)] = letter;
        }
    }
    labels
}
