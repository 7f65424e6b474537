//! Tree-structured export of the active cells of a grid.
//!
//! The document has a `<grid>` root holding one `<el>` record per active cell, each with
//! `<x>` and `<y>` text children, sorted by `(x, y)`.
use std::io::{self, Write};

use reservoir_survey::grid::{Cell, Grid};

const EMPTY_DOCUMENT: &str = "<grid/>\n";

/// Serializes `grid` into an indented XML document.
pub fn grid_to_xml(grid: &Grid) -> String {
    if grid.is_empty() {
        return EMPTY_DOCUMENT.to_owned();
    }
    let mut out = String::from("<grid>\n");
    // Grid iteration is already lexicographic in (x, y).
    for cell in grid.iter() {
        out.push_str(&element(cell));
    }
    out.push_str("</grid>\n");
    out
}

/// Streams the XML document for `grid` into `out`.
pub fn write_grid_xml<W: Write>(grid: &Grid, mut out: W) -> io::Result<()> {
    if grid.is_empty() {
        out.write_all(EMPTY_DOCUMENT.as_bytes())?;
        return out.flush();
    }
    out.write_all(b"<grid>\n")?;
    for cell in grid.iter() {
        out.write_all(element(cell).as_bytes())?;
    }
    out.write_all(b"</grid>\n")?;
    out.flush()
}

fn element(cell: Cell) -> String {
    format!(
        "  <el>\n    <x>{}</x>\n    <y>{}</y>\n  </el>\n",
        cell.x, cell.y
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_sorted_by_x_then_y() {
        let grid = Grid::from_cells(5, [(3, 0), (0, 4), (0, 1)]).unwrap();
        let xml = grid_to_xml(&grid);
        let xs: Vec<&str> = xml
            .lines()
            .filter_map(|l| l.trim().strip_prefix("<x>"))
            .collect();
        let ys: Vec<&str> = xml
            .lines()
            .filter_map(|l| l.trim().strip_prefix("<y>"))
            .collect();
        assert_eq!(xs, vec!["0</x>", "0</x>", "3</x>"]);
        assert_eq!(ys, vec!["1</y>", "4</y>", "0</y>"]);
        assert!(xml.starts_with("<grid>\n  <el>\n    <x>0</x>\n    <y>1</y>\n  </el>\n"));
        assert!(xml.ends_with("</grid>\n"));
    }

    #[test]
    fn empty_grid_is_an_empty_root() {
        let grid = Grid::empty(4).unwrap();
        assert_eq!(grid_to_xml(&grid), "<grid/>\n");
    }

    #[test]
    fn streamed_and_buffered_documents_match() {
        for grid in [
            Grid::generate(15, 0.6, Some(3)).unwrap(),
            Grid::empty(3).unwrap(),
        ] {
            let mut buf = Vec::new();
            write_grid_xml(&grid, &mut buf).unwrap();
            assert_eq!(String::from_utf8(buf).unwrap(), grid_to_xml(&grid));
        }
    }

    #[test]
    fn one_record_per_active_cell() {
        let grid = Grid::generate(12, 0.5, Some(9)).unwrap();
        let xml = grid_to_xml(&grid);
        assert_eq!(xml.matches("<el>").count(), grid.len());
    }
}
