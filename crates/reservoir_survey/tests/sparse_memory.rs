//! Auxiliary memory of every strategy must scale with active cells, not grid area.
//!
//! Lives in its own test binary because it installs a global heap profiler.
use reservoir_survey::grid::Grid;
use reservoir_survey::partition::{partition, StrategyKind};

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

/// Far below the 10^8 bytes an area-sized visited mask would take.
const AUX_BYTES_LIMIT: usize = 64 * 1024;

#[test]
fn huge_sparse_grid_partitions_without_area_sized_buffers() {
    // The grid's own mask is allocated before profiling starts and is not counted.
    let grid = Grid::from_cells(10_000, [(0, 0), (5, 5), (9_999, 9_999)]).unwrap();

    let _profiler = dhat::Profiler::builder().testing().build();

    for kind in StrategyKind::ALL {
        let p = partition(&grid, kind);
        assert_eq!(p.len(), 3, "{kind}");
        assert_eq!(p.total_cells(), 3, "{kind}");

        let stats = dhat::HeapStats::get();
        dhat::assert!(
            stats.max_bytes < AUX_BYTES_LIMIT,
            "{kind} peaked at {} bytes",
            stats.max_bytes
        );
    }
}
