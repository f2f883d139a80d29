//! Grid rasterization and connected-region segmentation.
//!
//! The canvas is divided into a uniform lattice of
//! [`CELL_SIZE_PX`]-sized cells, each sampled at its center through the
//! classifier. A 4-connected breadth-first flood fill groups same-kind
//! cells into disjoint regions: the atomic unit of reported area and
//! hover interaction. Segmentation is a pure function of the shape list
//! and canvas dimensions; [`SegmentCache`] memoizes the latest result so
//! cursor movement never triggers recomputation.

use std::collections::VecDeque;

use glam::{DVec2, dvec2};

use crate::classify::classify;
use crate::defaults::CELL_SIZE_PX;
use crate::log::debug;
use crate::store::{Shape, ZoneStore};
use crate::types::{CanvasSize, ZoneKind};

/// Sentinel in the cell-to-region table for unclassified cells.
const NO_REGION: u32 = u32::MAX;

/// Uniform sampling lattice over the canvas, row-major indexed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub cols: usize,
    pub rows: usize,
    pub cell: f64,
}

impl Grid {
    pub fn for_canvas(canvas: CanvasSize) -> Self {
        let cols = (canvas.width.max(0.0) / CELL_SIZE_PX).ceil() as usize;
        let rows = (canvas.height.max(0.0) / CELL_SIZE_PX).ceil() as usize;
        Self {
            cols,
            rows,
            cell: CELL_SIZE_PX,
        }
    }

    pub fn empty() -> Self {
        Self {
            cols: 0,
            rows: 0,
            cell: CELL_SIZE_PX,
        }
    }

    /// Total cell count.
    pub fn len(&self) -> usize {
        self.cols * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Center of a cell: the single sampling point shared by
    /// segmentation and hover lookup. Centers keep axis-aligned shape
    /// edges off the lattice, where the ray-cast test is ambiguous.
    pub fn center(&self, index: usize) -> DVec2 {
        let col = index % self.cols;
        let row = index / self.cols;
        dvec2(
            (col as f64 + 0.5) * self.cell,
            (row as f64 + 0.5) * self.cell,
        )
    }

    /// Map a pixel position to its containing cell, if in bounds.
    pub fn cell_at(&self, p: DVec2) -> Option<usize> {
        if self.is_empty() || p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let col = (p.x / self.cell) as usize;
        let row = (p.y / self.cell) as usize;
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(row * self.cols + col)
    }

    /// 4-connected in-bounds neighbors of a cell.
    fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + use<> {
        let col = index % self.cols;
        let row = index / self.cols;
        let west = (col > 0).then(|| index - 1);
        let east = (col + 1 < self.cols).then(|| index + 1);
        let north = (row > 0).then(|| index - self.cols);
        let south = (row + 1 < self.rows).then(|| index + self.cols);
        [west, east, north, south].into_iter().flatten()
    }
}

/// A maximal 4-connected set of same-kind cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub kind: ZoneKind,
    /// Row-major cell indices belonging to this region.
    pub cells: Vec<usize>,
}

impl Region {
    pub fn pixel_area(&self, cell: f64) -> f64 {
        self.cells.len() as f64 * cell * cell
    }
}

/// The full partition of classified cells into disjoint regions.
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    grid: Grid,
    regions: Vec<Region>,
    /// Cell index to region index, `NO_REGION` for unclassified cells.
    cell_region: Vec<u32>,
}

impl Segmentation {
    pub fn empty() -> Self {
        Self {
            grid: Grid::empty(),
            regions: Vec::new(),
            cell_region: Vec::new(),
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// The region owning the cell under a pixel position, for hover.
    pub fn region_at(&self, p: DVec2) -> Option<&Region> {
        let index = self.grid.cell_at(p)?;
        let region = self.cell_region[index];
        if region == NO_REGION {
            None
        } else {
            self.regions.get(region as usize)
        }
    }

    /// Total classified cell count across all regions.
    pub fn total_cells(&self) -> usize {
        self.regions.iter().map(|region| region.cells.len()).sum()
    }
}

/// Rasterize the canvas and flood-fill classified cells into regions.
///
/// An absent canvas yields an empty segmentation. Each cell is visited
/// once; the worklist is an explicit queue over integer cell indices and
/// the visited set a bitvec sized to the grid.
pub fn segment(shapes: &[Shape], canvas: Option<CanvasSize>) -> Segmentation {
    let Some(canvas) = canvas else {
        return Segmentation::empty();
    };
    let grid = Grid::for_canvas(canvas);
    if grid.is_empty() {
        return Segmentation::empty();
    }

    let mut regions: Vec<Region> = Vec::new();
    let mut cell_region = vec![NO_REGION; grid.len()];
    let mut visited = vec![false; grid.len()];
    let mut worklist = VecDeque::new();

    for seed in 0..grid.len() {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        let Some(kind) = classify(grid.center(seed), shapes) else {
            continue;
        };

        // Grow a new homogeneous region from this seed.
        let region_index = regions.len() as u32;
        let mut cells = vec![seed];
        cell_region[seed] = region_index;
        worklist.push_back(seed);

        while let Some(index) = worklist.pop_front() {
            for neighbor in grid.neighbors(index) {
                if visited[neighbor] {
                    continue;
                }
                // Different-kind neighbors stay unvisited so they can
                // seed their own region later.
                if classify(grid.center(neighbor), shapes) == Some(kind) {
                    visited[neighbor] = true;
                    cell_region[neighbor] = region_index;
                    cells.push(neighbor);
                    worklist.push_back(neighbor);
                }
            }
        }

        regions.push(Region { kind, cells });
    }

    debug!(
        "segmented {} cells into {} regions",
        grid.len(),
        regions.len()
    );
    Segmentation {
        grid,
        regions,
        cell_region,
    }
}

/// Memoizes the most recent segmentation, keyed by store version and
/// canvas dimensions. Hover lookups between store mutations reuse the
/// cached region set.
#[derive(Debug, Clone)]
pub struct SegmentCache {
    key: Option<CacheKey>,
    seg: Segmentation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheKey {
    version: u64,
    canvas: Option<(u64, u64)>,
}

impl CacheKey {
    fn new(store: &ZoneStore, canvas: Option<CanvasSize>) -> Self {
        Self {
            version: store.version(),
            canvas: canvas.map(|c| (c.width.to_bits(), c.height.to_bits())),
        }
    }
}

impl Default for SegmentCache {
    fn default() -> Self {
        Self {
            key: None,
            seg: Segmentation::empty(),
        }
    }
}

impl SegmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the segmentation for the store's current state,
    /// recomputing only when the store version or canvas changed.
    pub fn get_or_compute(&mut self, store: &ZoneStore, canvas: Option<CanvasSize>) -> &Segmentation {
        let key = CacheKey::new(store, canvas);
        if self.key != Some(key) {
            self.seg = segment(store.shapes(), canvas);
            self.key = Some(key);
        }
        &self.seg
    }
}
