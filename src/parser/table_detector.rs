//! Table detection from painted boxes (lattice mode).
//!
//! Every painted rectangle on a page is a cell candidate. Candidates that
//! touch or overlap are grouped into one table, frames that merely enclose
//! other cells are dropped, and each text span is moved into the smallest
//! cell containing its origin. Spans outside every cell stay free text.

use crate::model::{BoundingBox, Cell, Point, Table, TextSpan};

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum width and height of a cell (points)
    pub min_cell_size: f64,
    /// Gap still considered touching when grouping cells (points)
    pub join_tolerance: f64,
    /// Coordinates closer than this are treated as equal when sorting
    pub align_tolerance: f64,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_cell_size: 2.0,
            join_tolerance: 1.0,
            align_tolerance: 2.0,
        }
    }
}

/// Lattice table detector.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a detector with custom configuration.
    pub fn new(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Build tables from `boxes` and distribute `spans` into their cells.
    ///
    /// Returns the tables and the spans that fell outside every cell, both
    /// in a stable order: tables top to bottom, cells row by row.
    pub fn detect(&self, boxes: &[BoundingBox], spans: Vec<TextSpan>) -> (Vec<Table>, Vec<TextSpan>) {
        let cells = self.cell_candidates(boxes);
        if cells.is_empty() {
            return (Vec::new(), spans);
        }

        let mut groups = self.group(&cells);
        for group in &mut groups {
            self.sort_reading_order(group);
        }
        groups.sort_by(|a, b| self.compare_boxes(&group_bounds(a), &group_bounds(b)));

        let mut tables: Vec<Table> = groups
            .into_iter()
            .map(|group| Table::new(group.into_iter().map(Cell::new).collect()))
            .collect();

        let mut free = Vec::new();
        for span in spans {
            match span.origin().and_then(|p| smallest_cell_at(&tables, p)) {
                Some((t, c)) => tables[t].cells[c].text.push(span),
                None => free.push(span),
            }
        }

        log::debug!(
            "Detected {} table(s) with {} cell(s), {} free span(s)",
            tables.len(),
            tables.iter().map(Table::cell_count).sum::<usize>(),
            free.len()
        );

        (tables, free)
    }

    /// Filter, de-duplicate and drop enclosing frames.
    fn cell_candidates(&self, boxes: &[BoundingBox]) -> Vec<BoundingBox> {
        let min = self.config.min_cell_size;
        let mut cells: Vec<BoundingBox> = Vec::new();
        for b in boxes.iter().filter(|b| b.width() > min && b.height() > min) {
            // Fill and stroke of the same cell often paint the same rect twice.
            if !cells.iter().any(|c| self.same_box(c, b)) {
                cells.push(*b);
            }
        }

        let frames: Vec<bool> = cells
            .iter()
            .map(|outer| {
                cells
                    .iter()
                    .filter(|inner| !self.same_box(outer, inner) && self.encloses(outer, inner))
                    .count()
                    >= 2
            })
            .collect();

        cells
            .into_iter()
            .zip(frames)
            .filter_map(|(cell, is_frame)| (!is_frame).then_some(cell))
            .collect()
    }

    /// Group touching boxes (union-find over all pairs).
    fn group(&self, cells: &[BoundingBox]) -> Vec<Vec<BoundingBox>> {
        let mut parent: Vec<usize> = (0..cells.len()).collect();

        fn find(parent: &mut [usize], mut i: usize) -> usize {
            while parent[i] != i {
                parent[i] = parent[parent[i]];
                i = parent[i];
            }
            i
        }

        for i in 0..cells.len() {
            for j in (i + 1)..cells.len() {
                if self.touches(&cells[i], &cells[j]) {
                    let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                    if ri != rj {
                        parent[rj] = ri;
                    }
                }
            }
        }

        let mut groups: Vec<(usize, Vec<BoundingBox>)> = Vec::new();
        for (i, cell) in cells.iter().enumerate() {
            let root = find(&mut parent, i);
            match groups.iter_mut().find(|(r, _)| *r == root) {
                Some((_, group)) => group.push(*cell),
                None => groups.push((root, vec![*cell])),
            }
        }
        groups.into_iter().map(|(_, group)| group).collect()
    }

    /// Top row first (PDF y grows upward), then left to right.
    fn sort_reading_order(&self, cells: &mut [BoundingBox]) {
        cells.sort_by(|a, b| self.compare_boxes(a, b));
    }

    fn compare_boxes(&self, a: &BoundingBox, b: &BoundingBox) -> std::cmp::Ordering {
        let tol = self.config.align_tolerance;
        if (a.max.y - b.max.y).abs() > tol {
            b.max.y.total_cmp(&a.max.y)
        } else {
            a.min.x.total_cmp(&b.min.x)
        }
    }

    fn touches(&self, a: &BoundingBox, b: &BoundingBox) -> bool {
        let tol = self.config.join_tolerance;
        a.min.x <= b.max.x + tol
            && b.min.x <= a.max.x + tol
            && a.min.y <= b.max.y + tol
            && b.min.y <= a.max.y + tol
    }

    fn same_box(&self, a: &BoundingBox, b: &BoundingBox) -> bool {
        let tol = self.config.join_tolerance;
        (a.min.x - b.min.x).abs() <= tol
            && (a.min.y - b.min.y).abs() <= tol
            && (a.max.x - b.max.x).abs() <= tol
            && (a.max.y - b.max.y).abs() <= tol
    }

    fn encloses(&self, outer: &BoundingBox, inner: &BoundingBox) -> bool {
        let tol = self.config.join_tolerance;
        outer.min.x <= inner.min.x + tol
            && outer.min.y <= inner.min.y + tol
            && outer.max.x + tol >= inner.max.x
            && outer.max.y + tol >= inner.max.y
    }
}

fn group_bounds(cells: &[BoundingBox]) -> BoundingBox {
    cells
        .iter()
        .skip(1)
        .fold(cells.first().copied().unwrap_or_default(), |acc, c| {
            BoundingBox::from_corners(
                Point::new(acc.min.x.min(c.min.x), acc.min.y.min(c.min.y)),
                Point::new(acc.max.x.max(c.max.x), acc.max.y.max(c.max.y)),
            )
        })
}

/// (table index, cell index) of the smallest cell containing `p`.
fn smallest_cell_at(tables: &[Table], p: Point) -> Option<(usize, usize)> {
    tables
        .iter()
        .enumerate()
        .flat_map(|(t, table)| table.cells.iter().enumerate().map(move |(c, cell)| (t, c, cell)))
        .filter(|(_, _, cell)| cell.bounds().contains(p))
        .min_by(|a, b| a.2.bounds().area().total_cmp(&b.2.bounds().area()))
        .map(|(t, c, _)| (t, c))
}
