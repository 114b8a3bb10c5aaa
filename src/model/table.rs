//! Table types.

use serde::{Deserialize, Serialize};

use super::{null_as_empty, BoundingBox, Point, TextSpan};

/// A table: an ordered set of cells found on a page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Table {
    /// Cells in extraction order
    #[serde(rename = "Cell", default, deserialize_with = "null_as_empty")]
    pub cells: Vec<Cell>,
}

impl Table {
    /// Create a table from cells.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if the table has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Smallest box enclosing every cell.
    pub fn bounds(&self) -> Option<BoundingBox> {
        let mut cells = self.cells.iter();
        let first = cells.next()?.bounds();
        Some(cells.fold(first, |acc, c| {
            let b = c.bounds();
            BoundingBox::new(
                Point::new(acc.min.x.min(b.min.x), acc.min.y.min(b.min.y)),
                Point::new(acc.max.x.max(b.max.x), acc.max.y.max(b.max.y)),
            )
        }))
    }
}

/// A table cell: a box and the text found inside it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Cell {
    /// Lower-left corner
    pub min: Point,

    /// Upper-right corner
    pub max: Point,

    /// Text spans inside the cell
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: Vec<TextSpan>,
}

impl Cell {
    /// Create an empty cell covering `bounds`.
    pub fn new(bounds: BoundingBox) -> Self {
        Self {
            min: bounds.min,
            max: bounds.max,
            text: Vec::new(),
        }
    }

    /// Set the cell text and return self.
    pub fn with_text(mut self, text: Vec<TextSpan>) -> Self {
        self.text = text;
        self
    }

    /// Cell bounding box.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(x0: f64, y0: f64, x1: f64, y1: f64) -> Cell {
        Cell::new(BoundingBox::new(Point::new(x0, y0), Point::new(x1, y1)))
    }

    #[test]
    fn test_table_bounds() {
        let table = Table::new(vec![cell(0.0, 0.0, 10.0, 10.0), cell(10.0, -5.0, 30.0, 8.0)]);
        let b = table.bounds().unwrap();
        assert_eq!(b.min, Point::new(0.0, -5.0));
        assert_eq!(b.max, Point::new(30.0, 10.0));
        assert!(Table::default().bounds().is_none());
    }

    #[test]
    fn test_cell_flattens_bounds() {
        let json = serde_json::to_value(cell(1.0, 2.0, 3.0, 4.0)).unwrap();
        assert_eq!(json["Min"]["X"], 1.0);
        assert_eq!(json["Max"]["Y"], 4.0);
        assert!(json["Text"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_cell_requires_bounds() {
        let result = serde_json::from_str::<Cell>(r#"{"Text":[]}"#);
        assert!(result.is_err());
    }
}
