//! The interchange shape shared by the extractor and the plotter: an ordered
//! grid of hex color sequences, plus the labeled tabular view built from it.

use indexmap::IndexMap;
use serde::Serialize;

/// Extracted oncoplot data: 0-based scan-order row index mapped to the ordered
/// sequence of distinct cell colors detected along that image row.
///
/// Keys are contiguous integers assigned in scan order; the map is freshly
/// allocated per extractor instance. JSON serialization stringifies the keys.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ColorGrid(IndexMap<usize, Vec<String>>);

impl ColorGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_row(&mut self, index: usize, colors: Vec<String>) {
        self.0.insert(index, colors);
    }

    pub fn get(&self, index: usize) -> Option<&[String]> {
        self.0.get(&index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rows in scan order.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.0.iter().map(|(k, v)| (*k, v.as_slice()))
    }
}

/// Tabular view of a [`ColorGrid`]: one frame column per grid row (keyed by the
/// stringified grid index), with an optional row-label index supplied by the
/// caller. Labels are positional and unvalidated against the grid's shape;
/// missing labels fall back to the row number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorFrame {
    columns: Vec<(String, Vec<String>)>,
    index: Option<Vec<String>>,
}

impl ColorFrame {
    pub fn new(columns: Vec<(String, Vec<String>)>) -> Self {
        Self { columns, index: None }
    }

    pub fn with_index(mut self, index: Vec<String>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn from_grid(grid: &ColorGrid, index: Option<Vec<String>>) -> Self {
        let columns = grid
            .rows()
            .map(|(k, colors)| (k.to_string(), colors.to_vec()))
            .collect();
        Self { columns, index }
    }

    /// Frame columns in insertion order as `(key, values)` pairs.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of frame rows: the longest column's length.
    pub fn n_rows(&self) -> usize {
        self.columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0)
    }

    /// Label for a frame row: the supplied index entry, or the row number when
    /// no index was supplied or the index is shorter than the frame.
    pub fn row_label(&self, row: usize) -> String {
        self.index
            .as_ref()
            .and_then(|labels| labels.get(row).cloned())
            .unwrap_or_else(|| row.to_string())
    }

    /// Value at (frame row, frame column), if the column reaches that row.
    pub fn value(&self, row: usize, column: usize) -> Option<&str> {
        self.columns
            .get(column)
            .and_then(|(_, v)| v.get(row))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> ColorGrid {
        let mut grid = ColorGrid::new();
        grid.insert_row(0, vec!["#ff0000".into(), "#00ff00".into()]);
        grid.insert_row(1, vec!["#0000ff".into()]);
        grid
    }

    #[test]
    fn grid_serializes_with_string_keys() {
        let json = serde_json::to_value(sample_grid()).unwrap();
        assert_eq!(json["0"][1], "#00ff00");
        assert_eq!(json["1"][0], "#0000ff");
    }

    #[test]
    fn frame_columns_follow_grid_scan_order() {
        let frame = ColorFrame::from_grid(&sample_grid(), None);
        let keys: Vec<&str> = frame.columns().map(|(k, _)| k).collect();
        assert_eq!(keys, ["0", "1"]);
        assert_eq!(frame.n_rows(), 2);
        assert_eq!(frame.value(1, 0), Some("#00ff00"));
        assert_eq!(frame.value(1, 1), None);
    }

    #[test]
    fn row_labels_fall_back_to_position() {
        let frame = ColorFrame::from_grid(&sample_grid(), Some(vec!["TP53".into()]));
        assert_eq!(frame.row_label(0), "TP53");
        assert_eq!(frame.row_label(1), "1");
    }
}
