//! In-memory worksheet model and its xlsx serialization.
//!
//! Cells are an explicit tagged state rather than "string value means color":
//! a [`Cell::Color`] is the pre-styling marker left by loading a color frame,
//! and [`Cell::Styled`] is the post-styling state (solid fill, blank text,
//! thin white border applied at render time). Labels and numbers are never
//! touched by styling passes.

use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook};

use crate::color::hex_to_u32;
use crate::error::{OncoplotError, Result};
use crate::grid::ColorFrame;

/// Spreadsheet addressing limits, 1-based inclusive.
pub const MAX_ROWS: i64 = 1_048_576;
pub const MAX_COLS: i64 = 16_384;

/// A single worksheet cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Row/column label or other plain text, exempt from styling.
    Text(String),
    Number(f64),
    /// Pre-styling color marker holding its hex value as the cell value.
    Color(String),
    /// Post-styling state: solid fill, blank text, thin white border.
    Styled { fill: String },
}

#[derive(Debug, Clone, Default)]
struct Row {
    cells: Vec<Cell>,
    height: Option<f64>,
}

/// A single-sheet workbook model with 1-based cell addressing.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    rows: Vec<Row>,
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Append a row of cells below the current contents.
    pub fn append_row(&mut self, cells: Vec<Cell>) {
        self.rows.push(Row { cells, height: None });
    }

    /// Insert `count` blank rows at the top, shifting all contents down.
    pub fn insert_blank_rows(&mut self, count: usize) {
        for _ in 0..count {
            self.rows.insert(0, Row::default());
        }
    }

    /// Cell at 1-based (row, column); `Empty` when the address is unoccupied.
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        if row == 0 || column == 0 {
            return &Cell::Empty;
        }
        self.rows
            .get(row - 1)
            .and_then(|r| r.cells.get(column - 1))
            .unwrap_or(&Cell::Empty)
    }

    /// Place a cell at 1-based (row, column), growing the sheet as needed.
    /// Bounds are checked before any mutation; out-of-range targets name the
    /// offending coordinates.
    pub fn set_cell(&mut self, row: i64, column: i64, cell: Cell) -> Result<()> {
        if row < 1 || column < 1 || row > MAX_ROWS || column > MAX_COLS {
            return Err(OncoplotError::CellOutOfRange { row, column });
        }
        let (row, column) = (row as usize - 1, column as usize - 1);
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Row::default);
        }
        let cells = &mut self.rows[row].cells;
        if cells.len() <= column {
            cells.resize(column + 1, Cell::Empty);
        }
        cells[column] = cell;
        Ok(())
    }

    /// Set the display height of a 1-based row; rows beyond the current extent
    /// are ignored.
    pub fn set_row_height(&mut self, row: usize, height: f64) {
        if row >= 1 {
            if let Some(r) = self.rows.get_mut(row - 1) {
                r.height = Some(height);
            }
        }
    }

    pub fn row_height(&self, row: usize) -> Option<f64> {
        self.rows.get(row.checked_sub(1)?).and_then(|r| r.height)
    }

    /// Apply `f` to every cell, row by row. Used by styling passes.
    pub fn map_cells(&mut self, mut f: impl FnMut(Cell) -> Cell) {
        for row in &mut self.rows {
            for cell in &mut row.cells {
                *cell = f(std::mem::take(cell));
            }
        }
    }

    /// Load a color frame: header row with the column keys, then one row per
    /// frame row carrying its label in column 1 and color markers after.
    pub fn load_frame(&mut self, frame: &ColorFrame) {
        let mut header = vec![Cell::Empty];
        for (key, _) in frame.columns() {
            header.push(match key.parse::<f64>() {
                Ok(n) => Cell::Number(n),
                Err(_) => Cell::Text(key.to_string()),
            });
        }
        self.append_row(header);

        for r in 0..frame.n_rows() {
            let mut cells = vec![Cell::Text(frame.row_label(r))];
            for c in 0..frame.n_columns() {
                cells.push(match frame.value(r, c) {
                    Some(hex) => Cell::Color(hex.to_string()),
                    None => Cell::Empty,
                });
            }
            self.append_row(cells);
        }
    }

    /// Serialize to an xlsx workbook at `path`, overwriting unconditionally.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        for (r, row) in self.rows.iter().enumerate() {
            let r = r as u32;
            if let Some(height) = row.height {
                worksheet.set_row_height(r, height)?;
            }
            for (c, cell) in row.cells.iter().enumerate() {
                let c = c as u16;
                match cell {
                    Cell::Empty => {}
                    Cell::Text(text) => {
                        worksheet.write_string(r, c, text)?;
                    }
                    Cell::Number(n) => {
                        worksheet.write_number(r, c, *n)?;
                    }
                    Cell::Color(hex) => {
                        worksheet.write_string(r, c, hex)?;
                    }
                    Cell::Styled { fill } => {
                        let format = Format::new()
                            .set_background_color(Color::RGB(hex_to_u32(fill)?))
                            .set_border(FormatBorder::Thin)
                            .set_border_color(Color::RGB(0xffffff));
                        worksheet.write_blank(r, c, &format)?;
                    }
                }
            }
        }
        workbook.save(path.as_ref())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{ColorFrame, ColorGrid};

    #[test]
    fn set_cell_grows_sheet_and_reads_back() {
        let mut sheet = Sheet::new();
        sheet.set_cell(3, 2, Cell::Text("x".into())).unwrap();
        assert_eq!(sheet.n_rows(), 3);
        assert_eq!(sheet.cell(3, 2), &Cell::Text("x".into()));
        assert_eq!(sheet.cell(1, 1), &Cell::Empty);
    }

    #[test]
    fn out_of_range_targets_name_coordinates() {
        let mut sheet = Sheet::new();
        let err = sheet.set_cell(0, 2, Cell::Empty).unwrap_err();
        match err {
            OncoplotError::CellOutOfRange { row, column } => {
                assert_eq!((row, column), (0, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(sheet.set_cell(1, MAX_COLS + 1, Cell::Empty).is_err());
        assert_eq!(sheet.n_rows(), 0);
    }

    #[test]
    fn insert_blank_rows_shifts_contents_down() {
        let mut sheet = Sheet::new();
        sheet.append_row(vec![Cell::Color("#ff0000".into())]);
        sheet.insert_blank_rows(2);
        assert_eq!(sheet.cell(1, 1), &Cell::Empty);
        assert_eq!(sheet.cell(3, 1), &Cell::Color("#ff0000".into()));
    }

    #[test]
    fn load_frame_places_labels_and_markers() {
        let mut grid = ColorGrid::new();
        grid.insert_row(0, vec!["#ff0000".into(), "#0000ff".into()]);
        let frame = ColorFrame::from_grid(&grid, Some(vec!["TP53".into(), "KRAS".into()]));

        let mut sheet = Sheet::new();
        sheet.load_frame(&frame);
        assert_eq!(sheet.cell(1, 2), &Cell::Number(0.0));
        assert_eq!(sheet.cell(2, 1), &Cell::Text("TP53".into()));
        assert_eq!(sheet.cell(2, 2), &Cell::Color("#ff0000".into()));
        assert_eq!(sheet.cell(3, 2), &Cell::Color("#0000ff".into()));
    }

    #[test]
    fn save_writes_workbook_file() {
        let mut sheet = Sheet::new();
        sheet.append_row(vec![Cell::Styled { fill: "#ff0000".into() }]);
        sheet.set_row_height(1, 60.0);
        let path = std::env::temp_dir().join(format!("oncoplot_sheet_{}.xlsx", std::process::id()));
        sheet.save(&path).unwrap();
        assert!(path.is_file());
        let _ = std::fs::remove_file(&path);
    }
}
