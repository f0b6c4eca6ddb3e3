//! Spreadsheet reconstruction: turn a color frame back into a styled
//! oncoplot, with an optional stacked-bar summary built from per-column
//! color frequency counts.

use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::Result;
use crate::grid::ColorFrame;
use crate::sheet::{Cell, Sheet};

/// Options for [`OncoplotCreator::gen_stack_plot`].
#[derive(Debug, Clone)]
pub struct StackPlotOptions {
    /// Fixed baseline row for every stack. When unset, each column's baseline
    /// is one past its maximum color count, so stacks grow upward from one
    /// row below the tallest bar's top.
    pub row_position: Option<i64>,
    /// Worksheet column of the first stack; advances by one per frame column.
    pub column_position: i64,
    /// Colors excluded from stacking.
    pub filter_colors: Vec<String>,
}

impl Default for StackPlotOptions {
    fn default() -> Self {
        Self {
            row_position: None,
            column_position: 2,
            filter_colors: Vec::new(),
        }
    }
}

/// Builds a styled oncoplot workbook from a [`ColorFrame`].
///
/// ```no_run
/// use oncoplot_extractor::{ColorFrame, OncoplotCreator};
///
/// let frame = ColorFrame::new(vec![("0".into(), vec!["#ff0000".into()])]);
/// let mut opc = OncoplotCreator::new(frame);
/// opc.gen_base_oncoplot();
/// opc.save("oncoplot.xlsx")?;
/// # Ok::<(), oncoplot_extractor::OncoplotError>(())
/// ```
#[derive(Debug)]
pub struct OncoplotCreator {
    frame: ColorFrame,
    sheet: Sheet,
    cell_size: f64,
    offset: usize,
}

impl OncoplotCreator {
    /// Create a plotter over a fresh worksheet and load the frame into it:
    /// a header row with the column keys, then one worksheet row per frame
    /// row with its label in column 1 and color markers after. Styling is a
    /// separate explicit step.
    pub fn new(frame: ColorFrame) -> Self {
        Self::with_sheet(frame, Sheet::new())
    }

    /// Like [`OncoplotCreator::new`] but loading into a caller-supplied
    /// worksheet.
    pub fn with_sheet(frame: ColorFrame, mut sheet: Sheet) -> Self {
        sheet.load_frame(&frame);
        Self {
            frame,
            sheet,
            cell_size: 60.0,
            offset: 10,
        }
    }

    /// Display size applied to every row so cells render roughly square
    /// (default 60).
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Number of blank header rows inserted above the grid by
    /// [`OncoplotCreator::gen_base_oncoplot`] (default 10).
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// The worksheet in its current state.
    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    /// Generate the base oncoplot: insert the header offset, size every row,
    /// and transmute each color marker into a styled cell. The fill is taken
    /// from the marker's value as the value is cleared — a single state
    /// transition per cell. Labels and numbers pass through untouched.
    pub fn gen_base_oncoplot(&mut self) {
        self.sheet.insert_blank_rows(self.offset);
        for row in 1..=self.sheet.n_rows() {
            self.sheet.set_row_height(row, self.cell_size);
        }
        self.sheet.map_cells(|cell| match cell {
            Cell::Color(hex) => Cell::Styled { fill: hex },
            other @ (Cell::Empty | Cell::Text(_) | Cell::Number(_) | Cell::Styled { .. }) => other,
        });
    }

    /// Overlay a stacked bar plot built from per-column color frequencies.
    ///
    /// For each frame column, occurrences of each color are counted and
    /// placed as runs of styled cells walking upward (decrementing row) from
    /// the baseline, one worksheet column per frame column starting at
    /// `column_position`. Purely additive: cells already on the sheet are
    /// overwritten where touched, never cleared elsewhere.
    ///
    /// Fails with a bounds error naming the offending coordinates when a
    /// placement target walks off the worksheet.
    pub fn gen_stack_plot(&mut self, options: &StackPlotOptions) -> Result<()> {
        let mut column = options.column_position;
        for (key, values) in self.frame.columns() {
            let mut counts: IndexMap<&str, usize> = IndexMap::new();
            for value in values {
                *counts.entry(value.as_str()).or_insert(0) += 1;
            }
            let mut row = match options.row_position {
                Some(fixed) => fixed,
                None => counts.values().max().copied().unwrap_or(0) as i64 + 1,
            };
            debug!(key, column, baseline = row, colors = counts.len(), "stacking column");
            for (color, count) in &counts {
                if options.filter_colors.iter().any(|f| f == color) {
                    continue;
                }
                for _ in 0..*count {
                    self.sheet
                        .set_cell(row, column, Cell::Styled { fill: (*color).to_string() })?;
                    row -= 1;
                }
            }
            column += 1;
        }
        Ok(())
    }

    /// Serialize the workbook to `path`, overwriting unconditionally.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.sheet.save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OncoplotError;

    const RED: &str = "#ff0000";
    const BLUE: &str = "#0000ff";

    fn single_column_frame(values: &[&str]) -> ColorFrame {
        ColorFrame::new(vec![(
            "0".to_string(),
            values.iter().map(|s| s.to_string()).collect(),
        )])
    }

    fn styled(fill: &str) -> Cell {
        Cell::Styled { fill: fill.to_string() }
    }

    #[test]
    fn base_plot_offsets_sizes_and_styles() {
        let frame = single_column_frame(&[RED, BLUE]).with_index(vec!["TP53".into(), "KRAS".into()]);
        let mut opc = OncoplotCreator::new(frame).with_offset(2).with_cell_size(40.0);
        opc.gen_base_oncoplot();

        let sheet = opc.sheet();
        // 2 offset rows + header + 2 data rows
        assert_eq!(sheet.n_rows(), 5);
        assert_eq!(sheet.cell(3, 2), &Cell::Number(0.0));
        assert_eq!(sheet.cell(4, 1), &Cell::Text("TP53".into()));
        assert_eq!(sheet.cell(4, 2), &styled(RED));
        assert_eq!(sheet.cell(5, 2), &styled(BLUE));
        for row in 1..=5 {
            assert_eq!(sheet.row_height(row), Some(40.0));
        }
    }

    #[test]
    fn stack_with_fixed_baseline_places_runs_upward() {
        let frame = single_column_frame(&[RED, RED, RED, BLUE, BLUE]);
        let mut opc = OncoplotCreator::new(frame);
        let options = StackPlotOptions {
            row_position: Some(10),
            ..StackPlotOptions::default()
        };
        opc.gen_stack_plot(&options).unwrap();

        let sheet = opc.sheet();
        for row in [10, 9, 8] {
            assert_eq!(sheet.cell(row, 2), &styled(RED));
        }
        for row in [7, 6] {
            assert_eq!(sheet.cell(row, 2), &styled(BLUE));
        }
        // loaded frame markers below the stack are untouched
        assert_eq!(sheet.cell(5, 2), &Cell::Color(BLUE.into()));
    }

    #[test]
    fn derived_baseline_is_one_past_max_count() {
        let frame = single_column_frame(&[RED, RED, RED]);
        let mut opc = OncoplotCreator::new(frame);
        opc.gen_stack_plot(&StackPlotOptions::default()).unwrap();

        let sheet = opc.sheet();
        for row in [4, 3, 2] {
            assert_eq!(sheet.cell(row, 2), &styled(RED));
        }
        // header row above the stack is untouched
        assert_eq!(sheet.cell(1, 2), &Cell::Number(0.0));
    }

    #[test]
    fn filtered_colors_are_skipped() {
        let frame = single_column_frame(&[RED, RED, RED, BLUE, BLUE]);
        let mut opc = OncoplotCreator::new(frame);
        let options = StackPlotOptions {
            filter_colors: vec![RED.to_string()],
            ..StackPlotOptions::default()
        };
        opc.gen_stack_plot(&options).unwrap();

        let sheet = opc.sheet();
        assert_eq!(sheet.cell(4, 2), &styled(BLUE));
        assert_eq!(sheet.cell(3, 2), &styled(BLUE));
        assert_eq!(sheet.cell(2, 2), &Cell::Color(RED.into()));
    }

    #[test]
    fn walking_off_the_sheet_names_the_target() {
        // counts red:3, blue:2 with derived baseline 4: red takes rows 4..2,
        // blue takes row 1 and then targets row 0
        let frame = single_column_frame(&[RED, RED, RED, BLUE, BLUE]);
        let mut opc = OncoplotCreator::new(frame);
        let err = opc.gen_stack_plot(&StackPlotOptions::default()).unwrap_err();
        match err {
            OncoplotError::CellOutOfRange { row, column } => {
                assert_eq!((row, column), (0, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn stacks_advance_one_column_per_frame_column() {
        let frame = ColorFrame::new(vec![
            ("0".into(), vec![RED.to_string()]),
            ("1".into(), vec![BLUE.to_string(), BLUE.to_string()]),
        ]);
        let mut opc = OncoplotCreator::new(frame);
        let options = StackPlotOptions {
            row_position: Some(5),
            ..StackPlotOptions::default()
        };
        opc.gen_stack_plot(&options).unwrap();

        let sheet = opc.sheet();
        assert_eq!(sheet.cell(5, 2), &styled(RED));
        assert_eq!(sheet.cell(5, 3), &styled(BLUE));
        assert_eq!(sheet.cell(4, 3), &styled(BLUE));
    }
}
