//! # oncoplot_extractor
//!
//! Recovers tabular color data from rasterized oncoplot images (genes ×
//! samples grids where each cell's color encodes a mutation category) and
//! rebuilds such data as styled spreadsheets.
//!
//! The two halves are independent and share only the grid shape:
//!
//! - [`OncoplotExtractor`] scans a decoded RGB image with a sequential
//!   run-length pass and produces a [`ColorGrid`] of hex color codes.
//! - [`OncoplotCreator`] consumes a [`ColorFrame`] of hex colors and produces
//!   a styled workbook, optionally with a stacked-bar summary derived from
//!   per-column color frequency counts.
//!
//! ```no_run
//! use oncoplot_extractor::{OncoplotCreator, OncoplotExtractor};
//!
//! let mut oce = OncoplotExtractor::open("oncoplot.png")?
//!     .with_gene_list(vec!["TP53".into(), "KRAS".into()]);
//! oce.extract()?;
//! oce.export_to_json("oncoplot.json")?;
//!
//! let mut opc = OncoplotCreator::new(oce.as_frame()?);
//! opc.gen_base_oncoplot();
//! opc.save("oncoplot.xlsx")?;
//! # Ok::<(), oncoplot_extractor::OncoplotError>(())
//! ```
//!
//! Known limitations, inherited from the scanning strategy: color matching is
//! exact (anti-aliased or gradient edges surface as spurious distinct
//! colors), and row detection samples a single fixed column, so a row whose
//! color run does not intersect that column is silently missed.

pub mod color;
pub mod error;
pub mod extractor;
pub mod grid;
pub mod plotter;
pub mod sheet;

pub use error::{OncoplotError, Result};
pub use extractor::OncoplotExtractor;
pub use grid::{ColorFrame, ColorGrid};
pub use plotter::{OncoplotCreator, StackPlotOptions};
pub use sheet::{Cell, Sheet};
