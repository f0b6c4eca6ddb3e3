//! Scanline extraction of oncoplot grids from decoded RGB images.
//!
//! Detection is a naive sequential run-length scan: row boundaries are found
//! by walking a single fixed column downward and recording every change to a
//! new non-background color, then each detected row is walked left to right
//! the same way to collect its cell colors. There is no edge detection or
//! clustering, and color matching is exact — see the crate docs for the
//! resulting limitations.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::{RgbImage, imageops};
use tracing::debug;

use crate::color::hex_from_rgb;
use crate::error::{OncoplotError, Result};
use crate::grid::{ColorFrame, ColorGrid};
use crate::sheet::Sheet;

/// Extracts oncoplot data from an oncoplot image.
///
/// ```no_run
/// use oncoplot_extractor::OncoplotExtractor;
///
/// let mut oce = OncoplotExtractor::open("oncoplot.png")?
///     .with_corners((0, 0, 100, 100))
///     .with_background(vec!["#ffffff".into()]);
/// oce.extract()?;
/// oce.export_to_excel("oncoplot.xlsx")?;
/// # Ok::<(), oncoplot_extractor::OncoplotError>(())
/// ```
#[derive(Debug)]
pub struct OncoplotExtractor {
    path: PathBuf,
    img: RgbImage,
    corners: Option<(u32, u32, u32, u32)>,
    background: Vec<String>,
    gene_list: Option<Vec<String>>,
    padding_left: u32,
    grid: ColorGrid,
}

impl OncoplotExtractor {
    /// Open an oncoplot image for extraction. Fails before any decode is
    /// attempted when `path` is not a regular file; otherwise eagerly decodes
    /// to an RGB buffer (alpha is composited away).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(OncoplotError::FileNotFound(path.to_path_buf()));
        }
        let img = image::open(path)?.to_rgb8();
        debug!(path = %path.display(), width = img.width(), height = img.height(), "decoded oncoplot image");
        Ok(Self {
            path: path.to_path_buf(),
            img,
            corners: None,
            background: vec!["#ffffff".to_string()],
            gene_list: None,
            padding_left: 0,
            grid: ColorGrid::new(),
        })
    }

    /// Crop bounds `(x1, y1, x2, y2)` — top-left inclusive, bottom-right
    /// exclusive — applied lazily at extraction time.
    pub fn with_corners(mut self, corners: (u32, u32, u32, u32)) -> Self {
        self.corners = Some(corners);
        self
    }

    /// Replace the background color list (default `["#ffffff"]`). Colors in
    /// this list are never emitted as points of interest.
    pub fn with_background(mut self, colors: Vec<String>) -> Self {
        self.background = colors;
        self
    }

    /// Gene names used to label output rows; positional, never consulted by
    /// the extraction logic itself.
    pub fn with_gene_list(mut self, genes: Vec<String>) -> Self {
        self.gene_list = Some(genes);
        self
    }

    /// Number of pixels to skip from the left edge when scanning for row
    /// boundaries (default 0).
    pub fn with_padding_left(mut self, padding_left: u32) -> Self {
        self.padding_left = padding_left;
        self
    }

    /// Path this extractor was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run the scanline pass and populate the grid.
    ///
    /// If crop corners are set the working image is replaced by the crop
    /// first, so a second call crops again — treat the extractor as
    /// single-use per extraction pass.
    pub fn extract(&mut self) -> Result<()> {
        if let Some((x1, y1, x2, y2)) = self.corners {
            self.img = imageops::crop_imm(&self.img, x1, y1, x2 - x1, y2 - y1).to_image();
            debug!(x1, y1, x2, y2, "cropped working image");
        }
        if self.padding_left >= self.img.width() {
            return Err(OncoplotError::PixelOutOfBounds { x: self.padding_left, y: 0 });
        }
        let rows = self.extract_row_poi();
        debug!(rows = rows.len(), "detected row markers");
        for (index, y) in rows.into_iter().enumerate() {
            self.grid.insert_row(index, self.extract_col_poi(y));
        }
        Ok(())
    }

    /// Walk the padding column downward, recording each y where the color
    /// changes to a new non-background color. Consecutive same-color runs
    /// collapse to the run's start; rows whose marker pixel matches a
    /// background color are dropped.
    fn extract_row_poi(&self) -> Vec<u32> {
        let mut poi = Vec::new();
        let mut last: Option<String> = None;
        for y in 0..self.img.height() {
            let color = hex_from_rgb(self.img.get_pixel(self.padding_left, y));
            if last.as_deref() != Some(color.as_str()) {
                if !self.background.contains(&color) {
                    poi.push(y);
                }
                last = Some(color);
            }
        }
        poi
    }

    /// Walk image row `y` left to right, recording the color at each start of
    /// a run of new, non-background color.
    fn extract_col_poi(&self, y: u32) -> Vec<String> {
        let mut poi = Vec::new();
        let mut last: Option<String> = None;
        for x in 0..self.img.width() {
            let color = hex_from_rgb(self.img.get_pixel(x, y));
            if last.as_deref() != Some(color.as_str()) {
                if !self.background.contains(&color) {
                    poi.push(color.clone());
                }
                last = Some(color);
            }
        }
        poi
    }

    /// The extracted grid. Fails with a state error when `extract()` has not
    /// yet produced any rows.
    pub fn as_dict(&self) -> Result<&ColorGrid> {
        if self.grid.is_empty() {
            return Err(OncoplotError::NotExtracted);
        }
        Ok(&self.grid)
    }

    /// Tabular view of the grid, labeled with the gene list when one was
    /// supplied. Labels are positional; no length validation is performed.
    pub fn as_frame(&self) -> Result<ColorFrame> {
        Ok(ColorFrame::from_grid(self.as_dict()?, self.gene_list.clone()))
    }

    /// Write the tabular view to an unstyled spreadsheet, overwriting `path`.
    pub fn export_to_excel(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut sheet = Sheet::new();
        sheet.load_frame(&self.as_frame()?);
        sheet.save(path)
    }

    /// Write the raw grid as a JSON object (keys stringified), overwriting
    /// `path`.
    pub fn export_to_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let grid = self.as_dict()?;
        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer(file, grid)?;
        Ok(())
    }

    /// Hex color of the pixel at `(x, y)` in the working image.
    pub fn pixel_to_hex(&self, x: u32, y: u32) -> Result<String> {
        if x >= self.img.width() || y >= self.img.height() {
            return Err(OncoplotError::PixelOutOfBounds { x, y });
        }
        Ok(hex_from_rgb(self.img.get_pixel(x, y)))
    }

    /// The pixel at `(x, y)` wrapped as a single-element background list.
    pub fn background_color_at(&self, x: u32, y: u32) -> Result<Vec<String>> {
        Ok(vec![self.pixel_to_hex(x, y)?])
    }

    /// Replace the background list wholesale with the color sampled at
    /// `(x, y)`, so that pixel's color is filtered from later extraction.
    pub fn set_background_from_pixel(&mut self, x: u32, y: u32) -> Result<()> {
        self.background = self.background_color_at(x, y)?;
        Ok(())
    }

    /// Current background color list.
    pub fn background(&self) -> &[String] {
        &self.background
    }
}
