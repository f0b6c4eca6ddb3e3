use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while extracting oncoplot data or rebuilding spreadsheets.
#[derive(Debug, Error)]
pub enum OncoplotError {
    /// Source path did not resolve to a regular file.
    #[error("file {0} does not exist")]
    FileNotFound(PathBuf),

    /// Image decode failure from the underlying codec.
    #[error("unable to decode image: {0}")]
    Image(#[from] image::ImageError),

    /// Data accessors were called before `extract()` produced any rows.
    #[error("no extracted data available; run extract() before exporting")]
    NotExtracted,

    /// A pixel coordinate fell outside the (possibly cropped) image.
    #[error("pixel coordinate ({x}, {y}) is outside the image")]
    PixelOutOfBounds { x: u32, y: u32 },

    /// A stack-plot target cell fell outside the worksheet's addressable bounds.
    /// Row is kept signed so a pointer that walked to 0 or below is reportable.
    #[error("cell position out of range: row={row}, column={column}")]
    CellOutOfRange { row: i64, column: i64 },

    /// A cell carried a color value that is not a 6-digit `#rrggbb` string.
    #[error("invalid hex color {0:?}")]
    InvalidHex(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, OncoplotError>;
