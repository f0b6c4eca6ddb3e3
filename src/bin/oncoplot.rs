use clap::Parser;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use oncoplot_extractor::{OncoplotCreator, OncoplotExtractor, StackPlotOptions};

/// Extract tabular color data from an oncoplot image and rebuild it as a
/// styled spreadsheet.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input oncoplot image path
    input: PathBuf,

    /// Crop rectangle as x1,y1,x2,y2 (top-left inclusive, bottom-right exclusive)
    #[arg(long)]
    corners: Option<String>,

    /// Comma-separated background colors excluded from extraction
    #[arg(short, long, default_value = "#ffffff")]
    background: String,

    /// Comma-separated gene names used to label output rows
    #[arg(short, long)]
    genes: Option<String>,

    /// Pixels to skip from the left edge when scanning for rows
    #[arg(long, default_value_t = 0)]
    padding_left: u32,

    /// Write the raw extracted grid to this JSON file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the styled oncoplot workbook to this xlsx file
    #[arg(short = 'o', long)]
    xlsx: Option<PathBuf>,

    /// Row display height for the styled workbook
    #[arg(long, default_value_t = 60.0)]
    cell_size: f64,

    /// Blank header rows inserted above the styled grid
    #[arg(long, default_value_t = 10)]
    offset: usize,

    /// Also overlay a stacked color-frequency summary
    #[arg(long)]
    stack: bool,

    /// Fixed baseline row for the stack plot (derived per column when omitted)
    #[arg(long)]
    stack_row: Option<i64>,

    /// First worksheet column of the stack plot
    #[arg(long, default_value_t = 2)]
    stack_column: i64,

    /// Comma-separated colors excluded from stacking
    #[arg(long)]
    filter_colors: Option<String>,
}

fn split_colors(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn split_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_corners(raw: &str) -> Result<(u32, u32, u32, u32)> {
    let parts: Vec<u32> = raw
        .split(',')
        .map(|s| s.trim().parse::<u32>().context("corner values must be integers"))
        .collect::<Result<_>>()?;
    match parts[..] {
        [x1, y1, x2, y2] => Ok((x1, y1, x2, y2)),
        _ => bail!("--corners expects exactly four values: x1,y1,x2,y2"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut extractor = OncoplotExtractor::open(&args.input)
        .with_context(|| format!("cannot open {}", args.input.display()))?
        .with_background(split_colors(&args.background))
        .with_padding_left(args.padding_left);
    if let Some(raw) = &args.corners {
        extractor = extractor.with_corners(parse_corners(raw)?);
    }
    if let Some(genes) = &args.genes {
        extractor = extractor.with_gene_list(split_names(genes));
    }

    extractor.extract().context("extraction failed")?;

    if let Some(path) = &args.json {
        extractor.export_to_json(path)?;
        println!("Saved grid → {}", path.display());
    }

    if let Some(path) = &args.xlsx {
        let mut creator = OncoplotCreator::new(extractor.as_frame()?)
            .with_cell_size(args.cell_size)
            .with_offset(args.offset);
        creator.gen_base_oncoplot();
        if args.stack {
            creator.gen_stack_plot(&StackPlotOptions {
                row_position: args.stack_row,
                column_position: args.stack_column,
                filter_colors: args.filter_colors.as_deref().map(split_colors).unwrap_or_default(),
            })?;
        }
        creator.save(path)?;
        println!("Saved oncoplot → {}", path.display());
    }

    if args.json.is_none() && args.xlsx.is_none() {
        let grid = extractor.as_dict()?;
        println!("{}", serde_json::to_string_pretty(grid)?);
    }

    Ok(())
}
