//! sheetstream CLI - build styled XLSX sheets from CSV

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sheetstream::prelude::*;

#[derive(Parser)]
#[command(name = "sheetstream")]
#[command(author, version, about = "Build styled spreadsheets from CSV")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a CSV file to a styled XLSX sheet
    Convert {
        /// Input CSV file ("-" for stdin)
        input: PathBuf,

        /// Output XLSX file
        #[arg(short, long)]
        output: PathBuf,

        /// Field delimiter
        #[arg(short, long, default_value = ",", value_parser = parse_delimiter)]
        delimiter: u8,

        /// Treat the first record as a header (bold, medium bottom border)
        #[arg(long)]
        header: bool,

        /// Draw a grid over the data with this line style (thin, medium, dashed, ...)
        #[arg(long, value_parser = parse_line)]
        grid: Option<BorderLineStyle>,

        /// Width of every data column
        #[arg(short, long)]
        width: Option<f64>,

        /// Worksheet name
        #[arg(long, default_value = "Sheet1")]
        sheet: String,
    },

    /// Load a CSV file through the builder and print the dense grid
    Grid {
        /// Input CSV file ("-" for stdin)
        input: PathBuf,

        /// Field delimiter for input and output
        #[arg(short, long, default_value = ",", value_parser = parse_delimiter)]
        delimiter: u8,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            delimiter,
            header,
            grid,
            width,
            sheet,
        } => convert(&input, &output, delimiter, header, grid, width, &sheet),
        Commands::Grid { input, delimiter } => print_grid(&input, delimiter),
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();
}

fn parse_delimiter(s: &str) -> std::result::Result<u8, String> {
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ if s == "\\t" => Ok(b'\t'),
        _ => Err(format!("delimiter must be a single ASCII character, got '{s}'")),
    }
}

fn parse_line(s: &str) -> std::result::Result<BorderLineStyle, String> {
    match BorderLineStyle::from_ooxml(s) {
        Some(BorderLineStyle::None) | None => Err(format!("unknown border line style '{s}'")),
        Some(line) => Ok(line),
    }
}

/// Numbers become numeric cells, everything else stays text
fn parse_field(field: &str) -> CellValue {
    if field.is_empty() {
        return CellValue::Empty;
    }
    match field.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::from(field),
    }
}

fn read_input(input: &Path) -> Result<String> {
    let mut content = String::new();
    if input == Path::new("-") {
        io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
    } else {
        File::open(input)
            .and_then(|mut f| f.read_to_string(&mut content))
            .with_context(|| format!("Failed to read '{}'", input.display()))?;
    }
    Ok(content)
}

/// Schedule one background write per non-empty field
///
/// Returns the number of records and the widest record.
fn load_csv<E: StreamEncoder + 'static>(
    builder: &SheetBuilder<E>,
    content: &str,
    delimiter: u8,
    header_style: Option<&Style>,
) -> Result<(u32, u32)> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = 0u32;
    let mut cols = 0u32;
    for (index, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Invalid CSV at record {}", index + 1))?;
        let row = u32::try_from(index + 1).context("Too many records")?;
        let style = if row == 1 { header_style.cloned() } else { None };

        for (col_index, field) in record.iter().enumerate() {
            let col = u32::try_from(col_index + 1).context("Too many columns")?;
            cols = cols.max(col);
            if field.is_empty() && style.is_none() {
                continue;
            }
            builder.set_cell_value_async(col, row, parse_field(field), style.clone(), false);
        }
        rows = row;
    }

    builder.wait().context("Failed to load cells")?;
    tracing::debug!(rows, cols, "loaded CSV");
    Ok((rows, cols))
}

fn convert(
    input: &Path,
    output: &Path,
    delimiter: u8,
    header: bool,
    grid: Option<BorderLineStyle>,
    width: Option<f64>,
    sheet: &str,
) -> Result<()> {
    let content = read_input(input)?;
    let builder = SheetBuilder::xlsx(sheet).context("Failed to create XLSX writer")?;

    let header_style = header.then(|| Style::new().bold());
    let (rows, cols) = load_csv(&builder, &content, delimiter, header_style.as_ref())?;
    if rows == 0 {
        bail!("'{}' contains no records", input.display());
    }

    if let Some(line) = grid {
        builder
            .set_border_range(1, 1, cols, rows, &BorderRange::grid(line, Color::BLACK), true)
            .context("Failed to draw grid")?;
    }
    if header {
        let rule = Style::with_border(BorderStyle::new().with_bottom(BorderLineStyle::Medium, Color::BLACK));
        builder
            .set_style_range(1, 1, cols, 1, &rule, true)
            .context("Failed to style header")?;
    }
    if let Some(width) = width {
        builder.set_col_width_range(1, cols, width)?;
    }

    let styles = builder.style_count();
    builder
        .save(output)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;

    tracing::info!(rows, cols, styles, "wrote sheet");
    eprintln!("Wrote {} rows x {} columns to '{}'", rows, cols, output.display());
    Ok(())
}

fn print_grid(input: &Path, delimiter: u8) -> Result<()> {
    let content = read_input(input)?;
    let builder = SheetBuilder::new(MemoryEncoder::new());
    load_csv(&builder, &content, delimiter, None)?;

    let options = CsvExportOptions {
        delimiter,
        ..CsvExportOptions::default()
    };
    builder
        .write_csv(io::stdout().lock(), &options)
        .context("Failed to write to stdout")?;
    Ok(())
}
