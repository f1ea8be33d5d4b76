//! Builder session
//!
//! A [`SheetBuilder`] accumulates cells from the calling thread and from
//! background tasks, then materializes them into its encoder row by row.
//!
//! Every synchronous mutation and every export first waits for the
//! background tasks scheduled before it. Once a background task has
//! failed, that first error is returned from every later synchronous call
//! and export instead of running it; errors of later tasks are discarded.
//!
//! Synchronous calls may be made from inside the worker pool (for example
//! within `ThreadPool::install` or a parallel iterator): the waiting
//! thread runs queued tasks itself until its own tasks are done.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use sheetstream_core::{
    BorderLineStyle, BorderRange, BorderStyle, Bounds, Cell, CellCoord, CellRect, CellStore, CellValue,
    Color, PageLayout, PageMargins, SheetLayout, StreamEncoder, Style, StyleAllocator, StyleHandle,
};
use sheetstream_xlsx::XlsxStreamWriter;

use crate::error::{Error, Result};
use crate::materialize::materialize;
use crate::options::{BuilderOptions, CsvExportOptions};
use crate::tasks::TaskGroup;

/// State shared with background tasks
struct Shared<E> {
    store: CellStore,
    encoder: Mutex<E>,
}

impl<E: StreamEncoder> StyleAllocator for Shared<E> {
    fn allocate(&self, style: &Style) -> sheetstream_core::Result<StyleHandle> {
        self.encoder
            .lock()
            .new_style(style)
            .map_err(sheetstream_core::Error::encoder)
    }
}

/// Concurrent sheet builder over a streaming encoder
///
/// Cells may be set in any order, from the calling thread or through the
/// `*_async` methods. Nothing reaches the encoder's rows until
/// [`finish`](SheetBuilder::finish), [`write`](SheetBuilder::write) or
/// [`save`](SheetBuilder::save).
///
/// # Example
///
/// ```rust
/// use sheetstream::prelude::*;
///
/// let builder = SheetBuilder::new(MemoryEncoder::new());
/// builder.set_cell_value(1, 1, "Name", Some(&Style::new().bold()), false, false)?;
/// builder.set_cell_value_async(1, 2, 42.0, None, false);
/// builder.set_border_range(1, 1, 1, 2, &BorderRange::outline(BorderLineStyle::Thin, Color::BLACK), true)?;
///
/// let encoder = builder.finish()?;
/// assert_eq!(encoder.rows().len(), 2);
/// # Ok::<(), sheetstream::Error>(())
/// ```
pub struct SheetBuilder<E: StreamEncoder> {
    shared: Arc<Shared<E>>,
    tasks: TaskGroup,
    default_style: Option<StyleHandle>,
}

impl SheetBuilder<XlsxStreamWriter> {
    /// Builder writing a single XLSX worksheet named `sheet_name`
    pub fn xlsx(sheet_name: &str) -> Result<Self> {
        Ok(Self::new(XlsxStreamWriter::new(sheet_name)?))
    }
}

impl<E: StreamEncoder + 'static> SheetBuilder<E> {
    /// Create a builder with default options
    pub fn new(encoder: E) -> Self {
        Self {
            shared: Arc::new(Shared {
                store: CellStore::new(),
                encoder: Mutex::new(encoder),
            }),
            tasks: TaskGroup::default(),
            default_style: None,
        }
    }

    /// Create a builder with options
    pub fn with_options(encoder: E, options: BuilderOptions) -> Result<Self> {
        let pool = match (options.thread_pool, options.worker_threads) {
            (Some(pool), _) => Some(pool),
            (None, Some(threads)) => Some(Arc::new(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("sheetstream-{i}"))
                    .build()?,
            )),
            (None, None) => None,
        };

        let mut builder = Self::new(encoder);
        builder.tasks = TaskGroup::new(pool);
        if let Some(edge) = options.default_border {
            builder.set_default_border(edge.style, edge.color)?;
        }
        Ok(builder)
    }

    /// Draw a border on all four sides of every cell inside the bounds
    ///
    /// Stored cells keep their own style; the default only fills cells
    /// that were never set.
    pub fn set_default_border(&mut self, line: BorderLineStyle, color: Color) -> Result<()> {
        let style = Style::with_border(BorderStyle::all(line, color));
        let handle = self
            .shared
            .store
            .registry()
            .intern(Some(&style), &*self.shared)?;
        log::debug!("default border style is {handle}");
        self.default_style = Some(handle);
        Ok(())
    }

    /// Set the value of a cell, optionally with a style
    ///
    /// Replacing a non-empty value requires `override_value`; styling a
    /// cell that already has a style requires `override_style` and merges
    /// the new style on top of the old one.
    pub fn set_cell_value<V: Into<CellValue>>(
        &self,
        col: u32,
        row: u32,
        value: V,
        style: Option<&Style>,
        override_value: bool,
        override_style: bool,
    ) -> Result<()> {
        self.tasks.wait()?;
        let coord = CellCoord::new(col, row)?;
        self.shared.store.set_value(
            coord,
            value.into(),
            style,
            override_value,
            override_style,
            &*self.shared,
        )?;
        Ok(())
    }

    /// Background variant of [`set_cell_value`](Self::set_cell_value)
    ///
    /// Never overrides an existing value; a conflict is reported by the
    /// next barrier.
    pub fn set_cell_value_async<V: Into<CellValue>>(
        &self,
        col: u32,
        row: u32,
        value: V,
        style: Option<Style>,
        override_style: bool,
    ) {
        let shared = Arc::clone(&self.shared);
        let value = value.into();
        self.tasks.spawn(move || {
            let coord = CellCoord::new(col, row)?;
            shared
                .store
                .set_value(coord, value, style.as_ref(), false, override_style, &*shared)
        });
    }

    /// Set the style of a single cell
    pub fn set_cell_style(&self, col: u32, row: u32, style: &Style, override_style: bool) -> Result<()> {
        self.tasks.wait()?;
        let coord = CellCoord::new(col, row)?;
        self.shared
            .store
            .set_style(coord, style, override_style, &*self.shared)?;
        Ok(())
    }

    /// Background variant of [`set_cell_style`](Self::set_cell_style)
    pub fn set_cell_style_async(&self, col: u32, row: u32, style: Style, override_style: bool) {
        let shared = Arc::clone(&self.shared);
        self.tasks.spawn(move || {
            let coord = CellCoord::new(col, row)?;
            shared.store.set_style(coord, &style, override_style, &*shared)
        });
    }

    /// Apply a style to every cell of a rectangle
    ///
    /// Stops at the first conflicting cell; cells styled before it keep
    /// the new style.
    pub fn set_style_range(
        &self,
        start_col: u32,
        start_row: u32,
        end_col: u32,
        end_row: u32,
        style: &Style,
        override_style: bool,
    ) -> Result<()> {
        self.tasks.wait()?;
        let rect = CellRect::new(start_col, start_row, end_col, end_row)?;
        self.shared
            .store
            .set_style_range(&rect, style, override_style, &*self.shared)?;
        Ok(())
    }

    /// Background variant of [`set_style_range`](Self::set_style_range)
    pub fn set_style_range_async(
        &self,
        start_col: u32,
        start_row: u32,
        end_col: u32,
        end_row: u32,
        style: Style,
        override_style: bool,
    ) {
        let shared = Arc::clone(&self.shared);
        self.tasks.spawn(move || {
            let rect = CellRect::new(start_col, start_row, end_col, end_row)?;
            shared
                .store
                .set_style_range(&rect, &style, override_style, &*shared)
        });
    }

    /// Draw positional borders over a rectangle
    ///
    /// Outer cells get the matching outline edges, and `inside` is drawn
    /// between neighbouring cells.
    pub fn set_border_range(
        &self,
        start_col: u32,
        start_row: u32,
        end_col: u32,
        end_row: u32,
        range: &BorderRange,
        override_style: bool,
    ) -> Result<()> {
        self.tasks.wait()?;
        let rect = CellRect::new(start_col, start_row, end_col, end_row)?;
        self.shared
            .store
            .set_border_range(&rect, range, override_style, &*self.shared)?;
        Ok(())
    }

    /// Background variant of [`set_border_range`](Self::set_border_range)
    pub fn set_border_range_async(
        &self,
        start_col: u32,
        start_row: u32,
        end_col: u32,
        end_row: u32,
        range: BorderRange,
        override_style: bool,
    ) {
        let shared = Arc::clone(&self.shared);
        self.tasks.spawn(move || {
            let rect = CellRect::new(start_col, start_row, end_col, end_row)?;
            shared
                .store
                .set_border_range(&rect, &range, override_style, &*shared)
        });
    }

    /// Wait for all background tasks
    ///
    /// Returns the first error any background task of this builder
    /// reported, now and on every later call.
    pub fn wait(&self) -> Result<()> {
        self.tasks.wait()?;
        Ok(())
    }

    /// Number of background tasks still running
    pub fn pending_tasks(&self) -> usize {
        self.tasks.pending()
    }

    /// Current bounds (only settled after [`wait`](Self::wait))
    pub fn bounds(&self) -> Bounds {
        self.shared.store.bounds()
    }

    /// Copy of a stored cell
    pub fn cell(&self, col: u32, row: u32) -> Option<Cell> {
        let coord = CellCoord::new(col, row).ok()?;
        self.shared.store.get(coord)
    }

    /// Style registered under `handle`
    pub fn style(&self, handle: StyleHandle) -> Option<Arc<Style>> {
        self.shared.store.registry().lookup(handle)
    }

    /// Number of distinct styles registered so far
    pub fn style_count(&self) -> usize {
        self.shared.store.registry().len()
    }

    /// Values as a dense grid of strings
    ///
    /// One row per row of the bounds and one entry per column; cells
    /// without a value are empty strings. Booleans render as `true` and
    /// `false`, numbers in their shortest round-trip form.
    pub fn string_grid(&self) -> Result<Vec<Vec<String>>> {
        self.tasks.wait()?;
        let bounds = self.shared.store.bounds();
        let mut grid = vec![vec![String::new(); bounds.max_col as usize]; bounds.max_row as usize];
        for (row, cells) in self.shared.store.snapshot() {
            for (col, cell) in cells {
                if !cell.value.is_empty() {
                    grid[row as usize - 1][col as usize - 1] = grid_text(&cell.value);
                }
            }
        }
        Ok(grid)
    }

    /// Write the string grid as CSV
    pub fn write_csv<W: Write>(&self, writer: W, options: &CsvExportOptions) -> Result<()> {
        let grid = self.string_grid()?;
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(options.line_terminator.to_csv())
            .flexible(true)
            .from_writer(writer);
        for record in &grid {
            csv_writer.write_record(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Materialize all cells into the encoder and return it
    ///
    /// Waits for background tasks, emits the rows, then flushes the
    /// encoder.
    pub fn finish(self) -> Result<E> {
        self.tasks.wait()?;
        let shared = Arc::try_unwrap(self.shared).map_err(|_| Error::SessionShared)?;
        let mut encoder = shared.encoder.into_inner();
        materialize(&shared.store, self.default_style, &mut encoder)
            .map_err(sheetstream_core::Error::encoder)?;
        encoder.flush().map_err(sheetstream_core::Error::encoder)?;
        Ok(encoder)
    }

    /// Materialize and write the encoded document to `target`
    pub fn write<W: Write + Seek>(self, target: W) -> Result<()> {
        let mut encoder = self.finish()?;
        encoder
            .write(target)
            .map_err(sheetstream_core::Error::encoder)?;
        Ok(())
    }

    /// Materialize and write the encoded document to a file
    pub fn save<P: AsRef<Path>>(self, path: P) -> Result<()> {
        let path = path.as_ref();
        log::info!("saving sheet to {}", path.display());
        let file = File::create(path)?;
        self.write(BufWriter::new(file))
    }
}

/// Sheet-level settings forwarded to encoders that support them
impl<E: SheetLayout + 'static> SheetBuilder<E> {
    /// Set the width of one column
    pub fn set_col_width(&self, col: u32, width: f64) -> Result<()> {
        self.set_col_width_range(col, col, width)
    }

    /// Set the width of columns `min_col..=max_col`
    pub fn set_col_width_range(&self, min_col: u32, max_col: u32, width: f64) -> Result<()> {
        CellRect::new(min_col, 1, max_col, 1)?;
        self.with_encoder(|encoder| encoder.set_col_width(min_col, max_col, width))
    }

    /// Merge a rectangle of cells
    pub fn merge_cell(&self, start_col: u32, start_row: u32, end_col: u32, end_row: u32) -> Result<()> {
        let rect = CellRect::new(start_col, start_row, end_col, end_row)?;
        self.with_encoder(|encoder| encoder.merge_cells(rect))
    }

    pub fn set_page_margins(&self, margins: PageMargins) -> Result<()> {
        self.with_encoder(|encoder| encoder.set_page_margins(margins))
    }

    pub fn set_page_layout(&self, layout: PageLayout) -> Result<()> {
        self.with_encoder(|encoder| encoder.set_page_layout(layout))
    }

    pub fn page_layout(&self) -> PageLayout {
        self.shared.encoder.lock().page_layout()
    }

    fn with_encoder<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut E) -> std::result::Result<(), E::Error>,
    {
        let mut encoder = self.shared.encoder.lock();
        f(&mut encoder).map_err(sheetstream_core::Error::encoder)?;
        Ok(())
    }
}

fn grid_text(value: &CellValue) -> String {
    match value {
        CellValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}
