//! Builder and export options

use std::fmt;
use std::sync::Arc;

use sheetstream_core::BorderEdge;

/// Options for [`SheetBuilder`](crate::SheetBuilder)
#[derive(Clone, Default)]
pub struct BuilderOptions {
    /// Border drawn on every cell inside the bounds that has no explicit cell
    pub default_border: Option<BorderEdge>,
    /// Run background tasks on a dedicated pool with this many threads
    /// instead of the global rayon pool
    pub worker_threads: Option<usize>,
    /// Run background tasks on an existing pool (takes precedence over
    /// `worker_threads`)
    pub thread_pool: Option<Arc<rayon::ThreadPool>>,
}

impl BuilderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_border(mut self, edge: BorderEdge) -> Self {
        self.default_border = Some(edge);
        self
    }

    pub fn worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    pub fn thread_pool(mut self, pool: Arc<rayon::ThreadPool>) -> Self {
        self.thread_pool = Some(pool);
        self
    }
}

impl fmt::Debug for BuilderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderOptions")
            .field("default_border", &self.default_border)
            .field("worker_threads", &self.worker_threads)
            .field("thread_pool", &self.thread_pool.as_ref().map(|p| p.current_num_threads()))
            .finish()
    }
}

/// Options for CSV export of the string grid
#[derive(Debug, Clone)]
pub struct CsvExportOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Line terminator
    pub line_terminator: LineTerminator,
}

impl Default for CsvExportOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            line_terminator: LineTerminator::LF,
        }
    }
}

/// Line terminator type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTerminator {
    /// Unix-style (LF)
    LF,
    /// Windows-style (CRLF)
    CRLF,
}

impl LineTerminator {
    pub(crate) fn to_csv(self) -> csv::Terminator {
        match self {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
        }
    }
}
