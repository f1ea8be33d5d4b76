//! Style registry for deduplication
//!
//! Every distinct style is registered with the encoder exactly once; equal
//! styles share the encoder handle. The registry is safe to use from many
//! threads at once.

use std::fmt;
use std::sync::Arc;

use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::Style;
use crate::error::Result;

/// Opaque style identifier handed out by the encoder
///
/// `StyleHandle::NONE` (0) means "no style".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StyleHandle(u32);

impl StyleHandle {
    /// The "no style" sentinel
    pub const NONE: StyleHandle = StyleHandle(0);

    pub const fn new(raw: u32) -> Self {
        StyleHandle(raw)
    }

    /// Raw handle value
    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for StyleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Allocates encoder handles for styles the registry has not seen yet
pub trait StyleAllocator: Sync {
    fn allocate(&self, style: &Style) -> Result<StyleHandle>;
}

impl<F> StyleAllocator for F
where
    F: Fn(&Style) -> Result<StyleHandle> + Sync,
{
    fn allocate(&self, style: &Style) -> Result<StyleHandle> {
        self(style)
    }
}

/// A registered style and its handle
#[derive(Debug, Clone)]
pub struct StoredStyle {
    pub handle: StyleHandle,
    pub style: Arc<Style>,
}

/// Content-addressed style store
///
/// Keys are canonical styles (see [`Style::canonical`]); a reverse index
/// resolves handles back to their style for override merging.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    by_content: DashMap<Arc<Style>, StyleHandle, RandomState>,
    by_handle: DashMap<StyleHandle, StoredStyle, RandomState>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the handle of a style, allocating one on first sight
    ///
    /// `None` maps to [`StyleHandle::NONE`] without touching the allocator.
    /// Allocation errors are returned as-is and leave the registry
    /// unchanged. Concurrent callers interning the same new style observe a
    /// single allocation.
    pub fn intern(&self, style: Option<&Style>, alloc: &dyn StyleAllocator) -> Result<StyleHandle> {
        let Some(style) = style else {
            return Ok(StyleHandle::NONE);
        };
        let canonical = style.canonical();

        if let Some(handle) = self.by_content.get(&canonical) {
            return Ok(*handle);
        }

        match self.by_content.entry(Arc::new(canonical)) {
            Entry::Occupied(entry) => Ok(*entry.get()),
            Entry::Vacant(entry) => {
                let style = Arc::clone(entry.key());
                let handle = alloc.allocate(&style)?;
                log::debug!("registered style handle {handle}");
                self.by_handle.insert(handle, StoredStyle { handle, style });
                entry.insert(handle);
                Ok(handle)
            }
        }
    }

    /// Resolve a handle to its style
    pub fn lookup(&self, handle: StyleHandle) -> Option<Arc<Style>> {
        self.by_handle
            .get(&handle)
            .map(|stored| Arc::clone(&stored.style))
    }

    /// Number of distinct registered styles
    pub fn len(&self) -> usize {
        self.by_content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_content.is_empty()
    }

    /// Snapshot of all registered styles ordered by handle
    pub fn iter(&self) -> impl Iterator<Item = StoredStyle> {
        let mut stored: Vec<StoredStyle> = self
            .by_handle
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        stored.sort_by_key(|s| s.handle);
        stored.into_iter()
    }
}
