//! Concurrent cell storage
//!
//! [`CellStore`] maps coordinates to cells in a sharded map, so mutations
//! of different coordinates proceed in parallel while mutations of the same
//! coordinate serialize on that coordinate's entry. Styles are interned
//! while the entry is held; the lock order is always
//! cell entry -> style registry entry -> encoder.

use std::collections::BTreeMap;

use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;

use super::{CellCoord, CellRect, CellValue};
use crate::border_range::{classify, BorderRange};
use crate::error::{Error, Result};
use crate::style::{merge_styles, Style, StyleAllocator, StyleHandle, StyleRegistry};

/// Stored cell: style handle plus value
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    pub style: StyleHandle,
    pub value: CellValue,
}

impl Cell {
    /// True when the cell neither carries a style nor a value
    pub fn is_blank(&self) -> bool {
        self.style.is_none() && self.value.is_empty()
    }
}

/// Largest row and column touched so far (0 when nothing was touched)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub max_row: u32,
    pub max_col: u32,
}

impl Bounds {
    fn extend(&mut self, col: u32, row: u32) {
        self.max_col = self.max_col.max(col);
        self.max_row = self.max_row.max(row);
    }
}

/// Row-major ordered copy of the store: row -> column -> cell
pub type RowMap = BTreeMap<u32, BTreeMap<u32, Cell>>;

/// Concurrent coordinate -> cell map with bounds tracking and override checks
///
/// Every mutating call extends the bounds before it can fail, so bounds
/// reflect every coordinate a caller ever touched, including calls that
/// were rejected with a conflict.
#[derive(Debug, Default)]
pub struct CellStore {
    cells: DashMap<CellCoord, Cell, RandomState>,
    bounds: Mutex<Bounds>,
    registry: StyleRegistry,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell value, optionally with a style
    ///
    /// On an existing cell:
    /// - a non-empty value replacing a non-empty value requires
    ///   `override_value`, otherwise [`Error::ValueOverrideConflict`] is
    ///   returned and nothing changes;
    /// - an empty value never clears the stored one;
    /// - a style on a cell that already has one requires `override_style`
    ///   and is merged on top of it (see [`merge_styles`]).
    ///
    /// The value is committed before the style is checked, so a
    /// [`Error::StyleOverrideConflict`] (or an allocation error) still
    /// leaves the new value in place.
    pub fn set_value(
        &self,
        coord: CellCoord,
        value: CellValue,
        style: Option<&Style>,
        override_value: bool,
        override_style: bool,
        alloc: &dyn StyleAllocator,
    ) -> Result<()> {
        self.touch(coord);

        match self.cells.entry(coord) {
            Entry::Vacant(entry) => {
                let style = self.registry.intern(style, alloc)?;
                entry.insert(Cell { style, value });
                Ok(())
            }
            Entry::Occupied(mut entry) => {
                let cell = entry.get_mut();
                if !cell.value.is_empty() && !value.is_empty() && !override_value {
                    return Err(Error::ValueOverrideConflict {
                        col: coord.col,
                        row: coord.row,
                    });
                }
                if !value.is_empty() {
                    cell.value = value;
                }
                match style {
                    Some(style) => self.apply_style(cell, coord, style, override_style, alloc),
                    None => Ok(()),
                }
            }
        }
    }

    /// Set the style of a single cell, creating an empty cell if needed
    pub fn set_style(
        &self,
        coord: CellCoord,
        style: &Style,
        override_style: bool,
        alloc: &dyn StyleAllocator,
    ) -> Result<()> {
        self.touch(coord);
        self.style_cell(coord, style, override_style, alloc)
    }

    /// Apply one style to every cell of `rect`
    ///
    /// Cells are visited in row-major order and the first error stops the
    /// walk; cells visited before it keep their new style.
    pub fn set_style_range(
        &self,
        rect: &CellRect,
        style: &Style,
        override_style: bool,
        alloc: &dyn StyleAllocator,
    ) -> Result<()> {
        self.touch(rect.end);
        for coord in rect.cells() {
            self.style_cell(coord, style, override_style, alloc)?;
        }
        Ok(())
    }

    /// Apply positional borders over `rect`
    ///
    /// Each cell gets the border set computed by [`classify`]; cells whose
    /// set is empty are skipped without creating a cell. Same error
    /// behaviour as [`CellStore::set_style_range`].
    pub fn set_border_range(
        &self,
        rect: &CellRect,
        range: &BorderRange,
        override_style: bool,
        alloc: &dyn StyleAllocator,
    ) -> Result<()> {
        self.touch(rect.end);
        for coord in rect.cells() {
            let border = classify(rect, coord, range);
            if border.is_empty() {
                continue;
            }
            self.style_cell(coord, &Style::with_border(border), override_style, alloc)?;
        }
        Ok(())
    }

    /// Copy of the cell at `coord`
    pub fn get(&self, coord: CellCoord) -> Option<Cell> {
        self.cells.get(&coord).map(|cell| cell.value().clone())
    }

    /// Current bounds
    pub fn bounds(&self) -> Bounds {
        *self.bounds.lock()
    }

    /// Number of stored cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major ordered copy of all stored cells
    ///
    /// Only consistent when no mutation runs concurrently.
    pub fn snapshot(&self) -> RowMap {
        let mut rows = RowMap::new();
        for entry in self.cells.iter() {
            let coord = *entry.key();
            rows.entry(coord.row)
                .or_default()
                .insert(coord.col, entry.value().clone());
        }
        rows
    }

    /// Style registry owned by this store
    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    fn touch(&self, coord: CellCoord) {
        self.bounds.lock().extend(coord.col, coord.row);
    }

    fn style_cell(
        &self,
        coord: CellCoord,
        style: &Style,
        override_style: bool,
        alloc: &dyn StyleAllocator,
    ) -> Result<()> {
        match self.cells.entry(coord) {
            Entry::Vacant(entry) => {
                let style = self.registry.intern(Some(style), alloc)?;
                entry.insert(Cell {
                    style,
                    value: CellValue::Empty,
                });
                Ok(())
            }
            Entry::Occupied(mut entry) => {
                self.apply_style(entry.get_mut(), coord, style, override_style, alloc)
            }
        }
    }

    fn apply_style(
        &self,
        cell: &mut Cell,
        coord: CellCoord,
        style: &Style,
        override_style: bool,
        alloc: &dyn StyleAllocator,
    ) -> Result<()> {
        let handle = if cell.style.is_none() {
            self.registry.intern(Some(style), alloc)?
        } else if override_style {
            self.override_style(cell.style, style, alloc)?
        } else {
            return Err(Error::StyleOverrideConflict {
                col: coord.col,
                row: coord.row,
            });
        };
        cell.style = handle;
        Ok(())
    }

    fn override_style(
        &self,
        origin: StyleHandle,
        overlay: &Style,
        alloc: &dyn StyleAllocator,
    ) -> Result<StyleHandle> {
        match self.registry.lookup(origin) {
            Some(origin) => {
                let merged = merge_styles(&origin, overlay);
                self.registry.intern(Some(&merged), alloc)
            }
            None => {
                log::debug!("style handle {origin} not registered here, using override as-is");
                self.registry.intern(Some(overlay), alloc)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{BorderLineStyle, BorderStyle, Color};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct Sequence(AtomicU32);

    impl StyleAllocator for Sequence {
        fn allocate(&self, _style: &Style) -> Result<StyleHandle> {
            Ok(StyleHandle::new(self.0.fetch_add(1, Ordering::SeqCst) + 1))
        }
    }

    fn at(col: u32, row: u32) -> CellCoord {
        CellCoord::new(col, row).unwrap()
    }

    fn thin_all() -> Style {
        Style::with_border(BorderStyle::all(BorderLineStyle::Thin, Color::BLACK))
    }

    #[test]
    fn test_new_cell() {
        let store = CellStore::new();
        let alloc = Sequence::default();
        store
            .set_value(at(2, 3), "a".into(), Some(&thin_all()), false, false, &alloc)
            .unwrap();

        let cell = store.get(at(2, 3)).unwrap();
        assert_eq!(cell.value, CellValue::string("a"));
        assert!(!cell.style.is_none());
        assert_eq!(store.bounds(), Bounds { max_row: 3, max_col: 2 });
    }

    #[test]
    fn test_value_override() {
        let store = CellStore::new();
        let alloc = Sequence::default();
        let c = at(1, 1);

        store.set_value(c, "first".into(), None, false, false, &alloc).unwrap();
        let err = store
            .set_value(c, "second".into(), None, false, false, &alloc)
            .unwrap_err();
        assert!(err.is_value_conflict());
        assert_eq!(store.get(c).unwrap().value, CellValue::string("first"));

        store.set_value(c, "second".into(), None, true, false, &alloc).unwrap();
        assert_eq!(store.get(c).unwrap().value, CellValue::string("second"));
    }

    #[test]
    fn test_empty_value_never_clears() {
        let store = CellStore::new();
        let alloc = Sequence::default();
        let c = at(1, 1);

        store.set_value(c, CellValue::Number(5.0), None, false, false, &alloc).unwrap();
        store
            .set_value(c, CellValue::Empty, None, false, false, &alloc)
            .unwrap();
        assert_eq!(store.get(c).unwrap().value, CellValue::Number(5.0));
    }

    #[test]
    fn test_value_on_styled_cell_is_not_a_conflict() {
        let store = CellStore::new();
        let alloc = Sequence::default();
        let c = at(4, 4);

        store.set_style(c, &thin_all(), false, &alloc).unwrap();
        store.set_value(c, "v".into(), None, false, false, &alloc).unwrap();

        let cell = store.get(c).unwrap();
        assert_eq!(cell.value, CellValue::string("v"));
        assert_eq!(store.registry().lookup(cell.style).as_deref(), Some(&thin_all()));
    }

    #[test]
    fn test_style_override_conflict_keeps_value() {
        let store = CellStore::new();
        let alloc = Sequence::default();
        let c = at(1, 1);

        store
            .set_value(c, "old".into(), Some(&thin_all()), false, false, &alloc)
            .unwrap();
        let before = store.get(c).unwrap().style;

        let err = store
            .set_value(c, "new".into(), Some(&Style::new().bold()), true, false, &alloc)
            .unwrap_err();
        assert!(err.is_style_conflict());

        let cell = store.get(c).unwrap();
        assert_eq!(cell.value, CellValue::string("new"));
        assert_eq!(cell.style, before);
    }

    #[test]
    fn test_style_merge_on_override() {
        let store = CellStore::new();
        let alloc = Sequence::default();
        let c = at(2, 2);

        store.set_style(c, &thin_all(), false, &alloc).unwrap();
        let dashed_top = Style::with_border(
            BorderStyle::new().with_top(BorderLineStyle::Dashed, Color::BLACK),
        );
        store.set_style(c, &dashed_top, true, &alloc).unwrap();

        let style = store.registry().lookup(store.get(c).unwrap().style).unwrap();
        assert_eq!(
            style.border,
            BorderStyle::all(BorderLineStyle::Thin, Color::BLACK)
                .with_top(BorderLineStyle::Dashed, Color::BLACK)
        );
    }

    #[test]
    fn test_style_on_unstyled_cell_interns_directly() {
        let store = CellStore::new();
        let alloc = Sequence::default();
        let c = at(1, 2);

        store.set_value(c, CellValue::Number(1.0), None, false, false, &alloc).unwrap();
        store.set_style(c, &thin_all(), false, &alloc).unwrap();
        assert!(!store.get(c).unwrap().style.is_none());
    }

    #[test]
    fn test_style_range_stops_at_first_conflict() {
        let store = CellStore::new();
        let alloc = Sequence::default();
        store.set_style(at(2, 1), &thin_all(), false, &alloc).unwrap();

        let rect = CellRect::new(1, 1, 3, 2).unwrap();
        let err = store
            .set_style_range(&rect, &Style::new().bold(), false, &alloc)
            .unwrap_err();
        assert!(err.is_style_conflict());

        // (1,1) was styled before the walk reached (2,1); nothing after it was
        assert!(store.get(at(1, 1)).is_some());
        assert!(store.get(at(3, 1)).is_none());
        assert!(store.get(at(1, 2)).is_none());
        assert_eq!(store.bounds(), Bounds { max_row: 2, max_col: 3 });
    }

    #[test]
    fn test_border_range_skips_empty_cells() {
        let store = CellStore::new();
        let alloc = Sequence::default();
        let rect = CellRect::new(1, 1, 3, 3).unwrap();
        let range = BorderRange::outline(BorderLineStyle::Medium, Color::BLACK);

        store.set_border_range(&rect, &range, false, &alloc).unwrap();
        assert!(store.get(at(2, 2)).is_none());
        assert_eq!(store.len(), 8);
        assert_eq!(store.bounds(), Bounds { max_row: 3, max_col: 3 });
    }

    #[test]
    fn test_snapshot_is_row_major() {
        let store = CellStore::new();
        let alloc = Sequence::default();
        for (col, row) in [(3, 2), (1, 2), (2, 1)] {
            store
                .set_value(at(col, row), format!("{col}-{row}").into(), None, false, false, &alloc)
                .unwrap();
        }

        let order: Vec<(u32, u32)> = store
            .snapshot()
            .iter()
            .flat_map(|(row, cols)| cols.keys().map(move |col| (*row, *col)))
            .collect();
        assert_eq!(order, vec![(1, 2), (2, 1), (2, 3)]);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Value { col: u32, row: u32, over: bool },
        Style { col: u32, row: u32, over: bool },
        Range { col: u32, row: u32, w: u32, h: u32 },
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1u32..8, 1u32..8, any::<bool>()).prop_map(|(col, row, over)| Op::Value { col, row, over }),
            (1u32..8, 1u32..8, any::<bool>()).prop_map(|(col, row, over)| Op::Style { col, row, over }),
            (1u32..8, 1u32..8, 0u32..3, 0u32..3).prop_map(|(col, row, w, h)| Op::Range { col, row, w, h }),
        ]
    }

    proptest! {
        #[test]
        fn prop_bounds_cover_every_touched_coordinate(ops in proptest::collection::vec(op(), 1..40)) {
            let store = CellStore::new();
            let alloc = Sequence::default();
            let mut previous = Bounds::default();

            for op in ops {
                let (col, row) = match op {
                    Op::Value { col, row, over } => {
                        let _ = store.set_value(at(col, row), "x".into(), Some(&thin_all()), over, over, &alloc);
                        (col, row)
                    }
                    Op::Style { col, row, over } => {
                        let _ = store.set_style(at(col, row), &Style::new().bold(), over, &alloc);
                        (col, row)
                    }
                    Op::Range { col, row, w, h } => {
                        let rect = CellRect::new(col, row, col + w, row + h).unwrap();
                        let _ = store.set_style_range(&rect, &thin_all(), false, &alloc);
                        (col + w, row + h)
                    }
                };
                let bounds = store.bounds();
                prop_assert!(bounds.max_col >= col && bounds.max_row >= row);
                prop_assert!(bounds.max_col >= previous.max_col && bounds.max_row >= previous.max_row);
                previous = bounds;
            }
        }
    }
}
