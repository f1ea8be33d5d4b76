//! Turning the cell store into encoder rows

use sheetstream_core::{CellStore, CellValue, RowCell, StreamEncoder, StyleHandle};

/// Emit every non-blank row of `store` to `encoder` in ascending order
///
/// Each row is a dense buffer of `max_col` slots. With a default style,
/// every slot starts as an empty cell carrying it and stored cells replace
/// their slot. Rows where every slot is unstyled and empty are skipped.
/// Returns the number of rows emitted.
pub(crate) fn materialize<E: StreamEncoder>(
    store: &CellStore,
    default_style: Option<StyleHandle>,
    encoder: &mut E,
) -> Result<usize, E::Error> {
    let bounds = store.bounds();
    let rows = store.snapshot();
    let default_cell = default_style
        .filter(|handle| !handle.is_none())
        .map(|handle| RowCell::new(handle, CellValue::Empty));

    log::debug!(
        "materializing {} cells within {} rows x {} columns",
        store.len(),
        bounds.max_row,
        bounds.max_col
    );

    let width = bounds.max_col as usize;
    let mut emitted = 0;
    for row in 1..=bounds.max_row {
        let stored = rows.get(&row);
        if stored.is_none() && default_cell.is_none() {
            continue;
        }

        let mut buffer = vec![default_cell.clone(); width];
        if let Some(cells) = stored {
            for (&col, cell) in cells {
                buffer[col as usize - 1] = Some(RowCell::new(cell.style, cell.value.clone()));
            }
        }

        let emit = buffer
            .iter()
            .flatten()
            .any(|cell| !cell.style.is_none() || !cell.value.is_empty());
        if !emit {
            log::trace!("skipping blank row {row}");
            continue;
        }

        log::trace!("emitting row {row}");
        encoder.set_row(row, &buffer)?;
        emitted += 1;
    }

    log::debug!("emitted {emitted} rows");
    Ok(emitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetstream_core::{CellCoord, MemoryEncoder, Result, Style};
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Sequence(AtomicU32);

    impl sheetstream_core::StyleAllocator for Sequence {
        fn allocate(&self, _style: &Style) -> Result<StyleHandle> {
            Ok(StyleHandle::new(self.0.fetch_add(1, Ordering::SeqCst) + 1))
        }
    }

    fn put(store: &CellStore, col: u32, row: u32, value: CellValue, style: Option<&Style>) {
        let alloc = Sequence(AtomicU32::new(0));
        store
            .set_value(CellCoord::new(col, row).unwrap(), value, style, false, false, &alloc)
            .unwrap();
    }

    #[test]
    fn test_empty_store_emits_nothing() {
        let mut encoder = MemoryEncoder::new();
        assert_eq!(materialize(&CellStore::new(), None, &mut encoder).unwrap(), 0);
        assert!(encoder.rows().is_empty());
    }

    #[test]
    fn test_rows_are_dense_and_ordered() {
        let store = CellStore::new();
        put(&store, 3, 2, CellValue::from("c2"), None);
        put(&store, 1, 4, CellValue::Number(4.0), None);
        put(&store, 1, 2, CellValue::from("a2"), None);

        let mut encoder = MemoryEncoder::new();
        assert_eq!(materialize(&store, None, &mut encoder).unwrap(), 2);

        let emitted: Vec<u32> = encoder.rows().iter().map(|(row, _)| *row).collect();
        assert_eq!(emitted, vec![2, 4]);
        assert_eq!(
            encoder.row(2).unwrap(),
            &[
                Some(RowCell::new(StyleHandle::NONE, CellValue::from("a2"))),
                None,
                Some(RowCell::new(StyleHandle::NONE, CellValue::from("c2"))),
            ]
        );
        assert_eq!(encoder.row(4).unwrap().len(), 3);
    }

    #[test]
    fn test_blank_stored_cells_do_not_make_a_row() {
        let store = CellStore::new();
        put(&store, 1, 1, CellValue::Empty, None);
        put(&store, 2, 2, CellValue::from("x"), None);

        let mut encoder = MemoryEncoder::new();
        assert_eq!(materialize(&store, None, &mut encoder).unwrap(), 1);
        assert!(encoder.row(1).is_none());
    }

    #[test]
    fn test_default_style_fills_every_row() {
        let store = CellStore::new();
        put(&store, 2, 3, CellValue::from("only"), None);
        let border = StyleHandle::new(7);

        let mut encoder = MemoryEncoder::new();
        assert_eq!(materialize(&store, Some(border), &mut encoder).unwrap(), 3);

        let default = Some(RowCell::new(border, CellValue::Empty));
        assert_eq!(encoder.row(1).unwrap(), &[default.clone(), default.clone()]);
        // the stored cell replaces the default, style included
        assert_eq!(
            encoder.row(3).unwrap(),
            &[default, Some(RowCell::new(StyleHandle::NONE, CellValue::from("only")))]
        );
    }

    #[test]
    fn test_styled_empty_cells_are_emitted() {
        let store = CellStore::new();
        put(&store, 1, 1, CellValue::Empty, Some(&Style::new().bold()));

        let mut encoder = MemoryEncoder::new();
        assert_eq!(materialize(&store, None, &mut encoder).unwrap(), 1);
        assert_eq!(encoder.row(1).unwrap()[0].as_ref().unwrap().style, StyleHandle::new(1));
    }

    #[test]
    fn test_encoder_error_is_returned() {
        let store = CellStore::new();
        put(&store, 1, 1, CellValue::Number(1.0), None);

        let mut encoder = MemoryEncoder::new();
        encoder.flush().unwrap();
        assert!(materialize(&store, None, &mut encoder).is_err());
    }
}
