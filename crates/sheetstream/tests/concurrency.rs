mod common;

use std::sync::Arc;

use common::{row_values, RejectRow};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sheetstream::prelude::*;

#[test]
fn test_async_and_sync_writes_are_all_kept() {
    let builder = SheetBuilder::new(MemoryEncoder::new());
    for row in 1..=200 {
        builder.set_cell_value_async(1, row, f64::from(row), None, false);
        builder.set_cell_style_async(2, row, Style::new().bold(), false);
    }
    // the sync call below waits for every task above
    builder
        .set_cell_value(3, 200, "last", None, false, false)
        .unwrap();

    assert_eq!(builder.bounds(), Bounds { max_row: 200, max_col: 3 });
    assert_eq!(builder.style_count(), 1);
    for row in 1..=200 {
        assert_eq!(builder.cell(1, row).unwrap().value, CellValue::Number(f64::from(row)));
    }

    let encoder = builder.finish().unwrap();
    assert_eq!(encoder.rows().len(), 200);
    assert_eq!(encoder.styles().len(), 1);
}

#[test]
fn test_concurrent_styles_on_one_cell_all_land() {
    let builder = SheetBuilder::new(MemoryEncoder::new());
    let sides = [
        BorderStyle::new().with_top(BorderLineStyle::Thin, Color::BLACK),
        BorderStyle::new().with_bottom(BorderLineStyle::Thin, Color::BLACK),
        BorderStyle::new().with_left(BorderLineStyle::Thin, Color::BLACK),
        BorderStyle::new().with_right(BorderLineStyle::Thin, Color::BLACK),
    ];
    for border in sides {
        builder.set_cell_style_async(4, 4, Style::with_border(border), true);
    }
    builder.wait().unwrap();

    let style = builder.style(builder.cell(4, 4).unwrap().style).unwrap();
    assert_eq!(style.border, BorderStyle::all(BorderLineStyle::Thin, Color::BLACK));
}

#[test]
fn test_async_ranges_on_disjoint_rectangles() {
    let builder = SheetBuilder::new(MemoryEncoder::new());
    let grid = BorderRange::grid(BorderLineStyle::Thin, Color::BLACK);
    for block in 0..10 {
        let top = block * 3 + 1;
        builder.set_border_range_async(1, top, 3, top + 2, grid, false);
        builder.set_style_range_async(5, top, 6, top + 2, Style::new().fill_color(Color::GRAY), false);
    }
    builder.wait().unwrap();

    assert_eq!(builder.bounds(), Bounds { max_row: 30, max_col: 6 });
    for row in 1..=30 {
        for col in [1, 2, 3, 5, 6] {
            assert!(builder.cell(col, row).is_some(), "missing cell {col},{row}");
        }
        assert!(builder.cell(4, row).is_none());
    }
}

#[test]
fn test_first_error_wins_and_sticks() {
    let builder = SheetBuilder::new(MemoryEncoder::new());
    builder.set_cell_value(1, 1, "taken", None, false, false).unwrap();

    for _ in 0..5 {
        builder.set_cell_value_async(1, 1, "again", None, false);
    }
    builder.set_cell_value_async(2, 1, "fine", None, false);

    let err = builder.wait().unwrap_err();
    assert!(err.is_value_conflict());
    assert!(builder.wait().unwrap_err().is_value_conflict());

    // the successful task ran regardless of the failures
    assert_eq!(builder.cell(2, 1).unwrap().value, CellValue::from("fine"));
    assert_eq!(builder.cell(1, 1).unwrap().value, CellValue::from("taken"));

    let err = builder.finish().unwrap_err();
    assert!(err.is_value_conflict());
}

#[test]
fn test_sync_call_inside_single_thread_pool() {
    let pool = Arc::new(rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap());
    let builder =
        SheetBuilder::with_options(MemoryEncoder::new(), BuilderOptions::new().thread_pool(Arc::clone(&pool)))
            .unwrap();

    pool.install(|| {
        builder.set_cell_value_async(1, 1, "queued", None, false);
        builder.set_cell_value(2, 1, "inline", None, false, false)
    })
    .unwrap();

    assert_eq!(builder.cell(1, 1).unwrap().value, CellValue::from("queued"));
    let encoder = builder.finish().unwrap();
    assert_eq!(row_values(&encoder, 1), vec!["queued", "inline"]);
}

#[test]
fn test_sync_call_inside_global_pool() {
    let builder = SheetBuilder::new(MemoryEncoder::new());
    rayon::scope(|_| {
        for row in 1..=20 {
            builder.set_cell_value_async(1, row, f64::from(row), None, false);
        }
        builder.set_cell_value(2, 20, "done", None, false, false).unwrap();
    });

    for row in 1..=20 {
        assert_eq!(builder.cell(1, row).unwrap().value, CellValue::from(f64::from(row)));
    }
}

#[test]
fn test_async_invalid_coordinate_reported_by_finish() {
    let builder = SheetBuilder::new(MemoryEncoder::new());
    builder.set_cell_value_async(1, 0, "nowhere", None, false);
    let err = builder.finish().unwrap_err();
    assert!(matches!(
        err.as_core(),
        Some(sheetstream_core::Error::InvalidCoordinate { col: 1, row: 0 })
    ));
}

#[test]
fn test_style_allocation_failure_surfaces() {
    let builder = SheetBuilder::new(MemoryEncoder::with_style_limit(1));
    builder.set_cell_style(1, 1, &Style::new().bold(), false).unwrap();
    let err = builder
        .set_cell_style(1, 2, &Style::new().fill_color(Color::RED), false)
        .unwrap_err();
    assert!(matches!(err.as_core(), Some(sheetstream_core::Error::Encoder(_))));
    assert_eq!(err.to_string(), "encoder error: style table is full (1 styles)");
    // nothing was stored for the rejected cell
    assert!(builder.cell(1, 2).is_none());
}

#[test]
fn test_row_failure_propagates_from_finish() {
    let builder = SheetBuilder::new(RejectRow::new(2));
    for row in 1..=3 {
        builder.set_cell_value(1, row, row, None, false, false).unwrap();
    }
    let err = builder.finish().unwrap_err();
    assert_eq!(err.to_string(), "encoder error: IO error: row 2 rejected");
}

#[test]
fn test_shared_pool_between_builders() {
    let pool = Arc::new(rayon::ThreadPoolBuilder::new().num_threads(3).build().unwrap());
    let a = SheetBuilder::with_options(MemoryEncoder::new(), BuilderOptions::new().thread_pool(Arc::clone(&pool))).unwrap();
    let b = SheetBuilder::with_options(MemoryEncoder::new(), BuilderOptions::new().thread_pool(pool)).unwrap();
    for row in 1..=50 {
        a.set_cell_value_async(1, row, "a", None, false);
        b.set_cell_value_async(2, row, "b", None, false);
    }
    let a = a.finish().unwrap();
    let b = b.finish().unwrap();
    assert_eq!(row_values(&a, 50), vec!["a"]);
    assert_eq!(row_values(&b, 50), vec!["", "b"]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_async_writes_to_distinct_cells_are_never_lost(
        coords in proptest::collection::hash_set((1u32..40, 1u32..40), 1..60)
    ) {
        let builder = SheetBuilder::new(MemoryEncoder::new());
        for &(col, row) in &coords {
            builder.set_cell_value_async(col, row, format!("{col}:{row}"), None, false);
        }
        builder.wait().unwrap();

        let max_col = coords.iter().map(|c| c.0).max().unwrap();
        let max_row = coords.iter().map(|c| c.1).max().unwrap();
        prop_assert_eq!(builder.bounds(), Bounds { max_row, max_col });
        for &(col, row) in &coords {
            prop_assert_eq!(
                builder.cell(col, row).map(|c| c.value),
                Some(CellValue::from(format!("{col}:{row}")))
            );
        }

        let grid = builder.string_grid().unwrap();
        let filled = grid.iter().flatten().filter(|s| !s.is_empty()).count();
        prop_assert_eq!(filled, coords.len());
    }
}
