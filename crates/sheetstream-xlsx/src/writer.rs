//! Streaming XLSX writer

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use quick_xml::escape::escape;

use crate::error::{XlsxError, XlsxResult};
use crate::styles::XlsxStyleTable;
use crate::MAX_SHEET_NAME_LEN;
use sheetstream_core::cell::column_to_letters;
use sheetstream_core::{
    CellRect, CellValue, PageLayout, PageMargins, RowCell, SheetLayout, StreamEncoder, Style,
    StyleHandle, MAX_COLS, MAX_ROWS,
};

/// Characters Excel does not allow in sheet names
const INVALID_SHEET_NAME_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// Single-sheet XLSX encoder
///
/// Rows are rendered to `<sheetData>` as they are emitted and must arrive
/// in strictly increasing order. Style handles are cell format (xf)
/// indices; 0 is the default format.
#[derive(Debug)]
pub struct XlsxStreamWriter {
    sheet_name: String,
    styles: XlsxStyleTable,
    sheet_data: String,
    last_row: u32,
    max_col: u32,
    rows_written: usize,
    col_widths: Vec<(u32, u32, f64)>,
    merges: Vec<CellRect>,
    margins: Option<PageMargins>,
    layout: Option<PageLayout>,
    flushed: bool,
}

impl XlsxStreamWriter {
    /// Create a writer for a sheet with the given name
    pub fn new<S: Into<String>>(sheet_name: S) -> XlsxResult<Self> {
        let sheet_name = sheet_name.into();
        validate_sheet_name(&sheet_name)?;
        Ok(Self {
            sheet_name,
            styles: XlsxStyleTable::new(),
            sheet_data: String::new(),
            last_row: 0,
            max_col: 0,
            rows_written: 0,
            col_widths: Vec::new(),
            merges: Vec::new(),
            margins: None,
            layout: None,
            flushed: false,
        })
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Number of rows emitted so far
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Number of registered cell formats, the default one included
    pub fn style_count(&self) -> usize {
        self.styles.len()
    }

    pub fn is_flushed(&self) -> bool {
        self.flushed
    }

    /// Flush and write the package to a file path
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> XlsxResult<()> {
        let file = File::create(path)?;
        self.write(file)
    }

    fn write_cell(&mut self, col: u32, row: u32, cell: &RowCell) {
        let cell_ref = format!("{}{}", column_to_letters(col), row);
        let style_attr = if cell.style.is_none() {
            String::new()
        } else {
            format!(" s=\"{}\"", cell.style)
        };

        match &cell.value {
            CellValue::Number(n) => {
                self.sheet_data
                    .push_str(&format!("<c r=\"{}\"{}><v>{}</v></c>", cell_ref, style_attr, n));
            }
            CellValue::String(s) => {
                let space = if s.as_str().trim() != s.as_str() {
                    " xml:space=\"preserve\""
                } else {
                    ""
                };
                self.sheet_data.push_str(&format!(
                    "<c r=\"{}\"{} t=\"inlineStr\"><is><t{}>{}</t></is></c>",
                    cell_ref,
                    style_attr,
                    space,
                    escape(s.as_str())
                ));
            }
            CellValue::Boolean(b) => {
                self.sheet_data.push_str(&format!(
                    "<c r=\"{}\"{} t=\"b\"><v>{}</v></c>",
                    cell_ref,
                    style_attr,
                    u8::from(*b)
                ));
            }
            CellValue::Empty => {
                // Preserve style-only cells
                if !cell.style.is_none() {
                    self.sheet_data
                        .push_str(&format!("<c r=\"{}\"{}/>", cell_ref, style_attr));
                }
            }
        }
    }

    fn worksheet_xml(&self) -> String {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );

        if self.layout.map_or(false, |l| l.fits_to_page()) {
            content.push_str("\n    <sheetPr><pageSetUpPr fitToPage=\"1\"/></sheetPr>");
        }

        if self.last_row > 0 && self.max_col > 0 {
            content.push_str(&format!(
                "\n    <dimension ref=\"A1:{}{}\"/>",
                column_to_letters(self.max_col),
                self.last_row
            ));
        }

        if !self.col_widths.is_empty() {
            content.push_str("\n    <cols>");
            for (min, max, width) in &self.col_widths {
                content.push_str(&format!(
                    "\n        <col min=\"{}\" max=\"{}\" width=\"{}\" customWidth=\"1\"/>",
                    min, max, width
                ));
            }
            content.push_str("\n    </cols>");
        }

        content.push_str("\n    <sheetData>");
        content.push_str(&self.sheet_data);
        content.push_str("\n    </sheetData>");

        if !self.merges.is_empty() {
            content.push_str(&format!("\n    <mergeCells count=\"{}\">", self.merges.len()));
            for range in &self.merges {
                content.push_str(&format!("\n        <mergeCell ref=\"{}\"/>", range));
            }
            content.push_str("\n    </mergeCells>");
        }

        let margins = self.margins.unwrap_or_default();
        if margins.center_horizontally || margins.center_vertically {
            content.push_str("\n    <printOptions");
            if margins.center_horizontally {
                content.push_str(" horizontalCentered=\"1\"");
            }
            if margins.center_vertically {
                content.push_str(" verticalCentered=\"1\"");
            }
            content.push_str("/>");
        }
        content.push_str(&format!(
            "\n    <pageMargins left=\"{}\" right=\"{}\" top=\"{}\" bottom=\"{}\" header=\"{}\" footer=\"{}\"/>",
            margins.left, margins.right, margins.top, margins.bottom, margins.header, margins.footer
        ));

        if let Some(layout) = &self.layout {
            content.push_str(&format!(
                "\n    <pageSetup paperSize=\"{}\" orientation=\"{}\"",
                layout.paper_size,
                layout.orientation.as_ooxml()
            ));
            if layout.fits_to_page() {
                content.push_str(&format!(
                    " fitToWidth=\"{}\" fitToHeight=\"{}\"",
                    layout.fit_to_width.unwrap_or(0),
                    layout.fit_to_height.unwrap_or(0)
                ));
            } else if layout.scale != 100 {
                content.push_str(&format!(" scale=\"{}\"", layout.scale));
            }
            if let Some(first) = layout.first_page_number {
                content.push_str(&format!(
                    " firstPageNumber=\"{}\" useFirstPageNumber=\"1\"",
                    first
                ));
            }
            if layout.black_and_white {
                content.push_str(" blackAndWhite=\"1\"");
            }
            content.push_str("/>");
        }

        content.push_str("\n</worksheet>");
        content
    }

    fn write_package<W: Write + Seek>(&self, writer: W) -> XlsxResult<()> {
        let mut zip = zip::ZipWriter::new(writer);
        let options = zip::write::SimpleFileOptions::default();

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
    <Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#,
        )?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#,
        )?;

        zip.start_file("xl/workbook.xml", options)?;
        let workbook = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>
        <sheet name="{}" sheetId="1" r:id="rId1"/>
    </sheets>
</workbook>"#,
            escape(self.sheet_name.as_str())
        );
        zip.write_all(workbook.as_bytes())?;

        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#,
        )?;

        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(self.styles.to_styles_xml().as_bytes())?;

        zip.start_file("xl/worksheets/sheet1.xml", options)?;
        zip.write_all(self.worksheet_xml().as_bytes())?;

        let mut writer = zip.finish()?;
        writer.flush()?;
        Ok(())
    }
}

fn validate_sheet_name(name: &str) -> XlsxResult<()> {
    let len = name.chars().count();
    if len == 0 || len > MAX_SHEET_NAME_LEN {
        return Err(XlsxError::InvalidSheetName(format!(
            "'{}' must be 1 to {} characters",
            name, MAX_SHEET_NAME_LEN
        )));
    }
    if let Some(c) = name.chars().find(|c| INVALID_SHEET_NAME_CHARS.contains(c)) {
        return Err(XlsxError::InvalidSheetName(format!(
            "'{}' contains '{}'",
            name, c
        )));
    }
    Ok(())
}

impl StreamEncoder for XlsxStreamWriter {
    type Error = XlsxError;

    fn new_style(&mut self, style: &Style) -> XlsxResult<StyleHandle> {
        Ok(StyleHandle::new(self.styles.push(style)))
    }

    fn set_row(&mut self, row: u32, cells: &[Option<RowCell>]) -> XlsxResult<()> {
        if self.flushed {
            return Err(XlsxError::Flushed);
        }
        if row <= self.last_row {
            return Err(XlsxError::RowOrder {
                row,
                previous: self.last_row,
            });
        }
        if row > MAX_ROWS || cells.len() > MAX_COLS as usize {
            return Err(XlsxError::OutOfRange {
                col: cells.len() as u32,
                row,
            });
        }

        self.sheet_data.push_str(&format!("\n        <row r=\"{}\">", row));
        for (i, cell) in cells.iter().enumerate() {
            if let Some(cell) = cell {
                self.write_cell(i as u32 + 1, row, cell);
            }
        }
        self.sheet_data.push_str("</row>");

        self.last_row = row;
        self.max_col = self.max_col.max(cells.len() as u32);
        self.rows_written += 1;
        log::trace!("xlsx row {} with {} columns", row, cells.len());
        Ok(())
    }

    fn flush(&mut self) -> XlsxResult<()> {
        if !self.flushed {
            log::debug!(
                "flushing sheet '{}': {} rows, {} cell formats",
                self.sheet_name,
                self.rows_written,
                self.styles.len()
            );
        }
        self.flushed = true;
        Ok(())
    }

    fn write<W: Write + Seek>(&mut self, target: W) -> XlsxResult<()> {
        self.flush()?;
        self.write_package(target)
    }
}

impl SheetLayout for XlsxStreamWriter {
    fn set_col_width(&mut self, min_col: u32, max_col: u32, width: f64) -> XlsxResult<()> {
        if min_col == 0 || max_col > MAX_COLS || min_col > max_col {
            return Err(XlsxError::OutOfRange {
                col: if min_col == 0 { min_col } else { max_col },
                row: 0,
            });
        }
        self.col_widths.push((min_col, max_col, width));
        Ok(())
    }

    fn merge_cells(&mut self, rect: CellRect) -> XlsxResult<()> {
        self.merges.push(rect);
        Ok(())
    }

    fn set_page_margins(&mut self, margins: PageMargins) -> XlsxResult<()> {
        self.margins = Some(margins);
        Ok(())
    }

    fn set_page_layout(&mut self, layout: PageLayout) -> XlsxResult<()> {
        self.layout = Some(layout);
        Ok(())
    }

    fn page_layout(&self) -> PageLayout {
        self.layout.unwrap_or_default()
    }
}
