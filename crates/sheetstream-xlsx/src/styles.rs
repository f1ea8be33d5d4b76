//! Cell format table (styles.xml)

use ahash::AHashMap;
use quick_xml::escape::escape;

use sheetstream_core::style::{
    Alignment, BorderEdge, BorderStyle, Color, FillStyle, FontStyle, NumberFormat, PatternType,
    Protection, Style, Underline,
};

/// First id available for custom number formats
const FIRST_CUSTOM_NUMFMT_ID: u32 = 164;

/// Styles in registration order; the position is the cellXfs index
#[derive(Debug)]
pub(crate) struct XlsxStyleTable {
    styles: Vec<Style>,
}

#[derive(Debug, Clone, Copy)]
struct ResolvedXfIds {
    font_id: u32,
    fill_id: u32,
    border_id: u32,
    num_fmt_id: u32,
}

/// Insert-or-get for a component table
fn intern<K>(ids: &mut AHashMap<K, u32>, items: &mut Vec<K>, key: &K) -> u32
where
    K: Clone + Eq + std::hash::Hash,
{
    if let Some(&id) = ids.get(key) {
        return id;
    }
    let id = items.len() as u32;
    items.push(key.clone());
    ids.insert(key.clone(), id);
    id
}

impl XlsxStyleTable {
    pub(crate) fn new() -> Self {
        // xf 0 is the default format every unstyled cell uses
        Self {
            styles: vec![Style::default()],
        }
    }

    /// Append a style and return its xf index
    pub(crate) fn push(&mut self, style: &Style) -> u32 {
        self.styles.push(style.clone());
        (self.styles.len() - 1) as u32
    }

    /// Number of cell formats, the default one included
    pub(crate) fn len(&self) -> usize {
        self.styles.len()
    }

    pub(crate) fn to_styles_xml(&self) -> String {
        let mut fonts: Vec<FontStyle> = vec![FontStyle::default()];
        let mut font_ids: AHashMap<FontStyle, u32> = AHashMap::new();
        font_ids.insert(FontStyle::default(), 0);

        // Excel requires the first two fills to be: none and gray125
        let mut fills: Vec<FillStyle> = vec![
            FillStyle::None,
            FillStyle::pattern(PatternType::Gray125, Color::Auto, Color::Auto),
        ];
        let mut fill_ids: AHashMap<FillStyle, u32> = AHashMap::new();
        fill_ids.insert(FillStyle::None, 0);

        let mut borders: Vec<BorderStyle> = vec![BorderStyle::default()];
        let mut border_ids: AHashMap<BorderStyle, u32> = AHashMap::new();
        border_ids.insert(BorderStyle::default(), 0);

        let mut numfmt_ids: AHashMap<String, u32> = AHashMap::new();
        let mut numfmts: Vec<(u32, String)> = Vec::new();

        let resolved: Vec<ResolvedXfIds> = self
            .styles
            .iter()
            .map(|style| {
                let font = style.font.clone().unwrap_or_default();
                let font_id = intern(&mut font_ids, &mut fonts, &font);
                let fill_id = intern(&mut fill_ids, &mut fills, &style.fill);
                let border_id = intern(&mut border_ids, &mut borders, &style.border);

                let code = style
                    .number_format
                    .resolved_code(style.decimal_places, style.negative_red)
                    .or_else(|| match &style.number_format {
                        NumberFormat::Custom(code) => Some(code.clone()),
                        _ => None,
                    });
                let num_fmt_id = match (code, &style.number_format) {
                    (Some(code), _) => match numfmt_ids.get(&code) {
                        Some(&id) => id,
                        None => {
                            let id = FIRST_CUSTOM_NUMFMT_ID + numfmts.len() as u32;
                            numfmt_ids.insert(code.clone(), id);
                            numfmts.push((id, code));
                            id
                        }
                    },
                    (None, NumberFormat::BuiltIn(id)) => *id,
                    (None, _) => 0,
                };

                ResolvedXfIds {
                    font_id,
                    fill_id,
                    border_id,
                    num_fmt_id,
                }
            })
            .collect();

        let mut xml = String::new();
        xml.push_str(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if !numfmts.is_empty() {
            xml.push_str(&format!("\n  <numFmts count=\"{}\">", numfmts.len()));
            for (id, code) in &numfmts {
                xml.push_str(&format!(
                    "\n    <numFmt numFmtId=\"{}\" formatCode=\"{}\"/>",
                    id,
                    escape(code.as_str())
                ));
            }
            xml.push_str("\n  </numFmts>");
        }

        xml.push_str(&format!("\n  <fonts count=\"{}\">", fonts.len()));
        for font in &fonts {
            xml.push_str("\n    ");
            xml.push_str(&write_font(font));
        }
        xml.push_str("\n  </fonts>");

        xml.push_str(&format!("\n  <fills count=\"{}\">", fills.len()));
        for fill in &fills {
            xml.push_str("\n    ");
            xml.push_str(&write_fill(fill));
        }
        xml.push_str("\n  </fills>");

        xml.push_str(&format!("\n  <borders count=\"{}\">", borders.len()));
        for border in &borders {
            xml.push_str("\n    ");
            xml.push_str(&write_border(border));
        }
        xml.push_str("\n  </borders>");

        xml.push_str(
            r#"
  <cellStyleXfs count="1">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
  </cellStyleXfs>"#,
        );

        xml.push_str(&format!("\n  <cellXfs count=\"{}\">", self.styles.len()));
        for (style, ids) in self.styles.iter().zip(&resolved) {
            xml.push_str("\n    ");
            xml.push_str(&write_xf(style, *ids));
        }
        xml.push_str("\n  </cellXfs>");

        xml.push_str(
            r#"
  <cellStyles count="1">
    <cellStyle name="Normal" xfId="0" builtinId="0"/>
  </cellStyles>
  <dxfs count="0"/>
  <tableStyles count="0" defaultTableStyle="TableStyleMedium9" defaultPivotStyle="PivotStyleLight16"/>
</styleSheet>"#,
        );
        xml
    }
}

/// Color attributes (` rgb="FF000000"`, ` theme="1"`, ...)
fn color_attrs(color: &Color) -> String {
    match color {
        Color::Auto => " indexed=\"64\"".to_string(),
        Color::Rgb { .. } | Color::Argb { .. } => {
            format!(" rgb=\"{}\"", color.to_argb_hex().unwrap_or_default())
        }
        Color::Indexed(i) => format!(" indexed=\"{}\"", i),
        Color::Theme { index, tint: 0 } => format!(" theme=\"{}\"", index),
        Color::Theme { index, tint } => {
            format!(" theme=\"{}\" tint=\"{}\"", index, (*tint as f64) / 100.0)
        }
    }
}

fn write_font(font: &FontStyle) -> String {
    let mut s = String::from("<font>");
    if font.bold {
        s.push_str("<b/>");
    }
    if font.italic {
        s.push_str("<i/>");
    }
    if font.strikethrough {
        s.push_str("<strike/>");
    }
    match font.underline {
        Underline::None => {}
        Underline::Single => s.push_str("<u/>"),
        Underline::Double => s.push_str("<u val=\"double\"/>"),
        Underline::SingleAccounting => s.push_str("<u val=\"singleAccounting\"/>"),
        Underline::DoubleAccounting => s.push_str("<u val=\"doubleAccounting\"/>"),
    }
    s.push_str(&format!("<sz val=\"{}\"/>", font.size));
    if !font.color.is_auto() {
        s.push_str(&format!("<color{}/>", color_attrs(&font.color)));
    }
    s.push_str(&format!("<name val=\"{}\"/>", escape(font.name.as_str())));
    s.push_str("</font>");
    s
}

fn write_fill(fill: &FillStyle) -> String {
    match fill {
        FillStyle::None => "<fill><patternFill patternType=\"none\"/></fill>".to_string(),
        FillStyle::Solid { color } => format!(
            "<fill><patternFill patternType=\"solid\"><fgColor{}/><bgColor indexed=\"64\"/></patternFill></fill>",
            color_attrs(color)
        ),
        FillStyle::Pattern {
            pattern,
            foreground,
            background,
        } => format!(
            "<fill><patternFill patternType=\"{}\"><fgColor{}/><bgColor{}/></patternFill></fill>",
            pattern.as_ooxml(),
            color_attrs(foreground),
            color_attrs(background)
        ),
    }
}

fn write_border_edge(tag: &str, edge: Option<BorderEdge>) -> String {
    match edge.and_then(|e| e.style.as_ooxml().map(|name| (name, e.color))) {
        None => format!("<{tag}/>"),
        Some((name, color)) => {
            format!("<{tag} style=\"{name}\"><color{}/></{tag}>", color_attrs(&color))
        }
    }
}

fn write_border(border: &BorderStyle) -> String {
    let mut s = String::from("<border>");
    s.push_str(&write_border_edge("left", border.left));
    s.push_str(&write_border_edge("right", border.right));
    s.push_str(&write_border_edge("top", border.top));
    s.push_str(&write_border_edge("bottom", border.bottom));
    s.push_str("<diagonal/>");
    s.push_str("</border>");
    s
}

fn write_alignment(al: &Alignment) -> String {
    let default = Alignment::default();
    if al == &default {
        return String::new();
    }

    let mut s = String::from("<alignment");
    if al.horizontal != default.horizontal {
        s.push_str(&format!(" horizontal=\"{}\"", al.horizontal.as_ooxml()));
    }
    if al.vertical != default.vertical {
        s.push_str(&format!(" vertical=\"{}\"", al.vertical.as_ooxml()));
    }
    if al.wrap_text {
        s.push_str(" wrapText=\"1\"");
    }
    if al.shrink_to_fit {
        s.push_str(" shrinkToFit=\"1\"");
    }
    if al.indent != 0 {
        s.push_str(&format!(" indent=\"{}\"", al.indent));
    }
    if al.rotation != 0 {
        s.push_str(&format!(" textRotation=\"{}\"", al.rotation));
    }
    s.push_str("/>");
    s
}

fn write_protection(p: &Protection) -> String {
    let default = Protection::default();
    if p == &default {
        return String::new();
    }
    let mut s = String::from("<protection");
    if p.locked != default.locked {
        s.push_str(&format!(" locked=\"{}\"", u8::from(p.locked)));
    }
    if p.hidden != default.hidden {
        s.push_str(&format!(" hidden=\"{}\"", u8::from(p.hidden)));
    }
    s.push_str("/>");
    s
}

fn write_xf(style: &Style, ids: ResolvedXfIds) -> String {
    let mut attrs = String::new();
    if ids.num_fmt_id != 0 {
        attrs.push_str(" applyNumberFormat=\"1\"");
    }
    if ids.font_id != 0 {
        attrs.push_str(" applyFont=\"1\"");
    }
    if ids.fill_id != 0 {
        attrs.push_str(" applyFill=\"1\"");
    }
    if ids.border_id != 0 {
        attrs.push_str(" applyBorder=\"1\"");
    }

    let alignment_xml = style.alignment.as_ref().map(write_alignment).unwrap_or_default();
    let protection_xml = style.protection.as_ref().map(write_protection).unwrap_or_default();
    if !alignment_xml.is_empty() {
        attrs.push_str(" applyAlignment=\"1\"");
    }
    if !protection_xml.is_empty() {
        attrs.push_str(" applyProtection=\"1\"");
    }

    let mut s = format!(
        "<xf numFmtId=\"{}\" fontId=\"{}\" fillId=\"{}\" borderId=\"{}\" xfId=\"0\"{}",
        ids.num_fmt_id, ids.font_id, ids.fill_id, ids.border_id, attrs
    );
    if alignment_xml.is_empty() && protection_xml.is_empty() {
        s.push_str("/>");
        return s;
    }
    s.push('>');
    s.push_str(&alignment_xml);
    s.push_str(&protection_xml);
    s.push_str("</xf>");
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetstream_core::style::{BorderLineStyle, HorizontalAlignment, VerticalAlignment};

    #[test]
    fn test_default_table() {
        let table = XlsxStyleTable::new();
        assert_eq!(table.len(), 1);
        let xml = table.to_styles_xml();
        assert!(xml.contains("<cellXfs count=\"1\">"));
        assert!(xml.contains("<fills count=\"2\">"));
        assert!(!xml.contains("<numFmts"));
    }

    #[test]
    fn test_components_are_shared() {
        let mut table = XlsxStyleTable::new();
        let border = BorderStyle::all(BorderLineStyle::Thin, Color::BLACK);
        assert_eq!(table.push(&Style::with_border(border.clone())), 1);
        assert_eq!(
            table.push(&Style::with_border(border).fill_color(Color::RED)),
            2
        );

        let xml = table.to_styles_xml();
        assert!(xml.contains("<borders count=\"2\">"));
        assert!(xml.contains("<fills count=\"3\">"));
        assert!(xml.contains("<left style=\"thin\"><color rgb=\"FF000000\"/></left>"));
        assert!(xml.contains("<fgColor rgb=\"FFFF0000\"/>"));
    }

    #[test]
    fn test_number_format_modifiers() {
        let mut table = XlsxStyleTable::new();
        table.push(&Style::new().number_format(NumberFormat::BuiltIn(4)));
        table.push(&Style::new().decimal_places(3).negative_red(true));
        table.push(&Style::new().number_format(NumberFormat::custom("0.0\"x\"")));

        let xml = table.to_styles_xml();
        assert!(xml.contains("<xf numFmtId=\"4\""));
        assert!(xml.contains("<numFmt numFmtId=\"164\" formatCode=\"0.000;[Red]-0.000\"/>"));
        assert!(xml.contains("<numFmt numFmtId=\"165\" formatCode=\"0.0&quot;x&quot;\"/>"));
    }

    #[test]
    fn test_alignment_and_protection() {
        let mut table = XlsxStyleTable::new();
        table.push(
            &Style::new()
                .alignment(Alignment::new(
                    HorizontalAlignment::Center,
                    VerticalAlignment::Center,
                    true,
                ))
                .protection(Protection::unlocked()),
        );
        let xml = table.to_styles_xml();
        assert!(xml.contains(
            "<alignment horizontal=\"center\" vertical=\"center\" wrapText=\"1\"/><protection locked=\"0\"/></xf>"
        ));
    }

    #[test]
    fn test_font_xml() {
        let font = FontStyle::new()
            .with_bold(true)
            .with_name("Fira & Co")
            .with_color(Color::theme(1, 0));
        assert_eq!(
            write_font(&font),
            "<font><b/><sz val=\"11\"/><color theme=\"1\"/><name val=\"Fira &amp; Co\"/></font>"
        );
    }
}
