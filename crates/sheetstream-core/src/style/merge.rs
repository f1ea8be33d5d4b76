//! Override merging of styles

use super::{BorderSide, BorderStyle, FillStyle, Style};

/// Merge `overlay` on top of `origin`
///
/// Borders merge edge by edge: the overlay's edge wins when present,
/// otherwise the origin's edge is kept. Every other part is taken whole
/// from the overlay if the overlay specifies it and kept from the origin
/// otherwise; parts are never merged field by field (an overlay font with
/// only `bold` set replaces the whole origin font).
pub fn merge_styles(origin: &Style, overlay: &Style) -> Style {
    let mut border = BorderStyle::new();
    for side in BorderSide::ALL {
        border.set_edge(side, overlay.border.edge(side).or(origin.border.edge(side)));
    }

    Style {
        border,
        fill: match overlay.fill.canonical() {
            FillStyle::None => origin.fill,
            fill => fill,
        },
        font: overlay.font.clone().or_else(|| origin.font.clone()),
        alignment: overlay.alignment.clone().or_else(|| origin.alignment.clone()),
        number_format: if overlay.number_format.is_general() {
            origin.number_format.clone()
        } else {
            overlay.number_format.clone()
        },
        decimal_places: overlay.decimal_places.or(origin.decimal_places),
        negative_red: overlay.negative_red || origin.negative_red,
        protection: overlay.protection.or(origin.protection),
        language: overlay.language.clone().or_else(|| origin.language.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{
        Alignment, BorderEdge, BorderLineStyle, Color, FontStyle, HorizontalAlignment,
        NumberFormat, PatternType, Protection, VerticalAlignment,
    };
    use pretty_assertions::assert_eq;

    fn origin() -> Style {
        Style::new()
            .border(BorderStyle::all(BorderLineStyle::Medium, Color::BLACK))
            .fill_color(Color::rgb(0x31, 0x5D, 0x3C))
            .font(
                FontStyle::new()
                    .with_bold(true)
                    .with_size(8.0)
                    .with_color(Color::rgb(0x71, 0x8D, 0xDC)),
            )
            .alignment(Alignment::new(
                HorizontalAlignment::Center,
                VerticalAlignment::Center,
                true,
            ))
    }

    #[test]
    fn test_border_merges_per_edge() {
        let overlay = Style::with_border(BorderStyle::new().with_top(BorderLineStyle::Dashed, Color::BLACK));
        let merged = merge_styles(&origin(), &overlay);

        let medium = Some(BorderEdge::new(BorderLineStyle::Medium, Color::BLACK));
        assert_eq!(
            merged.border.top,
            Some(BorderEdge::new(BorderLineStyle::Dashed, Color::BLACK))
        );
        assert_eq!(merged.border.bottom, medium);
        assert_eq!(merged.border.left, medium);
        assert_eq!(merged.border.right, medium);

        // everything else is inherited
        assert_eq!(merged.fill, origin().fill);
        assert_eq!(merged.font, origin().font);
        assert_eq!(merged.alignment, origin().alignment);
    }

    #[test]
    fn test_edges_absent_on_both_sides_stay_absent() {
        let a = Style::with_border(BorderStyle::new().with_left(BorderLineStyle::Thin, Color::BLACK));
        let b = Style::with_border(BorderStyle::new().with_right(BorderLineStyle::Thick, Color::RED));
        let merged = merge_styles(&a, &b);
        assert!(merged.border.top.is_none());
        assert!(merged.border.bottom.is_none());
        assert_eq!(merged.border.left, a.border.left);
        assert_eq!(merged.border.right, b.border.right);
    }

    #[test]
    fn test_parts_are_replaced_whole() {
        let overlay = Style::new().font(FontStyle::new().with_italic(true));
        let merged = merge_styles(&origin(), &overlay);

        let font = merged.font.unwrap();
        assert!(font.italic);
        assert!(!font.bold, "origin font fields must not leak into the overlay font");
        assert_eq!(font.size, 11.0);
    }

    #[test]
    fn test_empty_pattern_fill_keeps_origin_fill() {
        let overlay = Style::new().fill(FillStyle::pattern(PatternType::None, Color::RED, Color::WHITE));
        let merged = merge_styles(&origin(), &overlay);
        assert_eq!(merged.fill, origin().fill);

        let gray = FillStyle::pattern(PatternType::Gray125, Color::RED, Color::WHITE);
        let merged = merge_styles(&origin(), &Style::new().fill(gray));
        assert_eq!(merged.fill, gray);
    }

    #[test]
    fn test_scalar_fields() {
        let base = Style::new()
            .number_format(NumberFormat::BuiltIn(NumberFormat::ID_NUMBER_SEP))
            .decimal_places(2)
            .protection(Protection::unlocked())
            .language("ja-jp");

        let keep = merge_styles(&base, &Style::new());
        assert_eq!(keep, base);

        let overlay = Style::new()
            .number_format(NumberFormat::custom("0.000"))
            .decimal_places(3)
            .negative_red(true)
            .language("en-us");
        let merged = merge_styles(&base, &overlay);
        assert_eq!(merged.number_format, NumberFormat::custom("0.000"));
        assert_eq!(merged.decimal_places, Some(3));
        assert!(merged.negative_red);
        assert_eq!(merged.protection, Some(Protection::unlocked()));
        assert_eq!(merged.language.as_deref(), Some("en-us"));
    }
}
