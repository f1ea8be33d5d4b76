//! Number format types

/// Number format for cell display
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    /// General format (default)
    #[default]
    General,

    /// Built-in format by ID
    BuiltIn(u32),

    /// Custom format string
    Custom(String),
}

impl NumberFormat {
    /// 1 - 0
    pub const ID_NUMBER_INT: u32 = 1;
    /// 2 - 0.00
    pub const ID_NUMBER_DEC2: u32 = 2;
    /// 3 - #,##0
    pub const ID_NUMBER_SEP: u32 = 3;
    /// 4 - #,##0.00
    pub const ID_NUMBER_SEP_DEC2: u32 = 4;
    /// 9 - 0%
    pub const ID_PERCENT_INT: u32 = 9;
    /// 10 - 0.00%
    pub const ID_PERCENT_DEC2: u32 = 10;
    /// 14 - mm-dd-yy
    pub const ID_DATE_SHORT: u32 = 14;
    /// 49 - @
    pub const ID_TEXT: u32 = 49;

    /// Create a number format from a format string
    pub fn custom<S: Into<String>>(format: S) -> Self {
        NumberFormat::Custom(format.into())
    }

    /// Check for the general format
    pub fn is_general(&self) -> bool {
        matches!(self, NumberFormat::General)
    }

    /// Get the format string
    pub fn format_string(&self) -> &str {
        match self {
            NumberFormat::General => "General",
            NumberFormat::BuiltIn(id) => builtin_format_string(*id),
            NumberFormat::Custom(s) => s,
        }
    }

    /// Format code after applying a decimal place count and the
    /// negative-in-red flag.
    ///
    /// Returns `None` when neither modifier changes the code, so the
    /// format can keep its built-in id.
    pub fn resolved_code(&self, decimal_places: Option<u8>, negative_red: bool) -> Option<String> {
        if decimal_places.is_none() && !negative_red {
            return None;
        }
        let base = match self {
            NumberFormat::General => "0.00",
            other => other.format_string(),
        };
        let mut code = match decimal_places {
            Some(places) => with_decimal_places(base, places),
            None => base.to_string(),
        };
        if negative_red && !code.contains(';') {
            code = format!("{code};[Red]-{code}");
        }
        Some(code)
    }
}

/// Rewrite the first decimal group (`.00`) of a format code
fn with_decimal_places(code: &str, places: u8) -> String {
    let decimals = if places == 0 {
        String::new()
    } else {
        format!(".{}", "0".repeat(places as usize))
    };
    match code.find(".0") {
        Some(start) => {
            let end = code[start + 1..]
                .find(|c: char| c != '0')
                .map(|i| start + 1 + i)
                .unwrap_or(code.len());
            format!("{}{}{}", &code[..start], decimals, &code[end..])
        }
        None => match code.rfind('0') {
            Some(last) => format!("{}{}{}", &code[..=last], decimals, &code[last + 1..]),
            None => code.to_string(),
        },
    }
}

fn builtin_format_string(id: u32) -> &'static str {
    match id {
        0 => "General",
        1 => "0",
        2 => "0.00",
        3 => "#,##0",
        4 => "#,##0.00",
        9 => "0%",
        10 => "0.00%",
        11 => "0.00E+00",
        12 => "# ?/?",
        13 => "# ??/??",
        14 => "mm-dd-yy",
        15 => "d-mmm-yy",
        16 => "d-mmm",
        17 => "mmm-yy",
        18 => "h:mm AM/PM",
        19 => "h:mm:ss AM/PM",
        20 => "h:mm",
        21 => "h:mm:ss",
        22 => "m/d/yy h:mm",
        37 => "#,##0 ;(#,##0)",
        38 => "#,##0 ;[Red](#,##0)",
        39 => "#,##0.00;(#,##0.00)",
        40 => "#,##0.00;[Red](#,##0.00)",
        49 => "@",
        _ => "General",
    }
}
