//! Locale-aware rendering of the numbers in the benchmark report.
//!
//! Only the numeric part of a locale matters here: which character groups
//! thousands (if any) and which one separates the fraction.

use std::env;

use lazy_static::lazy_static;

/// Numeric conventions of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLocale {
    /// Inserted between groups of three integer digits. `None` disables grouping.
    pub thousands_sep: Option<char>,
    pub decimal_point: char,
}

impl NumberLocale {
    /// The "C"/"POSIX" locale: no grouping, `.` as decimal point.
    pub const C: NumberLocale = NumberLocale {
        thousands_sep: None,
        decimal_point: '.',
    };

    const COMMA_DOT: NumberLocale = NumberLocale {
        thousands_sep: Some(','),
        decimal_point: '.',
    };

    const DOT_COMMA: NumberLocale = NumberLocale {
        thousands_sep: Some('.'),
        decimal_point: ',',
    };

    const SPACE_COMMA: NumberLocale = NumberLocale {
        thousands_sep: Some('\u{a0}'),
        decimal_point: ',',
    };

    const APOSTROPHE_DOT: NumberLocale = NumberLocale {
        thousands_sep: Some('\''),
        decimal_point: '.',
    };

    /// Maps a POSIX locale name such as `en_US.UTF-8` or `de_DE@euro` to its
    /// numeric conventions. Unknown languages fall back to `C`.
    pub fn from_name(name: &str) -> NumberLocale {
        let base = name.split(|c: char| c == '.' || c == '@').next().unwrap_or("");
        let mut parts = base.split(|c: char| c == '_' || c == '-');
        let language = parts.next().unwrap_or("").to_ascii_lowercase();
        let territory = parts.next().unwrap_or("").to_ascii_uppercase();

        match (language.as_str(), territory.as_str()) {
            ("" | "c" | "posix", _) => Self::C,
            ("de" | "it", "CH") | ("rm", _) => Self::APOSTROPHE_DOT,
            ("en" | "ja" | "zh" | "ko" | "he" | "th" | "hi" | "ms" | "fil" | "ga", _) => Self::COMMA_DOT,
            ("es", "MX" | "US") => Self::COMMA_DOT,
            ("de" | "nl" | "it" | "es" | "pt" | "id" | "da" | "tr" | "el" | "ro" | "hr" | "sl" | "sr", _) => {
                Self::DOT_COMMA
            }
            ("fr" | "ru" | "pl" | "cs" | "sk" | "sv" | "fi" | "nb" | "nn" | "no" | "uk" | "hu" | "bg" | "et"
            | "lt" | "lv", _) => Self::SPACE_COMMA,
            _ => Self::C,
        }
    }

    /// Reads the process locale from `LC_ALL`, `LC_NUMERIC` and `LANG`, in that
    /// order, taking the first one that is set and non-empty.
    pub fn from_env() -> NumberLocale {
        ["LC_ALL", "LC_NUMERIC", "LANG"]
            .iter()
            .filter_map(|var| env::var(var).ok())
            .find(|value| !value.is_empty())
            .map(|value| Self::from_name(&value))
            .unwrap_or(Self::C)
    }
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::C
    }
}

lazy_static! {
    /// Locale of the running process, resolved once.
    static ref PROCESS_LOCALE: NumberLocale = NumberLocale::from_env();
}

/// Returns the numeric conventions of the running process.
pub fn process_locale() -> NumberLocale {
    *PROCESS_LOCALE
}

/// Numbers that can be rendered for humans.
///
/// Integers are grouped by thousands. Floating point values are written in
/// fixed notation with one digit after the decimal point.
pub trait FormatNumber {
    fn format_with(&self, locale: &NumberLocale) -> String;
}

macro_rules! impl_format_integer {
    ($($t:ty),*) => {
        $(
            impl FormatNumber for $t {
                fn format_with(&self, locale: &NumberLocale) -> String {
                    let digits = self.to_string();
                    match digits.strip_prefix('-') {
                        Some(magnitude) => format!("-{}", group_digits(magnitude, locale.thousands_sep)),
                        None => group_digits(&digits, locale.thousands_sep),
                    }
                }
            }
        )*
    };
}

impl_format_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl FormatNumber for f64 {
    fn format_with(&self, locale: &NumberLocale) -> String {
        if !self.is_finite() {
            return self.to_string();
        }

        let fixed = format!("{:.1}", self);
        let (sign, unsigned) = match fixed.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", fixed.as_str()),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "0"));

        format!(
            "{}{}{}{}",
            sign,
            group_digits(whole, locale.thousands_sep),
            locale.decimal_point,
            fraction
        )
    }
}

impl FormatNumber for f32 {
    fn format_with(&self, locale: &NumberLocale) -> String {
        f64::from(*self).format_with(locale)
    }
}

/// Formats `value` with the process locale.
pub fn format_number<T: FormatNumber + ?Sized>(value: &T) -> String {
    value.format_with(&process_locale())
}

fn group_digits(digits: &str, separator: Option<char>) -> String {
    let Some(separator) = separator else {
        return digits.to_string();
    };

    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(digit);
    }
    out
}
