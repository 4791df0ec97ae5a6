//! Message templates with positional placeholders and locale-aware number rendering.
//!
//! Patterns follow the familiar `{0}` convention:
//!
//! | Syntax | Output |
//! |--------|--------|
//! | `{0}` | argument 0, numbers grouped for the locale |
//! | `{0,number}` | argument 0 as a grouped number |
//! | `{0,number,integer}` | argument 0 rounded to an integer |
//! | `''` | a literal apostrophe |
//! | `'{0}'` | the literal text `{0}` |
//!
//! Placeholders that reference a missing argument, or that cannot be parsed, are copied to
//! the output unchanged.

use std::fmt;

use crate::locale::Locale;

/// A value substituted into a message template.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageArg {
    /// Text inserted verbatim.
    Text(String),
    /// Whole number rendered with locale grouping.
    Integer(i64),
    /// Floating point number rendered with locale grouping and decimal separator.
    Float(f64),
}

impl From<&str> for MessageArg {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MessageArg {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for MessageArg {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for MessageArg {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

macro_rules! integer_arg {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for MessageArg {
                fn from(value: $ty) -> Self {
                    Self::Integer(i64::from(value))
                }
            }
        )*
    };
}

integer_arg!(i8, i16, i32, i64, u8, u16, u32);

impl fmt::Display for MessageArg {
    /// Locale-neutral rendering, used when no locale is at hand.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgumentStyle {
    Plain,
    Number,
    Integer,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Argument {
        index: usize,
        style: ArgumentStyle,
        source: String,
    },
}

/// A parsed message pattern bound to the locale it was resolved for.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageTemplate {
    pattern: String,
    locale: Locale,
    segments: Vec<Segment>,
}

impl MessageTemplate {
    /// Parse `pattern` for rendering in `locale`. Parsing never fails.
    pub fn new(pattern: impl Into<String>, locale: Locale) -> Self {
        let pattern = pattern.into();
        let segments = parse_segments(&pattern);
        Self {
            pattern,
            locale,
            segments,
        }
    }

    /// Raw pattern text as stored in the bundle.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Locale used for number rendering.
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Render the template, substituting `args` by position.
    pub fn format(&self, args: &[MessageArg]) -> String {
        let symbols = NumberSymbols::for_locale(&self.locale);
        let mut output = String::with_capacity(self.pattern.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Argument {
                    index,
                    style,
                    source,
                } => match args.get(*index) {
                    Some(arg) => render_argument(&mut output, arg, *style, symbols),
                    None => output.push_str(source),
                },
            }
        }

        output
    }
}

fn parse_segments(pattern: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.chars().peekable();
    let mut quoted = false;

    while let Some(ch) = chars.next() {
        match ch {
            '\'' if chars.peek() == Some(&'\'') => {
                chars.next();
                literal.push('\'');
            }
            '\'' => quoted = !quoted,
            _ if quoted => literal.push(ch),
            '{' => {
                let mut body = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    body.push(c);
                }

                let source = if closed {
                    format!("{{{body}}}")
                } else {
                    format!("{{{body}")
                };

                match closed.then(|| parse_placeholder(&body)).flatten() {
                    Some((index, style)) => {
                        if !literal.is_empty() {
                            segments.push(Segment::Literal(std::mem::take(&mut literal)));
                        }
                        segments.push(Segment::Argument {
                            index,
                            style,
                            source,
                        });
                    }
                    None => literal.push_str(&source),
                }
            }
            _ => literal.push(ch),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

fn parse_placeholder(body: &str) -> Option<(usize, ArgumentStyle)> {
    let mut parts = body.split(',').map(str::trim);
    let index = parts.next()?.parse::<usize>().ok()?;
    let style = match (parts.next(), parts.next()) {
        (None, _) => ArgumentStyle::Plain,
        (Some("number"), None) => ArgumentStyle::Number,
        (Some("number"), Some("integer")) => ArgumentStyle::Integer,
        // Unsupported format types (dates, choices) render as plain values.
        _ => ArgumentStyle::Plain,
    };
    Some((index, style))
}

fn render_argument(
    output: &mut String,
    arg: &MessageArg,
    style: ArgumentStyle,
    symbols: NumberSymbols,
) {
    match (arg, style) {
        (MessageArg::Text(text), _) => output.push_str(text),
        (MessageArg::Integer(value), _) => symbols.push_integer(output, *value),
        (MessageArg::Float(value), ArgumentStyle::Integer) => {
            symbols.push_float(output, value.round_ties_even(), 0);
        }
        (MessageArg::Float(value), ArgumentStyle::Plain | ArgumentStyle::Number) => {
            symbols.push_float(output, *value, MAX_FRACTION_DIGITS);
        }
    }
}

const MAX_FRACTION_DIGITS: usize = 3;

#[derive(Debug, Clone, Copy)]
struct NumberSymbols {
    grouping: char,
    decimal: char,
}

impl NumberSymbols {
    fn for_locale(locale: &Locale) -> Self {
        match locale.language() {
            "fr" => Self {
                grouping: '\u{202f}',
                decimal: ',',
            },
            "de" | "es" | "it" | "pt" | "nl" | "da" | "id" | "tr" => Self {
                grouping: '.',
                decimal: ',',
            },
            "ru" | "pl" | "cs" | "sv" | "fi" | "nb" | "uk" => Self {
                grouping: '\u{a0}',
                decimal: ',',
            },
            _ => Self {
                grouping: ',',
                decimal: '.',
            },
        }
    }

    fn push_integer(self, output: &mut String, value: i64) {
        if value < 0 {
            output.push('-');
        }
        self.push_grouped_digits(output, &value.unsigned_abs().to_string());
    }

    fn push_float(self, output: &mut String, value: f64, fraction_digits: usize) {
        if value.is_nan() {
            output.push_str("NaN");
            return;
        }
        if value.is_infinite() {
            output.push_str(if value < 0.0 { "-∞" } else { "∞" });
            return;
        }

        let rendered = format!("{:.*}", fraction_digits, value.abs());
        let (whole, fraction) = match rendered.split_once('.') {
            Some((whole, fraction)) => (whole, fraction.trim_end_matches('0')),
            None => (rendered.as_str(), ""),
        };

        let is_zero = whole.bytes().all(|b| b == b'0') && fraction.is_empty();
        if value.is_sign_negative() && !is_zero {
            output.push('-');
        }
        self.push_grouped_digits(output, whole);
        if !fraction.is_empty() {
            output.push(self.decimal);
            output.push_str(fraction);
        }
    }

    fn push_grouped_digits(self, output: &mut String, digits: &str) {
        let len = digits.len();
        for (position, digit) in digits.chars().enumerate() {
            if position > 0 && (len - position) % 3 == 0 {
                output.push(self.grouping);
            }
            output.push(digit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english(pattern: &str) -> MessageTemplate {
        MessageTemplate::new(pattern, Locale::english())
    }

    #[test]
    fn substitutes_positional_arguments() {
        let template = MessageTemplate::new("Bonjour {0}", Locale::french());
        assert_eq!(template.format(&["Marie".into()]), "Bonjour Marie");
    }

    #[test]
    fn reorders_arguments_by_index() {
        let template = english("{1} before {0}");
        assert_eq!(template.format(&["a".into(), "b".into()]), "b before a");
    }

    #[test]
    fn leaves_missing_arguments_in_place() {
        let template = english("Hello {0} and {1}");
        assert_eq!(template.format(&["Ann".into()]), "Hello Ann and {1}");
    }

    #[test]
    fn keeps_unparseable_placeholders_as_text() {
        assert_eq!(english("Hello {name}").format(&["x".into()]), "Hello {name}");
        assert_eq!(english("Open {0").format(&["x".into()]), "Open {0");
    }

    #[test]
    fn doubled_apostrophe_is_literal() {
        assert_eq!(english("It''s {0}").format(&["here".into()]), "It's here");
    }

    #[test]
    fn quoted_braces_are_not_placeholders() {
        assert_eq!(english("Use '{0}' for {0}").format(&["x".into()]), "Use {0} for x");
    }

    #[test]
    fn groups_integers_per_locale() {
        let args = [MessageArg::from(1_234_567)];
        assert_eq!(english("{0}").format(&args), "1,234,567");
        assert_eq!(
            MessageTemplate::new("{0}", Locale::new("de", "", "")).format(&args),
            "1.234.567"
        );
        assert_eq!(
            MessageTemplate::new("{0,number}", Locale::french()).format(&args),
            "1\u{202f}234\u{202f}567"
        );
    }

    #[test]
    fn renders_floats_with_locale_decimal_separator() {
        let args = [MessageArg::from(1234.5)];
        assert_eq!(english("{0,number}").format(&args), "1,234.5");
        assert_eq!(
            MessageTemplate::new("{0,number}", Locale::french()).format(&args),
            "1\u{202f}234,5"
        );
    }

    #[test]
    fn integer_style_rounds_floats() {
        assert_eq!(
            english("{0,number,integer}").format(&[MessageArg::from(2.6)]),
            "3"
        );
    }

    #[test]
    fn integer_style_rounds_halves_to_even() {
        let template = english("{0,number,integer}");
        assert_eq!(template.format(&[MessageArg::from(2.5)]), "2");
        assert_eq!(template.format(&[MessageArg::from(3.5)]), "4");
        assert_eq!(template.format(&[MessageArg::from(-2.5)]), "-2");
    }

    #[test]
    fn limits_fraction_digits() {
        assert_eq!(english("{0}").format(&[MessageArg::from(0.12345)]), "0.123");
        assert_eq!(english("{0}").format(&[MessageArg::from(-0.0001)]), "0");
    }

    #[test]
    fn negative_numbers_keep_sign_before_grouping() {
        assert_eq!(english("{0}").format(&[MessageArg::from(-12_345)]), "-12,345");
        assert_eq!(english("{0}").format(&[MessageArg::from(-1500.25)]), "-1,500.25");
    }

    #[test]
    fn unsupported_styles_render_plainly() {
        assert_eq!(english("{0,date,short}").format(&["today".into()]), "today");
    }
}
