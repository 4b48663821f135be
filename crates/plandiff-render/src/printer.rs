//! Indentation, op-styling, and the output sink.
//!
//! Every row is written as `<color><indentation><text><reset>`. The
//! indentation is four columns per level; when a row carries its operation's
//! glyph, the glyph takes the last two columns of the indentation.

use plandiff_types::colors;
use plandiff_types::StepOp;

/// Columns per indent level.
pub const INDENT_WIDTH: usize = 4;

const SHORT_HASH_LEN: usize = 7;

/// Build the indentation for a row at `level`.
///
/// # Panics
///
/// Panics if `prefix` is requested at level zero, where there is no room for
/// the glyph, or if the operation's glyph is not two characters wide.
pub fn indent_string(level: usize, op: StepOp, prefix: bool) -> String {
    let mut indent = " ".repeat(level * INDENT_WIDTH);
    if indent.is_empty() {
        assert!(!prefix, "a prefixed row needs at least one level of indentation");
        return indent;
    }

    let glyph = if prefix { op.raw_prefix() } else { "  " };
    assert_eq!(glyph.chars().count(), 2, "glyph for {op} must be two characters");
    indent.truncate(indent.len() - 2);
    indent.push_str(glyph);
    indent
}

/// The first seven characters of a content hash, or all of it when shorter.
pub fn short_hash(hash: &str) -> &str {
    match hash.char_indices().nth(SHORT_HASH_LEN) {
        Some((end, _)) => &hash[..end],
        None => hash,
    }
}

/// `old` when unchanged, otherwise `old->new`.
pub fn text_change(old: &str, new: &str) -> String {
    if old == new {
        old.to_string()
    } else {
        format!("{old}->{new}")
    }
}

/// The shortest representation of `n`, in `d.ddde±XX` notation when the
/// decimal exponent is below -4 or at least 6.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    if n == 0.0 {
        return n.to_string();
    }

    let scientific = format!("{n:e}");
    let Some((mantissa, exp)) = scientific.split_once('e') else {
        return n.to_string();
    };
    let exp: i32 = match exp.parse() {
        Ok(exp) => exp,
        Err(_) => return n.to_string(),
    };
    if (-4..6).contains(&exp) {
        return n.to_string();
    }
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
}

/// Width of the widest key, for aligning the `:` after property names.
pub(crate) fn max_key<'a>(keys: impl IntoIterator<Item = &'a str>) -> usize {
    keys.into_iter()
        .map(|k| k.chars().count())
        .max()
        .unwrap_or(0)
}

/// An in-memory sink for rendered rows.
#[derive(Debug, Default)]
pub struct Printer {
    buf: String,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text with no color or indentation.
    pub fn write_raw(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    /// Append one colored, indented fragment.
    pub fn write_with_indent(&mut self, level: usize, op: StepOp, prefix: bool, text: &str) {
        self.buf.push_str(op.color().marker());
        self.buf.push_str(&indent_string(level, op, prefix));
        self.buf.push_str(text);
        self.buf.push_str(colors::RESET);
    }

    /// Append a colored fragment that continues the current row.
    pub fn write(&mut self, op: StepOp, text: &str) {
        self.write_with_indent(0, op, false, text);
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

/// The label that starts a row: a property name or an array index.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Title<'a> {
    /// `name: `, left-aligned to `align` columns.
    Key { name: &'a str, align: usize, level: usize },
    /// `[index]: `
    Index { index: usize, level: usize },
}

impl<'a> Title<'a> {
    pub(crate) fn key(name: &'a str, align: usize, level: usize) -> Self {
        Title::Key { name, align, level }
    }

    pub(crate) fn index(index: usize, level: usize) -> Self {
        Title::Index { index, level }
    }

    pub(crate) fn print(self, out: &mut Printer, op: StepOp, prefix: bool) {
        match self {
            Title::Key { name, align, level } => {
                out.write_with_indent(level, op, prefix, &format!("{name:<align$}: "));
            }
            Title::Index { index, level } => {
                out.write_with_indent(level, op, prefix, &format!("[{index}]: "));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plandiff_types::colors::strip;
    use plandiff_types::Color;

    #[test]
    fn indent_is_four_columns_per_level() {
        assert_eq!(indent_string(0, StepOp::Same, false), "");
        assert_eq!(indent_string(1, StepOp::Same, false), "    ");
        assert_eq!(indent_string(3, StepOp::Update, false), " ".repeat(12));
    }

    #[test]
    fn glyph_replaces_last_two_columns() {
        assert_eq!(indent_string(1, StepOp::Create, true), "  + ");
        assert_eq!(indent_string(2, StepOp::Delete, true), "      - ");
        assert_eq!(indent_string(1, StepOp::Replace, true), "  +-");
        assert_eq!(indent_string(1, StepOp::Same, true), "    ");
    }

    #[test]
    #[should_panic(expected = "at least one level")]
    fn prefix_at_level_zero_panics() {
        indent_string(0, StepOp::Create, true);
    }

    #[test]
    fn short_hash_truncates_to_seven() {
        assert_eq!(short_hash("0123456789abcdef"), "0123456");
        assert_eq!(short_hash("0123456"), "0123456");
        assert_eq!(short_hash("abc"), "abc");
        assert_eq!(short_hash(""), "");
    }

    #[test]
    fn numbers_switch_to_exponent_form_at_the_edges() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-2.5), "-2.5");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(123456.0), "123456");
        assert_eq!(format_number(123456.5), "123456.5");
        assert_eq!(format_number(1e6), "1e+06");
        assert_eq!(format_number(1234567.0), "1.234567e+06");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2e100), "-2e+100");
        assert_eq!(format_number(0.0001), "0.0001");
        assert_eq!(format_number(0.00001), "1e-05");
        assert_eq!(format_number(1.5e-7), "1.5e-07");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "+Inf");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn text_change_collapses_equal_sides() {
        assert_eq!(text_change("a", "a"), "a");
        assert_eq!(text_change("a", "b"), "a->b");
    }

    #[test]
    fn rows_are_wrapped_in_color_and_reset() {
        let mut out = Printer::new();
        out.write_with_indent(1, StepOp::Create, true, "x");
        assert_eq!(
            out.as_str(),
            format!("{}  + x{}", Color::Green, colors::RESET)
        );
    }

    #[test]
    fn titles_align_names() {
        let mut out = Printer::new();
        Title::key("id", 5, 1).print(&mut out, StepOp::Same, false);
        Title::index(3, 2).print(&mut out, StepOp::Delete, true);
        assert_eq!(strip(out.as_str()), "    id   :       - [3]: ");
    }

    #[test]
    fn max_key_counts_chars() {
        assert_eq!(max_key(["a", "abc", "ab"]), 3);
        assert_eq!(max_key(Vec::<&str>::new()), 0);
    }
}
