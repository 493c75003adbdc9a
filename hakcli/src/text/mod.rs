//! Width-aware text output for help rendering.

use std::io::{self, Write};

use textwrap::Options;

/// Line width used when the destination is not a terminal.
pub const DEFAULT_WIDTH: usize = 80;

const INDENT_UNIT: &str = "  ";

/// Columns of the controlling terminal, or [`DEFAULT_WIDTH`] when there is
/// none.
#[must_use]
pub fn terminal_width() -> usize {
    textwrap::termwidth()
}

/// Writes `text` wrapped to `width`, every line prefixed with `level` indent
/// units of two spaces.
pub(crate) fn write_indented(
    out: &mut dyn Write,
    text: &str,
    level: usize,
    width: usize,
) -> io::Result<()> {
    write_filled(out, text, &INDENT_UNIT.repeat(level), width)
}

/// Writes `text` wrapped to `width` with `indent` before every line, followed
/// by a newline.
pub(crate) fn write_filled(
    out: &mut dyn Write,
    text: &str,
    indent: &str,
    width: usize,
) -> io::Result<()> {
    let options = Options::new(width)
        .initial_indent(indent)
        .subsequent_indent(indent);
    writeln!(out, "{}", textwrap::fill(text, options))
}
