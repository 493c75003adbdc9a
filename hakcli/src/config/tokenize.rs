//! POSIX shell-style splitting of config lines.

use shlex::Shlex;

use crate::error::LineError;

/// Splits `line` into words. `#` at the start of a word comments out the
/// rest of the line.
pub(crate) fn split(line: &str) -> Result<Vec<String>, LineError> {
    let mut lexer = Shlex::new(line);
    let words: Vec<String> = lexer.by_ref().collect();
    if lexer.had_error {
        Err(LineError::Quoting)
    } else {
        Ok(words)
    }
}
