//! Ready-made coercions for common option values.

use camino::{Utf8Path, Utf8PathBuf};
use regex::{Regex, RegexBuilder};

use super::Coercion;
use crate::error::CoerceError;

const TRUTHY: [&str; 6] = ["on", "1", "yes", "y", "true", "t"];
const FALSY: [&str; 6] = ["off", "0", "no", "n", "false", "f"];

/// Switch-like boolean accepting `on/off`, `yes/no`, `true/false` and their
/// one-letter and numeric spellings, case-insensitively.
///
/// # Examples
///
/// ```
/// let flag = hakcli::coerce::boolean();
/// assert_eq!(flag.coerce("YES").ok(), Some(true));
/// assert_eq!(flag.coerce("off").ok(), Some(false));
/// assert!(flag.coerce("maybe").is_err());
/// ```
#[must_use]
pub fn boolean() -> Coercion<bool> {
    Coercion::new("Bool", |raw: &str| {
        let lowered = raw.to_lowercase();
        if TRUTHY.contains(&lowered.as_str()) {
            Ok(true)
        } else if FALSY.contains(&lowered.as_str()) {
            Ok(false)
        } else {
            Err(CoerceError::new(format!("not a Bool: '{lowered}'")))
        }
    })
    .with_candidates(TRUTHY.into_iter().chain(FALSY))
}

/// Regular expression written as `<delimiter>pattern<delimiter>flags`, for
/// example `/^v[0-9]+$/i`.
///
/// Supported flags: `i` case-insensitive, `s` dot matches newline, `x`
/// insignificant whitespace, `a` ASCII-only classes.
#[must_use]
pub fn regex() -> Coercion<Regex> {
    Coercion::new("Regex", parse_regex)
}

fn parse_regex(raw: &str) -> Result<Regex, CoerceError> {
    let mut chars = raw.chars();
    let delimiter = match (chars.next(), raw.chars().count()) {
        (Some(delimiter), count) if count >= 2 => delimiter,
        _ => return Err(CoerceError::new(format!("invalid regex literal: '{raw}'"))),
    };
    let body = chars.as_str();
    let (pattern, flags) = body.rsplit_once(delimiter).unwrap_or(("", body));

    let mut ascii = false;
    let mut case_insensitive = false;
    let mut dot_all = false;
    let mut verbose = false;
    for flag in flags.chars() {
        match flag.to_ascii_lowercase() {
            'a' => ascii = true,
            'i' => case_insensitive = true,
            's' => dot_all = true,
            'x' => verbose = true,
            _ => return Err(CoerceError::new(format!("invalid regex flag char: {flag}"))),
        }
    }
    let pattern = if ascii {
        ascii_classes(pattern)
    } else {
        pattern.to_owned()
    };
    RegexBuilder::new(&pattern)
        .case_insensitive(case_insensitive)
        .dot_matches_new_line(dot_all)
        .ignore_whitespace(verbose)
        .build()
        .map_err(|err| CoerceError::new(err.to_string()))
}

/// Restricts the Perl classes `\d \w \s \b` and their negations to ASCII.
/// Everything else keeps Unicode semantics.
fn ascii_classes(pattern: &str) -> String {
    let mut rewritten = String::with_capacity(pattern.len());
    let mut class_depth = 0_usize;
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '[' => class_depth += 1,
            ']' => class_depth = class_depth.saturating_sub(1),
            _ => {}
        }
        if c != '\\' {
            rewritten.push(c);
            continue;
        }
        match chars.next() {
            Some('d') => rewritten.push_str("[0-9]"),
            Some('D') => rewritten.push_str("[^0-9]"),
            Some('w') => rewritten.push_str("[0-9A-Za-z_]"),
            Some('W') => rewritten.push_str("[^0-9A-Za-z_]"),
            Some('s') => rewritten.push_str(r"[\t\n\x0B\x0C\r ]"),
            Some('S') => rewritten.push_str(r"[^\t\n\x0B\x0C\r ]"),
            Some('b') if class_depth == 0 => rewritten.push_str(r"(?-u:\b)"),
            Some('B') if class_depth == 0 => rewritten.push_str(r"(?-u:\B)"),
            Some(other) => {
                rewritten.push('\\');
                rewritten.push(other);
            }
            None => rewritten.push('\\'),
        }
    }
    rewritten
}

/// Path to an existing regular file.
#[must_use]
pub fn file_path() -> Coercion<Utf8PathBuf> {
    Coercion::new("file_path", |raw: &str| {
        let path = Utf8Path::new(raw);
        require_exists(path)?;
        require_file(path)?;
        Ok(path.to_path_buf())
    })
}

/// Path to an existing directory.
#[must_use]
pub fn dir_path() -> Coercion<Utf8PathBuf> {
    Coercion::new("dir_path", |raw: &str| {
        let path = Utf8Path::new(raw);
        require_exists(path)?;
        require_dir(path)?;
        Ok(path.to_path_buf())
    })
}

/// Path that is either absent or an existing regular file.
#[must_use]
pub fn new_file_path() -> Coercion<Utf8PathBuf> {
    Coercion::new("new_file_path", |raw: &str| {
        let path = Utf8Path::new(raw);
        if path.exists() {
            require_file(path)?;
        }
        Ok(path.to_path_buf())
    })
}

/// Path that is either absent or an existing directory.
#[must_use]
pub fn new_dir_path() -> Coercion<Utf8PathBuf> {
    Coercion::new("new_dir_path", |raw: &str| {
        let path = Utf8Path::new(raw);
        if path.exists() {
            require_dir(path)?;
        }
        Ok(path.to_path_buf())
    })
}

fn require_exists(path: &Utf8Path) -> Result<(), CoerceError> {
    if path.exists() {
        Ok(())
    } else {
        Err(CoerceError::new(format!("file does not exist: {path}")))
    }
}

fn require_file(path: &Utf8Path) -> Result<(), CoerceError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CoerceError::new(format!("path target is not a file: {path}")))
    }
}

fn require_dir(path: &Utf8Path) -> Result<(), CoerceError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(CoerceError::new(format!(
            "path target is not a directory: {path}"
        )))
    }
}
