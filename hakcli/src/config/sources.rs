//! Discovery of config files: explicit paths, a per-user config directory and
//! a file found by searching from the working directory upwards.

use std::io::ErrorKind;
use std::path::PathBuf;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::error::LoadError;

/// Upper bound on directories visited by an ascending workdir search.
pub const MAX_WORKDIR_ASCENT: usize = 512;

const CONFIG_EXTENSION: &str = "cfg";

/// Ordered list of places configuration is read from.
///
/// # Examples
///
/// ```
/// use hakcli::config::ConfigSources;
///
/// let sources = ConfigSources::new()
///     .file("/etc/tool/defaults.cfg")
///     .config_dir("tool")
///     .workdir_file(".toolrc", true);
/// assert_eq!(sources.files().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    files: Vec<Utf8PathBuf>,
    config_dir: Option<String>,
    workdir: Option<(String, bool)>,
}

impl ConfigSources {
    /// Creates an empty source list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an explicit file. Explicit files are read first, in the order
    /// they were added.
    #[must_use]
    pub fn file(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Reads every `*.cfg` file of `<config home>/<name>` after the explicit
    /// files.
    #[must_use]
    pub fn config_dir(mut self, name: impl Into<String>) -> Self {
        self.config_dir = Some(name.into());
        self
    }

    /// Reads `basename` from the working directory last, or from the nearest
    /// ancestor containing it when `ascend` is set.
    #[must_use]
    pub fn workdir_file(mut self, basename: impl Into<String>, ascend: bool) -> Self {
        self.workdir = Some((basename.into(), ascend));
        self
    }

    /// Explicit files added so far.
    #[must_use]
    pub fn files(&self) -> &[Utf8PathBuf] {
        &self.files
    }

    /// Resolves the sources into the list of files to read.
    ///
    /// Explicit files are listed whether or not they exist; the loader skips
    /// missing ones.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the config directory cannot be listed, a
    /// path is not UTF-8, or the workdir search exceeds its bound.
    pub fn resolve(&self) -> Result<Vec<Utf8PathBuf>, LoadError> {
        let mut paths = self.files.clone();
        if let Some(name) = &self.config_dir {
            paths.extend(enumerate_config_dir(name)?);
        }
        if let Some((basename, ascend)) = &self.workdir {
            tracing::debug!(%basename, ascend, "using workdir file");
            if let Some(file) = find_workdir_file(basename, *ascend)?.file {
                paths.push(file);
            }
        }
        Ok(paths)
    }
}

/// Base directory for per-user config directories.
///
/// `$XDG_CONFIG_HOME` when set and non-empty, otherwise the home directory.
/// In the configured value a leading `~` becomes the home directory, then
/// `$NAME` and `${NAME}` are replaced by environment variables; references
/// to unset variables are kept verbatim.
///
/// # Errors
///
/// Returns [`LoadError::NonUtf8Path`] if the directory is not valid UTF-8.
pub fn config_home() -> Result<Option<Utf8PathBuf>, LoadError> {
    let Some(configured) = std::env::var_os("XDG_CONFIG_HOME").filter(|value| !value.is_empty())
    else {
        return dirs::home_dir().map(utf8_path).transpose();
    };
    let expanded = utf8_path(expand_home(PathBuf::from(configured)))?;
    Ok(Some(Utf8PathBuf::from(expand_vars(expanded.as_str()))))
}

fn utf8_path(path: PathBuf) -> Result<Utf8PathBuf, LoadError> {
    Utf8PathBuf::from_path_buf(path).map_err(LoadError::NonUtf8Path)
}

fn expand_home(path: PathBuf) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path
}

fn expand_vars(text: &str) -> String {
    let mut expanded = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('$') {
        let (head, tail) = rest.split_at(start);
        expanded.push_str(head);
        let after = tail.get(1..).unwrap_or_default();
        let (name, reference_len) = match after.strip_prefix('{') {
            Some(braced) => braced.find('}').map_or(("", 1), |end| {
                (braced.get(..end).unwrap_or_default(), end + 3)
            }),
            None => {
                let end = after
                    .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                    .unwrap_or(after.len());
                (after.get(..end).unwrap_or_default(), end + 1)
            }
        };
        let reference = tail.get(..reference_len).unwrap_or(tail);
        match std::env::var(name).ok().filter(|_| !name.is_empty()) {
            Some(value) => expanded.push_str(&value),
            None => expanded.push_str(reference),
        }
        rest = tail.get(reference_len..).unwrap_or_default();
    }
    expanded.push_str(rest);
    expanded
}

/// Sorted `*.cfg` files directly inside `<config home>/<name>`.
///
/// A missing directory, or a path that is not a directory, yields no files.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the directory exists but cannot be listed, or
/// [`LoadError::NonUtf8Path`] for a non-UTF-8 config home.
pub fn enumerate_config_dir(name: &str) -> Result<Vec<Utf8PathBuf>, LoadError> {
    let Some(home) = config_home()? else {
        return Ok(Vec::new());
    };
    let path = home.join(name);
    if !path.is_dir() {
        tracing::debug!(%path, "config directory absent");
        return Ok(Vec::new());
    }
    let io_error = |source| LoadError::Io {
        path: path.clone(),
        source,
    };
    let dir = match Dir::open_ambient_dir(&path, ambient_authority()) {
        Ok(dir) => dir,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(io_error(err)),
    };

    let mut found = Vec::new();
    for entry in dir.entries().map_err(io_error)? {
        let file_name = entry.and_then(|entry| entry.file_name()).map_err(io_error)?;
        if Utf8Path::new(&file_name).extension() == Some(CONFIG_EXTENSION) {
            found.push(path.join(file_name));
        }
    }
    found.sort();
    Ok(found)
}

/// Outcome of a workdir search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkdirMatch {
    /// Directory containing the match, or the working directory when nothing
    /// was found.
    pub base: Utf8PathBuf,
    /// The matched file.
    pub file: Option<Utf8PathBuf>,
}

/// Looks for `basename` in the working directory and, with `ascend`, in each
/// ancestor up to the filesystem root.
///
/// # Errors
///
/// Returns [`LoadError::WorkdirAscent`] after [`MAX_WORKDIR_ASCENT`]
/// directories without reaching the root, [`LoadError::Io`] if the working
/// directory is unavailable, and [`LoadError::NonUtf8Path`] if it is not
/// UTF-8.
pub fn find_workdir_file(basename: &str, ascend: bool) -> Result<WorkdirMatch, LoadError> {
    let cwd = std::env::current_dir().map_err(|source| LoadError::Io {
        path: Utf8PathBuf::from("."),
        source,
    })?;
    let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(LoadError::NonUtf8Path)?;

    let mut base = cwd.clone();
    for _ in 0..MAX_WORKDIR_ASCENT {
        let candidate = base.join(basename);
        tracing::debug!(%candidate, "looking for workdir file");
        if candidate.exists() {
            return Ok(WorkdirMatch {
                base,
                file: Some(candidate),
            });
        }
        let Some(parent) = base
            .parent()
            .filter(|_| ascend)
            .map(Utf8Path::to_path_buf)
        else {
            return Ok(WorkdirMatch {
                base: cwd,
                file: None,
            });
        };
        base = parent;
    }
    Err(LoadError::WorkdirAscent { start: cwd })
}
