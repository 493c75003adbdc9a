//! Loads config files from every source kind into a shared option table.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result, anyhow, ensure};
use camino::{Utf8Path, Utf8PathBuf};
use hakcli::LoadError;
use hakcli::coerce::{self, Coercion};
use hakcli::config::{ConfigSources, ConfigTable};
use hakcli::handler::{Handler, Param};
use rstest::rstest;
use tempfile::TempDir;
use test_helpers::{cwd, env};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Mirror {
    upstream: String,
    retries: u32,
    verify: bool,
    paths: Vec<String>,
}

fn table(mirror: &Rc<RefCell<Mirror>>) -> Result<ConfigTable> {
    let mut table = ConfigTable::new();
    let target = Rc::clone(mirror);
    table.option(
        "upstream",
        Handler::unary("upstream", "url", Coercion::<String>::parse(), move |url| {
            target.borrow_mut().upstream = url;
        }),
    )?;
    let target = Rc::clone(mirror);
    table.option(
        "retries",
        Handler::unary("retries", "count", Coercion::<u32>::parse(), move |count| {
            target.borrow_mut().retries = count;
        }),
    )?;
    let target = Rc::clone(mirror);
    table.option(
        "verify",
        Handler::new("verify", move |args| {
            target.borrow_mut().verify = args.take(0)?;
            Ok(())
        })
        .param(Param::typed("enabled", coerce::boolean()).with_default(true)),
    )?;
    let target = Rc::clone(mirror);
    table.option(
        "paths",
        Handler::new("paths", move |args| {
            target.borrow_mut().paths.extend(args.take_rest::<String>(0)?);
            Ok(())
        })
        .param(Param::raw("path").variadic()),
    )?;
    Ok(table)
}

struct Layout {
    _dir: TempDir,
    home: Utf8PathBuf,
    project: Utf8PathBuf,
    nested: Utf8PathBuf,
}

fn layout() -> Result<Layout> {
    let dir = TempDir::new().context("create temp dir")?;
    let root = std::fs::canonicalize(dir.path()).context("canonicalize temp dir")?;
    let root = Utf8PathBuf::from_path_buf(root).map_err(|path| anyhow!("{}", path.display()))?;
    let home = root.join("config");
    let project = root.join("project");
    let nested = project.join("a/b");
    std::fs::create_dir_all(home.join("mirror"))?;
    std::fs::create_dir_all(&nested)?;
    Ok(Layout {
        _dir: dir,
        home,
        project,
        nested,
    })
}

fn write(path: &Utf8Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("write {path}"))
}

#[rstest]
fn later_sources_override_earlier_ones() -> Result<()> {
    let layout = layout()?;
    let explicit = layout.project.join("defaults.cfg");
    write(&explicit, "upstream https://example.org\nretries 1\n")?;
    write(&layout.home.join("mirror/10.cfg"), "retries 3\npaths /srv\n")?;
    write(&layout.home.join("mirror/20.cfg"), "verify\n")?;
    write(&layout.home.join("mirror/skip.conf"), "retries 99\n")?;
    write(&layout.project.join(".mirror.cfg"), "verify off\npaths 'my docs' src\n")?;

    let _scope = env::scope_with(|lock| vec![lock.set_var("XDG_CONFIG_HOME", layout.home.as_str())]);
    let _cwd = cwd::set_dir(&layout.nested)?;

    let mirror = Rc::new(RefCell::new(Mirror::default()));
    let sources = ConfigSources::new()
        .file(explicit)
        .file(layout.project.join("absent.cfg"))
        .config_dir("mirror")
        .workdir_file(".mirror.cfg", true);
    table(&mirror)?.load(&sources)?;

    let expected = Mirror {
        upstream: String::from("https://example.org"),
        retries: 3,
        verify: false,
        paths: vec![String::from("/srv"), String::from("my docs"), String::from("src")],
    };
    ensure!(*mirror.borrow() == expected, "got {:?}", mirror.borrow());
    Ok(())
}

#[rstest]
fn the_first_bad_line_stops_loading() -> Result<()> {
    let layout = layout()?;
    let first = layout.project.join("first.cfg");
    let second = layout.project.join("second.cfg");
    write(&first, "retries 2\nretries lots\nretries 4\n")?;
    write(&second, "upstream never-read\n")?;

    let mirror = Rc::new(RefCell::new(Mirror::default()));
    let sources = ConfigSources::new().file(first.clone()).file(second);
    let err = table(&mirror)?
        .load(&sources)
        .err()
        .ok_or_else(|| anyhow!("retries lots must fail"))?;

    ensure!(matches!(&err, LoadError::Line { line: 2, path, .. } if *path == first));
    ensure!(
        err.to_string()
            == format!(
                "config {first}:2: invalid count argument for retries: invalid digit found in string"
            )
    );
    ensure!(mirror.borrow().retries == 2);
    ensure!(mirror.borrow().upstream.is_empty());
    Ok(())
}

#[rstest]
fn unreadable_paths_are_io_errors() -> Result<()> {
    let layout = layout()?;
    let mirror = Rc::new(RefCell::new(Mirror::default()));
    let err = table(&mirror)?
        .load_file(&layout.project)
        .err()
        .ok_or_else(|| anyhow!("a directory is not a config file"))?;
    ensure!(matches!(err, LoadError::Io { .. }), "got {err:?}");
    ensure!(err.to_string().starts_with(&format!("config {}: ", layout.project)));
    Ok(())
}
