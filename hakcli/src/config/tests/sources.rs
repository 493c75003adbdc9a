//! Config directory enumeration and workdir file search.

use anyhow::{Result, ensure};
use camino::Utf8PathBuf;
use rstest::rstest;
use test_helpers::{cwd, env};

use super::fixtures::utf8_temp_dir;
use crate::config::{ConfigSources, config_home, enumerate_config_dir, find_workdir_file};

const WORKDIR_FILE: &str = ".hakcli-sources-test.cfg";

fn touch(path: &Utf8PathBuf) -> Result<()> {
    std::fs::write(path, "")?;
    Ok(())
}

#[rstest]
fn config_dir_lists_cfg_files_in_order() -> Result<()> {
    let (_dir, root) = utf8_temp_dir()?;
    let app = root.join("fetch");
    std::fs::create_dir_all(&app)?;
    for name in ["b.cfg", "a.cfg", "notes.txt", "cfg"] {
        touch(&app.join(name))?;
    }

    let _scope = env::scope_with(|lock| vec![lock.set_var("XDG_CONFIG_HOME", root.as_str())]);
    let found = enumerate_config_dir("fetch")?;
    ensure!(found == [app.join("a.cfg"), app.join("b.cfg")], "got {found:?}");
    ensure!(enumerate_config_dir("missing")?.is_empty());
    Ok(())
}

#[rstest]
fn a_file_in_place_of_the_config_dir_yields_nothing() -> Result<()> {
    let (_dir, root) = utf8_temp_dir()?;
    touch(&root.join("fetch"))?;
    let _scope = env::scope_with(|lock| vec![lock.set_var("XDG_CONFIG_HOME", root.as_str())]);
    ensure!(enumerate_config_dir("fetch")?.is_empty());
    Ok(())
}

#[rstest]
fn config_home_expands_a_leading_tilde() -> Result<()> {
    let (_dir, root) = utf8_temp_dir()?;
    let _scope = env::scope_with(|lock| {
        vec![
            lock.set_var("HOME", root.as_str()),
            lock.set_var("XDG_CONFIG_HOME", "~/settings"),
        ]
    });
    ensure!(config_home()? == Some(root.join("settings")));
    Ok(())
}

#[rstest]
#[case(None)]
#[case(Some(""))]
fn unset_config_home_falls_back_to_the_home_directory(#[case] value: Option<&str>) -> Result<()> {
    let (_dir, root) = utf8_temp_dir()?;
    let _scope = env::scope_with(|lock| {
        vec![
            lock.set_var("HOME", root.as_str()),
            match value {
                Some(value) => lock.set_var("XDG_CONFIG_HOME", value),
                None => lock.remove_var("XDG_CONFIG_HOME"),
            },
        ]
    });
    ensure!(config_home()? == Some(root.clone()));
    Ok(())
}

#[rstest]
#[case("$HAKCLI_SOURCES_ROOT/cfg", "<root>/cfg")]
#[case("${HAKCLI_SOURCES_ROOT}/cfg", "<root>/cfg")]
#[case("${HAKCLI_SOURCES_ROOT}cfg", "<root>cfg")]
#[case("~/$HAKCLI_SOURCES_NAME", "<root>/settings")]
#[case("/srv/$HAKCLI_SOURCES_UNSET/x", "/srv/$HAKCLI_SOURCES_UNSET/x")]
#[case("/srv/${HAKCLI_SOURCES_UNSET}", "/srv/${HAKCLI_SOURCES_UNSET}")]
#[case("/srv/$/x${", "/srv/$/x${")]
fn config_home_expands_variables(#[case] configured: &str, #[case] expected: &str) -> Result<()> {
    let (_dir, root) = utf8_temp_dir()?;
    let _scope = env::scope_with(|lock| {
        vec![
            lock.set_var("HOME", root.as_str()),
            lock.set_var("HAKCLI_SOURCES_ROOT", root.as_str()),
            lock.set_var("HAKCLI_SOURCES_NAME", "settings"),
            lock.remove_var("HAKCLI_SOURCES_UNSET"),
            lock.set_var("XDG_CONFIG_HOME", configured),
        ]
    });
    let expected = Utf8PathBuf::from(expected.replace("<root>", root.as_str()));
    let found = config_home()?;
    ensure!(found.as_ref() == Some(&expected), "got {found:?}");
    Ok(())
}

#[rstest]
fn config_dir_defaults_to_a_directory_under_home() -> Result<()> {
    let (_dir, root) = utf8_temp_dir()?;
    let app = root.join("fetch");
    std::fs::create_dir_all(&app)?;
    touch(&app.join("main.cfg"))?;
    let _scope = env::scope_with(|lock| {
        vec![
            lock.set_var("HOME", root.as_str()),
            lock.remove_var("XDG_CONFIG_HOME"),
        ]
    });
    ensure!(enumerate_config_dir("fetch")? == [app.join("main.cfg")]);
    Ok(())
}

#[rstest]
#[case(true)]
#[case(false)]
fn workdir_search_ascends_only_when_asked(#[case] ascend: bool) -> Result<()> {
    let (_dir, root) = utf8_temp_dir()?;
    let project = root.join("project");
    let nested = project.join("src/deep");
    std::fs::create_dir_all(&nested)?;
    touch(&project.join(WORKDIR_FILE))?;

    let _guard = cwd::set_dir(&nested)?;
    let found = find_workdir_file(WORKDIR_FILE, ascend)?;
    if ascend {
        ensure!(found.base == project);
        ensure!(found.file == Some(project.join(WORKDIR_FILE)));
    } else {
        ensure!(found.base == nested);
        ensure!(found.file.is_none());
    }
    Ok(())
}

#[rstest]
fn workdir_file_in_the_working_directory_matches_without_ascending() -> Result<()> {
    let (_dir, root) = utf8_temp_dir()?;
    touch(&root.join(WORKDIR_FILE))?;
    let _guard = cwd::set_dir(&root)?;
    let found = find_workdir_file(WORKDIR_FILE, false)?;
    ensure!(found.base == root);
    ensure!(found.file == Some(root.join(WORKDIR_FILE)));
    Ok(())
}

#[rstest]
fn sources_resolve_explicit_then_config_dir_then_workdir() -> Result<()> {
    let (_dir, root) = utf8_temp_dir()?;
    let home = root.join("home");
    let app = home.join("fetch");
    let work = root.join("work");
    std::fs::create_dir_all(&app)?;
    std::fs::create_dir_all(&work)?;
    touch(&app.join("10-base.cfg"))?;
    touch(&app.join("20-site.cfg"))?;
    touch(&work.join(WORKDIR_FILE))?;

    let _scope = env::scope_with(|lock| vec![lock.set_var("XDG_CONFIG_HOME", home.as_str())]);
    let _guard = cwd::set_dir(&work)?;
    let sources = ConfigSources::new()
        .file("/etc/fetch.cfg")
        .config_dir("fetch")
        .workdir_file(WORKDIR_FILE, true);

    ensure!(sources.files() == [Utf8PathBuf::from("/etc/fetch.cfg")]);
    let resolved = sources.resolve()?;
    ensure!(
        resolved
            == [
                Utf8PathBuf::from("/etc/fetch.cfg"),
                app.join("10-base.cfg"),
                app.join("20-site.cfg"),
                work.join(WORKDIR_FILE),
            ],
        "got {resolved:?}"
    );
    Ok(())
}

#[rstest]
fn workdir_miss_contributes_nothing() -> Result<()> {
    let (_dir, root) = utf8_temp_dir()?;
    let _guard = cwd::set_dir(&root)?;
    let sources = ConfigSources::new().workdir_file(WORKDIR_FILE, false);
    ensure!(sources.resolve()?.is_empty());
    Ok(())
}
