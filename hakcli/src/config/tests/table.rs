//! Binding config lines to registered options.

use anyhow::{Result, anyhow, ensure};
use camino::Utf8Path;
use rstest::rstest;

use super::fixtures::{Applied, table, utf8_temp_dir};
use crate::config::ConfigTable;
use crate::error::{DefinitionError, LineError, LoadError};
use crate::handler::{Handler, Param};

fn applied(log: &Applied) -> Vec<String> {
    log.borrow().clone()
}

fn line_error(table: &mut ConfigTable, line: &str) -> Result<String> {
    table
        .load_line(line)
        .err()
        .map(|err| err.to_string())
        .ok_or_else(|| anyhow!("expected {line:?} to fail"))
}

#[rstest]
fn lines_invoke_their_option(table: Result<(ConfigTable, Applied)>) -> Result<()> {
    let (mut table, log) = table?;
    table.load_line("retries 3 # three is plenty")?;
    table.load_line("set colour 'dark blue'")?;
    table.load_line("set tracing")?;
    table.load_line("include a b \"c d\"")?;
    table.load_line("include only")?;
    ensure!(
        applied(&log)
            == [
                "retries=3",
                "colour=dark blue",
                "tracing=on",
                "include=a+b+c d",
                "include=only+",
            ]
    );
    Ok(())
}

#[rstest]
#[case("")]
#[case("   \t")]
#[case("# retries 9")]
fn blank_and_comment_lines_do_nothing(
    table: Result<(ConfigTable, Applied)>,
    #[case] line: &str,
) -> Result<()> {
    let (mut table, log) = table?;
    table.load_line(line)?;
    ensure!(applied(&log).is_empty());
    Ok(())
}

#[rstest]
#[case("nope 1", "unknown command 'nope'")]
#[case("retries", "missing count argument for retries")]
#[case("include", "missing first argument for include")]
#[case(
    "retries three",
    "invalid count argument for retries: invalid digit found in string"
)]
#[case("retries 1 2 3", "too many arguments for retries: expected 1, got 3")]
#[case("set a b c", "too many arguments for set: expected 2, got 3")]
#[case("set 'open", "unbalanced quoting")]
#[case("refuse", "refuse failed: not today")]
fn bad_lines_are_reported(
    table: Result<(ConfigTable, Applied)>,
    #[case] line: &str,
    #[case] expected: &str,
) -> Result<()> {
    let (mut table, log) = table?;
    ensure!(line_error(&mut table, line)? == expected);
    ensure!(applied(&log).is_empty(), "nothing is applied from a bad line");
    Ok(())
}

#[rstest]
fn registration_rules() {
    let mut table = ConfigTable::new();
    assert!(table.option("x", Handler::unit("x", || ())).is_ok());
    assert!(table.contains("x"));
    assert!(!table.contains("y"));
    assert_eq!(
        table.option("x", Handler::unit("x", || ())),
        Err(DefinitionError::DuplicateOption("x".into()))
    );
    let misplaced = Handler::new("y", |_| Ok(()))
        .param(Param::raw("rest").variadic())
        .param(Param::raw("last"));
    assert_eq!(
        table.option("y", misplaced),
        Err(DefinitionError::VariadicNotLast {
            handler: "y".into(),
            param: "rest".into(),
        })
    );
}

#[rstest]
fn load_str_reports_the_failing_line(table: Result<(ConfigTable, Applied)>) -> Result<()> {
    let (mut table, log) = table?;
    let contents = "retries 1\n\n# note\nretries 1 2\nretries 5\n";
    let err = table
        .load_str(Utf8Path::new("main.cfg"), contents)
        .err()
        .ok_or_else(|| anyhow!("expected failure"))?;
    ensure!(
        err.to_string() == "config main.cfg:4: too many arguments for retries: expected 1, got 2",
        "got {err}"
    );
    ensure!(matches!(err, LoadError::Line { line: 4, .. }));
    ensure!(matches!(
        err.line_error(),
        Some(LineError::TooManyArguments { .. })
    ));
    ensure!(applied(&log) == ["retries=1"], "lines before the failure apply");
    Ok(())
}

#[rstest]
fn load_file_skips_missing_files(table: Result<(ConfigTable, Applied)>) -> Result<()> {
    let (mut table, log) = table?;
    let (_dir, root) = utf8_temp_dir()?;
    let present = root.join("present.cfg");
    std::fs::write(&present, "set mode fast\r\nretries 2\n")?;

    ensure!(!table.load_file(&root.join("absent.cfg"))?);
    ensure!(table.load_file(&present)?);
    ensure!(applied(&log) == ["mode=fast", "retries=2"]);
    Ok(())
}
