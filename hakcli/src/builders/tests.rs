//! Builder handles and the properties they publish.

use anyhow::{Result, ensure};
use rstest::rstest;

use super::*;
use crate::ParseOutcome;

fn run(node: &mut CliNode, argv: &[&str]) -> Result<ParseOutcome> {
    Ok(node.try_process(argv.iter().copied(), &mut Vec::<u8>::new())?)
}

#[rstest]
fn handles_share_state_with_their_clones() -> Result<()> {
    let mut node = CliNode::root("tool", None);
    let flag = node.flag(Some("f"), "force", None)?;
    let copy = flag.clone();
    run(&mut node, &["tool", "-f"])?;
    ensure!(flag.value() && copy.value());
    Ok(())
}

#[rstest]
fn every_builder_publishes_a_property() -> Result<()> {
    let mut node = CliNode::root("tool", None);
    node.flag(Some("f"), "force", None)?;
    node.counted_flag(Some("v"), "verbose", None)?;
    node.variable(Coercion::<f32>::parse(), 1.5, Some("s"), "scale", None)?;
    node.variable_list(Coercion::<String>::parse(), Some("I"), "include", None)?;
    node.arg_variable(Coercion::<String>::parse(), String::new(), "input", None, false)?;
    node.arg_list_variable(Coercion::<u16>::parse(), "ports", None, false)?;
    ensure!(
        node.property_names() == ["force", "include", "input", "ports", "scale", "verbose"]
    );
    ensure!(node.property::<f32>("scale") == Some(1.5));
    ensure!(node.property::<Vec<u16>>("ports") == Some(Vec::new()));
    ensure!(node.property::<u8>("missing").is_none());
    Ok(())
}

#[rstest]
fn variables_keep_the_last_value_and_lists_keep_all() -> Result<()> {
    let mut node = CliNode::root("tool", None);
    let level = node.variable(Coercion::<u8>::parse(), 0, Some("l"), "level", None)?;
    let include = node.variable_list(Coercion::<String>::parse(), Some("I"), "include", None)?;
    run(&mut node, &["tool", "-l", "1", "-I", "a", "-l", "3", "-I", "b"])?;
    ensure!(level.value() == 3);
    ensure!(include.values() == ["a", "b"]);
    Ok(())
}

#[rstest]
fn descriptions_become_handler_docs() -> Result<()> {
    let mut node = CliNode::root("tool", None);
    node.counted_flag(Some("v"), "verbose", Some("Repeat for more output"))?;
    node.arg_list_variable(Coercion::<String>::parse(), "files", Some("Inputs"), false)?;
    let mut help: Vec<u8> = Vec::new();
    node.write_help(&mut help, 0)?;
    let help = String::from_utf8(help)?;
    ensure!(help.starts_with("tool [options] files:String...\n"), "got:\n{help}");
    ensure!(help.contains("\n  files\n    Inputs\n"), "got:\n{help}");
    ensure!(
        help.contains("\n  -v|--verbose\n    Repeat for more output\n"),
        "got:\n{help}"
    );
    Ok(())
}

#[rstest]
fn required_list_needs_one_value() -> Result<()> {
    let mut node = CliNode::root("tool", None);
    let files = node.arg_list_variable(Coercion::<String>::parse(), "files", None, true)?;
    let err = node
        .try_process(["tool"], &mut Vec::<u8>::new())
        .err()
        .map(|err| err.to_string());
    ensure!(err.as_deref() == Some("files not set"));
    ensure!(!files.is_set());
    run(&mut node, &["tool", "a"])?;
    ensure!(files.is_set());
    Ok(())
}
