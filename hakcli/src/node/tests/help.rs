//! Help layout.

use std::io::Write;

use anyhow::{Result, ensure};
use rstest::{fixture, rstest};

use crate::coerce::Coercion;
use crate::handler::{Handler, Param};
use crate::node::CliNode;

#[fixture]
fn tree() -> Result<CliNode> {
    let mut root = CliNode::root("tool", Some("Does things"));
    root.flag(Some("v"), "verbose", Some("Talk more"))?;
    root.variable(Coercion::<u32>::parse(), 0, Some("n"), "num", None)?;
    root.argument(
        Handler::new("input", |_| Ok(()))
            .param(Param::raw("path"))
            .doc("File to read"),
        false,
        None,
    )?;
    root.argument(
        Handler::new("pair", |_| Ok(()))
            .param(Param::typed("a", Coercion::<u32>::parse()))
            .param(Param::raw("b")),
        true,
        None,
    )?;
    let sub = root.subcommand("sub", Some("Sub things"), true)?;
    sub.flag(Some("f"), "force", None)?;
    root.help_printer(|out: &mut dyn Write| writeln!(out, "Notes:\n  indented note   "));
    Ok(root)
}

fn render(node: &CliNode, indent: usize) -> Result<String> {
    let mut out: Vec<u8> = Vec::new();
    node.write_help(&mut out, indent)?;
    Ok(String::from_utf8(out)?)
}

#[rstest]
fn renders_the_whole_tree(tree: Result<CliNode>) -> Result<()> {
    let text = render(&tree?, 0)?;
    let expected = "\
tool [options] input pair:(a:u32 b)...
Does things
  input
    File to read
Options:
  -h|--help
    Print this help text and exit normally
  -v|--verbose
    Talk more
  -n|--num value:u32
Subcommands:
  sub [options]
    Sub things
    Options:
      -f|--force
Notes:
  indented note
";
    ensure!(text == expected, "got:\n{text}");
    Ok(())
}

#[rstest]
fn nested_rendering_shifts_every_section(tree: Result<CliNode>) -> Result<()> {
    let tree = tree?;
    let text = render(&tree, 2)?;
    ensure!(text.starts_with("    tool [options]"), "got:\n{text}");
    ensure!(text.contains("\n      Does things\n"), "got:\n{text}");
    ensure!(text.contains("\n      Options:\n        -h|--help\n"), "got:\n{text}");
    ensure!(text.contains("\n        sub [options]\n          Sub things\n"), "got:\n{text}");
    // Printer output keeps its own indentation.
    ensure!(text.ends_with("Notes:\n  indented note\n"), "got:\n{text}");
    Ok(())
}

#[rstest]
fn single_typed_positionals_show_their_type() -> Result<()> {
    let mut node = CliNode::new("count", None);
    node.arg_variable(Coercion::<u64>::parse(), 0, "limit", None, false)?;
    ensure!(render(&node, 0)? == "count limit:u64\n");
    Ok(())
}

#[rstest]
fn long_descriptions_wrap_at_eighty_columns() -> Result<()> {
    let description = "word ".repeat(30);
    let node = CliNode::new("wrap", Some(description.trim_end()));
    let text = render(&node, 0)?;
    let lines: Vec<&str> = text.lines().collect();
    ensure!(lines.len() > 2, "got:\n{text}");
    ensure!(lines.iter().all(|line| line.len() <= 80), "got:\n{text}");
    Ok(())
}
