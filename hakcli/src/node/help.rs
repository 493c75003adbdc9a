//! Help rendering.
//!
//! Each line is wrapped separately and indented two spaces per level. A root
//! node renders as:
//!
//! ```text
//! tool [options] input:file_path pair:(a:u32 b)...
//! Describes the tool
//!   input
//!     What the input is
//! Options:
//!   -v|--verbose
//!     Talk more
//! Subcommands:
//!   sub [options]
//!     Describes the subcommand
//!     Options:
//!       -f|--force
//! ```
//!
//! Help printer output follows, keeping the indentation the printer wrote.

use std::io::{self, Write};

use super::{CliNode, Command};
use crate::handler::Param;
use crate::text::{self, DEFAULT_WIDTH, terminal_width, write_indented};

impl CliNode {
    /// Writes this node's help and that of every descendant to `out`,
    /// wrapped at 80 columns and starting `indent` levels deep.
    ///
    /// # Errors
    ///
    /// Propagates write failures and errors returned by help printers.
    pub fn write_help(&self, out: &mut dyn Write, indent: usize) -> io::Result<()> {
        self.render_help(out, indent, DEFAULT_WIDTH)
    }

    /// Writes the help tree to stdout, wrapped at the terminal width.
    ///
    /// # Errors
    ///
    /// Propagates write failures and errors returned by help printers.
    pub fn print_help(&self) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        self.render_help(&mut stdout, 0, terminal_width())
    }

    pub(super) fn render_help(
        &self,
        out: &mut dyn Write,
        indent: usize,
        width: usize,
    ) -> io::Result<()> {
        let nested = usize::from(indent > 0);
        let heading = indent + nested;
        let entry = indent + 1 + nested;
        let detail = indent + 2 + nested;

        write_indented(out, &self.usage(), indent, width)?;
        if let Some(description) = &self.description {
            write_indented(out, description, heading, width)?;
        }

        for argument in &self.arguments {
            if let Some(doc) = argument.handler.documentation() {
                write_indented(out, &argument.ident, entry, width)?;
                write_indented(out, doc, detail, width)?;
            }
        }

        if !self.commands.is_empty() {
            write_indented(out, "Options:", heading, width)?;
            for command in &self.commands {
                write_indented(out, &command.synopsis(), entry, width)?;
                if let Some(doc) = command.handler.documentation() {
                    write_indented(out, doc, detail, width)?;
                }
            }
        }

        if !self.subcommand_order.is_empty() {
            write_indented(out, "Subcommands:", heading, width)?;
            for child in self.ordered_subcommands() {
                child.render_help(out, entry, width)?;
            }
        }

        for printer in &self.help_printers {
            let mut buffer: Vec<u8> = Vec::new();
            printer(&mut buffer)?;
            for line in String::from_utf8_lossy(&buffer).lines() {
                let line = line.trim_end();
                let body = line.trim_start();
                let lead = line.get(..line.len() - body.len()).unwrap_or_default();
                text::write_filled(out, body, lead, width)?;
            }
        }
        Ok(())
    }

    fn usage(&self) -> String {
        let mut usage = self.name.clone();
        if !self.commands.is_empty() {
            usage.push_str(" [options]");
        }
        for argument in &self.arguments {
            usage.push(' ');
            usage.push_str(&argument.ident);
            match argument.handler.parameters() {
                [single] => {
                    if let Some(type_name) = single.type_name() {
                        usage.push(':');
                        usage.push_str(type_name);
                    }
                }
                params => {
                    let signature: Vec<String> = params.iter().map(Param::signature).collect();
                    usage.push_str(":(");
                    usage.push_str(&signature.join(" "));
                    usage.push(')');
                }
            }
            if argument.repeated {
                usage.push_str("...");
            }
        }
        usage
    }
}

impl Command {
    fn synopsis(&self) -> String {
        let mut synopsis = match (self.short, &self.long) {
            (Some(short), Some(long)) => format!("-{short}|--{long}"),
            (Some(short), None) => format!("-{short}"),
            (None, Some(long)) => format!("--{long}"),
            (None, None) => self.handler.name().to_owned(),
        };
        for param in self.handler.parameters() {
            synopsis.push(' ');
            synopsis.push_str(&param.signature());
        }
        synopsis
    }
}
