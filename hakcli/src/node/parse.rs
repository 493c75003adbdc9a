//! Argument-vector processing.

use std::io::{self, Write};
use std::ops::ControlFlow;

use colored::Colorize;

use super::CliNode;
use crate::error::ParseError;
use crate::handler::{Args, Handler, Invocation};
use crate::text::{DEFAULT_WIDTH, terminal_width};

/// Token that prints completion candidates instead of parsing further.
const COMPLETION_SENTINEL: &str = "--options";
/// Token after which every argument is taken literally.
const LITERAL_SWITCH: &str = "--";

/// How a successful parse ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Every token was consumed and all checks passed.
    Completed,
    /// Help or completion output was written; the host should stop.
    Exited,
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Command(usize),
    Argument(usize),
}

/// A handler that has been selected and is still collecting tokens.
struct Pending {
    target: Target,
    args: Args,
}

impl CliNode {
    /// Parses `argv`, whose first element is the program or subcommand name.
    ///
    /// Help and completion output go to `out`, wrapped at 80 columns. Checks
    /// registered on this node run after every token has been consumed.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for unknown switches, stray or invalid
    /// tokens, handlers left without their arguments, failing handlers or
    /// checks, and failures writing to `out`. Errors raised inside a
    /// subcommand propagate unchanged.
    pub fn try_process<I, S>(
        &mut self,
        argv: I,
        out: &mut dyn Write,
    ) -> Result<ParseOutcome, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        self.parse(&argv, out, DEFAULT_WIDTH)
    }

    /// Parses `argv` and terminates the process where the command line asks
    /// for it.
    ///
    /// Returns normally when parsing completed. Exits with status 0 after help
    /// or completion output. On a [`ParseError`] the help tree and the error
    /// are written to stderr and the process exits with status 1.
    pub fn process<I, S>(&mut self, argv: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        let width = terminal_width();
        let outcome = {
            let mut stdout = io::stdout().lock();
            self.parse(&argv, &mut stdout, width)
                .and_then(|outcome| {
                    stdout.flush().map(|()| outcome).map_err(ParseError::from)
                })
        };
        match outcome {
            Ok(ParseOutcome::Completed) => {}
            Ok(ParseOutcome::Exited) => std::process::exit(0),
            Err(err) => {
                tracing::debug!(error = %err, "command line rejected");
                let mut stderr = io::stderr().lock();
                // Exiting regardless; a closed stderr leaves nowhere to report.
                let _unused = self.report(&mut stderr, &err, width);
                std::process::exit(1);
            }
        }
    }

    /// [`CliNode::process`] over the arguments this process was started with.
    pub fn process_env(&mut self) {
        self.process(std::env::args_os().map(|arg| arg.to_string_lossy().into_owned()));
    }

    fn report(&self, out: &mut dyn Write, err: &ParseError, width: usize) -> io::Result<()> {
        self.render_help(out, 0, width)?;
        writeln!(out, "{}: {err}", "Error".red().bold())
    }

    pub(super) fn parse(
        &mut self,
        argv: &[String],
        out: &mut dyn Write,
        width: usize,
    ) -> Result<ParseOutcome, ParseError> {
        self.activation.set();
        let mut literal = false;
        let mut next_argument = 0;
        let mut pending: Option<Pending> = None;

        for (position, token) in argv.iter().enumerate().skip(1) {
            if !literal && token == COMPLETION_SENTINEL {
                self.write_completions(pending.as_ref(), out)?;
                return Ok(ParseOutcome::Exited);
            }

            if !literal && token.starts_with('-') {
                if token == LITERAL_SWITCH {
                    literal = true;
                } else if let Some(long) = token.strip_prefix("--") {
                    let index = self
                        .by_long
                        .get(long)
                        .copied()
                        .ok_or_else(|| ParseError::UnknownSwitch(token.clone()))?;
                    if self.select(Target::Command(index), &mut pending, out, width)?.is_break() {
                        return Ok(ParseOutcome::Exited);
                    }
                } else {
                    for short in token.chars().skip(1) {
                        let index = self
                            .by_short
                            .get(&short)
                            .copied()
                            .ok_or_else(|| ParseError::UnknownSwitch(format!("-{short}")))?;
                        if self.select(Target::Command(index), &mut pending, out, width)?.is_break() {
                            return Ok(ParseOutcome::Exited);
                        }
                    }
                }
                continue;
            }

            if pending.is_none() {
                if let Some(child) = self.subcommands.get_mut(token.as_str()) {
                    tracing::debug!(subcommand = %token, "delegating to subcommand");
                    let tail = argv.get(position..).unwrap_or_default();
                    if child.parse(tail, out, width)? == ParseOutcome::Exited {
                        return Ok(ParseOutcome::Exited);
                    }
                    break;
                }
                let index = self
                    .positional_for(next_argument)
                    .ok_or_else(|| ParseError::StrayArgument(token.clone()))?;
                next_argument += 1;
                if self.select(Target::Argument(index), &mut pending, out, width)?.is_break() {
                    return Ok(ParseOutcome::Exited);
                }
            }

            if let Some(mut current) = pending.take() {
                if self.accept(&mut current, token)? {
                    if self.invoke(current.target, current.args, out, width)?.is_break() {
                        return Ok(ParseOutcome::Exited);
                    }
                } else {
                    pending = Some(current);
                }
            }
        }

        if let Some(current) = pending {
            let params = self
                .handler(current.target)
                .parameters()
                .iter()
                .skip(current.args.len())
                .map(|param| param.name().to_owned())
                .collect();
            return Err(ParseError::MissingArguments {
                handler: self.ident(current.target),
                params,
            });
        }

        for check in &mut self.checks {
            check()?;
        }
        Ok(ParseOutcome::Completed)
    }

    /// Makes `target` the active handler, dropping any unfinished binding.
    fn select(
        &mut self,
        target: Target,
        pending: &mut Option<Pending>,
        out: &mut dyn Write,
        width: usize,
    ) -> Result<ControlFlow<()>, ParseError> {
        *pending = None;
        if self.handler(target).arity() > 0 {
            *pending = Some(Pending {
                target,
                args: Args::default(),
            });
            return Ok(ControlFlow::Continue(()));
        }
        self.invoke(target, Args::default(), out, width)
    }

    /// Coerces `token` into the next parameter; `true` once the signature is
    /// full.
    fn accept(&self, current: &mut Pending, token: &str) -> Result<bool, ParseError> {
        let handler = self.handler(current.target);
        if let Some(param) = handler.parameters().get(current.args.len()) {
            let value = param
                .coerce(token)
                .map_err(|source| ParseError::InvalidArgument {
                    handler: self.ident(current.target),
                    param: param.name().to_owned(),
                    source,
                })?;
            current.args.push(value);
        }
        Ok(current.args.len() >= handler.arity())
    }

    fn invoke(
        &mut self,
        target: Target,
        mut args: Args,
        out: &mut dyn Write,
        width: usize,
    ) -> Result<ControlFlow<()>, ParseError> {
        match self.handler_mut(target).invoke(&mut args)? {
            Invocation::Done => Ok(ControlFlow::Continue(())),
            Invocation::ShowHelp => {
                self.render_help(out, 0, width)?;
                Ok(ControlFlow::Break(()))
            }
        }
    }

    /// Positional handler for the `cursor`-th positional token; the repeated
    /// tail absorbs everything past the end.
    fn positional_for(&self, cursor: usize) -> Option<usize> {
        if cursor < self.arguments.len() {
            Some(cursor)
        } else if self.arguments.last().is_some_and(|arg| arg.repeated) {
            self.arguments.len().checked_sub(1)
        } else {
            None
        }
    }

    fn write_completions(&self, pending: Option<&Pending>, out: &mut dyn Write) -> io::Result<()> {
        let Some(current) = pending else {
            for short in self.commands.iter().filter_map(|command| command.short) {
                writeln!(out, "-{short}")?;
            }
            for long in self.commands.iter().filter_map(|command| command.long.as_deref()) {
                writeln!(out, "--{long}")?;
            }
            return Ok(());
        };
        let handler = self.handler(current.target);
        if let Some(candidates) = handler.completion_candidates(&current.args) {
            writeln!(out, "{}", candidates.join(" "))?;
        }
        if let Some(param) = handler.parameters().get(current.args.len())
            && !param.candidates().is_empty()
        {
            writeln!(out, "{}", param.candidates().join(" "))?;
        }
        Ok(())
    }

    #[expect(
        clippy::indexing_slicing,
        reason = "targets are only built from indices into this node's tables"
    )]
    fn handler(&self, target: Target) -> &Handler {
        match target {
            Target::Command(index) => &self.commands[index].handler,
            Target::Argument(index) => &self.arguments[index].handler,
        }
    }

    #[expect(
        clippy::indexing_slicing,
        reason = "targets are only built from indices into this node's tables"
    )]
    fn handler_mut(&mut self, target: Target) -> &mut Handler {
        match target {
            Target::Command(index) => &mut self.commands[index].handler,
            Target::Argument(index) => &mut self.arguments[index].handler,
        }
    }

    fn ident(&self, target: Target) -> String {
        match target {
            Target::Command(index) => self
                .commands
                .get(index)
                .map(super::Command::ident)
                .unwrap_or_default(),
            Target::Argument(index) => self
                .arguments
                .get(index)
                .map(|arg| arg.ident.clone())
                .unwrap_or_default(),
        }
    }
}
