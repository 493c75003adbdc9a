//! Command-line tree for the demo.

use std::io::Write;

use hakcli::coerce::Coercion;
use hakcli::{
    Activation, ArgListVariable, ArgVariable, CliNode, CountedFlag, Flag, HandlerError,
    ParseError, ParseOutcome, Variable,
};
use tracing::Level;

use crate::error::Result;
use crate::message::Plan;
use crate::settings::{LOG_ENV, Settings, WORKDIR_FILE};

/// Parsed command line and the handles its values land in.
pub struct CommandLine {
    root: CliNode,
    verbose: CountedFlag,
    salutation: Variable<String>,
    excited: Flag,
    names: ArgListVariable<String>,
    take_leave: Activation,
    farewell: Variable<String>,
    leaver: ArgVariable<String>,
    recipients: Vec<String>,
    excited_by_default: bool,
}

impl CommandLine {
    /// Builds the tree with defaults taken from `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree is declared inconsistently.
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut root = CliNode::root("hello_hak", Some("Greets people, politely or otherwise."));
        let verbose = root.counted_flag(Some("v"), "verbose", Some("Log more; repeatable"))?;
        let salutation = root.variable(
            Coercion::<String>::parse(),
            settings.salutation.clone(),
            Some("s"),
            "salutation",
            Some("Word opening the greeting"),
        )?;
        let excited = root.flag(Some("x"), "excited", Some("End with an exclamation mark"))?;
        let names = root.arg_list_variable(
            Coercion::<String>::parse(),
            "names",
            Some("People to greet"),
            false,
        )?;
        let check_salutation = salutation.clone();
        root.check(move || {
            if check_salutation.value().trim().is_empty() {
                Err(HandlerError::new("salutation must contain visible characters"))
            } else {
                Ok(())
            }
        });
        root.help_printer(|out| {
            writeln!(out, "Config files:")?;
            writeln!(
                out,
                "  $XDG_CONFIG_HOME/hello_hak/*.cfg (default ~/hello_hak/*.cfg),"
            )?;
            writeln!(out, "  then the nearest {WORKDIR_FILE}")?;
            writeln!(out, "Set {LOG_ENV} to a level to log while they load.")
        });

        let leave = root.subcommand("take-leave", Some("Say goodbye to someone"), true)?;
        let farewell = leave.variable(
            Coercion::<String>::parse(),
            settings.farewell.clone(),
            Some("f"),
            "farewell",
            Some("Word used to say goodbye"),
        )?;
        let leaver = leave.arg_variable(
            Coercion::<String>::parse(),
            String::new(),
            "name",
            Some("Who is leaving"),
            true,
        )?;
        let take_leave = leave.activation();

        Ok(Self {
            root,
            verbose,
            salutation,
            excited,
            names,
            take_leave,
            farewell,
            leaver,
            recipients: settings.recipients.clone(),
            excited_by_default: settings.excited,
        })
    }

    /// Parses the process arguments, exiting on help, completion or error.
    pub fn parse_env(&mut self) {
        self.root.process_env();
    }

    /// Parses `argv`, sending help and completions to `out`.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseError`] that rejected the command line.
    pub fn try_parse<I, S>(&mut self, argv: I, out: &mut dyn Write) -> Result<ParseOutcome, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.root.try_process(argv, out)
    }

    /// Log level implied by the number of `-v` switches.
    #[must_use]
    pub fn log_level(&self) -> Level {
        match self.verbose.count() {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// What to print for the parsed command line.
    #[must_use]
    pub fn plan(&self) -> Plan {
        if self.take_leave.is_set() {
            return Plan::Farewell {
                farewell: self.farewell.value(),
                name: self.leaver.value(),
            };
        }
        let names = if self.names.is_set() {
            self.names.values()
        } else {
            self.recipients.clone()
        };
        Plan::Greeting {
            salutation: self.salutation.value(),
            names,
            excited: self.excited_by_default || self.excited.value(),
        }
    }
}
