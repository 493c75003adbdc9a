//! Rendering greetings.

use std::io::{self, Write};

/// Message selected by the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Greet everyone in `names`, or the world when nobody is named.
    Greeting {
        /// Opening word.
        salutation: String,
        /// People greeted.
        names: Vec<String>,
        /// End with `!`.
        excited: bool,
    },
    /// Say goodbye to one person.
    Farewell {
        /// Closing word.
        farewell: String,
        /// Person leaving.
        name: String,
    },
}

impl Plan {
    /// The rendered line, without a trailing newline.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Greeting {
                salutation,
                names,
                excited,
            } => {
                let audience = match names.as_slice() {
                    [] => String::from("World"),
                    [only] => only.clone(),
                    [init @ .., last] => format!("{} and {last}", init.join(", ")),
                };
                let mark = if *excited { '!' } else { '.' };
                format!("{}, {audience}{mark}", salutation.trim())
            }
            Self::Farewell { farewell, name } => format!("{farewell}, {name}."),
        }
    }

    /// Writes the rendered line to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if `out` cannot be written.
    pub fn write_to(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", self.render())
    }
}
