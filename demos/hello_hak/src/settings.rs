//! Config-file settings that seed the command-line defaults.

use std::cell::RefCell;
use std::rc::Rc;

use hakcli::coerce::{self, Coercion};
use hakcli::config::{ConfigSources, ConfigTable};
use hakcli::handler::{Handler, Param};
use tracing::Level;

use crate::error::Result;

/// Directory under the config home holding `*.cfg` files.
pub const CONFIG_DIR: &str = "hello_hak";
/// Per-project file looked up from the working directory upwards.
pub const WORKDIR_FILE: &str = ".hello_hak.cfg";
/// Environment variable naming the log level used while settings load.
pub const LOG_ENV: &str = "HELLO_HAK_LOG";

/// Values a config file may set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Word opening every greeting.
    pub salutation: String,
    /// End greetings with `!` instead of `.`.
    pub excited: bool,
    /// Word used by `take-leave`.
    pub farewell: String,
    /// People greeted when none are named on the command line.
    pub recipients: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            salutation: String::from("Hello"),
            excited: false,
            farewell: String::from("Goodbye"),
            recipients: Vec::new(),
        }
    }
}

/// Options understood in config files, writing into `settings`:
///
/// ```text
/// salutation <text>
/// excited [on]
/// farewell <text>
/// recipients <name> <name...>
/// ```
///
/// # Errors
///
/// Returns an error if an option is declared twice.
pub fn config_table(settings: &Rc<RefCell<Settings>>) -> Result<ConfigTable> {
    let mut table = ConfigTable::new();

    let target = Rc::clone(settings);
    table.option(
        "salutation",
        Handler::unary("salutation", "text", Coercion::<String>::parse(), move |text| {
            target.borrow_mut().salutation = text;
        })
        .doc("Word opening every greeting"),
    )?;

    let target = Rc::clone(settings);
    table.option(
        "excited",
        Handler::new("excited", move |args| {
            target.borrow_mut().excited = args.take(0)?;
            Ok(())
        })
        .param(Param::typed("enabled", coerce::boolean()).with_default(true)),
    )?;

    let target = Rc::clone(settings);
    table.option(
        "farewell",
        Handler::unary("farewell", "text", Coercion::<String>::parse(), move |text| {
            target.borrow_mut().farewell = text;
        }),
    )?;

    let target = Rc::clone(settings);
    table.option(
        "recipients",
        Handler::new("recipients", move |args| {
            let mut names = vec![args.take::<String>(0)?];
            names.extend(args.take_rest::<String>(1)?);
            target.borrow_mut().recipients = names;
            Ok(())
        })
        .param(Param::raw("first"))
        .param(Param::raw("others").variadic()),
    )?;

    Ok(table)
}

/// Where settings are read from, in application order.
#[must_use]
pub fn sources() -> ConfigSources {
    ConfigSources::new()
        .config_dir(CONFIG_DIR)
        .workdir_file(WORKDIR_FILE, true)
}

/// Level to log at before the command line is parsed: `$HELLO_HAK_LOG` when
/// it names a level, otherwise `WARN`.
#[must_use]
pub fn initial_log_level() -> Level {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(Level::WARN)
}

/// Loads [`Settings`] from every file [`sources`] resolves to, exiting with
/// status 1 on the first discovery or load failure.
///
/// # Errors
///
/// Returns an error if the config table is declared inconsistently.
pub fn load() -> Result<Settings> {
    let settings = Rc::new(RefCell::new(Settings::default()));
    config_table(&settings)?.load_or_exit(&sources());
    let loaded = settings.borrow().clone();
    tracing::debug!(?loaded, "settings loaded");
    Ok(loaded)
}
