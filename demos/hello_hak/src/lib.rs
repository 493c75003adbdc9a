//! Greeting demo built on `hakcli`.
//!
//! Settings come from `$XDG_CONFIG_HOME/hello_hak/*.cfg` (`~/hello_hak` when
//! unset) and the nearest `.hello_hak.cfg` above the working directory, then
//! from the command line.

pub mod cli;
pub mod error;
pub mod message;
pub mod settings;
