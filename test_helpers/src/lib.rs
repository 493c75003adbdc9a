//! Test helpers shared across the hakcli workspace.
//!
//! Provides RAII guards for the two pieces of process-global state the config
//! loader reads (environment variables and the working directory) and a
//! cloneable in-memory writer for capturing output.

pub mod capture;
pub mod cwd;
pub mod env;
