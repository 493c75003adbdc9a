//! Unit tests for command tree registration, parsing and help rendering.

mod help;
