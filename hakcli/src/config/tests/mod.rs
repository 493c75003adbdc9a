//! Unit tests for config option binding and source discovery.

mod sources;
mod table;
