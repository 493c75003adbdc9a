//! In-memory writer shared between the code under test and the assertion.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;

/// Cloneable byte sink; every clone appends to the same buffer.
///
/// Useful wherever the writer has to be handed over by value, such as a
/// `tracing_subscriber` writer factory.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Captured output decoded as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns an error if the captured bytes are not valid UTF-8.
    pub fn contents(&self) -> Result<String> {
        String::from_utf8(self.bytes.lock().clone()).context("captured output is not UTF-8")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_buffer() -> Result<()> {
        let buffer = SharedBuffer::default();
        let mut writer = buffer.clone();
        write!(writer, "hello ")?;
        buffer.clone().write_all(b"world")?;
        anyhow::ensure!(buffer.contents()? == "hello world");
        Ok(())
    }
}
