//! # Disassembly Output
//!
//! Every step produces one line:
//!
//! ```text
//! 03800000  EA00000E  B 0x03800040
//! ^fetch    ^word     ^mnemonic
//! ```
//!
//! The core hands these lines to a [`DisassemblySink`] and does not care
//! where they end up.

use crate::ring_buffer::RingBuffer;

/// Something that consumes one disassembly line per executed step.
pub trait DisassemblySink {
    fn consume(&mut self, line: String);
}

/// Forwards lines to `tracing` at trace level, target `emu::disassembly`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DisassemblySink for TracingSink {
    fn consume(&mut self, line: String) {
        tracing::trace!(target: "emu::disassembly", "{line}");
    }
}

impl DisassemblySink for Vec<String> {
    fn consume(&mut self, line: String) {
        self.push(line);
    }
}

impl DisassemblySink for RingBuffer<String> {
    fn consume(&mut self, line: String) {
        self.push(line);
    }
}

impl<S: DisassemblySink + ?Sized> DisassemblySink for &mut S {
    fn consume(&mut self, line: String) {
        (**self).consume(line);
    }
}

/// Formats a line as `AAAAAAAA  WWWWWWWW  text`.
#[must_use]
pub fn format_line(address: u32, word: u32, text: &str) -> String {
    format!("{address:08X}  {word:08X}  {text}")
}
