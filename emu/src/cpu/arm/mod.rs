//! # ARM2 Instruction Set (32-bit)
//!
//! Every instruction is conditional.
//!
//! ## Format
//!
//! ```text
//! 31-28   27-25   24-0
//! [Cond] [Class] [Instruction-specific]
//! ```
//!
//! - **Condition (bits 28-31)**: See [`condition`](super::condition)
//! - **Class (bits 25-27)**: See [`instructions`]
//!
//! ## Submodules
//!
//! - [`instructions`] - Decoding (`From<u32>`) and disassembly
//! - [`operations`] - Execution
//! - [`mode`] - Fetched word with its decoding

#[allow(clippy::cast_possible_truncation)]
pub mod instructions;

pub mod mode;

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::similar_names)]
pub mod operations;
