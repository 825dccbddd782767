#[allow(clippy::cast_possible_truncation)]
pub mod bitwise;

pub mod cpu;
pub mod disassembly;

#[allow(clippy::cast_possible_truncation)]
pub mod memory;
pub mod ring_buffer;

pub use cpu::arm2::{Arm2, MachineState, PIPELINE_OFFSET, StepOutcome};
pub use cpu::fault::{Fault, FaultKind};
pub use disassembly::{DisassemblySink, TracingSink};
pub use memory::{AccessDiagnostic, Memory, RAM_SIZE};
