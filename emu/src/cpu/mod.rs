pub mod arm;

#[allow(clippy::module_name_repetitions)]
pub mod arm2;
pub mod condition;
pub mod cpu_modes;
pub mod exception;
pub mod fault;
pub mod flags;
pub mod psr;
pub mod registers;
