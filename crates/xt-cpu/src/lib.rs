//! Cycle-counted 16-bit real-mode processor core.
//!
//! The core owns 1 MiB of physical memory and talks to the rest of the
//! machine through [`IoBus`]: port I/O, the timer tick derived from consumed
//! clock cycles, and the interrupt controller.

#![forbid(unsafe_code)]

pub mod alu;
pub mod bus;
mod cpu;
pub mod decode;
mod exec;
pub mod mem;
pub mod mnemonic;
pub mod state;

pub use bus::{IoBus, NullIoBus};
pub use cpu::{is_string_op, Cpu, RunExit, StepOutcome, HALT_IDLE_CLOCKS};
pub use mem::{Memory, MemoryError};
pub use state::{seg_off, CpuState, Flags, Reg16, SegReg, Width};
