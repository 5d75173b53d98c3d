#![forbid(unsafe_code)]

pub mod pit;

pub use pit::{AccessMode, Pit8253, PitMode};
