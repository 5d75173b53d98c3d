#![forbid(unsafe_code)]

pub mod chipset;
pub mod crtc6845;
pub mod dma8237;
pub mod pic8259;
pub mod pit8253;
pub mod ppi8255;

pub use chipset::{Chipset, Peripheral};
pub use crtc6845::Crtc6845;
pub use dma8237::Dma8237;
pub use pic8259::Pic8259Port;
pub use pit8253::Pit8253Port;
pub use ppi8255::Ppi8255;
