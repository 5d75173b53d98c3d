//! Port view of the interrupt controller.
//!
//! The controller model lives in `xt-interrupts`; this module claims its two
//! ports so it can sit on an [`xt_platform::io::IoPortBus`].

use xt_platform::io::PortIoDevice;

pub use xt_interrupts::pic8259::{Pic8259, PIC_CMD, PIC_DATA};

#[derive(Debug, Clone, Default)]
pub struct Pic8259Port {
    pic: Pic8259,
}

impl Pic8259Port {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pic(&self) -> &Pic8259 {
        &self.pic
    }

    pub fn pic_mut(&mut self) -> &mut Pic8259 {
        &mut self.pic
    }
}

impl PortIoDevice for Pic8259Port {
    fn claims(&self, port: u16) -> bool {
        matches!(port, PIC_CMD | PIC_DATA)
    }

    fn read(&mut self, port: u16) -> u8 {
        self.pic.port_read_u8(port)
    }

    fn write(&mut self, port: u16, value: u8) {
        self.pic.port_write_u8(port, value);
    }

    fn reset(&mut self) {
        self.pic.reset();
    }
}
