//! Port view of the interval timer (`0x40..=0x43`).

use xt_platform::io::PortIoDevice;

pub use xt_timers::pit::{Pit8253, PIT_CH0, PIT_CMD};

#[derive(Debug, Clone, Default)]
pub struct Pit8253Port {
    pit: Pit8253,
}

impl Pit8253Port {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pit(&self) -> &Pit8253 {
        &self.pit
    }

    pub fn pit_mut(&mut self) -> &mut Pit8253 {
        &mut self.pit
    }
}

impl PortIoDevice for Pit8253Port {
    fn claims(&self, port: u16) -> bool {
        (PIT_CH0..=PIT_CMD).contains(&port)
    }

    fn read(&mut self, port: u16) -> u8 {
        self.pit.port_read_u8(port)
    }

    fn write(&mut self, port: u16, value: u8) {
        self.pit.port_write_u8(port, value);
    }

    fn reset(&mut self) {
        self.pit.reset();
    }
}
