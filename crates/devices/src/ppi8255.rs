//! Intel 8255 programmable peripheral interface (ports `0x60..=0x63`).
//!
//! On the XT, port A carries the last keyboard scan code. The rest of the
//! chip is a plain byte latch.

use tracing::debug;
use xt_platform::io::PortIoDevice;

pub const PPI_BASE: u16 = 0x60;
pub const PPI_LEN: u16 = 4;

/// Power-on value of port A.
pub const PORT_A_RESET: u8 = 0x2C;

#[derive(Debug, Clone)]
pub struct Ppi8255 {
    ports: [u8; 4],
}

impl Ppi8255 {
    pub fn new() -> Self {
        Self {
            ports: [PORT_A_RESET, 0, 0, 0],
        }
    }

    /// Latch a scan code into port A. The caller raises IRQ 1.
    pub fn key_typed(&mut self, scan_code: u8) {
        debug!(scan_code, "key typed");
        self.ports[0] = scan_code;
    }

    pub fn last_scan_code(&self) -> u8 {
        self.ports[0]
    }
}

impl Default for Ppi8255 {
    fn default() -> Self {
        Self::new()
    }
}

impl PortIoDevice for Ppi8255 {
    fn claims(&self, port: u16) -> bool {
        (PPI_BASE..PPI_BASE + PPI_LEN).contains(&port)
    }

    fn read(&mut self, port: u16) -> u8 {
        self.ports[usize::from(port & 0b11)]
    }

    fn write(&mut self, port: u16, value: u8) {
        self.ports[usize::from(port & 0b11)] = value;
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
