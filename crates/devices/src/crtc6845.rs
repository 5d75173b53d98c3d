//! Motorola 6845 CRT controller as wired on a CGA card (`0x3D0..=0x3DF`).
//!
//! The register file is only stored; rendering reads the cursor registers
//! out of it. The status port fakes alternating retrace phases so that BIOS
//! polling loops make progress.

use xt_platform::io::PortIoDevice;

pub const CRTC_BASE: u16 = 0x3D0;
pub const CRTC_LEN: u16 = 0x10;

pub const CRTC_INDEX: u16 = 0x3D4;
pub const CRTC_DATA: u16 = 0x3D5;
pub const CGA_STATUS: u16 = 0x3DA;

/// R0..=R17.
pub const CRTC_REGISTERS: usize = 18;

pub const REG_CURSOR_START: usize = 0x0A;
pub const REG_CURSOR_HIGH: usize = 0x0E;
pub const REG_CURSOR_LOW: usize = 0x0F;

/// Status values returned on successive reads: vertical retrace, idle,
/// horizontal retrace, idle.
const RETRACE_SEQUENCE: [u8; 4] = [0x08, 0x00, 0x01, 0x00];

#[derive(Debug, Clone, Default)]
pub struct Crtc6845 {
    index: u8,
    registers: [u8; CRTC_REGISTERS],
    retrace: usize,
}

impl Crtc6845 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `index`; 0 past R17.
    pub fn register(&self, index: usize) -> u8 {
        self.registers.get(index).copied().unwrap_or(0)
    }

    /// Cursor address in character cells (R14:R15).
    pub fn cursor_location(&self) -> u16 {
        u16::from_be_bytes([
            self.registers[REG_CURSOR_HIGH],
            self.registers[REG_CURSOR_LOW],
        ])
    }

    pub fn cursor_start(&self) -> u8 {
        self.registers[REG_CURSOR_START]
    }

    fn status(&mut self) -> u8 {
        self.retrace = (self.retrace + 1) % RETRACE_SEQUENCE.len();
        RETRACE_SEQUENCE[self.retrace]
    }
}

impl PortIoDevice for Crtc6845 {
    fn claims(&self, port: u16) -> bool {
        (CRTC_BASE..CRTC_BASE + CRTC_LEN).contains(&port)
    }

    fn read(&mut self, port: u16) -> u8 {
        match port {
            CGA_STATUS => self.status(),
            _ => 0,
        }
    }

    fn write(&mut self, port: u16, value: u8) {
        match port {
            CRTC_INDEX => self.index = value,
            CRTC_DATA => {
                if let Some(reg) = self.registers.get_mut(usize::from(self.index)) {
                    *reg = value;
                }
            }
            _ => {}
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
