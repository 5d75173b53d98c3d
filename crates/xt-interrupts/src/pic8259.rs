//! Single Intel 8259A programmable interrupt controller.
//!
//! Only the subset a single-controller XT needs is modelled: the
//! initialization command word sequence, the mask register and a
//! non-specific end-of-interrupt that retires every in-service line.
//! Priority is fixed, line 0 highest; there is no rotation and no cascade.

use tracing::debug;

pub const PIC_CMD: u16 = 0x20;
pub const PIC_DATA: u16 = 0x21;

/// ICW1 marker bit (written to the command port).
const ICW1_INIT: u8 = 0x10;
/// ICW1: single controller, no ICW3.
const ICW1_SINGLE: u8 = 0x02;
/// ICW1: ICW4 follows.
const ICW1_IC4: u8 = 0x01;
/// OCW2 non-specific end of interrupt.
const OCW2_EOI: u8 = 0x20;

const ICW_COUNT: usize = 4;

#[derive(Debug, Clone, Default)]
pub struct Pic8259 {
    irr: u8,
    imr: u8,
    isr: u8,
    icw: [u8; ICW_COUNT],
    /// Number of initialization words consumed. `0` means never initialized;
    /// [`ICW_COUNT`] means the sequence is complete.
    icw_step: usize,
}

impl Pic8259 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Latch a request on `line` (edge triggered; the bit stays set until acknowledged).
    pub fn raise_irq(&mut self, line: u8) {
        debug_assert!(line < 8, "IRQ line out of range: {line}");
        self.irr |= 1 << (line & 7);
    }

    /// Whether any unmasked request is waiting.
    pub fn has_pending(&self) -> bool {
        self.irr & !self.imr != 0
    }

    /// Accept the highest-priority unmasked request: clears its request bit,
    /// marks it in service and returns the vector (`ICW2 + line`).
    pub fn acknowledge(&mut self) -> Option<u8> {
        let pending = self.irr & !self.imr;
        if pending == 0 {
            return None;
        }
        let line = pending.trailing_zeros() as u8;
        let bit = 1u8 << line;
        self.irr &= !bit;
        self.isr |= bit;
        Some(self.vector_base().wrapping_add(line))
    }

    pub fn is_initialized(&self) -> bool {
        self.icw_step >= ICW_COUNT
    }

    /// ICW2 as programmed (0 before initialization).
    pub fn vector_base(&self) -> u8 {
        self.icw[1]
    }

    pub fn irr(&self) -> u8 {
        self.irr
    }

    pub fn imr(&self) -> u8 {
        self.imr
    }

    pub fn isr(&self) -> u8 {
        self.isr
    }

    pub fn port_read_u8(&self, port: u16) -> u8 {
        match port {
            PIC_CMD => self.irr,
            PIC_DATA => self.imr,
            _ => 0,
        }
    }

    pub fn port_write_u8(&mut self, port: u16, value: u8) {
        match port {
            PIC_CMD => self.write_command(value),
            PIC_DATA => self.write_data(value),
            _ => {}
        }
    }

    fn write_command(&mut self, value: u8) {
        if value & ICW1_INIT != 0 {
            self.imr = 0;
            self.icw = [0; ICW_COUNT];
            self.icw[0] = value;
            self.icw_step = 1;
        }
        if value & OCW2_EOI != 0 {
            self.isr = 0;
        }
    }

    fn write_data(&mut self, value: u8) {
        match self.icw_step {
            // A controller that was never programmed just takes the mask.
            0 => self.imr = value,
            1 => {
                self.icw[1] = value;
                self.icw_step = 2;
                if self.icw[0] & ICW1_SINGLE != 0 {
                    self.icw_step = 3;
                }
                self.skip_icw4();
            }
            2 => {
                self.icw[2] = value;
                self.icw_step = 3;
                self.skip_icw4();
            }
            3 => {
                self.icw[3] = value;
                self.icw_step = ICW_COUNT;
                self.log_initialized();
            }
            _ => self.imr = value,
        }
    }

    fn skip_icw4(&mut self) {
        if self.icw_step == 3 && self.icw[0] & ICW1_IC4 == 0 {
            self.icw_step = ICW_COUNT;
            self.log_initialized();
        }
    }

    fn log_initialized(&self) {
        debug!(
            icw1 = self.icw[0],
            vector_base = self.icw[1],
            "8259 initialization complete"
        );
    }
}
