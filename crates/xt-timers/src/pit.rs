//! Intel 8253 programmable interval timer, clocked by the processor.
//!
//! The timer has no time base of its own: the core calls [`Pit8253::tick`]
//! once per four consumed clock cycles. Modes 0, 2 and 3 count; the gated
//! modes (1, 4, 5) are accepted but hold their counter.

use tracing::debug;

pub const PIT_CH0: u16 = 0x40;
pub const PIT_CH1: u16 = 0x41;
pub const PIT_CH2: u16 = 0x42;
pub const PIT_CMD: u16 = 0x43;

pub const CHANNELS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PitMode {
    #[default]
    InterruptOnTerminalCount = 0,
    OneShot = 1,
    RateGenerator = 2,
    SquareWaveGenerator = 3,
    SoftwareStrobe = 4,
    HardwareStrobe = 5,
}

impl PitMode {
    /// Decode the 3-bit mode field. 6 and 7 alias 2 and 3.
    pub fn from_bits(bits: u8) -> Self {
        let mut mode = bits & 0b111;
        if mode >= 6 {
            mode &= 0b11;
        }
        match mode {
            0 => PitMode::InterruptOnTerminalCount,
            1 => PitMode::OneShot,
            2 => PitMode::RateGenerator,
            3 => PitMode::SquareWaveGenerator,
            4 => PitMode::SoftwareStrobe,
            _ => PitMode::HardwareStrobe,
        }
    }

    fn output_high_on_load(self) -> bool {
        matches!(self, PitMode::RateGenerator | PitMode::SquareWaveGenerator)
    }
}

/// Read/load byte order selected by the control word's RL field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    /// RL = 00 on a control write: latch the count instead of reprogramming.
    Latch,
    LowOnly,
    HighOnly,
    #[default]
    LowHigh,
}

impl AccessMode {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => AccessMode::Latch,
            0b01 => AccessMode::LowOnly,
            0b10 => AccessMode::HighOnly,
            _ => AccessMode::LowHigh,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct PitChannel {
    mode: PitMode,
    access: AccessMode,
    reload: u16,
    count: u16,
    latch: u16,
    latched: bool,
    enabled: bool,
    output: bool,
    /// `true` when the next LowHigh transfer is the high byte.
    toggle: bool,
}

impl PitChannel {
    fn write_data(&mut self, value: u8) {
        let [lo, hi] = self.reload.to_le_bytes();
        let complete = match self.access {
            AccessMode::LowOnly | AccessMode::Latch => {
                self.reload = u16::from_le_bytes([value, hi]);
                true
            }
            AccessMode::HighOnly => {
                self.reload = u16::from_le_bytes([lo, value]);
                true
            }
            AccessMode::LowHigh => {
                if self.toggle {
                    self.reload = u16::from_le_bytes([lo, value]);
                } else {
                    self.reload = u16::from_le_bytes([value, hi]);
                }
                self.toggle = !self.toggle;
                !self.toggle
            }
        };
        if complete {
            self.count = self.reload;
            self.enabled = true;
            self.output = self.mode.output_high_on_load();
        }
    }

    fn read_data(&mut self) -> u8 {
        let val = if self.latched { self.latch } else { self.count };
        let [lo, hi] = val.to_le_bytes();
        let (byte, finished) = match self.access {
            AccessMode::LowOnly | AccessMode::Latch => (lo, true),
            AccessMode::HighOnly => (hi, true),
            AccessMode::LowHigh => {
                let byte = if self.toggle { hi } else { lo };
                self.toggle = !self.toggle;
                (byte, !self.toggle)
            }
        };
        if finished {
            self.latched = false;
        }
        byte
    }

    /// Advance by one input clock. Returns the new output level.
    fn tick(&mut self) -> bool {
        if !self.enabled {
            return self.output;
        }
        match self.mode {
            PitMode::InterruptOnTerminalCount => {
                self.count = self.count.wrapping_sub(1);
                if self.count == 0 {
                    self.output = true;
                }
            }
            PitMode::RateGenerator => {
                self.count = self.count.wrapping_sub(1);
                if self.count == 1 {
                    self.count = self.reload;
                    self.output = false;
                } else {
                    self.output = true;
                }
            }
            PitMode::SquareWaveGenerator => {
                let step = match (self.count & 1 == 1, self.output) {
                    (true, true) => 1,
                    (true, false) => 3,
                    (false, _) => 2,
                };
                self.count = self.count.wrapping_sub(step);
                if self.count == 0 {
                    self.count = self.reload;
                    self.output = !self.output;
                }
            }
            PitMode::OneShot | PitMode::SoftwareStrobe | PitMode::HardwareStrobe => {}
        }
        self.output
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pit8253 {
    channels: [PitChannel; CHANNELS],
}

impl Pit8253 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Write to the control register (port 0x43).
    pub fn write_command(&mut self, value: u8) {
        let sc = usize::from(value >> 6);
        let Some(ch) = self.channels.get_mut(sc) else {
            // Read-back (SC = 11) is an 8254 feature.
            return;
        };
        let access = AccessMode::from_bits(value >> 4);
        if access == AccessMode::Latch {
            ch.latch = ch.count;
            ch.latched = true;
            return;
        }
        ch.mode = PitMode::from_bits(value >> 1);
        ch.access = access;
        ch.toggle = false;
        ch.latched = false;
        ch.enabled = false;
        debug!(channel = sc, mode = ?ch.mode, access = ?ch.access, "8253 channel reprogrammed");
    }

    pub fn port_read_u8(&mut self, port: u16) -> u8 {
        match port {
            PIT_CH0..=PIT_CH2 => self.channels[usize::from(port - PIT_CH0)].read_data(),
            _ => 0,
        }
    }

    pub fn port_write_u8(&mut self, port: u16, value: u8) {
        match port {
            PIT_CH0..=PIT_CH2 => self.channels[usize::from(port - PIT_CH0)].write_data(value),
            PIT_CMD => self.write_command(value),
            _ => {}
        }
    }

    /// Advance every channel by one input clock. Returns `true` when channel 0
    /// (the system timer, wired to IRQ 0) produced a rising output edge.
    pub fn tick(&mut self) -> bool {
        let mut irq0 = false;
        for (i, ch) in self.channels.iter_mut().enumerate() {
            let before = ch.output;
            let after = ch.tick();
            if i == 0 && !before && after {
                irq0 = true;
            }
        }
        irq0
    }

    /// Live counter of `channel`.
    pub fn channel_count(&self, channel: usize) -> u16 {
        self.channels.get(channel).map_or(0, |ch| ch.count)
    }

    pub fn output(&self, channel: usize) -> bool {
        self.channels.get(channel).is_some_and(|ch| ch.output)
    }

    pub fn mode(&self, channel: usize) -> Option<PitMode> {
        self.channels.get(channel).map(|ch| ch.mode)
    }
}
