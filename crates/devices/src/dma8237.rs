//! Intel 8237 DMA controller register file (ports `0x00..=0x1F`).
//!
//! Only the per-channel address and count registers are modelled, each
//! accessed as two byte transfers through a per-channel flip-flop. No
//! transfers ever take place; the BIOS merely programs and reads them back.

use xt_platform::io::PortIoDevice;

pub const DMA_BASE: u16 = 0x00;
pub const DMA_LEN: u16 = 0x20;

const CHANNELS: usize = 4;

#[derive(Debug, Clone, Default)]
pub struct Dma8237 {
    addr: [u16; CHANNELS],
    count: [u16; CHANNELS],
    /// `true` when the next access to a channel register is the high byte.
    flip_flop: [bool; CHANNELS],
}

impl Dma8237 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current address register of `channel`; 0 for channels past 3.
    pub fn address(&self, channel: usize) -> u16 {
        self.addr.get(channel).copied().unwrap_or(0)
    }

    pub fn count(&self, channel: usize) -> u16 {
        self.count.get(channel).copied().unwrap_or(0)
    }

    /// Register selected by `port`: `(channel, is_count)`.
    fn decode(port: u16) -> Option<(usize, bool)> {
        match port {
            0x00..=0x07 => Some((usize::from(port / 2), port & 1 != 0)),
            _ => None,
        }
    }

    fn toggle(&mut self, channel: usize) -> bool {
        let high = self.flip_flop[channel];
        self.flip_flop[channel] = !high;
        high
    }
}

impl PortIoDevice for Dma8237 {
    fn claims(&self, port: u16) -> bool {
        (DMA_BASE..DMA_BASE + DMA_LEN).contains(&port)
    }

    fn read(&mut self, port: u16) -> u8 {
        let Some((ch, is_count)) = Self::decode(port) else {
            return 0;
        };
        let high = self.toggle(ch);
        let reg = if is_count { self.count[ch] } else { self.addr[ch] };
        let [lo, hi] = reg.to_le_bytes();
        if high {
            hi
        } else {
            lo
        }
    }

    fn write(&mut self, port: u16, value: u8) {
        let Some((ch, is_count)) = Self::decode(port) else {
            return;
        };
        let high = self.toggle(ch);
        let reg = if is_count {
            &mut self.count[ch]
        } else {
            &mut self.addr[ch]
        };
        let [lo, hi] = reg.to_le_bytes();
        *reg = if high {
            u16::from_le_bytes([lo, value])
        } else {
            u16::from_le_bytes([value, hi])
        };
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
