//! Text-mode snapshots handed to presentation code.
//!
//! The machine copies the 80x25 text window and the CRTC cursor registers
//! into an immutable [`TextFrame`] and swaps it into a [`FrameSlot`]. Readers
//! on other threads clone the `Arc` and render at their own pace.

use std::sync::{Arc, RwLock};

use xt_cpu::mem::{TEXT_COLUMNS, TEXT_ROWS, TEXT_SIZE};

pub type Rgb = [u8; 3];

/// The 16 CGA colours, indexed by attribute nibble.
pub const PALETTE: [Rgb; 16] = [
    [0x00, 0x00, 0x00],
    [0x00, 0x00, 0xAA],
    [0x00, 0xAA, 0x00],
    [0x00, 0xAA, 0xAA],
    [0xAA, 0x00, 0x00],
    [0xAA, 0x00, 0xAA],
    [0xAA, 0x55, 0x00],
    [0xAA, 0xAA, 0xAA],
    [0x55, 0x55, 0x55],
    [0x55, 0x55, 0xFF],
    [0x55, 0xFF, 0x55],
    [0x55, 0xFF, 0xFF],
    [0xFF, 0x55, 0x55],
    [0xFF, 0x55, 0xFF],
    [0xFF, 0xFF, 0x55],
    [0xFF, 0xFF, 0xFF],
];

/// Cursor-start bit that turns the cursor off.
const CURSOR_DISABLE: u8 = 0x20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextCell {
    pub ch: u8,
    pub attr: u8,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl TextCell {
    /// Foreground from the low nibble, background from bits 4..=6. Bit 7
    /// (blink) does not select a colour.
    pub fn from_bytes(ch: u8, attr: u8) -> Self {
        Self {
            ch,
            attr,
            fg: PALETTE[usize::from(attr & 0x0F)],
            bg: PALETTE[usize::from(attr >> 4 & 0x07)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFrame {
    bytes: Box<[u8]>,
    cursor_location: u16,
    cursor_start: u8,
}

impl TextFrame {
    /// Snapshot of a text window. `window` shorter than a full screen is
    /// padded with zeros.
    pub fn capture(window: &[u8], cursor_location: u16, cursor_start: u8) -> Self {
        let mut bytes = vec![0u8; TEXT_SIZE].into_boxed_slice();
        let len = window.len().min(TEXT_SIZE);
        bytes[..len].copy_from_slice(&window[..len]);
        Self {
            bytes,
            cursor_location,
            cursor_start,
        }
    }

    pub fn blank() -> Self {
        Self::capture(&[], 0, 0)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Character cell at `(col, row)`.
    ///
    /// # Panics
    ///
    /// Panics if the position lies outside the 80x25 screen.
    pub fn cell(&self, col: usize, row: usize) -> TextCell {
        assert!(
            col < TEXT_COLUMNS && row < TEXT_ROWS,
            "cell ({col}, {row}) outside the text screen"
        );
        let offset = (row * TEXT_COLUMNS + col) * 2;
        TextCell::from_bytes(self.bytes[offset], self.bytes[offset + 1])
    }

    pub fn cursor_location(&self) -> u16 {
        self.cursor_location
    }

    /// Cursor as `(col, row)`, or `None` when it is parked off screen.
    pub fn cursor_position(&self) -> Option<(usize, usize)> {
        let loc = usize::from(self.cursor_location);
        (loc < TEXT_COLUMNS * TEXT_ROWS).then(|| (loc % TEXT_COLUMNS, loc / TEXT_COLUMNS))
    }

    pub fn cursor_start(&self) -> u8 {
        self.cursor_start
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_start & CURSOR_DISABLE == 0
    }

    /// Printable rendering of one row: ASCII passes through, everything else
    /// becomes a space.
    pub fn row_text(&self, row: usize) -> String {
        (0..TEXT_COLUMNS)
            .map(|col| {
                let ch = self.cell(col, row).ch;
                if ch.is_ascii_graphic() {
                    char::from(ch)
                } else {
                    ' '
                }
            })
            .collect()
    }

    /// The whole screen as text, trailing blanks trimmed per row.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for row in 0..TEXT_ROWS {
            out.push_str(self.row_text(row).trim_end());
            out.push('\n');
        }
        out
    }
}

impl Default for TextFrame {
    fn default() -> Self {
        Self::blank()
    }
}

/// Shared handle to the most recently published [`TextFrame`].
///
/// Publishing swaps an `Arc` under a write lock; readers clone the `Arc`
/// under a read lock. Neither side holds the lock while touching frame data.
#[derive(Debug, Clone, Default)]
pub struct FrameSlot {
    inner: Arc<RwLock<Arc<TextFrame>>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, frame: TextFrame) {
        let frame = Arc::new(frame);
        let mut slot = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = frame;
    }

    pub fn latest(&self) -> Arc<TextFrame> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
