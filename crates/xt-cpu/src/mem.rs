use thiserror::Error;

/// Size of the physical address space (20 address lines).
pub const MEMORY_SIZE: usize = 1 << 20;
pub const ADDRESS_MASK: u32 = 0xF_FFFF;

/// Start of the write-protected firmware region (top 40 KiB).
pub const ROM_BASE: u32 = 0xF6000;

/// Color text window: 80x25 cells of (character, attribute).
pub const TEXT_BASE: u32 = 0xB8000;
pub const TEXT_COLUMNS: usize = 80;
pub const TEXT_ROWS: usize = 25;
pub const TEXT_SIZE: usize = TEXT_COLUMNS * TEXT_ROWS * 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("load of {len} bytes at {base:#07x} runs past the end of memory")]
    LoadOutOfRange { base: u32, len: usize },
}

/// Flat 1 MiB physical memory.
///
/// Guest writes into `ROM_BASE..` are dropped; [`Memory::load`] bypasses the
/// protection so firmware images can be installed.
#[derive(Clone)]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory")
            .field("size", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        Self {
            bytes: vec![0; MEMORY_SIZE].into_boxed_slice(),
        }
    }

    pub fn is_write_protected(addr: u32) -> bool {
        (addr & ADDRESS_MASK) >= ROM_BASE
    }

    pub fn read_u8(&self, addr: u32) -> u8 {
        self.bytes[(addr & ADDRESS_MASK) as usize]
    }

    pub fn write_u8(&mut self, addr: u32, val: u8) {
        let addr = addr & ADDRESS_MASK;
        if Self::is_write_protected(addr) {
            return;
        }
        self.bytes[addr as usize] = val;
    }

    /// Little-endian word; the high byte wraps around the top of memory.
    pub fn read_u16(&self, addr: u32) -> u16 {
        let lo = self.read_u8(addr);
        let hi = self.read_u8(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    pub fn write_u16(&mut self, addr: u32, val: u16) {
        let [lo, hi] = val.to_le_bytes();
        self.write_u8(addr, lo);
        self.write_u8(addr.wrapping_add(1), hi);
    }

    /// Copy `data` to `base`, ignoring write protection.
    pub fn load(&mut self, base: u32, data: &[u8]) -> Result<(), MemoryError> {
        let start = base as usize;
        let end = start
            .checked_add(data.len())
            .filter(|&end| end <= MEMORY_SIZE)
            .ok_or(MemoryError::LoadOutOfRange {
                base,
                len: data.len(),
            })?;
        self.bytes[start..end].copy_from_slice(data);
        Ok(())
    }

    pub fn slice(&self, base: u32, len: usize) -> Option<&[u8]> {
        let start = base as usize;
        let end = start.checked_add(len)?;
        self.bytes.get(start..end)
    }

    pub fn text_window(&self) -> &[u8] {
        let start = TEXT_BASE as usize;
        &self.bytes[start..start + TEXT_SIZE]
    }
}
