use crate::state::Width;

/// Capabilities the core needs from the chipset: port I/O, the timer tick
/// and the interrupt controller.
///
/// The core advances the timer by one tick for every four clock cycles it
/// consumes.
pub trait IoBus {
    fn io_read(&mut self, port: u16, width: Width) -> u16;
    fn io_write(&mut self, port: u16, width: Width, value: u16);

    /// Advance the interval timer by one input tick.
    fn tick(&mut self);

    /// Whether the interrupt controller has an unmasked request pending.
    fn interrupt_pending(&self) -> bool;

    /// Acknowledge the highest-priority pending request and return its vector.
    fn acknowledge_interrupt(&mut self) -> Option<u8>;
}

impl<B: IoBus + ?Sized> IoBus for &mut B {
    fn io_read(&mut self, port: u16, width: Width) -> u16 {
        (**self).io_read(port, width)
    }

    fn io_write(&mut self, port: u16, width: Width, value: u16) {
        (**self).io_write(port, width, value)
    }

    fn tick(&mut self) {
        (**self).tick()
    }

    fn interrupt_pending(&self) -> bool {
        (**self).interrupt_pending()
    }

    fn acknowledge_interrupt(&mut self) -> Option<u8> {
        (**self).acknowledge_interrupt()
    }
}

/// Bus with nothing attached. Reads return 0 and no interrupts are raised.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullIoBus {
    ticks: u64,
}

impl NullIoBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl IoBus for NullIoBus {
    fn io_read(&mut self, _port: u16, _width: Width) -> u16 {
        0
    }

    fn io_write(&mut self, _port: u16, _width: Width, _value: u16) {}

    fn tick(&mut self) {
        self.ticks += 1;
    }

    fn interrupt_pending(&self) -> bool {
        false
    }

    fn acknowledge_interrupt(&mut self) -> Option<u8> {
        None
    }
}
