//! The fixed XT peripheral set and its wiring to the processor core.

use tracing::debug;
use xt_cpu::{IoBus, Width};
use xt_interrupts::Pic8259;
use xt_platform::io::{IoPortBus, PortIoDevice};
use xt_timers::Pit8253;

use crate::crtc6845::Crtc6845;
use crate::dma8237::Dma8237;
use crate::pic8259::Pic8259Port;
use crate::pit8253::Pit8253Port;
use crate::ppi8255::Ppi8255;

pub const IRQ_TIMER: u8 = 0;
pub const IRQ_KEYBOARD: u8 = 1;

/// Closed set of devices the chipset puts on its port bus.
#[derive(Debug, Clone)]
pub enum Peripheral {
    Dma(Dma8237),
    Pic(Pic8259Port),
    Pit(Pit8253Port),
    Ppi(Ppi8255),
    Crtc(Crtc6845),
}

impl PortIoDevice for Peripheral {
    fn claims(&self, port: u16) -> bool {
        match self {
            Peripheral::Dma(dev) => dev.claims(port),
            Peripheral::Pic(dev) => dev.claims(port),
            Peripheral::Pit(dev) => dev.claims(port),
            Peripheral::Ppi(dev) => dev.claims(port),
            Peripheral::Crtc(dev) => dev.claims(port),
        }
    }

    fn read(&mut self, port: u16) -> u8 {
        match self {
            Peripheral::Dma(dev) => dev.read(port),
            Peripheral::Pic(dev) => dev.read(port),
            Peripheral::Pit(dev) => dev.read(port),
            Peripheral::Ppi(dev) => dev.read(port),
            Peripheral::Crtc(dev) => dev.read(port),
        }
    }

    fn write(&mut self, port: u16, value: u8) {
        match self {
            Peripheral::Dma(dev) => dev.write(port, value),
            Peripheral::Pic(dev) => dev.write(port, value),
            Peripheral::Pit(dev) => dev.write(port, value),
            Peripheral::Ppi(dev) => dev.write(port, value),
            Peripheral::Crtc(dev) => dev.write(port, value),
        }
    }

    fn reset(&mut self) {
        match self {
            Peripheral::Dma(dev) => dev.reset(),
            Peripheral::Pic(dev) => dev.reset(),
            Peripheral::Pit(dev) => dev.reset(),
            Peripheral::Ppi(dev) => dev.reset(),
            Peripheral::Crtc(dev) => dev.reset(),
        }
    }
}

/// Bus positions of each peripheral, fixed at construction.
#[derive(Debug, Clone, Copy)]
struct Slots {
    dma: usize,
    pic: usize,
    pit: usize,
    ppi: usize,
    crtc: usize,
}

/// Port bus populated with the XT devices, exposed to the core as its
/// [`IoBus`]. Timer ticks feed IRQ 0 and keystrokes feed IRQ 1.
#[derive(Debug, Clone)]
pub struct Chipset {
    bus: IoPortBus<Peripheral>,
    slots: Slots,
}

fn attach(bus: &mut IoPortBus<Peripheral>, device: Peripheral) -> usize {
    let slot = bus.devices().len();
    bus.register(device);
    slot
}

impl Chipset {
    pub fn new() -> Self {
        let mut bus = IoPortBus::new();
        let slots = Slots {
            dma: attach(&mut bus, Peripheral::Dma(Dma8237::new())),
            pic: attach(&mut bus, Peripheral::Pic(Pic8259Port::new())),
            pit: attach(&mut bus, Peripheral::Pit(Pit8253Port::new())),
            ppi: attach(&mut bus, Peripheral::Ppi(Ppi8255::new())),
            crtc: attach(&mut bus, Peripheral::Crtc(Crtc6845::new())),
        };
        Self { bus, slots }
    }

    pub fn bus(&self) -> &IoPortBus<Peripheral> {
        &self.bus
    }

    pub fn reset(&mut self) {
        debug!("chipset reset");
        self.bus.reset();
    }

    pub fn pic(&self) -> &Pic8259 {
        match &self.bus.devices()[self.slots.pic] {
            Peripheral::Pic(port) => port.pic(),
            _ => unreachable!("PIC slot holds another device"),
        }
    }

    pub fn pic_mut(&mut self) -> &mut Pic8259 {
        match &mut self.bus.devices_mut()[self.slots.pic] {
            Peripheral::Pic(port) => port.pic_mut(),
            _ => unreachable!("PIC slot holds another device"),
        }
    }

    pub fn pit(&self) -> &Pit8253 {
        match &self.bus.devices()[self.slots.pit] {
            Peripheral::Pit(port) => port.pit(),
            _ => unreachable!("PIT slot holds another device"),
        }
    }

    fn pit_mut(&mut self) -> &mut Pit8253 {
        match &mut self.bus.devices_mut()[self.slots.pit] {
            Peripheral::Pit(port) => port.pit_mut(),
            _ => unreachable!("PIT slot holds another device"),
        }
    }

    pub fn ppi(&self) -> &Ppi8255 {
        match &self.bus.devices()[self.slots.ppi] {
            Peripheral::Ppi(ppi) => ppi,
            _ => unreachable!("PPI slot holds another device"),
        }
    }

    fn ppi_mut(&mut self) -> &mut Ppi8255 {
        match &mut self.bus.devices_mut()[self.slots.ppi] {
            Peripheral::Ppi(ppi) => ppi,
            _ => unreachable!("PPI slot holds another device"),
        }
    }

    pub fn crtc(&self) -> &Crtc6845 {
        match &self.bus.devices()[self.slots.crtc] {
            Peripheral::Crtc(crtc) => crtc,
            _ => unreachable!("CRTC slot holds another device"),
        }
    }

    pub fn dma(&self) -> &Dma8237 {
        match &self.bus.devices()[self.slots.dma] {
            Peripheral::Dma(dma) => dma,
            _ => unreachable!("DMA slot holds another device"),
        }
    }

    /// Inject a keyboard scan code and request IRQ 1.
    pub fn key_typed(&mut self, scan_code: u8) {
        self.ppi_mut().key_typed(scan_code);
        self.pic_mut().raise_irq(IRQ_KEYBOARD);
    }
}

impl Default for Chipset {
    fn default() -> Self {
        Self::new()
    }
}

impl IoBus for Chipset {
    fn io_read(&mut self, port: u16, width: Width) -> u16 {
        self.bus.read(port, width.bytes() as u8)
    }

    fn io_write(&mut self, port: u16, width: Width, value: u16) {
        self.bus.write(port, width.bytes() as u8, value);
    }

    fn tick(&mut self) {
        if self.pit_mut().tick() {
            self.pic_mut().raise_irq(IRQ_TIMER);
        }
    }

    fn interrupt_pending(&self) -> bool {
        self.pic().has_pending()
    }

    fn acknowledge_interrupt(&mut self) -> Option<u8> {
        self.pic_mut().acknowledge()
    }
}
