/// A port-mapped peripheral. The bus asks each device in registration order
/// whether it claims a port; the first one that does handles the access.
pub trait PortIoDevice {
    fn claims(&self, port: u16) -> bool;
    fn read(&mut self, port: u16) -> u8;
    fn write(&mut self, port: u16, value: u8);

    /// Reset the device back to its power-on state.
    fn reset(&mut self) {}
}

/// Ordered registry of port devices.
///
/// Dispatch is first-claimer-wins over the registration order, so a device
/// registered earlier shadows later devices on overlapping ranges. Unclaimed
/// reads return 0 and unclaimed writes are dropped.
#[derive(Debug, Clone)]
pub struct IoPortBus<D> {
    devices: Vec<D>,
}

impl<D: PortIoDevice> IoPortBus<D> {
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
        }
    }

    pub fn register(&mut self, device: D) {
        self.devices.push(device);
    }

    pub fn devices(&self) -> &[D] {
        &self.devices
    }

    pub fn devices_mut(&mut self) -> &mut [D] {
        &mut self.devices
    }

    fn claimer(&mut self, port: u16) -> Option<&mut D> {
        self.devices.iter_mut().find(|dev| dev.claims(port))
    }

    pub fn read_u8(&mut self, port: u16) -> u8 {
        self.claimer(port).map_or(0, |dev| dev.read(port))
    }

    pub fn write_u8(&mut self, port: u16, value: u8) {
        if let Some(dev) = self.claimer(port) {
            dev.write(port, value);
        }
    }

    /// Sized access. Word accesses are split into `port` (low byte) and
    /// `port + 1` (high byte), each routed on its own.
    pub fn read(&mut self, port: u16, size: u8) -> u16 {
        match size {
            0 => 0,
            1 => u16::from(self.read_u8(port)),
            _ => {
                let lo = self.read_u8(port);
                let hi = self.read_u8(port.wrapping_add(1));
                u16::from_le_bytes([lo, hi])
            }
        }
    }

    pub fn write(&mut self, port: u16, size: u8, value: u16) {
        match size {
            0 => {}
            1 => self.write_u8(port, value as u8),
            _ => {
                let [lo, hi] = value.to_le_bytes();
                self.write_u8(port, lo);
                self.write_u8(port.wrapping_add(1), hi);
            }
        }
    }

    pub fn reset(&mut self) {
        for dev in self.devices.iter_mut() {
            dev.reset();
        }
    }
}

impl<D: PortIoDevice> Default for IoPortBus<D> {
    fn default() -> Self {
        Self::new()
    }
}
