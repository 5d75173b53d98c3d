//! Composition root for the XT-class machine.
//!
//! [`Machine`] owns the processor core (which owns memory and the
//! [`Chipset`]), loads firmware images, drives execution in bounded slices
//! and publishes text-mode snapshots for presentation threads.
#![forbid(unsafe_code)]

mod config;
mod error;
mod frame;

pub use config::{FirmwareImage, MachineConfig, BASIC_BASE, BIOS_BASE};
pub use error::MachineError;
pub use frame::{FrameSlot, Rgb, TextCell, TextFrame, PALETTE};
pub use xt_cpu::{RunExit, StepOutcome};

use tracing::{debug, warn};
use xt_cpu::{Cpu, MemoryError};
use xt_devices::Chipset;

pub struct Machine {
    cfg: MachineConfig,
    cpu: Cpu<Chipset>,
    frames: FrameSlot,
    trace: bool,
    /// Instructions executed since the last automatic publication.
    since_publish: u64,
}

impl Machine {
    /// Build a machine, load every configured firmware image and reset.
    pub fn new(cfg: MachineConfig) -> Result<Self, MachineError> {
        let mut machine = Self {
            cfg,
            cpu: Cpu::new(Chipset::new()),
            frames: FrameSlot::new(),
            trace: false,
            since_publish: 0,
        };
        machine.load_firmware()?;
        machine.reset();
        Ok(machine)
    }

    pub fn config(&self) -> &MachineConfig {
        &self.cfg
    }

    pub fn cpu(&self) -> &Cpu<Chipset> {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu<Chipset> {
        &mut self.cpu
    }

    pub fn chipset(&self) -> &Chipset {
        self.cpu.bus()
    }

    /// Emit a `trace!` line per executed instruction.
    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    /// Copy `data` into physical memory at `base`, ignoring write protection.
    pub fn load_image(&mut self, base: u32, data: &[u8]) -> Result<(), MachineError> {
        self.cpu.mem.load(base, data).map_err(|err| match err {
            MemoryError::LoadOutOfRange { base, len } => {
                warn!(base, len, "image would extend past the end of memory");
                MachineError::FirmwareOutOfRange { base, len }
            }
        })
    }

    fn load_firmware(&mut self) -> Result<(), MachineError> {
        for image in self.cfg.firmware.clone() {
            let data = std::fs::read(&image.path).map_err(|source| MachineError::FirmwareRead {
                path: image.path.clone(),
                source,
            })?;
            self.load_image(image.base, &data)?;
            debug!(
                path = %image.path.display(),
                base = image.base,
                len = data.len(),
                "firmware image loaded"
            );
        }
        Ok(())
    }

    /// Processor and chipset reset. Memory and general registers keep their
    /// contents.
    pub fn reset(&mut self) {
        debug!("machine reset");
        self.cpu.reset();
        self.cpu.bus_mut().reset();
        self.since_publish = 0;
    }

    /// Re-read the firmware images from disk (for example after they were
    /// rebuilt), then reset.
    pub fn reload_firmware(&mut self) -> Result<(), MachineError> {
        self.load_firmware()?;
        self.reset();
        Ok(())
    }

    pub fn step(&mut self) -> StepOutcome {
        self.cpu.step()
    }

    /// Execute up to `max_insts` instructions (`0` means until halt),
    /// publishing a text frame every `text_publish_interval` instructions.
    pub fn run_slice(&mut self, max_insts: u64) -> RunExit {
        let interval = self.cfg.text_publish_interval;
        let mut executed = 0u64;
        loop {
            let remaining = (max_insts != 0).then(|| max_insts - executed);
            let until_publish = (interval != 0).then(|| interval - self.since_publish);
            // `Cpu::run` treats a budget of 0 as unbounded.
            let budget = match (remaining, until_publish) {
                (Some(a), Some(b)) => a.min(b),
                (Some(n), None) | (None, Some(n)) => n,
                (None, None) => 0,
            };

            let exit = self.cpu.run(budget, self.trace);
            executed += exit.executed();
            if interval != 0 {
                self.since_publish += exit.executed();
                if self.since_publish >= interval {
                    self.publish_text_frame();
                    self.since_publish = 0;
                }
            }

            match exit {
                RunExit::Halted { .. } => return RunExit::Halted { executed },
                RunExit::Completed { .. } if max_insts != 0 && executed >= max_insts => {
                    return RunExit::Completed { executed };
                }
                RunExit::Completed { .. } => {}
            }
        }
    }

    /// Inject a keyboard scan code (raises IRQ 1).
    pub fn key_typed(&mut self, scan_code: u8) {
        self.cpu.bus_mut().key_typed(scan_code);
    }

    /// Snapshot of the text window and cursor registers.
    pub fn text_frame(&self) -> TextFrame {
        let crtc = self.chipset().crtc();
        TextFrame::capture(
            self.cpu.mem.text_window(),
            crtc.cursor_location(),
            crtc.cursor_start(),
        )
    }

    pub fn publish_text_frame(&mut self) {
        self.frames.publish(self.text_frame());
    }

    /// Handle for presentation threads; see [`FrameSlot::latest`].
    pub fn frame_slot(&self) -> FrameSlot {
        self.frames.clone()
    }
}
