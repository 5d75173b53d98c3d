use std::io;
use std::path::PathBuf;

/// Errors returned when constructing or configuring a [`crate::Machine`].
///
/// Guest-visible faults (divide errors and the like) are delivered to the
/// guest as interrupts and never show up here.
#[derive(Debug, thiserror::Error)]
pub enum MachineError {
    #[error("failed to read firmware image {}", path.display())]
    FirmwareRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("firmware image of {len} bytes at {base:#07x} extends past the end of memory")]
    FirmwareOutOfRange { base: u32, len: usize },

    #[error("invalid machine configuration: {0}")]
    Config(String),
}
