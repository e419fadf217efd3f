//! Input device layer
//!
//! Abstracts the kernel input nodes the controller is read from:
//!
//! 1. [`InputDevice`] - one opened node: identity, capabilities and blocking batch reads
//! 2. [`DeviceSource`] - enumerates candidate node paths and opens them
//! 3. [`discovery`] - classifies opened nodes and pairs them into one [`GamePad`]
//!
//! [`evdev_device`] provides the Linux implementation of both traits.
//!
//! [`GamePad`]: crate::controller::GamePad

pub mod discovery;
pub mod evdev_device;

#[cfg(test)]
pub(crate) mod mock;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

pub use discovery::{classify, open_first, open_path, Classification, DeviceRole, Transport};
pub use evdev_device::{EvdevDevice, EvdevSource};

// Event categories as reported by the kernel (linux/input-event-codes.h)
const EV_SYN: u16 = 0x00;
const EV_KEY: u16 = 0x01;
const EV_ABS: u16 = 0x03;

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Failed to open input device {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read from input device: {0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to enumerate input devices: {0}")]
    Enumerate(#[source] std::io::Error),
}

/// Category of a raw input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    Synchronization,
    Key,
    Absolute,
    Other(u16),
}

impl EventKind {
    pub fn from_raw(kind: u16) -> Self {
        match kind {
            EV_SYN => EventKind::Synchronization,
            EV_KEY => EventKind::Key,
            EV_ABS => EventKind::Absolute,
            other => EventKind::Other(other),
        }
    }
}

/// One event as delivered by a device read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub kind: EventKind,
    pub code: u16,
    pub value: i32,
}

impl RawEvent {
    pub fn new(kind: EventKind, code: u16, value: i32) -> Self {
        Self { kind, code, value }
    }

    pub fn key(code: u16, value: i32) -> Self {
        Self::new(EventKind::Key, code, value)
    }

    pub fn absolute(code: u16, value: i32) -> Self {
        Self::new(EventKind::Absolute, code, value)
    }

    pub fn sync() -> Self {
        Self::new(EventKind::Synchronization, 0, 0)
    }
}

/// Declared event categories of a device and the codes declared for each
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    categories: BTreeMap<EventKind, BTreeSet<u16>>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `kind` with the given codes; codes accumulate across calls
    pub fn with<I>(mut self, kind: EventKind, codes: I) -> Self
    where
        I: IntoIterator<Item = u16>,
    {
        self.insert(kind, codes);
        self
    }

    pub fn insert<I>(&mut self, kind: EventKind, codes: I)
    where
        I: IntoIterator<Item = u16>,
    {
        self.categories.entry(kind).or_default().extend(codes);
    }

    pub fn has(&self, kind: EventKind) -> bool {
        self.categories.contains_key(&kind)
    }

    pub fn codes(&self, kind: EventKind) -> Option<&BTreeSet<u16>> {
        self.categories.get(&kind)
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (kind, codes) in &self.categories {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            write!(f, "{:?}[{}]", kind, codes.len())?;
        }
        Ok(())
    }
}

/// An opened input node.
///
/// Dropping the handle closes the node.
pub trait InputDevice: Send {
    fn path(&self) -> &Path;
    fn name(&self) -> &str;
    fn vendor(&self) -> u16;
    fn product(&self) -> u16;
    fn capabilities(&self) -> &Capabilities;

    /// Blocks until the device delivers events and returns them in delivery order
    fn read_batch(&mut self) -> Result<Vec<RawEvent>, DeviceError>;
}

/// Enumerates and opens candidate input nodes
pub trait DeviceSource {
    /// Candidate paths in scan order
    fn paths(&self) -> Result<Vec<PathBuf>, DeviceError>;

    fn open(&self, path: &Path) -> Result<Box<dyn InputDevice>, DeviceError>;
}

/// Identity of a bound device, kept for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub path: PathBuf,
    pub name: String,
    pub vendor: u16,
    pub product: u16,
    pub capabilities: Capabilities,
}

impl DeviceInfo {
    pub fn of(device: &dyn InputDevice) -> Self {
        Self {
            path: device.path().to_path_buf(),
            name: device.name().to_string(),
            vendor: device.vendor(),
            product: device.product(),
            capabilities: device.capabilities().clone(),
        }
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) {:04x}:{:04x} {}",
            self.name,
            self.path.display(),
            self.vendor,
            self.product,
            self.capabilities
        )
    }
}
