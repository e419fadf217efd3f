//! Scripted in-memory devices for tests

use super::{Capabilities, DeviceError, DeviceSource, EventKind, InputDevice, RawEvent};
use crate::config::{
    DUALSHOCK3_PRODUCT_ID, SONY_VENDOR_ID, WIRELESS_MOTION_NAME, WIRELESS_PRIMARY_NAME,
};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Replays a fixed list of batches, then fails the next read as a disconnect
pub struct MockDevice {
    path: PathBuf,
    name: String,
    vendor: u16,
    product: u16,
    capabilities: Capabilities,
    batches: VecDeque<Vec<RawEvent>>,
    reads: Arc<AtomicUsize>,
    drops: Arc<AtomicUsize>,
}

impl MockDevice {
    pub fn new(name: &str, vendor: u16, product: u16, capabilities: Capabilities) -> Self {
        Self {
            path: PathBuf::from(format!("/dev/input/mock-{}", name.replace(' ', "-"))),
            name: name.to_string(),
            vendor,
            product,
            capabilities,
            batches: VecDeque::new(),
            reads: Arc::new(AtomicUsize::new(0)),
            drops: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn wired_primary() -> Self {
        Self::new(
            "SHANWAN PS3 GamePad",
            SONY_VENDOR_ID,
            DUALSHOCK3_PRODUCT_ID,
            Capabilities::new()
                .with(EventKind::Key, [304, 305, 307, 308])
                .with(EventKind::Absolute, [0, 1, 2, 3, 4, 5]),
        )
    }

    pub fn wired_motion() -> Self {
        Self::new(
            "SHANWAN PS3 GamePad Motion Sensors",
            SONY_VENDOR_ID,
            DUALSHOCK3_PRODUCT_ID,
            Capabilities::new().with(EventKind::Absolute, [0, 1, 2]),
        )
    }

    pub fn wireless_primary() -> Self {
        Self::new(
            WIRELESS_PRIMARY_NAME,
            0,
            0,
            Capabilities::new().with(EventKind::Key, [304]),
        )
    }

    pub fn wireless_motion() -> Self {
        Self::new(
            WIRELESS_MOTION_NAME,
            0,
            0,
            Capabilities::new().with(EventKind::Absolute, [0, 1, 2]),
        )
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = PathBuf::from(path);
        self
    }

    pub fn with_batch(mut self, batch: Vec<RawEvent>) -> Self {
        self.batches.push_back(batch);
        self
    }

    /// Counts `read_batch` calls, including the failing one
    pub fn read_counter(&self) -> Arc<AtomicUsize> {
        self.reads.clone()
    }

    /// Becomes 1 once the handle is dropped
    pub fn drop_counter(&self) -> Arc<AtomicUsize> {
        self.drops.clone()
    }
}

impl Drop for MockDevice {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

impl InputDevice for MockDevice {
    fn path(&self) -> &Path {
        &self.path
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn vendor(&self) -> u16 {
        self.vendor
    }

    fn product(&self) -> u16 {
        self.product
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn read_batch(&mut self) -> Result<Vec<RawEvent>, DeviceError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.batches.pop_front().ok_or_else(|| {
            DeviceError::Read(io::Error::new(io::ErrorKind::NotConnected, "device removed"))
        })
    }
}

/// Hands out prepared devices by path; paths without a device fail to open
#[derive(Default)]
pub struct MockSource {
    paths: Vec<PathBuf>,
    devices: Mutex<HashMap<PathBuf, MockDevice>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(mut self, device: MockDevice) -> Self {
        let path = device.path.clone();
        self.paths.push(path.clone());
        self.devices.get_mut().insert(path, device);
        self
    }

    pub fn with_unopenable(mut self, path: &str) -> Self {
        self.paths.push(PathBuf::from(path));
        self
    }
}

impl DeviceSource for MockSource {
    fn paths(&self) -> Result<Vec<PathBuf>, DeviceError> {
        Ok(self.paths.clone())
    }

    fn open(&self, path: &Path) -> Result<Box<dyn InputDevice>, DeviceError> {
        match self.devices.lock().remove(path) {
            Some(device) => Ok(Box::new(device)),
            None => Err(DeviceError::Open {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
            }),
        }
    }
}
