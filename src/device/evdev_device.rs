//! Linux input nodes through the `evdev` crate

use super::{Capabilities, DeviceError, DeviceSource, EventKind, InputDevice, RawEvent};
use crate::config::DiscoveryConfig;
use evdev::{Device, EventType};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct EvdevDevice {
    path: PathBuf,
    device: Device,
    name: String,
    capabilities: Capabilities,
}

impl EvdevDevice {
    pub fn open(path: &Path) -> Result<Self, DeviceError> {
        let device = Device::open(path).map_err(|source| DeviceError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let name = device.name().unwrap_or_default().to_string();
        let capabilities = read_capabilities(&device);
        debug!(
            "Opened {} ({}) with capabilities {}",
            path.display(),
            name,
            capabilities
        );

        Ok(Self {
            path: path.to_path_buf(),
            device,
            name,
            capabilities,
        })
    }
}

fn read_capabilities(device: &Device) -> Capabilities {
    let mut capabilities = Capabilities::new();

    for event_type in device.supported_events().iter() {
        let kind = EventKind::from_raw(event_type.0);
        match event_type {
            EventType::KEY => {
                let codes = device
                    .supported_keys()
                    .map(|keys| keys.iter().map(|key| key.code()).collect::<Vec<_>>())
                    .unwrap_or_default();
                capabilities.insert(kind, codes);
            }
            EventType::ABSOLUTE => {
                let codes = device
                    .supported_absolute_axes()
                    .map(|axes| axes.iter().map(|axis| axis.0).collect::<Vec<_>>())
                    .unwrap_or_default();
                capabilities.insert(kind, codes);
            }
            _ => capabilities.insert(kind, Vec::new()),
        }
    }

    capabilities
}

impl InputDevice for EvdevDevice {
    fn path(&self) -> &Path {
        &self.path
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn vendor(&self) -> u16 {
        self.device.input_id().vendor()
    }

    fn product(&self) -> u16 {
        self.device.input_id().product()
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn read_batch(&mut self) -> Result<Vec<RawEvent>, DeviceError> {
        let events = self
            .device
            .fetch_events()
            .map_err(DeviceError::Read)?
            .map(|event| {
                RawEvent::new(
                    EventKind::from_raw(event.event_type().0),
                    event.code(),
                    event.value(),
                )
            })
            .collect();
        Ok(events)
    }
}

/// Enumerates `<device_dir>/<device_prefix>*`, sorted by name
pub struct EvdevSource {
    dir: PathBuf,
    prefix: String,
}

impl EvdevSource {
    pub fn new(config: &DiscoveryConfig) -> Self {
        Self {
            dir: config.device_dir.clone(),
            prefix: config.device_prefix.clone(),
        }
    }
}

impl DeviceSource for EvdevSource {
    fn paths(&self) -> Result<Vec<PathBuf>, DeviceError> {
        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)
            .map_err(DeviceError::Enumerate)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().starts_with(&self.prefix))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        debug!(
            "Found {} candidate devices in {}",
            paths.len(),
            self.dir.display()
        );
        Ok(paths)
    }

    fn open(&self, path: &Path) -> Result<Box<dyn InputDevice>, DeviceError> {
        Ok(Box::new(EvdevDevice::open(path)?))
    }
}
