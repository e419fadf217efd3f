//! Finds the controller among the system's input nodes
//!
//! A DualShock 3 shows up as two nodes: the primary node (buttons, sticks,
//! triggers) and a motion node (accelerometer). Over USB both carry the Sony
//! vendor/product pair and are told apart by their capabilities. Over
//! Bluetooth they are recognised by name.

use super::{DeviceError, DeviceSource, EventKind, InputDevice};
use crate::config::DiscoveryConfig;
use crate::controller::GamePad;
pub use crate::controller::Transport;
use std::path::Path;
use tracing::{debug, info, warn};

/// What a node is to us
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceRole {
    Primary,
    Motion,
    /// Recognised controller we do not drive (PlayStation Move)
    Unsupported,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub role: DeviceRole,
    /// Set whenever the node matched one of our identifiers, even if its role is unknown
    pub transport: Option<Transport>,
}

impl Classification {
    fn new(role: DeviceRole, transport: Option<Transport>) -> Self {
        Self { role, transport }
    }
}

/// Classifies one opened node
pub fn classify(device: &dyn InputDevice, config: &DiscoveryConfig) -> Classification {
    if device.vendor() == config.wired_vendor && device.product() == config.wired_product {
        let capabilities = device.capabilities();
        let role = if capabilities.has(EventKind::Key) {
            DeviceRole::Primary
        } else if capabilities.has(EventKind::Absolute) {
            DeviceRole::Motion
        } else {
            DeviceRole::Unknown
        };
        return Classification::new(role, Some(Transport::Wired));
    }

    let name = device.name();
    if name == config.wireless_motion_name {
        Classification::new(DeviceRole::Motion, Some(Transport::Wireless))
    } else if name == config.wireless_primary_name {
        Classification::new(DeviceRole::Primary, Some(Transport::Wireless))
    } else if name == config.pointer_controller_name {
        Classification::new(DeviceRole::Unsupported, Some(Transport::Wireless))
    } else {
        Classification::new(DeviceRole::Unknown, None)
    }
}

/// Scans `source` and binds the first primary node, paired with the first
/// motion node if one turns up.
///
/// Scanning stops as soon as both are found. Nodes that cannot be opened are
/// skipped. Returns `Ok(None)` when no primary node exists.
pub fn open_first(
    source: &dyn DeviceSource,
    config: &DiscoveryConfig,
) -> Result<Option<GamePad>, DeviceError> {
    let paths = source.paths()?;
    info!("Scanning {} input devices for a controller", paths.len());

    let mut primary: Option<(Box<dyn InputDevice>, Transport)> = None;
    let mut motion: Option<(Box<dyn InputDevice>, Transport)> = None;
    let mut unopened = 0;

    for path in paths {
        let device = match source.open(&path) {
            Ok(device) => device,
            Err(e) => {
                debug!("Skipping {}: {}", path.display(), e);
                unopened += 1;
                continue;
            }
        };

        let classification = classify(device.as_ref(), config);
        let transport = classification.transport.unwrap_or_default();
        match classification.role {
            DeviceRole::Primary if primary.is_none() => {
                info!(
                    "Found primary device {} at {} ({:?})",
                    device.name(),
                    path.display(),
                    transport
                );
                primary = Some((device, transport));
            }
            DeviceRole::Motion if motion.is_none() => {
                info!(
                    "Found motion sensor device {} at {} ({:?})",
                    device.name(),
                    path.display(),
                    transport
                );
                motion = Some((device, transport));
            }
            DeviceRole::Primary | DeviceRole::Motion => {
                debug!(
                    "Already have a {:?} device, ignoring {} at {}",
                    classification.role,
                    device.name(),
                    path.display()
                );
            }
            DeviceRole::Unsupported => {
                warn!(
                    "Found {} at {}, but it is not supported yet",
                    device.name(),
                    path.display()
                );
            }
            DeviceRole::Unknown if classification.transport.is_some() => {
                warn!(
                    "Ignoring input device with unexpected capabilities: {} [{}]",
                    device.name(),
                    device.capabilities()
                );
            }
            DeviceRole::Unknown => {
                debug!(
                    "Skipping {} at {} ({:04x}:{:04x})",
                    device.name(),
                    path.display(),
                    device.vendor(),
                    device.product()
                );
            }
        }

        if primary.is_some() && motion.is_some() {
            break;
        }
    }

    match (primary, motion) {
        (Some((primary, primary_transport)), Some((motion, motion_transport))) => {
            let transport = if primary_transport == Transport::Wireless
                || motion_transport == Transport::Wireless
            {
                Transport::Wireless
            } else {
                Transport::Wired
            };
            Ok(Some(GamePad::bind(primary, Some(motion), transport)))
        }
        (Some((primary, transport)), None) => {
            info!("No motion sensors detected, continuing without tilt");
            Ok(Some(GamePad::bind(primary, None, transport)))
        }
        (None, motion) => {
            if motion.is_some() {
                info!("Found a motion sensor but no matching primary device");
            }
            info!(
                "No controller found ({} devices could not be opened)",
                unopened
            );
            Ok(None)
        }
    }
}

/// Binds `path` as the primary node. No classification, no motion pairing.
pub fn open_path(source: &dyn DeviceSource, path: &Path) -> Result<GamePad, DeviceError> {
    let device = source.open(path)?;
    info!("Opened {} at {}", device.name(), path.display());
    Ok(GamePad::bind(device, None, Transport::Wired))
}
