//! GamePad - one logical controller and its read loops
//!
//! Binds the primary node and the optional motion node of one physical
//! controller to a single [`ControllerState`] and drives both streams.
//!

use super::run_loop::{Stream, StreamLoop};
use super::state::{ControllerState, SharedState, Transport};
use crate::config::{ConfigError, DiscoveryConfig};
use crate::device::{self, DeviceError, DeviceInfo, EvdevSource, InputDevice};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Errors surfaced by [`GamePad`] operations
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// Opening, enumerating or reading a device failed
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    /// Loading the discovery configuration failed
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A spawned read loop panicked or was cancelled
    #[error("Read loop task failed: {0}")]
    Join(String),
}

/// State and handles behind a [`GamePad`]. Only the read loops touch the devices.
pub struct Session {
    pub(super) primary: Mutex<Box<dyn InputDevice>>,
    pub(super) motion: Option<Mutex<Box<dyn InputDevice>>>,
    pub(super) state: SharedState,
    pub(super) quit: AtomicBool,
    primary_info: DeviceInfo,
    motion_info: Option<DeviceInfo>,
}

/// One logical controller: a primary node, an optional motion node and the
/// state both of them feed.
///
/// Cloning is cheap and every clone refers to the same session, so a clone can
/// be moved into the change callback to read state or call [`GamePad::quit`].
///
/// # Callbacks
///
/// The callback passed to [`GamePad::run`] / [`GamePad::run_motion`] runs
/// synchronously on the loop that saw the change, after the state lock has been
/// released. With both loops running it may be called from two threads and the
/// calls may interleave. Reading through [`GamePad::snapshot`] gives a consistent
/// view. Keep callbacks short or hand the work off through a channel; while the
/// callback runs, that loop is not reading.
///
/// # Examples
///
/// ```rust,no_run
/// use dualshock3::config::DiscoveryConfig;
/// use dualshock3::controller::GamePad;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let Some(pad) = GamePad::open_first(&DiscoveryConfig::default())? else {
///     return Ok(());
/// };
/// let reader = pad.clone();
/// pad.run(move || {
///     let state = reader.snapshot();
///     if state.buttons.start && state.buttons.select {
///         reader.quit();
///     }
/// })?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GamePad {
    session: Arc<Session>,
}

impl GamePad {
    /// Binds already opened devices. Tilt is tracked only when `motion` is present.
    pub fn bind(
        primary: Box<dyn InputDevice>,
        motion: Option<Box<dyn InputDevice>>,
        transport: Transport,
    ) -> Self {
        let primary_info = DeviceInfo::of(primary.as_ref());
        let motion_info = motion.as_deref().map(|device| DeviceInfo::of(device));
        let state = ControllerState::new(transport, motion.is_some());

        info!("Bound primary device: {}", primary_info);
        if let Some(info) = &motion_info {
            info!("Bound motion device: {}", info);
        }

        Self {
            session: Arc::new(Session {
                primary: Mutex::new(primary),
                motion: motion.map(Mutex::new),
                state: SharedState::new(state),
                quit: AtomicBool::new(false),
                primary_info,
                motion_info,
            }),
        }
    }

    /// Opens `path` as the primary node, without classification or motion pairing
    pub fn open(path: &Path) -> Result<Self, ControllerError> {
        let source = EvdevSource::new(&DiscoveryConfig::default());
        Ok(device::open_path(&source, path)?)
    }

    /// Scans the input nodes for a controller; `None` when there is none
    pub fn open_first(config: &DiscoveryConfig) -> Result<Option<Self>, ControllerError> {
        let source = EvdevSource::new(config);
        Ok(device::open_first(&source, config)?)
    }

    pub fn transport(&self) -> Transport {
        self.session.state.read(|state| state.transport)
    }

    pub fn has_motion(&self) -> bool {
        self.session.motion.is_some()
    }

    pub fn device_info(&self) -> &DeviceInfo {
        &self.session.primary_info
    }

    pub fn motion_info(&self) -> Option<&DeviceInfo> {
        self.session.motion_info.as_ref()
    }

    /// Copy of the current state, taken under the lock
    pub fn snapshot(&self) -> ControllerState {
        self.session.state.snapshot()
    }

    /// Runs `f` against the state while holding the lock
    pub fn read<R>(&self, f: impl FnOnce(&ControllerState) -> R) -> R {
        self.session.state.read(f)
    }

    /// Asks both loops to stop.
    ///
    /// A loop notices on its next pass, after the batch it is working on (or
    /// the read it is blocked in) completes.
    pub fn quit(&self) {
        debug!("Quit requested");
        self.session.quit.store(true, Ordering::SeqCst);
    }

    pub fn is_quitting(&self) -> bool {
        self.session.quit.load(Ordering::SeqCst)
    }

    /// Blocks reading the primary node.
    ///
    /// Returns `Ok` after [`GamePad::quit`] and the read error when the device fails.
    pub fn run<F>(&self, callback: F) -> Result<(), DeviceError>
    where
        F: FnMut(),
    {
        self.run_stream(Stream::Primary, callback)
    }

    /// Blocks reading the motion node; returns immediately when none is bound
    pub fn run_motion<F>(&self, callback: F) -> Result<(), DeviceError>
    where
        F: FnMut(),
    {
        self.run_stream(Stream::Motion, callback)
    }

    fn run_stream<F>(&self, stream: Stream, callback: F) -> Result<(), DeviceError>
    where
        F: FnMut(),
    {
        let mut reading = StreamLoop::create(self.session.clone(), stream).start();
        let result = reading.run(callback);
        debug!("{} loop finished after {} batches", stream, reading.batches());
        result
    }

    /// Runs both loops on tokio's blocking pool. Must be called from within a runtime.
    ///
    /// The returned [`SessionHandle`] resolves once both loops have ended.
    pub fn spawn<F>(&self, callback: F) -> SessionHandle
    where
        F: Fn() + Send + Sync + 'static,
    {
        let callback = Arc::new(callback);

        let pad = self.clone();
        let on_change = callback.clone();
        let primary = tokio::task::spawn_blocking(move || pad.run(|| (*on_change)()));

        let pad = self.clone();
        let motion = tokio::task::spawn_blocking(move || pad.run_motion(|| (*callback)()));

        info!("Spawned controller read loops");
        SessionHandle { primary, motion }
    }
}

/// Both spawned read loops
pub struct SessionHandle {
    primary: JoinHandle<Result<(), DeviceError>>,
    motion: JoinHandle<Result<(), DeviceError>>,
}

impl SessionHandle {
    /// Waits for both loops. The primary loop's error wins if both failed.
    pub async fn join(self) -> Result<(), ControllerError> {
        let primary = self
            .primary
            .await
            .map_err(|e| ControllerError::Join(e.to_string()))?;
        let motion = self
            .motion
            .await
            .map_err(|e| ControllerError::Join(e.to_string()))?;

        primary.and(motion).map_err(ControllerError::from)
    }
}
