use super::controller_handle::Session;
use super::decoder::{decode_batch, decode_motion_batch};
use crate::device::DeviceError;
use statum::{machine, state};
use std::fmt;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Which bound node a loop reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Primary,
    Motion,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Primary => write!(f, "primary"),
            Stream::Motion => write!(f, "motion"),
        }
    }
}

// Loop lifecycle
#[state]
#[derive(Debug, Clone)]
pub enum LoopState {
    Idle,
    Reading,
}

#[machine]
pub struct StreamLoop<S: LoopState> {
    // Session owning the device and the shared state
    session: Arc<Session>,

    stream: Stream,

    // Batches read so far
    batches: u64,
}

impl StreamLoop<Idle> {
    pub fn create(session: Arc<Session>, stream: Stream) -> Self {
        debug!("Creating {} stream loop", stream);
        Self::new(session, stream, 0)
    }

    pub fn start(self) -> StreamLoop<Reading> {
        info!("Starting {} stream loop", self.stream);
        self.transition()
    }
}

impl StreamLoop<Reading> {
    /// Reads and decodes batches until quit is requested or a read fails.
    ///
    /// `on_change` runs on this thread after each batch that changed the
    /// state, with the state lock already released.
    pub fn run<F>(&mut self, mut on_change: F) -> Result<(), DeviceError>
    where
        F: FnMut(),
    {
        let session = self.session.clone();
        let stream = self.stream;
        let slot = match stream {
            Stream::Primary => &session.primary,
            Stream::Motion => match &session.motion {
                Some(motion) => motion,
                None => {
                    debug!("No motion device bound, motion loop has nothing to do");
                    return Ok(());
                }
            },
        };
        let mut device = slot.lock();

        loop {
            if session.quit.load(Ordering::SeqCst) {
                info!(
                    "Quit requested, {} stream loop stopping after {} batches",
                    stream, self.batches
                );
                return Ok(());
            }

            let events = match device.read_batch() {
                Ok(events) => events,
                Err(e) => {
                    error!("{} stream loop terminated: {}", stream, e);
                    return Err(e);
                }
            };
            self.batches += 1;

            let changed = session.state.update(|state| match stream {
                Stream::Primary => decode_batch(state, &events),
                Stream::Motion => decode_motion_batch(state, &events),
            });
            debug!(
                "{} batch #{}: {} events, changed={}",
                stream,
                self.batches,
                events.len(),
                changed
            );

            if changed {
                on_change();
            }
        }
    }

    pub fn batches(&self) -> u64 {
        self.batches
    }
}
