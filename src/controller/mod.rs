//! Controller subsystem: state, decoding and read loops
//!
//! Turns raw event batches from the bound device nodes into one
//! [`ControllerState`]:
//!
//! 1. [`analog`] - stick calibration with a fixed dead zone
//! 2. [`decoder`] - applies primary and motion batches to the state
//! 3. [`state`] - the state itself and its lock
//! 4. [`controller_handle`] - [`GamePad`], the session owning devices and state
//!
//! # Architecture
//!
//! ```text
//! primary node ──► run loop ──► decode_batch ────────┐
//!                                                     ├──► SharedState ──► callback / snapshot
//! motion node  ──► run loop ──► decode_motion_batch ─┘
//! ```
//!
//! Each loop blocks in its device read and fires the change callback at most
//! once per batch.

pub mod analog;
pub mod controller_handle;
pub mod decoder;
mod run_loop;
pub mod state;

pub use analog::{calibrate, AnalogStick};
pub use controller_handle::{ControllerError, GamePad, SessionHandle};
pub use state::{Button, Buttons, ControllerState, SharedState, Tilt, Transport};
