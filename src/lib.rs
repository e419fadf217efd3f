//! DualShock 3 input decoding for Linux
//!
//! Finds the controller's evdev nodes, pairs the button/stick node with the
//! accelerometer node and keeps a calibrated [`ControllerState`] up to date
//! from both of them.
//!
//! ```rust,no_run
//! use dualshock3::{Config, GamePad};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! if let Some(pad) = GamePad::open_first(&config.discovery)? {
//!     let reader = pad.clone();
//!     pad.run(move || println!("{}", reader.snapshot()))?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod device;

pub use config::{Config, DiscoveryConfig};
pub use controller::{ControllerError, ControllerState, GamePad, Transport};
