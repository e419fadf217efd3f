//! Applies raw event batches to [`ControllerState`]

use super::state::{Button, ControllerState};
use crate::device::{EventKind, RawEvent};
use tracing::debug;

// Absolute axis codes of the primary node
const ABS_LEFT_X: u16 = 0;
const ABS_LEFT_Y: u16 = 1;
const ABS_L2: u16 = 2;
const ABS_RIGHT_X: u16 = 3;
const ABS_RIGHT_Y: u16 = 4;
const ABS_R2: u16 = 5;

// Accelerometer axis codes of the motion node
const ABS_TILT_X: u16 = 0;
const ABS_TILT_Y: u16 = 1;
const ABS_TILT_Z: u16 = 2;

// L2/R2 also arrive as digital keys; the analog axes already carry them
const BTN_TL2: u16 = 312;
const BTN_TR2: u16 = 313;
// Sent alongside every button press
const KEY_ANY_BUTTON: u16 = 4;

/// Key code to button
pub fn map_button(code: u16) -> Option<Button> {
    match code {
        304 => Some(Button::Cross),
        305 => Some(Button::Circle),
        307 => Some(Button::Triangle),
        308 => Some(Button::Square),
        310 => Some(Button::L1),
        311 => Some(Button::R1),
        314 => Some(Button::Select),
        315 => Some(Button::Start),
        317 => Some(Button::L3),
        318 => Some(Button::R3),
        544 => Some(Button::DPadUp),
        545 => Some(Button::DPadDown),
        546 => Some(Button::DPadLeft),
        547 => Some(Button::DPadRight),
        _ => None,
    }
}

/// Applies a primary-stream batch in delivery order.
///
/// Returns whether any field changed. Stick samples that calibrate to the
/// stored value do not count, trigger samples and known buttons always do.
pub fn decode_batch(state: &mut ControllerState, events: &[RawEvent]) -> bool {
    let mut changed = false;

    for event in events {
        match event.kind {
            EventKind::Absolute => {
                changed |= match event.code {
                    ABS_LEFT_X => state.left_stick.set_x(event.value),
                    ABS_LEFT_Y => state.left_stick.set_y(event.value),
                    ABS_L2 => {
                        state.l2 = event.value;
                        true
                    }
                    ABS_RIGHT_X => state.right_stick.set_x(event.value),
                    ABS_RIGHT_Y => state.right_stick.set_y(event.value),
                    ABS_R2 => {
                        state.r2 = event.value;
                        true
                    }
                    _ => false,
                };
            }
            EventKind::Key => match map_button(event.code) {
                Some(button) => {
                    state.buttons.set(button, event.value != 0);
                    changed = true;
                }
                None => match event.code {
                    BTN_TL2 | BTN_TR2 | KEY_ANY_BUTTON => {}
                    code => debug!("Ignoring unknown button code {} = {}", code, event.value),
                },
            },
            EventKind::Synchronization | EventKind::Other(_) => {}
        }
    }

    changed
}

/// Applies a motion-stream batch: axes 0/1/2 go straight into the tilt.
///
/// Without a tilt (no motion node bound) nothing is applied.
pub fn decode_motion_batch(state: &mut ControllerState, events: &[RawEvent]) -> bool {
    let Some(tilt) = state.tilt.as_mut() else {
        return false;
    };
    let mut changed = false;

    for event in events {
        if event.kind != EventKind::Absolute {
            continue;
        }
        match event.code {
            ABS_TILT_X => tilt.x_raw = event.value,
            ABS_TILT_Y => tilt.y_raw = event.value,
            ABS_TILT_Z => tilt.z_raw = event.value,
            _ => continue,
        }
        changed = true;
    }

    changed
}
