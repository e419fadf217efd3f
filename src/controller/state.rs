//! Controller state shared between the read loops and the consumer

use super::analog::AnalogStick;
use parking_lot::Mutex;
use std::fmt;

/// How the controller is connected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    #[default]
    Wired,
    Wireless,
}

// Digital buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Cross,
    Circle,
    Square,
    Triangle,
    Select,
    Start,
    L1,
    R1,
    L3,
    R3,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Buttons {
    pub cross: bool,
    pub circle: bool,
    pub square: bool,
    pub triangle: bool,
    pub select: bool,
    pub start: bool,
    pub l1: bool,
    pub r1: bool,
    pub l3: bool,
    pub r3: bool,
    pub dpad_up: bool,
    pub dpad_down: bool,
    pub dpad_left: bool,
    pub dpad_right: bool,
}

impl Buttons {
    pub fn get(&self, button: Button) -> bool {
        match button {
            Button::Cross => self.cross,
            Button::Circle => self.circle,
            Button::Square => self.square,
            Button::Triangle => self.triangle,
            Button::Select => self.select,
            Button::Start => self.start,
            Button::L1 => self.l1,
            Button::R1 => self.r1,
            Button::L3 => self.l3,
            Button::R3 => self.r3,
            Button::DPadUp => self.dpad_up,
            Button::DPadDown => self.dpad_down,
            Button::DPadLeft => self.dpad_left,
            Button::DPadRight => self.dpad_right,
        }
    }

    pub fn set(&mut self, button: Button, pressed: bool) {
        let flag = match button {
            Button::Cross => &mut self.cross,
            Button::Circle => &mut self.circle,
            Button::Square => &mut self.square,
            Button::Triangle => &mut self.triangle,
            Button::Select => &mut self.select,
            Button::Start => &mut self.start,
            Button::L1 => &mut self.l1,
            Button::R1 => &mut self.r1,
            Button::L3 => &mut self.l3,
            Button::R3 => &mut self.r3,
            Button::DPadUp => &mut self.dpad_up,
            Button::DPadDown => &mut self.dpad_down,
            Button::DPadLeft => &mut self.dpad_left,
            Button::DPadRight => &mut self.dpad_right,
        };
        *flag = pressed;
    }
}

/// Raw accelerometer samples, stored without calibration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tilt {
    pub x_raw: i32,
    pub y_raw: i32,
    pub z_raw: i32,
}

impl fmt::Display for Tilt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x_raw, self.y_raw, self.z_raw)
    }
}

/// Everything the controller reports.
///
/// `tilt` is `Some` only while a motion sensor node is bound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerState {
    pub left_stick: AnalogStick,
    pub right_stick: AnalogStick,
    pub tilt: Option<Tilt>,
    pub buttons: Buttons,
    /// Trigger pressure, 0-255, uncalibrated
    pub l2: i32,
    pub r2: i32,
    pub transport: Transport,
}

impl ControllerState {
    pub fn new(transport: Transport, has_motion: bool) -> Self {
        Self {
            tilt: has_motion.then(Tilt::default),
            transport,
            ..Self::default()
        }
    }
}

fn mark(pressed: bool) -> &'static str {
    if pressed {
        "X"
    } else {
        "O"
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.buttons;
        match &self.tilt {
            Some(tilt) => write!(f, "Tilt=({tilt}) ")?,
            None => write!(f, "Tilt=(-,-,-) ")?,
        }
        write!(
            f,
            "LeftStick=({:3}[{:.2}],{:3}[{:.2}],{}) RightStick=({:3}[{:.2}],{:3}[{:.2}],{}) ",
            self.left_stick.x_raw,
            self.left_stick.x,
            self.left_stick.y_raw,
            self.left_stick.y,
            mark(b.l3),
            self.right_stick.x_raw,
            self.right_stick.x,
            self.right_stick.y_raw,
            self.right_stick.y,
            mark(b.r3),
        )?;
        write!(
            f,
            "L1={} L2={:02x} R1={} R2={:02x} DPad({},{},{},{}) ",
            mark(b.l1),
            self.l2,
            mark(b.r1),
            self.r2,
            mark(b.dpad_left),
            mark(b.dpad_right),
            mark(b.dpad_up),
            mark(b.dpad_down),
        )?;
        write!(
            f,
            "Square={} Triangle={} Cross={} Circle={} Select={} Start={}",
            mark(b.square),
            mark(b.triangle),
            mark(b.cross),
            mark(b.circle),
            mark(b.select),
            mark(b.start),
        )
    }
}

/// [`ControllerState`] behind a single lock.
///
/// The lock is never handed out; every access runs inside a closure so the
/// guard is released on every exit path.
#[derive(Debug, Default)]
pub struct SharedState {
    inner: Mutex<ControllerState>,
}

impl SharedState {
    pub fn new(state: ControllerState) -> Self {
        Self {
            inner: Mutex::new(state),
        }
    }

    /// Runs `f` with exclusive access
    pub fn update<R>(&self, f: impl FnOnce(&mut ControllerState) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Runs `f` against a consistent view
    pub fn read<R>(&self, f: impl FnOnce(&ControllerState) -> R) -> R {
        let guard = self.inner.lock();
        f(&guard)
    }

    pub fn snapshot(&self) -> ControllerState {
        self.read(ControllerState::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilt_only_with_motion() {
        assert_eq!(ControllerState::new(Transport::Wired, false).tilt, None);
        assert_eq!(
            ControllerState::new(Transport::Wireless, true).tilt,
            Some(Tilt::default())
        );
    }

    #[test]
    fn set_touches_one_flag() {
        let mut buttons = Buttons::default();
        buttons.set(Button::DPadLeft, true);

        assert!(buttons.get(Button::DPadLeft));
        let expected = Buttons {
            dpad_left: true,
            ..Buttons::default()
        };
        assert_eq!(buttons, expected);

        buttons.set(Button::DPadLeft, false);
        assert_eq!(buttons, Buttons::default());
    }

    #[test]
    fn display_without_tilt_uses_placeholder() {
        let mut state = ControllerState::new(Transport::Wired, false);
        state.left_stick.set_x(200);
        state.buttons.cross = true;
        state.l2 = 0xff;

        let line = state.to_string();
        assert!(line.starts_with("Tilt=(-,-,-) LeftStick=(200[0.57],  0[0.00],O)"));
        assert!(line.contains("L2=ff"));
        assert!(line.contains("R2=00"));
        assert!(line.contains("Cross=X"));
        assert!(line.ends_with("Start=O"));
    }

    #[test]
    fn display_with_tilt() {
        let mut state = ControllerState::new(Transport::Wireless, true);
        state.tilt = Some(Tilt {
            x_raw: -12,
            y_raw: 400,
            z_raw: 7,
        });
        assert!(state.to_string().starts_with("Tilt=(-12,400,7) "));
    }

    #[test]
    fn snapshot_is_detached() {
        let shared = SharedState::new(ControllerState::default());
        let before = shared.snapshot();
        shared.update(|s| s.buttons.start = true);

        assert!(!before.buttons.start);
        assert!(shared.read(|s| s.buttons.start));
    }
}
