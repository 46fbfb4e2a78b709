//! Module containing driver control inputs and per-tick control schedules.
//!
//! Two control shapes exist because the upstream demos exposed both: pedal
//! percentages and held buttons.  Both map to a longitudinal acceleration
//! via the reference constants carried in
//! [SimDriveParams](crate::simdrive::SimDriveParams).

use crate::imports::*;
use crate::simdrive::SimDriveParams;
use crate::utils::{max, min};

/// Driver control input for one tick.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    /// Pedal positions as percentages, each clamped to \[0, 100\]
    Pedal { throttle_perc: f64, brake_perc: f64 },
    /// Held accelerate/brake buttons
    Buttons { accelerate: bool, brake: bool },
}

impl Default for Control {
    /// Neutral input: no throttle, no brake.
    fn default() -> Self {
        Control::Buttons {
            accelerate: false,
            brake: false,
        }
    }
}

impl Control {
    /// Commanded longitudinal acceleration, $m/s^2$.  Positive is
    /// propulsion, negative is braking.
    pub fn accel_mps2(&self, sim_params: &SimDriveParams) -> f64 {
        match *self {
            Control::Pedal {
                throttle_perc,
                brake_perc,
            } => {
                let throttle = min(max(throttle_perc, 0.0), 100.0);
                let brake = min(max(brake_perc, 0.0), 100.0);
                throttle / 100.0 * sim_params.max_accel_mps2
                    - brake / 100.0 * sim_params.max_brake_mps2
            }
            Control::Buttons { accelerate, brake } => {
                let mut acc = 0.0;
                if accelerate {
                    acc += sim_params.max_accel_mps2;
                }
                if brake {
                    acc -= sim_params.max_brake_mps2;
                }
                acc
            }
        }
    }

    pub fn full_throttle() -> Self {
        Control::Pedal {
            throttle_perc: 100.0,
            brake_perc: 0.0,
        }
    }
}

/// Source of per-tick control inputs.  The presentation layer implements
/// this over its widgets; tests and the CLI use [ConstantControl] or a
/// [ControlTrace].
pub trait ControlSource {
    fn control_at(&mut self, i: usize) -> Control;
}

impl<F> ControlSource for F
where
    F: FnMut(usize) -> Control,
{
    fn control_at(&mut self, i: usize) -> Control {
        self(i)
    }
}

/// Same control repeated every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantControl(pub Control);

impl ControlSource for ConstantControl {
    fn control_at(&mut self, _i: usize) -> Control {
        self.0
    }
}

/// Named per-tick control schedule.  Ticks beyond the end of the trace
/// yield neutral control.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct ControlTrace {
    pub name: String,
    pub controls: Vec<Control>,
}

impl SerdeAPI for ControlTrace {}

impl ControlTrace {
    pub fn new(name: String, controls: Vec<Control>) -> Self {
        Self { name, controls }
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

impl ControlSource for ControlTrace {
    fn control_at(&mut self, i: usize) -> Control {
        self.controls.get(i).copied().unwrap_or_default()
    }
}
