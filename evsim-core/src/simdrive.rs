//! Module containing structs for the tick-by-tick drive simulation.

pub mod simdrive_impl;

use crate::control::ControlSource;
use crate::imports::*;
use crate::vehicle::Vehicle;

use validator::Validate;

/// Simulation run configuration.  Carries the fixed time increment, the
/// tick horizon, and the reference constants of the control model.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Validate)]
pub struct SimDriveParams {
    /// Fixed time increment, $s$; must be positive
    #[serde(alias = "dt")]
    pub dt_s: f64,
    /// Tick count at which a run terminates if the battery lasts that long
    #[serde(alias = "maxTicks")]
    pub max_ticks: usize,
    /// Acceleration commanded by full throttle, $m/s^2$
    #[validate(range(min = 0))]
    pub max_accel_mps2: f64,
    /// Deceleration commanded by full brake, $m/s^2$
    #[validate(range(min = 0))]
    pub max_brake_mps2: f64,
    /// Nominal battery bus voltage for current telemetry, $V$
    #[validate(range(min = 0))]
    pub bus_voltage_v: f64,
}

impl Default for SimDriveParams {
    fn default() -> Self {
        Self {
            dt_s: 0.1,
            max_ticks: 300,
            max_accel_mps2: 2.0,
            max_brake_mps2: 3.0,
            bus_voltage_v: 400.0,
        }
    }
}

impl SerdeAPI for SimDriveParams {
    fn init(&mut self) -> anyhow::Result<()> {
        self.check()
    }
}

impl SimDriveParams {
    /// Rejects invalid run configuration; `dt_s <= 0` is a programming
    /// error caught here rather than per step.
    pub fn check(&self) -> anyhow::Result<()> {
        match self.validate() {
            Ok(_) => (),
            Err(e) => bail!(e),
        };
        ensure!(self.dt_s > 0.0, "dt_s must be positive");
        ensure!(self.max_ticks > 0, "max_ticks must be positive");
        ensure!(self.bus_voltage_v > 0.0, "bus_voltage_v must be positive");
        Ok(())
    }
}

/// Why a run reached its terminal state.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    BatteryDepleted,
    HorizonReached,
}

/// Mutable kinematic and battery state, owned exclusively by one run.
/// Created fresh at run start, mutated once per tick by
/// [step](SimDrive::step), discarded or reset when the run stops.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct VehicleState {
    /// step counter
    pub i: usize,
    pub speed_mps: f64,
    pub dist_km: f64,
    pub battery_kwh: f64,
    pub terminal: Option<TerminationReason>,
}

/// Per-tick output emitted across the presentation boundary.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub i: usize,
    pub speed_kmh: f64,
    pub battery_kwh: f64,
    pub dist_km: f64,
    pub current_a: f64,
    pub power_w: f64,
    pub terminal: bool,
    pub terminal_reason: Option<TerminationReason>,
}

/// Tick-by-tick longitudinal drive simulation for one vehicle.  History
/// channels are preallocated to the tick horizon and hold exactly the
/// series the presentation layer charts; index 0 is the initial condition.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SimDrive {
    pub veh: Vehicle,
    pub sim_params: SimDriveParams,
    pub state: VehicleState,
    pub speed_kmh: Array1<f64>,
    pub battery_kwh: Array1<f64>,
    pub dist_km: Array1<f64>,
    pub current_a: Array1<f64>,
    pub power_w: Array1<f64>,
}

impl SerdeAPI for SimDrive {
    fn init(&mut self) -> anyhow::Result<()> {
        self.veh.set_derived()?;
        self.sim_params.check()
    }
}

/// Lazy, finite, restartable sequence of per-tick snapshots.  Real-time
/// pacing stays with the caller; each `next` advances exactly one tick and
/// the sequence ends with the first terminal snapshot.
pub struct SimRun<S: ControlSource> {
    sd: SimDrive,
    source: S,
    done: bool,
}

/// Builds a [SimRun] over a validated [SimDrive].
pub fn run<S: ControlSource>(
    veh: Vehicle,
    sim_params: SimDriveParams,
    source: S,
) -> anyhow::Result<SimRun<S>> {
    Ok(SimRun {
        sd: SimDrive::new(veh, sim_params)?,
        source,
        done: false,
    })
}

impl<S: ControlSource> Iterator for SimRun<S> {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        if self.done {
            return None;
        }
        let control = self.source.control_at(self.sd.state.i);
        let snapshot = self.sd.step(control);
        self.done = snapshot.terminal;
        Some(snapshot)
    }
}

impl<S: ControlSource> SimRun<S> {
    /// Rewinds to a fresh run with the same vehicle and configuration.
    pub fn reset(&mut self) {
        self.sd.reset();
        self.done = false;
    }

    pub fn sim_drive(&self) -> &SimDrive {
        &self.sd
    }
}
