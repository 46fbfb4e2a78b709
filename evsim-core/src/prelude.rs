//! Convenience module for exposing commonly used structs

pub use crate::consumption::{consumption_sweep, steady_state_consumption, ConsumptionSweep, SteadyState};
pub use crate::control::{ConstantControl, Control, ControlSource, ControlTrace};
pub use crate::params::PhysicalProperties;
pub use crate::simdrive::{run, SimDrive, SimDriveParams, SimRun, Snapshot, TerminationReason, VehicleState};
pub use crate::traits::{ApproxEq, SerdeAPI};
pub use crate::vehicle::Vehicle;
