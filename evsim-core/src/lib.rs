#![allow(clippy::field_reassign_with_default)]

//! Crate containing models for tick-by-tick speed, energy draw, and battery
//! depletion simulation of battery-electric vehicles, plus steady-state
//! consumption and range estimation.

pub mod consumption;
pub mod control;
pub mod imports;
pub mod params;
pub mod prelude;
pub mod simdrive;
pub mod traits;
pub mod utils;
pub mod vehicle;
