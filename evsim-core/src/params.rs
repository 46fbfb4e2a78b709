//! Module containing evsim parameters.

use crate::imports::*;

/// Unit conversions that should NEVER change
pub const KMH_PER_MPS: f64 = 3.6;
pub const M_PER_KM: f64 = 1000.0;
pub const W_PER_KW: f64 = 1000.0;
/// Joules per kilowatt-hour
pub const J_PER_KWH: f64 = 3.6e6;

/// Struct containing physical properties of the environment
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PhysicalProperties {
    /// Sea level air density at approximately 15 C, $kg/m^3$
    pub air_density_kg_per_m3: f64, // = 1.225
    pub a_grav_mps2: f64, // = 9.81
}

impl Default for PhysicalProperties {
    fn default() -> Self {
        Self {
            air_density_kg_per_m3: 1.225,
            a_grav_mps2: 9.81,
        }
    }
}

impl SerdeAPI for PhysicalProperties {}
