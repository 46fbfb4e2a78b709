//! Module containing steady-state consumption and range estimation for the
//! non-animated "instant estimate" views.

use crate::imports::*;
use crate::params::{KMH_PER_MPS, M_PER_KM, W_PER_KW};
use crate::vehicle::Vehicle;

/// Reference sweep shape: 50 evenly spaced points from 0 to 180 km/h.
pub const SWEEP_POINTS: usize = 50;
pub const SWEEP_MAX_SPEED_KMH: f64 = 180.0;

/// Consumption and implied range while cruising at a constant speed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct SteadyState {
    pub speed_kmh: f64,
    pub power_kw: f64,
    pub kwh_per_km: f64,
    pub range_km: f64,
}

impl SerdeAPI for SteadyState {}

/// Steady cruising consumption at `speed_kmh` with no acceleration.
/// Energy per kilometer is undefined at rest, so `speed_kmh <= 0` reports
/// zero power, zero consumption, and zero range.
pub fn steady_state_consumption(veh: &Vehicle, speed_kmh: f64) -> SteadyState {
    let speed_mps = speed_kmh / KMH_PER_MPS;
    if speed_mps <= 0.0 {
        return SteadyState {
            speed_kmh,
            ..SteadyState::default()
        };
    }
    let power_w = veh.power_draw_watts(speed_mps);
    let kwh_per_km = power_w / (speed_mps * M_PER_KM);
    let range_km = if kwh_per_km > 0.0 {
        veh.battery_capacity_kwh / kwh_per_km
    } else {
        0.0
    };
    SteadyState {
        speed_kmh,
        power_kw: power_w / W_PER_KW,
        kwh_per_km,
        range_km,
    }
}

/// Table of (speed, kWh/km) pairs across an evenly spaced speed sweep,
/// produced for charting.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ConsumptionSweep {
    pub speed_kmh: Array1<f64>,
    pub kwh_per_km: Array1<f64>,
}

impl SerdeAPI for ConsumptionSweep {}

pub fn consumption_sweep(veh: &Vehicle, max_speed_kmh: f64, n_points: usize) -> ConsumptionSweep {
    let speed_kmh = Array::linspace(0.0, max_speed_kmh, n_points);
    let kwh_per_km = speed_kmh
        .iter()
        .map(|&s| steady_state_consumption(veh, s).kwh_per_km)
        .collect();
    ConsumptionSweep {
        speed_kmh,
        kwh_per_km,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_form_power_at_80_kmh() {
        let veh = Vehicle::mock_vehicle();
        let ss = steady_state_consumption(&veh, 80.0);
        let v: f64 = 80.0 / 3.6;
        let power_w = (0.5 * 1.225 * 0.29 * 2.2 * v.powi(2) + 1600.0 * 9.81 * 0.010) * v / 0.90;
        assert!(ss.power_kw.approx_eq(&(power_w / 1e3), 1e-9));
        assert!(ss.kwh_per_km.approx_eq(&(power_w / (v * 1e3)), 1e-9));
        assert!(ss
            .range_km
            .approx_eq(&(60.0 / (power_w / (v * 1e3))), 1e-9));
    }

    #[test]
    fn test_zero_speed_is_guarded() {
        let veh = Vehicle::mock_vehicle();
        let ss = steady_state_consumption(&veh, 0.0);
        assert_eq!(ss.power_kw, 0.0);
        assert_eq!(ss.kwh_per_km, 0.0);
        assert_eq!(ss.range_km, 0.0);
    }

    #[test]
    fn test_sweep_shape_and_monotonicity() {
        let veh = Vehicle::mock_vehicle();
        let sweep = consumption_sweep(&veh, SWEEP_MAX_SPEED_KMH, SWEEP_POINTS);
        assert_eq!(sweep.kwh_per_km.len(), 50);
        assert!(sweep
            .speed_kmh
            .approx_eq(&Array::linspace(0.0, 180.0, 50), 1e-12));
        assert_eq!(sweep.kwh_per_km[0], 0.0);
        // consumption rises with speed once moving
        for w in sweep.kwh_per_km.to_vec()[1..].windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn test_range_shrinks_with_speed() {
        let veh = Vehicle::mock_vehicle();
        let slow = steady_state_consumption(&veh, 60.0);
        let fast = steady_state_consumption(&veh, 120.0);
        assert!(fast.kwh_per_km > slow.kwh_per_km);
        assert!(fast.range_km < slow.range_km);
    }
}
