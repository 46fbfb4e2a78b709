//! Module containing implementations for [simdrive](crate::simdrive).

use crate::control::Control;
use crate::imports::*;
use crate::params::{J_PER_KWH, KMH_PER_MPS, M_PER_KM};
use crate::simdrive::{SimDrive, SimDriveParams, Snapshot, TerminationReason, VehicleState};
use crate::utils::{max, min};
use crate::vehicle::Vehicle;

impl SimDrive {
    /// Validates vehicle and run configuration and builds a fresh run.
    /// All per-tick math is total; `step` cannot fail.
    pub fn new(mut veh: Vehicle, sim_params: SimDriveParams) -> anyhow::Result<Self> {
        veh.set_derived()?;
        sim_params.check()?;
        let hist_len = sim_params.max_ticks + 1;
        let mut sd = Self {
            veh,
            sim_params,
            state: VehicleState::default(),
            speed_kmh: Array::zeros(hist_len),
            battery_kwh: Array::zeros(hist_len),
            dist_km: Array::zeros(hist_len),
            current_a: Array::zeros(hist_len),
            power_w: Array::zeros(hist_len),
        };
        sd.reset();
        Ok(sd)
    }

    /// Restores the initial condition: at rest, zero distance, full
    /// battery, zeroed history.  A run is restartable only through here.
    pub fn reset(&mut self) {
        let hist_len = self.sim_params.max_ticks + 1;
        self.state = VehicleState {
            i: 0,
            speed_mps: 0.0,
            dist_km: 0.0,
            battery_kwh: self.veh.battery_capacity_kwh,
            terminal: None,
        };
        self.speed_kmh = Array::zeros(hist_len);
        self.battery_kwh = Array::zeros(hist_len);
        self.dist_km = Array::zeros(hist_len);
        self.current_a = Array::zeros(hist_len);
        self.power_w = Array::zeros(hist_len);
        self.battery_kwh[0] = self.state.battery_kwh;
    }

    /// Advances the run by one fixed time increment.
    ///
    /// Integrates commanded acceleration into speed (clamped to the speed
    /// limiter), charges drag and rolling losses at the new speed against
    /// the battery, and advances distance.  Exhausting the battery stops
    /// the car before distance accrues on that tick and latches the
    /// terminal state; reaching the tick horizon latches it too.  Calling
    /// `step` on a terminal run changes nothing and returns the same
    /// terminal snapshot.
    pub fn step(&mut self, control: Control) -> Snapshot {
        if self.state.terminal.is_some() {
            return self.snapshot(0.0, 0.0);
        }
        let dt = self.sim_params.dt_s;
        let acc = control.accel_mps2(&self.sim_params);
        let mut speed = min(
            max(self.state.speed_mps + acc * dt, 0.0),
            self.veh.max_speed_mps,
        );

        let mut power_w = self.veh.power_draw_watts(speed);
        let energy_kwh = power_w * dt / J_PER_KWH;
        self.state.battery_kwh -= energy_kwh;
        if self.state.battery_kwh <= 0.0 {
            self.state.battery_kwh = 0.0;
            speed = 0.0;
            power_w = 0.0;
            self.state.terminal = Some(TerminationReason::BatteryDepleted);
            log::warn!("battery depleted at tick {}", self.state.i + 1);
        }

        self.state.speed_mps = speed;
        self.state.dist_km += speed * dt / M_PER_KM;
        let current_a = if speed > 0.0 {
            power_w / self.sim_params.bus_voltage_v
        } else {
            0.0
        };

        self.state.i += 1;
        if self.state.terminal.is_none() && self.state.i >= self.sim_params.max_ticks {
            self.state.terminal = Some(TerminationReason::HorizonReached);
        }

        let i = self.state.i;
        self.speed_kmh[i] = speed * KMH_PER_MPS;
        self.battery_kwh[i] = self.state.battery_kwh;
        self.dist_km[i] = self.state.dist_km;
        self.current_a[i] = current_a;
        self.power_w[i] = power_w;

        self.snapshot(current_a, power_w)
    }

    /// Steps to the terminal state, pulling one control per tick from
    /// `source` and filling the history channels.  Walking a run that is
    /// already terminal is an error; `reset` rewinds it first.
    pub fn walk<S: crate::control::ControlSource>(
        &mut self,
        source: &mut S,
    ) -> anyhow::Result<()> {
        ensure!(
            self.state.terminal.is_none(),
            "cannot walk a terminal run; call reset first"
        );
        while self.state.terminal.is_none() {
            let control = source.control_at(self.state.i);
            self.step(control);
        }
        Ok(())
    }

    fn snapshot(&self, current_a: f64, power_w: f64) -> Snapshot {
        Snapshot {
            i: self.state.i,
            speed_kmh: self.state.speed_mps * KMH_PER_MPS,
            battery_kwh: self.state.battery_kwh,
            dist_km: self.state.dist_km,
            current_a,
            power_w,
            terminal: self.state.terminal.is_some(),
            terminal_reason: self.state.terminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{ConstantControl, ControlTrace};
    use crate::simdrive::run;

    fn mock_sim_drive() -> SimDrive {
        SimDrive::new(Vehicle::mock_vehicle(), SimDriveParams::default()).unwrap()
    }

    #[test]
    fn test_single_full_throttle_step() {
        let mut sd = mock_sim_drive();
        let snap = sd.step(Control::full_throttle());
        // 2 m/s^2 over 0.1 s from rest
        assert!(sd.state.speed_mps.approx_eq(&0.2, 1e-12));
        let road_load_n = 0.5 * 1.225 * 0.29 * 2.2 * 0.2f64.powi(2) + 1600.0 * 9.81 * 0.010;
        let power_w = road_load_n * 0.2 / 0.90;
        assert!(snap.power_w.approx_eq(&power_w, 1e-9));
        assert!(snap.current_a.approx_eq(&(power_w / 400.0), 1e-9));
        let battery_kwh = 60.0 - power_w * 0.1 / 3.6e6;
        assert!(snap.battery_kwh.approx_eq(&battery_kwh, 1e-12));
        assert!(snap.dist_km.approx_eq(&(0.2 * 0.1 / 1000.0), 1e-12));
        assert!(!snap.terminal);
    }

    #[test]
    fn test_rest_consumes_no_energy() {
        let mut sd = mock_sim_drive();
        let mut source = ConstantControl(Control::default());
        sd.walk(&mut source).unwrap();
        assert_eq!(sd.state.i, 300);
        assert_eq!(sd.state.speed_mps, 0.0);
        assert_eq!(sd.state.battery_kwh, 60.0);
        assert_eq!(sd.state.dist_km, 0.0);
        assert_eq!(
            sd.state.terminal,
            Some(TerminationReason::HorizonReached)
        );
    }

    #[test]
    fn test_neutral_control_holds_speed() {
        // the model applies drag and rolling losses to the battery only,
        // never as passive deceleration
        let mut sd = mock_sim_drive();
        for _ in 0..20 {
            sd.step(Control::full_throttle());
        }
        let speed_mps = sd.state.speed_mps;
        assert!(speed_mps > 0.0);
        let battery_before = sd.state.battery_kwh;
        for _ in 0..20 {
            sd.step(Control::default());
        }
        assert_eq!(sd.state.speed_mps, speed_mps);
        // still moving, so the battery keeps draining
        assert!(sd.state.battery_kwh < battery_before);
    }

    #[test]
    fn test_depletion_stops_car_before_distance_accrues() {
        let mut veh = Vehicle::mock_vehicle();
        veh.battery_capacity_kwh = 1e-9;
        let mut sd = SimDrive::new(veh, SimDriveParams::default()).unwrap();
        let snap = sd.step(Control::full_throttle());
        assert!(snap.terminal);
        assert_eq!(snap.terminal_reason, Some(TerminationReason::BatteryDepleted));
        assert_eq!(snap.speed_kmh, 0.0);
        assert_eq!(snap.battery_kwh, 0.0);
        assert_eq!(snap.dist_km, 0.0);
        assert_eq!(snap.current_a, 0.0);
    }

    #[test]
    fn test_terminal_state_is_idempotent() {
        let mut veh = Vehicle::mock_vehicle();
        veh.battery_capacity_kwh = 1e-9;
        let mut sd = SimDrive::new(veh, SimDriveParams::default()).unwrap();
        sd.step(Control::full_throttle());
        let i = sd.state.i;
        for _ in 0..5 {
            let snap = sd.step(Control::full_throttle());
            assert_eq!(snap.i, i);
            assert_eq!(snap.speed_kmh, 0.0);
            assert_eq!(snap.battery_kwh, 0.0);
            assert_eq!(snap.terminal_reason, Some(TerminationReason::BatteryDepleted));
        }
    }

    #[test]
    fn test_reset_restores_initial_condition() {
        let mut sd = mock_sim_drive();
        for _ in 0..50 {
            sd.step(Control::full_throttle());
        }
        sd.reset();
        assert_eq!(sd.state.i, 0);
        assert_eq!(sd.state.speed_mps, 0.0);
        assert_eq!(sd.state.battery_kwh, 60.0);
        assert_eq!(sd.state.terminal, None);
        assert_eq!(sd.battery_kwh[0], 60.0);
        assert_eq!(sd.speed_kmh[50], 0.0);
    }

    #[test]
    fn test_run_iterator_is_finite_and_restartable() {
        let source = ConstantControl(Control::default());
        let mut sim_run = run(
            Vehicle::mock_vehicle(),
            SimDriveParams::default(),
            source,
        )
        .unwrap();
        assert_eq!(sim_run.by_ref().count(), 300);
        assert_eq!(sim_run.next(), None);
        sim_run.reset();
        let last = sim_run.by_ref().last().unwrap();
        assert!(last.terminal);
        assert_eq!(last.i, 300);
    }

    #[test]
    fn test_walk_with_control_trace() {
        let mut sd = mock_sim_drive();
        // throttle for 100 ticks, then the trace runs out and the run
        // coasts at constant speed to the horizon
        let mut trace = ControlTrace::new(
            String::from("throttle then neutral"),
            vec![Control::full_throttle(); 100],
        );
        sd.walk(&mut trace).unwrap();
        assert_eq!(sd.state.i, 300);
        assert_eq!(sd.speed_kmh[100], sd.speed_kmh[300]);
        assert!(sd.dist_km[300] > sd.dist_km[100]);
    }

    #[test]
    fn test_walk_rejects_terminal_run_until_reset() {
        let mut sd = mock_sim_drive();
        let mut source = ConstantControl(Control::full_throttle());
        sd.walk(&mut source).unwrap();
        assert!(sd.walk(&mut source).is_err());
        sd.reset();
        sd.walk(&mut source).unwrap();
        assert_eq!(sd.state.i, 300);
    }

    #[test]
    fn test_termination_reason_wire_format() {
        let reason = TerminationReason::BatteryDepleted;
        assert_eq!(
            serde_json::to_string(&reason).unwrap(),
            "\"battery_depleted\""
        );
    }

    #[test]
    fn test_rejects_non_positive_dt() {
        let mut sim_params = SimDriveParams::default();
        sim_params.dt_s = 0.0;
        assert!(SimDrive::new(Vehicle::mock_vehicle(), sim_params).is_err());
    }
}
