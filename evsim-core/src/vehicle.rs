//! Module containing the vehicle struct and related functions.

// local
use crate::imports::*;
use crate::params::*;

use validator::Validate;

/// Struct containing vehicle attributes.  All fields are fixed for the
/// duration of a run; derived fields are recomputed by
/// [set_derived](Vehicle::set_derived), which also performs input
/// validation and is called automatically when the vehicle is loaded via
/// [SerdeAPI].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Validate)]
pub struct Vehicle {
    /// Vehicle name
    #[serde(alias = "name")]
    pub scenario_name: String,
    /// Usable battery energy capacity, $kWh$
    #[serde(alias = "batteryCapacityKWh")]
    #[validate(range(min = 0))]
    pub battery_capacity_kwh: f64,
    /// Fraction of electrical power converted to propulsion, in (0, 1\]
    #[serde(alias = "motorEfficiency")]
    #[validate(range(min = 0, max = 1))]
    pub motor_eff: f64,
    /// Total vehicle mass, $kg$
    #[serde(alias = "massKg")]
    #[validate(range(min = 0))]
    pub mass_kg: f64,
    /// Aerodynamic drag coefficient
    #[serde(alias = "dragCoefficient")]
    #[validate(range(min = 0))]
    pub drag_coef: f64,
    /// Rolling resistance coefficient
    #[serde(alias = "rollingResistanceCoefficient")]
    #[validate(range(min = 0))]
    pub wheel_rr_coef: f64,
    /// Speed limiter ceiling, $km/h$
    #[serde(alias = "maxSpeedKmh")]
    #[validate(range(min = 0))]
    pub max_speed_kmh: f64,
    /// Frontal area, $m^2$
    #[serde(alias = "frontalAreaM2", default = "default_frontal_area_m2")]
    #[validate(range(min = 0))]
    pub frontal_area_m2: f64,
    /// Physical properties, see [PhysicalProperties]
    #[serde(default)]
    pub props: PhysicalProperties,
    /// Speed limiter ceiling, $m/s$; overridden by `set_derived`
    #[serde(skip)]
    pub max_speed_mps: f64,
}

fn default_frontal_area_m2() -> f64 {
    2.2
}

impl SerdeAPI for Vehicle {
    fn init(&mut self) -> anyhow::Result<()> {
        self.set_derived()
    }
}

impl Vehicle {
    /// Sets derived parameters:
    /// - `max_speed_mps`
    ///
    /// Also runs vehicle input validation; any failure here is a
    /// configuration error and halts run setup.
    pub fn set_derived(&mut self) -> anyhow::Result<()> {
        match self.validate() {
            Ok(_) => (),
            Err(e) => bail!(e),
        };
        ensure!(
            self.battery_capacity_kwh > 0.0,
            "battery_capacity_kwh must be positive in {}",
            self.scenario_name
        );
        ensure!(
            self.motor_eff > 0.0,
            "motor_eff must be in (0, 1] in {}",
            self.scenario_name
        );
        ensure!(
            self.mass_kg > 0.0,
            "mass_kg must be positive in {}",
            self.scenario_name
        );
        ensure!(
            self.max_speed_kmh > 0.0,
            "max_speed_kmh must be positive in {}",
            self.scenario_name
        );
        ensure!(
            self.frontal_area_m2 > 0.0,
            "frontal_area_m2 must be positive in {}",
            self.scenario_name
        );
        self.max_speed_mps = self.max_speed_kmh / KMH_PER_MPS;
        Ok(())
    }

    /// Aggregate resistive road load at `speed_mps`, $N$
    pub fn road_load_newtons(&self, speed_mps: f64) -> f64 {
        let drag_n = 0.5
            * self.props.air_density_kg_per_m3
            * self.drag_coef
            * self.frontal_area_m2
            * speed_mps.powi(2);
        let rolling_n = self.mass_kg * self.props.a_grav_mps2 * self.wheel_rr_coef;
        drag_n + rolling_n
    }

    /// Electrical power draw to hold `speed_mps` against road load, $W$.
    /// Zero at rest; the motor draws nothing when the vehicle is stopped.
    pub fn power_draw_watts(&self, speed_mps: f64) -> f64 {
        if speed_mps <= 0.0 {
            return 0.0;
        }
        self.road_load_newtons(speed_mps) * speed_mps / self.motor_eff
    }

    pub fn mock_vehicle() -> Self {
        let mut v = Self {
            scenario_name: String::from("evsim compact sedan"),
            battery_capacity_kwh: 60.0,
            motor_eff: 0.90,
            mass_kg: 1600.0,
            drag_coef: 0.29,
            wheel_rr_coef: 0.010,
            max_speed_kmh: 120.0,
            frontal_area_m2: 2.2,
            props: PhysicalProperties::default(),
            max_speed_mps: 0.0,
        };
        v.set_derived().unwrap();
        v
    }
}
