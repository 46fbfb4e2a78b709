use clap::Parser;
use serde::{Deserialize, Serialize};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use evsim_core::consumption::{SWEEP_MAX_SPEED_KMH, SWEEP_POINTS};
use evsim_core::params::KMH_PER_MPS;
use evsim_core::prelude::*;

/// Wrapper for evsim.
/// After running `cargo build --release`, run a timed drive with
/// ```bash
/// ./target/release/evsim-cli --veh-file compact_sedan.yaml --throttle 100
/// ```
/// or a steady-state consumption estimate with
/// ```bash
/// ./target/release/evsim-cli --veh-file compact_sedan.yaml --steady-speed 80
/// ```
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct EvSimApi {
    /// Vehicle as json string
    #[clap(long, value_parser)]
    veh: Option<String>,
    /// Path to vehicle file (yaml or json); the built-in mock vehicle is
    /// used when omitted
    #[clap(long, value_parser)]
    veh_file: Option<String>,
    /// Cruising speed (km/h) for a steady-state estimate instead of a
    /// timed drive
    #[clap(long, value_parser)]
    steady_speed: Option<f64>,
    /// Emit the consumption sweep table (50 points, 0-180 km/h) instead of
    /// running anything
    #[clap(long)]
    sweep: bool,
    /// Path to control trace file (yaml or json) for a timed drive
    #[clap(long, value_parser)]
    trace_file: Option<String>,
    /// Constant throttle percentage for a timed drive, default 100
    #[clap(long, value_parser)]
    throttle: Option<f64>,
    /// Constant brake percentage for a timed drive, default 0
    #[clap(long, value_parser)]
    brake: Option<f64>,
    /// Simulation time increment (s), default 0.1
    #[clap(long, value_parser)]
    dt: Option<f64>,
    /// Tick horizon for a timed drive, default 300
    #[clap(long, value_parser)]
    max_ticks: Option<usize>,
    /// How to print results: `json` (default) or `yaml`
    #[clap(long, value_parser)]
    res_fmt: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
struct DriveResults {
    ticks: usize,
    final_speed_kmh: f64,
    dist_km: f64,
    battery_kwh_used: f64,
    battery_kwh_remaining: f64,
    terminal_reason: Option<TerminationReason>,
}

impl SerdeAPI for DriveResults {}

pub fn main() -> anyhow::Result<()> {
    TermLogger::init(
        LevelFilter::Warn,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;
    let api = EvSimApi::parse();

    let veh = if let Some(veh_json) = api.veh {
        Vehicle::from_json(&veh_json)?
    } else if let Some(veh_file) = api.veh_file {
        Vehicle::from_file(&veh_file)?
    } else {
        Vehicle::mock_vehicle()
    };
    let fmt = api.res_fmt.unwrap_or_else(|| String::from("json"));

    if api.sweep {
        let sweep = consumption_sweep(&veh, SWEEP_MAX_SPEED_KMH, SWEEP_POINTS);
        println!("{}", sweep.to_str(&fmt)?);
        return Ok(());
    }

    if let Some(speed_kmh) = api.steady_speed {
        let ss = steady_state_consumption(&veh, speed_kmh);
        println!("{}", ss.to_str(&fmt)?);
        return Ok(());
    }

    let mut sim_params = SimDriveParams::default();
    if let Some(dt_s) = api.dt {
        sim_params.dt_s = dt_s;
    }
    if let Some(max_ticks) = api.max_ticks {
        sim_params.max_ticks = max_ticks;
    }

    let mut sd = SimDrive::new(veh, sim_params)?;
    if let Some(trace_file) = api.trace_file {
        let mut trace = ControlTrace::from_file(&trace_file)?;
        sd.walk(&mut trace)?;
    } else {
        let mut source = ConstantControl(Control::Pedal {
            throttle_perc: api.throttle.unwrap_or(100.0),
            brake_perc: api.brake.unwrap_or(0.0),
        });
        sd.walk(&mut source)?;
    }

    let results = DriveResults {
        ticks: sd.state.i,
        final_speed_kmh: sd.state.speed_mps * KMH_PER_MPS,
        dist_km: sd.state.dist_km,
        battery_kwh_used: sd.veh.battery_capacity_kwh - sd.state.battery_kwh,
        battery_kwh_remaining: sd.state.battery_kwh,
        terminal_reason: sd.state.terminal,
    };
    println!("{}", results.to_str(&fmt)?);
    Ok(())
}
