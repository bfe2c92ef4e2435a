#![doc = r#"Energy-conservation audit layered over wavecon-evolve.

- `WaveConfig`: startup parameters (clap `Parser`), defaults reproduce the reference run.
- `run_audit`: integrate the configured pulse and summarise its energy trace.
- `AuditReport`: initial energy, final energy, difference and the drift verdict.

Notes:
- Only this crate knows about command-line parsing; lower layers take plain values.

Example (doctest):
```
use wavecon_audit::{run_audit, WaveConfig};

let cfg = WaveConfig { steps: 60, ..WaveConfig::default() };
let run = run_audit(&cfg).unwrap();
assert_eq!(run.trace.len(), 60);
assert_eq!(run.report.difference, run.report.final_energy - run.report.initial);
assert!(run.report.within_tolerance());
```
"#]

use std::fmt;
use std::io::{self, Write};

use clap::Parser;
use thiserror::Error;
use tracing::{info, warn};
use wavecon_core::{cfl_timestep, CoreError, Grid, Scalar};
use wavecon_evolve::{conserved_energy, EnergyTrace, EvolveError, GaussianPulse, WaveIntegrator};

pub const DEFAULT_POINTS: usize = 500;
pub const DEFAULT_LENGTH: Scalar = 1.0;
pub const DEFAULT_SPEED: Scalar = 1.0;
pub const DEFAULT_CFL: Scalar = 0.45;
pub const DEFAULT_STEPS: usize = 300;
pub const DEFAULT_CENTER: Scalar = 0.5;
pub const DEFAULT_WIDTH: Scalar = 0.002;
pub const DEFAULT_TOLERANCE: Scalar = 1e-2;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuditError {
    #[error(transparent)]
    Evolve(#[from] EvolveError),

    #[error("drift tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(Scalar),

    #[error("an audit needs at least one step")]
    NoSteps,
}

impl From<CoreError> for AuditError {
    fn from(e: CoreError) -> Self {
        AuditError::Evolve(e.into())
    }
}

/// Startup parameters of one audit run.
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct WaveConfig {
    /// Number of grid points N (at least 3).
    #[arg(short = 'n', long, default_value_t = DEFAULT_POINTS)]
    pub points: usize,

    /// Domain length L; the grid covers [0, L).
    #[arg(long, default_value_t = DEFAULT_LENGTH)]
    pub length: Scalar,

    /// Wave speed c.
    #[arg(short = 'c', long, default_value_t = DEFAULT_SPEED)]
    pub speed: Scalar,

    /// CFL safety factor in (0, 1]; dt = cfl * dx / c.
    #[arg(long, default_value_t = DEFAULT_CFL)]
    pub cfl: Scalar,

    /// Number of steps to simulate.
    #[arg(long, default_value_t = DEFAULT_STEPS)]
    pub steps: usize,

    /// Gaussian pulse center.
    #[arg(long, default_value_t = DEFAULT_CENTER)]
    pub center: Scalar,

    /// Gaussian width parameter w in exp(-(x - center)^2 / w).
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: Scalar,

    /// Largest acceptable |E_final - E_initial| / E_initial.
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    pub tolerance: Scalar,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            points: DEFAULT_POINTS,
            length: DEFAULT_LENGTH,
            speed: DEFAULT_SPEED,
            cfl: DEFAULT_CFL,
            steps: DEFAULT_STEPS,
            center: DEFAULT_CENTER,
            width: DEFAULT_WIDTH,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl WaveConfig {
    #[inline]
    pub fn pulse(&self) -> GaussianPulse {
        GaussianPulse { center: self.center, width: self.width }
    }

    /// Reject degenerate configurations before any integration happens.
    pub fn validate(&self) -> Result<(), AuditError> {
        let grid = Grid::new(self.points, self.length)?;
        cfl_timestep(&grid, self.speed, self.cfl)?;
        self.pulse().sample(&grid)?;
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(AuditError::InvalidTolerance(self.tolerance));
        }
        if self.steps == 0 {
            return Err(AuditError::NoSteps);
        }
        Ok(())
    }

    pub fn build_integrator(&self) -> Result<WaveIntegrator, AuditError> {
        self.validate()?;
        let grid = Grid::new(self.points, self.length)?;
        let state = self.pulse().state(&grid)?;
        Ok(WaveIntegrator::new(grid, self.speed, self.cfl, state)?)
    }
}

/// Summary of an energy trace. `difference` is always `final_energy - initial`.
///
/// The relative measures are `None` when the initial energy is zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AuditReport {
    pub steps: usize,
    pub initial: Scalar,
    pub final_energy: Scalar,
    pub difference: Scalar,
    pub relative_drift: Option<Scalar>,
    pub max_relative_deviation: Option<Scalar>,
    pub tolerance: Scalar,
}

impl AuditReport {
    pub fn from_trace(trace: &EnergyTrace, tolerance: Scalar) -> Result<Self, AuditError> {
        let (Some(initial), Some(final_energy)) = (trace.initial(), trace.last()) else {
            return Err(AuditError::NoSteps);
        };
        Ok(Self {
            steps: trace.len(),
            initial,
            final_energy,
            difference: final_energy - initial,
            relative_drift: trace.relative_drift(),
            max_relative_deviation: trace.max_relative_deviation(),
            tolerance,
        })
    }

    /// Relative drift within tolerance. A zero-energy run passes only if it stays at zero.
    pub fn within_tolerance(&self) -> bool {
        conserved_energy(self.initial, self.final_energy, self.tolerance)
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Initial total energy: {}", self.initial)?;
        writeln!(f, "Final total energy: {}", self.final_energy)?;
        write!(f, "Energy difference: {}", self.difference)
    }
}

/// Outcome of [`run_audit`]: the frozen trace and its summary.
#[derive(Clone, Debug, PartialEq)]
pub struct AuditRun {
    pub report: AuditReport,
    pub trace: EnergyTrace,
}

impl AuditRun {
    /// Whether the run counts as a success. Without `strict` every completed run passes.
    pub fn passes(&self, strict: bool) -> bool {
        !strict || self.report.within_tolerance()
    }

    /// One `step energy` line per sample, in step order.
    pub fn write_trace<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (step, e) in self.trace.samples().iter().enumerate() {
            writeln!(out, "{step} {e}")?;
        }
        Ok(())
    }
}

pub fn run_audit(config: &WaveConfig) -> Result<AuditRun, AuditError> {
    let mut integ = config.build_integrator()?;
    integ.run(config.steps)?;
    let trace = integ.into_trace();
    let report = AuditReport::from_trace(&trace, config.tolerance)?;

    info!(
        steps = report.steps,
        initial = report.initial,
        final_energy = report.final_energy,
        relative_drift = ?report.relative_drift,
        "energy audit complete"
    );
    if !report.within_tolerance() {
        warn!(
            relative_drift = ?report.relative_drift,
            tolerance = report.tolerance,
            "energy drift exceeds tolerance"
        );
    }
    Ok(AuditRun { report, trace })
}
