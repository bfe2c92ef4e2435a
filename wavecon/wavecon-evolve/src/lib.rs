#![doc = r#"Leapfrog stepper for the periodic 1D wave equation psi_tt = c^2 psi_xx.

Provides:
- `Evolver<G>` trait.
- `Field1D`: a scalar field over the periodic lattice with an `is_finite()` check.
- `WaveState`: the two most recent time levels `(prev, now)`.
- `GaussianPulse`: the at-rest Gaussian initial condition.
- `LeapfrogEvolver`: the explicit central-difference-in-time stepper.
- Energy bookkeeping in [`energy`]: density, flux, continuity residual.
- [`WaveIntegrator`]: owns grid, state and the append-only [`EnergyTrace`].
- `conserved_energy`: relative drift check between two energy samples.
"#]

use std::fmt;

use thiserror::Error;
use wavecon_core::{lap_into, CoreError, Grid, Scalar};

pub mod energy;
mod integrator;

pub use energy::{continuity_residual, energy_density, energy_flux, total_energy};
pub use integrator::{EnergyTrace, WaveIntegrator};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvolveError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("invalid initial condition: {what} = {value}")]
    InvalidInitialCondition { what: &'static str, value: Scalar },

    #[error("non-finite {phase} at step {step}")]
    NonFinite { step: usize, phase: StepPhase },
}

/// Where in a step a non-finite value surfaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepPhase {
    /// The energy sample of the current state; nothing was recorded for this step.
    Sample,
    /// The field after advancing; the step's sample is already in the trace.
    Advance,
}

impl fmt::Display for StepPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepPhase::Sample => f.write_str("energy sample"),
            StepPhase::Advance => f.write_str("field after advance"),
        }
    }
}

/// A minimal evolution stepper interface.
pub trait Evolver<G> {
    fn step(&mut self, g: &mut G, dt: Scalar) -> Result<(), EvolveError>;
}

/// A simple scalar field over a 1D lattice.
#[derive(Clone, Debug, PartialEq)]
pub struct Field1D {
    pub data: Vec<Scalar>,
}
impl Field1D {
    pub fn new(data: Vec<Scalar>) -> Self { Self { data } }
    pub fn zeros(n: usize) -> Self { Self { data: vec![0.0; n] } }
    #[inline]
    pub fn len(&self) -> usize { self.data.len() }
    #[inline]
    pub fn is_empty(&self) -> bool { self.data.is_empty() }
    #[inline]
    pub fn is_finite(&self) -> bool { self.data.iter().all(|x| x.is_finite()) }
    #[inline]
    pub fn as_slice(&self) -> &[Scalar] { &self.data }
}

/// Check conservation between two energy samples within a relative tolerance.
///
/// Returns true iff |e1 - e0| / |e0| <= tol. Relative drift is undefined for
/// e0 == 0, so a zero-energy start passes only if e1 is zero as well.
#[inline]
pub fn conserved_energy(e0: Scalar, e1: Scalar, tol: Scalar) -> bool {
    if e0 == 0.0 {
        return e1 == 0.0;
    }
    (e1 - e0).abs() / e0.abs() <= tol
}

/// Field at the previous and current time levels. Both always hold exactly N points.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveState {
    prev: Field1D,
    now: Field1D,
}

impl WaveState {
    pub fn new(grid: &Grid, prev: Field1D, now: Field1D) -> Result<Self, EvolveError> {
        grid.check_len(prev.as_slice())?;
        grid.check_len(now.as_slice())?;
        Ok(Self { prev, now })
    }

    /// Zero initial velocity: both time levels equal `profile`.
    pub fn at_rest(grid: &Grid, profile: Field1D) -> Result<Self, EvolveError> {
        Self::new(grid, profile.clone(), profile)
    }

    pub fn zeros(grid: &Grid) -> Self {
        Self { prev: Field1D::zeros(grid.n()), now: Field1D::zeros(grid.n()) }
    }

    #[inline]
    pub fn prev(&self) -> &Field1D { &self.prev }
    #[inline]
    pub fn now(&self) -> &Field1D { &self.now }
    #[inline]
    pub fn is_finite(&self) -> bool { self.prev.is_finite() && self.now.is_finite() }
}

/// psi(x) = exp(-(x - center)^2 / width), sampled at rest.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussianPulse {
    pub center: Scalar,
    pub width: Scalar,
}

impl Default for GaussianPulse {
    fn default() -> Self {
        Self { center: 0.5, width: 0.002 }
    }
}

impl GaussianPulse {
    pub fn sample(&self, grid: &Grid) -> Result<Field1D, EvolveError> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(EvolveError::InvalidInitialCondition { what: "width", value: self.width });
        }
        if !self.center.is_finite() {
            return Err(EvolveError::InvalidInitialCondition { what: "center", value: self.center });
        }
        let data = (0..grid.n())
            .map(|i| {
                let d = grid.x(i) - self.center;
                (-(d * d) / self.width).exp()
            })
            .collect();
        Ok(Field1D::new(data))
    }

    pub fn state(&self, grid: &Grid) -> Result<WaveState, EvolveError> {
        WaveState::at_rest(grid, self.sample(grid)?)
    }
}

/// Explicit leapfrog update on a periodic grid.
///
/// next\[i] = 2 now\[i] - prev\[i] + (c dt)^2 lap(now)\[i]
///
/// The Laplacian is taken into a scratch buffer first, and `next` is written
/// into the stale `prev` buffer point by point before the two levels swap, so
/// every point reads only values from the step's input.
#[derive(Clone, Debug)]
pub struct LeapfrogEvolver {
    grid: Grid,
    c: Scalar,
    lap: Vec<Scalar>,
}

impl LeapfrogEvolver {
    pub fn new(grid: Grid, c: Scalar) -> Self {
        Self { grid, c, lap: vec![0.0; grid.n()] }
    }
}

impl Evolver<WaveState> for LeapfrogEvolver {
    fn step(&mut self, s: &mut WaveState, dt: Scalar) -> Result<(), EvolveError> {
        lap_into(&self.grid, s.now.as_slice(), &mut self.lap)?;
        self.grid.check_len(s.prev.as_slice())?;
        let k = (self.c * dt) * (self.c * dt);
        for ((p, &n), &l) in s.prev.data.iter_mut().zip(&s.now.data).zip(&self.lap) {
            *p = 2.0 * n - *p + k * l;
        }
        std::mem::swap(&mut s.prev, &mut s.now);
        Ok(())
    }
}
