use tracing::{debug, trace};
use wavecon_core::{cfl_timestep, courant_number, Grid, Scalar};

use crate::energy::energy_density_into;
use crate::{EvolveError, Evolver, LeapfrogEvolver, StepPhase, WaveState};

/// Append-only record of total energy, one sample per step, taken before the field advances.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnergyTrace {
    samples: Vec<Scalar>,
}

impl EnergyTrace {
    #[inline]
    pub fn len(&self) -> usize { self.samples.len() }
    #[inline]
    pub fn is_empty(&self) -> bool { self.samples.is_empty() }
    #[inline]
    pub fn samples(&self) -> &[Scalar] { &self.samples }
    #[inline]
    pub fn initial(&self) -> Option<Scalar> { self.samples.first().copied() }
    #[inline]
    pub fn last(&self) -> Option<Scalar> { self.samples.last().copied() }

    /// last - initial.
    pub fn drift(&self) -> Option<Scalar> {
        Some(self.last()? - self.initial()?)
    }

    /// Nonzero initial sample; relative measures are undefined without one.
    fn reference(&self) -> Option<Scalar> {
        self.initial().filter(|&e0| e0 != 0.0)
    }

    /// |last - initial| / |initial|. `None` for an empty trace or a zero initial energy.
    pub fn relative_drift(&self) -> Option<Scalar> {
        let e0 = self.reference()?;
        Some(self.drift()?.abs() / e0.abs())
    }

    /// Largest |E_k - E_0| / |E_0| over the whole trace. `None` under the same conditions as
    /// [`relative_drift`](Self::relative_drift).
    pub fn max_relative_deviation(&self) -> Option<Scalar> {
        let e0 = self.reference()?;
        Some(
            self.samples
                .iter()
                .map(|e| (e - e0).abs() / e0.abs())
                .fold(0.0, Scalar::max),
        )
    }

    fn push(&mut self, e: Scalar) {
        self.samples.push(e);
    }
}

/// Owns the grid, the two time levels and the energy trace for one run.
///
/// Each [`step`](Self::step) records the total energy of the current state and
/// then advances the field with the leapfrog update.
#[derive(Clone, Debug)]
pub struct WaveIntegrator {
    grid: Grid,
    c: Scalar,
    dt: Scalar,
    state: WaveState,
    evolver: LeapfrogEvolver,
    trace: EnergyTrace,
    density: Vec<Scalar>,
}

impl WaveIntegrator {
    /// `dt` is derived as `safety * dx / c`; it is never chosen independently.
    pub fn new(grid: Grid, c: Scalar, safety: Scalar, state: WaveState) -> Result<Self, EvolveError> {
        let dt = cfl_timestep(&grid, c, safety)?;
        grid.check_len(state.prev().as_slice())?;
        grid.check_len(state.now().as_slice())?;
        debug!(
            n = grid.n(),
            dx = grid.dx(),
            dt,
            courant = courant_number(c, dt, grid.dx()),
            "wave integrator initialised"
        );
        Ok(Self {
            grid,
            c,
            dt,
            state,
            evolver: LeapfrogEvolver::new(grid, c),
            trace: EnergyTrace::default(),
            density: vec![0.0; grid.n()],
        })
    }

    #[inline]
    pub fn grid(&self) -> &Grid { &self.grid }
    #[inline]
    pub fn c(&self) -> Scalar { self.c }
    #[inline]
    pub fn dt(&self) -> Scalar { self.dt }
    #[inline]
    pub fn state(&self) -> &WaveState { &self.state }
    #[inline]
    pub fn trace(&self) -> &EnergyTrace { &self.trace }
    /// Steps completed so far; equals the trace length.
    #[inline]
    pub fn steps_taken(&self) -> usize { self.trace.len() }

    pub fn into_trace(self) -> EnergyTrace {
        self.trace
    }

    /// Record the current energy, then advance one step. Returns the recorded sample.
    pub fn step(&mut self) -> Result<Scalar, EvolveError> {
        let step = self.trace.len();
        energy_density_into(&self.grid, &self.state, self.c, self.dt, &mut self.density)?;
        let e = self.grid.integrate(&self.density);
        if !e.is_finite() {
            return Err(EvolveError::NonFinite { step, phase: StepPhase::Sample });
        }
        self.trace.push(e);
        trace!(step, energy = e, "energy sample");

        self.evolver.step(&mut self.state, self.dt)?;
        if !self.state.now().is_finite() {
            return Err(EvolveError::NonFinite { step, phase: StepPhase::Advance });
        }
        Ok(e)
    }

    /// Run `steps` steps in order; no early exit except on a non-finite field.
    pub fn run(&mut self, steps: usize) -> Result<&EnergyTrace, EvolveError> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(&self.trace)
    }
}
