//! Discrete energy bookkeeping for the wave equation.
//!
//! With psi_t = (now - prev) / dt and psi_x = d_dx(now):
//!
//! - density  e = 0.5 (psi_t^2 + c^2 psi_x^2)
//! - flux     F = -c^2 psi_t psi_x
//!
//! The local law is e_t + F_x = 0. Integrated over the periodic domain the
//! flux term telescopes away, leaving total energy constant.

use wavecon_core::{d_dx, d_dx_into, Grid, Scalar};

use crate::{EvolveError, WaveState};

fn time_derivative(s: &WaveState, dt: Scalar) -> Vec<Scalar> {
    s.now()
        .data
        .iter()
        .zip(&s.prev().data)
        .map(|(n, p)| (n - p) / dt)
        .collect()
}

/// Pointwise energy density written into `out`.
pub fn energy_density_into(
    grid: &Grid,
    s: &WaveState,
    c: Scalar,
    dt: Scalar,
    out: &mut [Scalar],
) -> Result<(), EvolveError> {
    grid.check_len(s.prev().as_slice())?;
    d_dx_into(grid, s.now().as_slice(), out)?;
    let c2 = c * c;
    for (e, (n, p)) in out.iter_mut().zip(s.now().data.iter().zip(&s.prev().data)) {
        let pt = (n - p) / dt;
        let px = *e;
        *e = 0.5 * (pt * pt + c2 * px * px);
    }
    Ok(())
}

pub fn energy_density(grid: &Grid, s: &WaveState, c: Scalar, dt: Scalar) -> Result<Vec<Scalar>, EvolveError> {
    let mut out = vec![0.0; grid.n()];
    energy_density_into(grid, s, c, dt, &mut out)?;
    Ok(out)
}

/// Spatial integral of the energy density: sum(e) * dx.
pub fn total_energy(grid: &Grid, s: &WaveState, c: Scalar, dt: Scalar) -> Result<Scalar, EvolveError> {
    Ok(grid.integrate(&energy_density(grid, s, c, dt)?))
}

/// Pointwise energy flux F = -c^2 psi_t psi_x. Diagnostic only; never enters the audit report.
pub fn energy_flux(grid: &Grid, s: &WaveState, c: Scalar, dt: Scalar) -> Result<Vec<Scalar>, EvolveError> {
    let px = d_dx(grid, s.now().as_slice())?;
    grid.check_len(s.prev().as_slice())?;
    let c2 = c * c;
    Ok(time_derivative(s, dt)
        .into_iter()
        .zip(px)
        .map(|(pt, px)| -c2 * pt * px)
        .collect())
}

/// Pointwise residual of the continuity law across one step:
///
/// r\[i] = (e_after\[i] - e_before\[i]) / dt + d_dx(F_after)\[i]
///
/// Small but not zero for this discretization; its integral reduces to the
/// change in total energy over the step divided by dt.
pub fn continuity_residual(
    grid: &Grid,
    before: &WaveState,
    after: &WaveState,
    c: Scalar,
    dt: Scalar,
) -> Result<Vec<Scalar>, EvolveError> {
    let e0 = energy_density(grid, before, c, dt)?;
    let e1 = energy_density(grid, after, c, dt)?;
    let div = d_dx(grid, &energy_flux(grid, after, c, dt)?)?;
    Ok(e1
        .iter()
        .zip(&e0)
        .zip(&div)
        .map(|((a, b), f)| (a - b) / dt + f)
        .collect())
}
