#![doc = r#"
wavecon-core: periodic 1D grid and centered finite-difference stencils

This crate provides:
- Core scalar type `Scalar`
- `Grid`: N equally spaced points over [0, L) with periodic wraparound
- `d_dx`, `lap`: periodic centered first and second differences
- `cfl_timestep(grid, c, safety)`: the derived, CFL-bounded time step
- `courant_number(c, dt, dx)`: c dt / dx, at most 1 for a stable run
- `CoreError` for degenerate configurations, rejected at construction

Neighbour access is explicit index arithmetic, `(i + 1) % N` and
`(i + N - 1) % N`. Operators always write into a buffer distinct from their
input, so no point ever reads a value advanced in the same pass.

```rust
use wavecon_core::{d_dx, lap, Grid};

let grid = Grid::new(4, 4.0).unwrap();
let f = [1.0, 2.0, 4.0, 8.0];
// index -1 is index 3, index 4 is index 0
assert_eq!(d_dx(&grid, &f).unwrap()[0], (2.0 - 8.0) / 2.0);
assert_eq!(lap(&grid, &f).unwrap()[3], 1.0 - 16.0 + 4.0);
```
"#]

use thiserror::Error;

pub type Scalar = f64;

/// Smallest grid on which the three-point periodic stencil has distinct neighbours.
pub const MIN_POINTS: usize = 3;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("periodic stencils need at least 3 points, got {0}")]
    TooFewPoints(usize),

    #[error("domain length must be finite and positive, got {0}")]
    NonPositiveLength(Scalar),

    #[error("wave speed must be finite and positive, got {0}")]
    NonPositiveSpeed(Scalar),

    #[error("CFL safety factor must lie in (0, 1], got {0}")]
    UnstableCfl(Scalar),

    #[error("field has {found} points but the grid has {expected}")]
    LengthMismatch { expected: usize, found: usize },
}

/// Periodic grid of `n` points covering the half-open interval [0, length).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    n: usize,
    dx: Scalar,
}

impl Grid {
    pub fn new(n: usize, length: Scalar) -> Result<Self, CoreError> {
        if n < MIN_POINTS {
            return Err(CoreError::TooFewPoints(n));
        }
        if !length.is_finite() || length <= 0.0 {
            return Err(CoreError::NonPositiveLength(length));
        }
        let dx = length / n as Scalar;
        // Guards against lengths so small the spacing underflows.
        if dx <= 0.0 {
            return Err(CoreError::NonPositiveLength(length));
        }
        Ok(Self { n, dx })
    }

    /// Number of grid points.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn dx(&self) -> Scalar {
        self.dx
    }

    /// Coordinate of point `i`.
    #[inline]
    pub fn x(&self, i: usize) -> Scalar {
        i as Scalar * self.dx
    }

    pub fn coords(&self) -> Vec<Scalar> {
        (0..self.n).map(|i| self.x(i)).collect()
    }

    /// Right neighbour; index N wraps to 0.
    #[inline]
    pub fn next(&self, i: usize) -> usize {
        (i + 1) % self.n
    }

    /// Left neighbour; index -1 wraps to N - 1.
    #[inline]
    pub fn prev(&self, i: usize) -> usize {
        (i + self.n - 1) % self.n
    }

    /// Index mirrored through `center` on the periodic lattice.
    #[inline]
    pub fn reflect(&self, center: usize, i: usize) -> usize {
        (2 * (center % self.n) + self.n - i % self.n) % self.n
    }

    pub fn check_len(&self, f: &[Scalar]) -> Result<(), CoreError> {
        if f.len() == self.n {
            Ok(())
        } else {
            Err(CoreError::LengthMismatch { expected: self.n, found: f.len() })
        }
    }

    /// Rectangle-rule integral over the periodic domain: sum(f) * dx.
    #[inline]
    pub fn integrate(&self, f: &[Scalar]) -> Scalar {
        f.iter().copied().sum::<Scalar>() * self.dx
    }
}

/// Courant number c * dt / dx; the explicit scheme is stable for values <= 1.
#[inline]
pub fn courant_number(c: Scalar, dt: Scalar, dx: Scalar) -> Scalar {
    c * dt / dx
}

/// Time step `safety * dx / c`, derived from the grid so the CFL bound holds by construction.
pub fn cfl_timestep(grid: &Grid, c: Scalar, safety: Scalar) -> Result<Scalar, CoreError> {
    if !c.is_finite() || c <= 0.0 {
        return Err(CoreError::NonPositiveSpeed(c));
    }
    if !safety.is_finite() || safety <= 0.0 || safety > 1.0 {
        return Err(CoreError::UnstableCfl(safety));
    }
    let dt = safety * grid.dx() / c;
    if !dt.is_finite() || dt <= 0.0 {
        return Err(CoreError::UnstableCfl(safety));
    }
    Ok(dt)
}

/// out\[i] = (f\[i+1] - f\[i-1]) / (2 dx), periodic.
pub fn d_dx_into(grid: &Grid, f: &[Scalar], out: &mut [Scalar]) -> Result<(), CoreError> {
    grid.check_len(f)?;
    grid.check_len(out)?;
    let inv = 1.0 / (2.0 * grid.dx());
    for (i, o) in out.iter_mut().enumerate() {
        *o = (f[grid.next(i)] - f[grid.prev(i)]) * inv;
    }
    Ok(())
}

/// out\[i] = (f\[i+1] - 2 f\[i] + f\[i-1]) / dx^2, periodic.
pub fn lap_into(grid: &Grid, f: &[Scalar], out: &mut [Scalar]) -> Result<(), CoreError> {
    grid.check_len(f)?;
    grid.check_len(out)?;
    let dx2 = grid.dx() * grid.dx();
    for (i, o) in out.iter_mut().enumerate() {
        *o = (f[grid.next(i)] - 2.0 * f[i] + f[grid.prev(i)]) / dx2;
    }
    Ok(())
}

pub fn d_dx(grid: &Grid, f: &[Scalar]) -> Result<Vec<Scalar>, CoreError> {
    let mut out = vec![0.0; grid.n()];
    d_dx_into(grid, f, &mut out)?;
    Ok(out)
}

pub fn lap(grid: &Grid, f: &[Scalar]) -> Result<Vec<Scalar>, CoreError> {
    let mut out = vec![0.0; grid.n()];
    lap_into(grid, f, &mut out)?;
    Ok(out)
}
