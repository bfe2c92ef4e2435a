#![allow(unused_doc_comments)]
use proptest::prelude::*;
use wavecon_core::{cfl_timestep, Grid};
use wavecon_evolve::*;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 32, .. ProptestConfig::default()
    })]

    /// The null solution stays null for any admissible configuration.
    #[test]
    fn prop_zero_field_fixed_point(
        n in 3usize..128,
        length in 0.1f64..10.0,
        c in 0.1f64..5.0,
        safety in 0.05f64..1.0,
    ) {
        let grid = Grid::new(n, length).unwrap();
        let mut integ = WaveIntegrator::new(grid, c, safety, WaveState::zeros(&grid)).unwrap();
        integ.run(20).unwrap();
        prop_assert!(integ.state().now().data.iter().all(|&v| v == 0.0));
        prop_assert!(integ.trace().samples().iter().all(|&e| e == 0.0));
    }

    /// A constant field at rest is stationary under the leapfrog update.
    #[test]
    fn prop_constant_field_stationary(n in 3usize..64, v in -5.0f64..5.0, c in 0.1f64..5.0) {
        let grid = Grid::new(n, 1.0).unwrap();
        let dt = cfl_timestep(&grid, c, 0.45).unwrap();
        let mut state = WaveState::at_rest(&grid, Field1D::new(vec![v; n])).unwrap();
        let mut ev = LeapfrogEvolver::new(grid, c);
        for _ in 0..10 {
            ev.step(&mut state, dt).unwrap();
        }
        prop_assert!(state.now().data.iter().all(|&x| x == v));
    }

    /// Energy density is non-negative and the trace stays near its start for moderate runs.
    #[test]
    fn prop_pulse_energy_bounded(
        center in 0.2f64..0.8,
        width in 0.002f64..0.02,
        safety in 0.1f64..0.9,
    ) {
        let grid = Grid::new(200, 1.0).unwrap();
        let state = GaussianPulse { center, width }.state(&grid).unwrap();
        let dt = cfl_timestep(&grid, 1.0, safety).unwrap();
        let e = energy_density(&grid, &state, 1.0, dt).unwrap();
        prop_assert!(e.iter().all(|&v| v >= 0.0));

        let mut integ = WaveIntegrator::new(grid, 1.0, safety, state).unwrap();
        let trace = integ.run(100).unwrap();
        prop_assert!(trace.samples().iter().all(|e| e.is_finite()));
        prop_assert!(trace.max_relative_deviation().unwrap() < 0.5);
    }
}
