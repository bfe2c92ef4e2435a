use clap::Parser;
use wavecon_audit::*;
use wavecon_core::CoreError;
use wavecon_evolve::EvolveError;

const GOLDEN_E0: f64 = 13.984_490_414_184_206;

#[test]
fn default_run_conserves_energy() {
    let run = run_audit(&WaveConfig::default()).unwrap();
    let r = run.report;
    assert_eq!(r.steps, 300);
    assert_eq!(run.trace.len(), 300);
    assert!(((r.initial - GOLDEN_E0) / GOLDEN_E0).abs() < 1e-9, "initial = {}", r.initial);
    let drift = r.relative_drift.unwrap();
    assert!(drift < 1e-2, "drift = {drift}");
    assert!(r.within_tolerance());
    assert!(r.max_relative_deviation.unwrap() < 2e-2);
    assert!(run.passes(true));
}

#[test]
fn report_orders_initial_final_difference() {
    let run = run_audit(&WaveConfig::default()).unwrap();
    let r = run.report;
    assert_eq!(r.initial, run.trace.initial().unwrap());
    assert_eq!(r.final_energy, run.trace.last().unwrap());
    assert_eq!(r.difference, r.final_energy - r.initial);

    let text = r.to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Initial total energy:"));
    assert!(lines[1].starts_with("Final total energy:"));
    assert!(lines[2].starts_with("Energy difference:"));
    let value = |l: &str| l.rsplit(' ').next().unwrap().parse::<f64>().unwrap();
    assert_eq!(value(lines[0]), r.initial);
    assert_eq!(value(lines[1]), r.final_energy);
    assert_eq!(value(lines[2]), r.difference);
}

#[test]
fn identical_configs_give_identical_traces() {
    let cfg = WaveConfig { steps: 120, ..WaveConfig::default() };
    let a = run_audit(&cfg).unwrap();
    let b = run_audit(&cfg).unwrap();
    assert_eq!(a, b);
}

#[test]
fn cli_defaults_match_reference_constants() {
    let parsed = WaveConfig::try_parse_from(["wavecon"]).unwrap();
    assert_eq!(parsed, WaveConfig::default());
    assert_eq!(parsed.points, 500);
    assert_eq!(parsed.steps, 300);
    assert_eq!(parsed.cfl, 0.45);
    assert_eq!(parsed.width, 0.002);
}

#[test]
fn cli_overrides() {
    let parsed = WaveConfig::try_parse_from([
        "wavecon", "-n", "128", "--length", "2.0", "-c", "0.5", "--cfl", "0.3", "--steps", "40",
        "--center", "1.0", "--width", "0.01", "--tolerance", "0.05",
    ])
    .unwrap();
    assert_eq!(
        parsed,
        WaveConfig {
            points: 128,
            length: 2.0,
            speed: 0.5,
            cfl: 0.3,
            steps: 40,
            center: 1.0,
            width: 0.01,
            tolerance: 0.05,
        }
    );
    assert!(run_audit(&parsed).unwrap().report.within_tolerance());
}

#[test]
fn degenerate_configs_fail_fast() {
    let base = WaveConfig::default();
    let cases = [
        (WaveConfig { points: 2, ..base.clone() }, AuditError::Evolve(EvolveError::Core(CoreError::TooFewPoints(2)))),
        (WaveConfig { length: 0.0, ..base.clone() }, AuditError::Evolve(EvolveError::Core(CoreError::NonPositiveLength(0.0)))),
        (WaveConfig { speed: -1.0, ..base.clone() }, AuditError::Evolve(EvolveError::Core(CoreError::NonPositiveSpeed(-1.0)))),
        (WaveConfig { cfl: 1.5, ..base.clone() }, AuditError::Evolve(EvolveError::Core(CoreError::UnstableCfl(1.5)))),
        (WaveConfig { steps: 0, ..base.clone() }, AuditError::NoSteps),
        (WaveConfig { tolerance: -1.0, ..base.clone() }, AuditError::InvalidTolerance(-1.0)),
    ];
    for (cfg, expected) in cases {
        assert_eq!(cfg.validate(), Err(expected.clone()));
        assert_eq!(run_audit(&cfg), Err(expected));
    }
    let bad_width = WaveConfig { width: 0.0, ..base };
    assert!(matches!(
        bad_width.validate(),
        Err(AuditError::Evolve(EvolveError::InvalidInitialCondition { what: "width", .. }))
    ));
}

#[test]
fn tight_tolerance_flags_drift() {
    let cfg = WaveConfig { tolerance: 1e-6, ..WaveConfig::default() };
    let run = run_audit(&cfg).unwrap();
    assert!(!run.report.within_tolerance());
    assert!(!run.passes(true));
    assert!(run.passes(false));
    // the numbers themselves do not depend on the tolerance
    let reference = run_audit(&WaveConfig::default()).unwrap();
    assert_eq!(run.trace, reference.trace);
}

#[test]
fn trace_lines_follow_step_order() {
    let cfg = WaveConfig { steps: 25, ..WaveConfig::default() };
    let run = run_audit(&cfg).unwrap();
    let mut out = Vec::new();
    run.write_trace(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 25);
    for (k, line) in lines.iter().enumerate() {
        let (step, value) = line.split_once(' ').unwrap();
        assert_eq!(step.parse::<usize>().unwrap(), k);
        assert_eq!(value.parse::<f64>().unwrap(), run.trace.samples()[k]);
    }
}
