use approx::assert_relative_eq;

use frees::{Dimension, Solver, Toolkit, Unit, Value, WarningKind};

#[test]
fn constants_are_substituted() {
    let report = Solver::default().solve("m = 2\nw = m * g_n");

    assert_relative_eq!(report.value("w").unwrap(), 19.6133, epsilon = 1e-9);
    assert!(!report.values.contains_key("g_n"));
}

#[test]
fn constants_do_not_touch_longer_names() {
    let report = Solver::default().solve("pipe = 3\nspin = pipe * pi");

    assert_relative_eq!(report.value("pipe").unwrap(), 3.0);
    assert_relative_eq!(
        report.value("spin").unwrap(),
        3.0 * std::f64::consts::PI,
        epsilon = 1e-12
    );
}

#[test]
fn unit_conversion() {
    let report = Solver::default().solve("L = convert(10, \"ft\", \"m\")");
    assert_relative_eq!(report.value("L").unwrap(), 3.048, epsilon = 1e-12);
}

#[test]
fn mismatched_units_warn() {
    let report = Solver::default().solve("L = convert(10, \"ft\", \"kg\")");

    assert_eq!(report.value("L"), None);
    assert_eq!(report.warnings[0].kind, WarningKind::EvaluationFailed);
}

#[test]
fn custom_toolkit() {
    let toolkit = Toolkit::standard()
        .to_builder()
        .constant("rho", "1000")
        .unit("furlong", Unit::new(Dimension::Length, 201.168))
        .function("cube", |args: &[Value<'_>]| {
            Ok(args.first().map_or(Ok(0.0), |v| v.number(1))?.powi(3))
        })
        .build();
    let solver = Solver::new(toolkit, frees::Config::default());

    let report = solver.solve("m = rho * cube(2)\nd = convert(1, \"furlong\", \"m\")");

    assert_relative_eq!(report.value("m").unwrap(), 8000.0);
    assert_relative_eq!(report.value("d").unwrap(), 201.168);
}

#[test]
fn unknown_function_warns() {
    let report = Solver::default().solve("y = frobnicate(2)");

    assert_eq!(report.value("y"), None);
    assert_eq!(report.warnings[0].kind, WarningKind::Malformed);
}
