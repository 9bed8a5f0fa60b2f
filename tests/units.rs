//! 단위 변환 회귀 테스트.
use thermal_growth::conversion::{convert, convert_auto, ConversionError, QuantityKind};
use thermal_growth::units::{
    celsius_to_fahrenheit, fahrenheit_to_celsius, inches_to_mm, mm_to_inches,
};

fn assert_close(label: &str, actual: f64, expected: f64, rel_tol: f64) {
    let denom = expected.abs().max(1.0);
    let diff = (actual - expected).abs();
    assert!(
        diff <= rel_tol * denom,
        "{label} expected {expected:.9} got {actual:.9} (diff {diff:.3e}, tol {rel_tol})"
    );
}

#[test]
fn temperature_reference_points() {
    assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
    assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
    assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
    assert_eq!(fahrenheit_to_celsius(212.0), 100.0);
    assert_close("-459.4F", fahrenheit_to_celsius(-459.4), -273.0, 1e-12);
}

#[test]
fn temperature_round_trip() {
    for x in [-273.15, -40.0, -0.5, 0.0, 20.0, 37.777, 1234.5678, 2500.0, 1.0e6] {
        assert_close("C->F->C", fahrenheit_to_celsius(celsius_to_fahrenheit(x)), x, 1e-12);
    }
}

#[test]
fn length_round_trip() {
    assert_eq!(inches_to_mm(1.0), 25.4);
    assert_eq!(mm_to_inches(25.4), 1.0);
    for x in [0.0, 0.001, 1.0, 12.345, 304.8, 1.0e5, -3.0] {
        assert_close("in->mm->in", mm_to_inches(inches_to_mm(x)), x, 1e-12);
    }
}

#[test]
fn string_units() {
    assert_eq!(convert(QuantityKind::Length, 2.0, "in", "mm").expect("length"), 50.8);
    assert_eq!(convert(QuantityKind::Temperature, 100.0, "C", "°F").expect("temp"), 212.0);
    assert_eq!(convert_auto(32.0, "F", "celsius").expect("auto"), 0.0);
}

#[test]
fn mixed_or_unknown_units_are_errors() {
    assert!(matches!(
        convert_auto(1.0, "in", "C"),
        Err(ConversionError::IncompatibleUnits { .. })
    ));
    assert!(matches!(
        convert_auto(1.0, "ft", "mm"),
        Err(ConversionError::UnknownUnit(u)) if u == "ft"
    ));
}
