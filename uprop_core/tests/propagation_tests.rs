//! End-to-end propagation scenarios through the free-function API.
//!
//! These go through the process-default registry exactly the way library
//! consumers do, covering the documented reference results for every
//! operator and elementary function.

use uprop_core::prelude::*;

fn assert_close(got: f64, want: f64) {
    assert!(
        (got - want).abs() < 1e-9,
        "expected {want}, got {got} (diff {})",
        (got - want).abs()
    );
}

#[test]
fn uncertain_arithmetic() {
    uprop_core::init_tracing();

    let x = uval(10.0, 1.0).unwrap();
    let y = uval(10.0, 1.0).unwrap();

    let z = &x - &y;
    let z2 = &x - &x;

    assert_eq!(nominal(&z), 0.0);
    assert_close(stddev(&z), 2.0_f64.sqrt());
    assert_eq!(stddev(&z2), 0.0);
}

#[test]
fn uncertain_multiplication() {
    let x = uval(10.0, 1.0).unwrap();
    let y = uval(10.0, 1.0).unwrap();

    let z = &x * &y;
    let z2 = &x * &x;

    assert_eq!(nominal(&z), 100.0);
    assert_close(stddev(&z), 200.0_f64.sqrt());
    assert_close(stddev(&z2), 20.0);
}

#[test]
fn uncertain_division() {
    let x = uval(10.0, 1.0).unwrap();
    let y = uval(2.0, 0.2).unwrap();

    let z = &x / &y;
    assert_eq!(nominal(&z), 5.0);
    assert_close(stddev(&z), 0.5_f64.sqrt());
}

#[test]
fn elementary_reference_results() {
    let x = uval(0.0, 1.0).unwrap();
    let s = sin(x);
    assert_eq!(nominal(&s), 0.0);
    assert_close(stddev(&s), 1.0);

    let q = sqrt(uval(4.0, 0.5).unwrap()).unwrap();
    assert_eq!(nominal(&q), 2.0);
    assert_close(stddev(&q), 0.125);

    let e = exp(uval(1.0, 0.1).unwrap());
    assert_close(stddev(&e), std::f64::consts::E * 0.1);

    let l = ln(uval(10.0, 1.0).unwrap()).unwrap();
    assert_close(stddev(&l), 0.1);
}

#[test]
fn domain_and_zero_divisor_failures() {
    let negative = uval(-1.0, 0.1).unwrap();
    assert!(matches!(
        sqrt(negative.clone()),
        Err(PropagationError::Domain {
            function: "sqrt",
            ..
        })
    ));
    assert!(matches!(
        ln(negative),
        Err(PropagationError::Domain { function: "ln", .. })
    ));

    let x = uval(1.0, 0.1).unwrap();
    let zero = uval(0.0, 0.5).unwrap();
    assert_eq!(
        x.checked_div(&zero).unwrap_err(),
        PropagationError::DivisionByZero
    );
}

#[test]
fn batch_roundtrip() {
    let vals = uvals(&[1.0, 2.0], &[0.1, 0.2]).unwrap();
    assert_eq!(nominals(&vals), vec![1.0, 2.0]);
    let sd = stddevs(&vals);
    assert_close(sd[0], 0.1);
    assert_close(sd[1], 0.2);

    assert!(matches!(
        uvals(&[1.0], &[]),
        Err(PropagationError::LengthMismatch {
            nominals: 1,
            sigmas: 0,
        })
    ));
}

#[test]
fn negative_sigma_fails_fast() {
    assert!(matches!(
        uval(1.0, -0.5),
        Err(PropagationError::InvalidSigma { .. })
    ));
}

#[test]
fn mixed_expression_preserves_correlation() {
    let x = uval(2.0, 0.1).unwrap();
    // (x + 1)·(x − 1) = x² − 1: d/dx = 2x = 4 → σ = 0.4.
    let product = (&x + 1.0) * (&x - 1.0);
    assert_close(nominal(&product), 3.0);
    assert_close(stddev(&product), 0.4);
}

#[test]
fn values_are_shareable_across_threads() {
    let x = uval(10.0, 1.0).unwrap();
    let handle = std::thread::spawn({
        let x = x.clone();
        move || (&x * &x).stddev()
    });
    let in_thread = handle.join().unwrap();
    assert_close(in_thread, (&x * &x).stddev());
}
