use super::*;

fn red() -> Rgba {
    Rgba::rgb(1.0, 0.0, 0.0)
}

fn blue() -> Rgba {
    Rgba::rgb(0.0, 0.0, 1.0)
}

fn samples() -> Vec<(Value, Value)> {
    vec![
        (Value::Scalar(0.1), Value::Scalar(0.3)),
        (Value::vec2(-1.0, 2.5), Value::vec2(3.0, 0.7)),
        (Value::vec3(0.0, 1.0, 2.0), Value::vec3(5.0, -1.0, 0.3)),
        (Value::Color(red()), Value::Color(blue())),
        (
            Value::Color(red()),
            Value::Gradient(vec![red(), Rgba::rgb(1.0, 0.5, 0.0)]),
        ),
        (Value::from("before"), Value::from("after")),
    ]
}

#[test]
fn identical_endpoints_are_idempotent() {
    for (a, _) in samples() {
        for ease in Ease::ALL {
            for f in [0.0, 0.1, 0.25, 0.5, 0.9, 1.0] {
                assert_eq!(interpolate(&a, &a, f, ease).unwrap(), a, "{ease:?} {f}");
            }
        }
    }
}

#[test]
fn endpoints_are_exact() {
    for (a, b) in samples() {
        for ease in Ease::ALL {
            assert_eq!(interpolate(&a, &b, 0.0, ease).unwrap(), a, "{ease:?}");
            let expected_end = if ease.ends_at_target() { &b } else { &a };
            assert_eq!(
                &interpolate(&a, &b, 1.0, ease).unwrap(),
                expected_end,
                "{ease:?}"
            );
        }
    }
}

#[test]
fn there_and_back_reaches_target_at_midpoint() {
    let v = interpolate(
        &Value::Scalar(1.0),
        &Value::Scalar(1.1),
        0.5,
        Ease::ThereAndBack,
    )
    .unwrap();
    assert_eq!(v, Value::Scalar(1.1));
}

#[test]
fn scalar_and_vector_lerp_linearly() {
    let v = interpolate(&Value::Scalar(0.0), &Value::Scalar(10.0), 0.25, Ease::Linear).unwrap();
    assert_eq!(v, Value::Scalar(2.5));
    let v = interpolate(
        &Value::vec2(0.0, 0.0),
        &Value::vec2(4.0, -4.0),
        0.5,
        Ease::Linear,
    )
    .unwrap();
    assert_eq!(v, Value::vec2(2.0, -2.0));
}

#[test]
fn colors_interpolate_componentwise() {
    let v = interpolate(&Value::Color(red()), &Value::Color(blue()), 0.5, Ease::Linear).unwrap();
    assert_eq!(v, Value::Color(Rgba::new(0.5, 0.0, 0.5, 1.0)));
}

#[test]
fn text_switches_only_when_window_completes() {
    let a = Value::from("a");
    let b = Value::from("b");
    assert_eq!(interpolate(&a, &b, 0.99, Ease::Linear).unwrap(), a);
    assert_eq!(interpolate(&a, &b, 1.0, Ease::Linear).unwrap(), b);
}

#[test]
fn fractions_outside_unit_range_are_rejected() {
    for f in [-0.01, 1.01, f64::NAN] {
        assert!(matches!(
            interpolate(&Value::Scalar(0.0), &Value::Scalar(1.0), f, Ease::Linear),
            Err(TimeweaveError::InvalidFraction(_))
        ));
    }
}

#[test]
fn mismatched_kinds_are_rejected() {
    assert!(matches!(
        interpolate(&Value::Scalar(0.0), &Value::vec2(1.0, 1.0), 0.5, Ease::Linear),
        Err(TimeweaveError::TypeMismatch(_))
    ));
}

#[test]
fn stops_map_fraction_onto_bracketing_pair() {
    let green = Rgba::rgb(0.0, 1.0, 0.0);
    let stops = vec![Value::Color(red()), Value::Color(green), Value::Color(blue())];
    assert_eq!(
        interpolate_stops(&stops, 0.0, Ease::Linear).unwrap(),
        Value::Color(red())
    );
    assert_eq!(
        interpolate_stops(&stops, 0.5, Ease::Linear).unwrap(),
        Value::Color(green)
    );
    assert_eq!(
        interpolate_stops(&stops, 0.75, Ease::Linear).unwrap(),
        Value::Color(Rgba::new(0.0, 0.5, 0.5, 1.0))
    );
    assert_eq!(
        interpolate_stops(&stops, 1.0, Ease::Linear).unwrap(),
        Value::Color(blue())
    );
    assert!(interpolate_stops(&[], 0.5, Ease::Linear).is_err());
}

#[test]
fn gradients_with_different_stop_counts_resample() {
    let a = Value::Gradient(vec![red(), blue()]);
    let b = Value::Gradient(vec![red(), red(), red()]);
    let Value::Gradient(mid) = interpolate(&a, &b, 0.5, Ease::Linear).unwrap() else {
        panic!("expected gradient");
    };
    assert_eq!(mid.len(), 3);
    assert_eq!(mid[0], red());
    assert_eq!(mid[1], Rgba::new(0.75, 0.0, 0.25, 1.0));
}

#[test]
fn sample_gradient_handles_single_and_empty() {
    assert_eq!(sample_gradient(&[], 0.5), None);
    assert_eq!(sample_gradient(&[red()], 0.7), Some(red()));
    assert_eq!(sample_gradient(&[red(), blue()], 1.0), Some(blue()));
}

#[test]
fn lerp_trait_covers_plain_vectors() {
    let a = Vec2::new(0.0, 4.0);
    let b = Vec2::new(2.0, 0.0);
    assert_eq!(<Vec2 as Lerp>::lerp(&a, &b, 0.25), Vec2::new(0.5, 3.0));
    assert_eq!(
        interpolate(&Value::Vec2(a), &Value::Vec2(b), 0.5, Ease::Linear).unwrap(),
        Value::vec2(1.0, 2.0)
    );
}
