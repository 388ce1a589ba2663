use super::*;

#[test]
fn endpoints_are_stable() {
    for e in [Ease::Linear, Ease::EaseIn, Ease::EaseOut, Ease::EaseInOut] {
        assert!((e.apply(0.0) - 0.0).abs() < 1e-12, "{e:?}");
        assert!((e.apply(1.0) - 1.0).abs() < 1e-12, "{e:?}");
    }
}

#[test]
fn inputs_outside_unit_range_are_clamped() {
    assert_eq!(Ease::EaseOut.apply(-3.0), 0.0);
    assert_eq!(Ease::EaseIn.apply(7.0), 1.0);
}

#[test]
fn monotonic_spot_check() {
    for e in [Ease::Linear, Ease::EaseIn, Ease::EaseOut, Ease::EaseInOut] {
        let mut prev = e.apply(0.0);
        for i in 1..=100 {
            let v = e.apply(i as f64 / 100.0);
            assert!(v + 1e-12 >= prev, "{e:?} decreased at {i}");
            prev = v;
        }
    }
}

#[test]
fn ease_out_matches_cubic_formula() {
    assert!((Ease::EaseOut.apply(0.5) - 0.875).abs() < 1e-12);
    assert!((Ease::EaseIn.apply(0.5) - 0.125).abs() < 1e-12);
    assert!((Ease::EaseInOut.apply(0.5) - 0.5).abs() < 1e-12);
}

#[test]
fn eased_progress_treats_zero_duration_as_done() {
    assert_eq!(eased_progress(0.0, 0.0, Ease::Linear), 1.0);
    assert_eq!(eased_progress(-1.0, 0.0, Ease::Linear), 0.0);
    assert_eq!(eased_progress(5.0, 10.0, Ease::Linear), 0.5);
}

#[test]
fn serde_uses_camel_case_names() {
    let s = serde_json::to_string(&Ease::EaseInOut).unwrap();
    assert_eq!(s, "\"easeInOut\"");
    let e: Ease = serde_json::from_str("\"linear\"").unwrap();
    assert_eq!(e, Ease::Linear);
}
