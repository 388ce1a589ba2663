use super::*;

#[test]
fn starts_at_rest() {
    let cfg = SpringConfig::with_damping(DAMPING_POP);
    assert_eq!(spring(0.0, 30.0, cfg), 0.0);
    assert_eq!(spring(-12.0, 30.0, cfg), 0.0);
}

#[test]
fn settle_horizon_matches_common_dampings() {
    assert_eq!(SpringConfig::with_damping(DAMPING_POP).settle_frames(30.0), 20);
    assert_eq!(SpringConfig::with_damping(DAMPING_SOFT).settle_frames(30.0), 17);
}

#[test]
fn settles_exactly_after_horizon() {
    for damping in [DAMPING_POP, DAMPING_SOFT] {
        let cfg = SpringConfig::with_damping(damping);
        let horizon = cfg.settle_frames(30.0);
        for f in horizon..horizon + 40 {
            assert_eq!(spring(f as f64, 30.0, cfg), 1.0);
        }
        let before = spring((horizon - 1) as f64, 30.0, cfg);
        assert!((before - 1.0).abs() < 0.05, "{damping}: {before}");
    }
}

#[test]
fn never_negative_and_overshoot_is_bounded() {
    let cfg = SpringConfig {
        damping: 2.0,
        overshoot_clamp: 0.1,
        ..SpringConfig::default()
    };
    for f in 0..600 {
        let v = spring(f as f64, 30.0, cfg);
        assert!(v >= 0.0);
        assert!(v <= 1.1 + 1e-12);
    }
}

#[test]
fn overdamped_and_critical_rise_monotonically() {
    for damping in [20.0, 40.0] {
        let cfg = SpringConfig::with_damping(damping);
        let mut prev = 0.0;
        for f in 0..120 {
            let v = spring(f as f64, 30.0, cfg);
            assert!(v + 1e-12 >= prev, "damping {damping} frame {f}");
            prev = v;
        }
        assert_eq!(prev, 1.0);
    }
}

#[test]
fn spring_between_maps_onto_range() {
    let cfg = SpringConfig::with_damping(DAMPING_SOFT);
    assert_eq!(spring_between(0.0, 30.0, cfg, 50.0, 0.0), 50.0);
    assert_eq!(spring_between(100.0, 30.0, cfg, 50.0, 0.0), 0.0);
}
