use super::*;

#[test]
fn disabled_theme_has_no_overlay() {
    let theme = Theme {
        enable_global_vfx: false,
        ..Theme::default()
    };
    assert!(global_vfx(&theme, 10, 100).is_none());
}

#[test]
fn grain_reseeds_every_three_frames() {
    let theme = Theme::default();
    let seeds: Vec<i64> = (0..7)
        .filter_map(|f| global_vfx(&theme, f, 100))
        .map(|v| v.grain.seed)
        .collect();
    assert_eq!(seeds, vec![0, 0, 0, 1, 1, 1, 2]);
}

#[test]
fn light_leak_drifts_diagonally_in_primary_color() {
    let theme = Theme::default();
    let Some(start) = global_vfx(&theme, 0, 100) else {
        panic!("vfx enabled by default");
    };
    assert_eq!(start.light_leak.x_pct, -20.0);
    assert_eq!(start.light_leak.y_pct, 120.0);
    assert_eq!(start.light_leak.opacity, LIGHT_LEAK_INTENSITY);
    assert_eq!(start.light_leak.color, theme.primary_color);
    assert_eq!(start.light_leak.blend_mode, "screen");

    let Some(end) = global_vfx(&theme, 100, 100) else {
        panic!("vfx enabled by default");
    };
    assert!((end.light_leak.x_pct - 120.0).abs() < 1e-9);
    assert!((end.light_leak.y_pct + 20.0).abs() < 1e-9);
}
