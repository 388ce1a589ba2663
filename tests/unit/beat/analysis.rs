use super::*;

fn sample() -> BeatAnalysisResult {
    BeatAnalysisResult {
        tempo: 128.0,
        beats: vec![14, 28, 42, 56],
        energy_levels: vec![
            EnergyLevel {
                frame: 0,
                energy: Energy::Low,
            },
            EnergyLevel {
                frame: 30,
                energy: Energy::High,
            },
        ],
        peak_frames: vec![14, 42],
    }
}

#[test]
fn well_formed_result_has_no_violations() {
    assert!(sample().contract_violations().is_empty());
}

#[test]
fn detects_unsorted_negative_and_stray_peaks() {
    let mut r = sample();
    r.beats = vec![-1, 28, 28];
    r.peak_frames = vec![99];
    let v = r.contract_violations();
    assert_eq!(v.len(), 3, "{v:?}");
}

#[test]
fn energy_uses_the_latest_sample() {
    let r = sample();
    assert_eq!(r.energy_at(10), Some(Energy::Low));
    assert_eq!(r.energy_at(30), Some(Energy::High));
    assert_eq!(r.energy_at(-5), None);
    assert!(r.is_peak(42));
    assert!(!r.is_peak(28));
}

#[test]
fn last_beat_lookup() {
    let beats = [14, 28, 42];
    assert_eq!(last_beat_at_or_before(&beats, 13), None);
    assert_eq!(last_beat_at_or_before(&beats, 14), Some(14));
    assert_eq!(last_beat_at_or_before(&beats, 41), Some(28));
    assert_eq!(last_beat_at_or_before(&beats, 1000), Some(42));
}

#[test]
fn retime_rounds_to_nearest_frame() {
    assert_eq!(retime_beats(&[15, 30], 30, 60), vec![30, 60]);
    assert_eq!(retime_beats(&[15, 30], 30, 24), vec![12, 24]);
    assert_eq!(retime_beats(&[10, 25], 30, 20), vec![7, 17]);
}

#[test]
fn windows_clamp_at_zero() {
    let w = beat_windows(&[5, 40], 10);
    assert_eq!(w[0].start, FrameIndex(0));
    assert_eq!(w[0].end, FrameIndex(15));
    assert_eq!(w[1].start, FrameIndex(30));
}

#[test]
fn serde_shape_matches_provider_payloads() {
    let json = r#"{"tempo":120,"beats":[15,30],"energyLevels":[{"frame":0,"energy":"medium"}],"peakFrames":[30]}"#;
    let r: BeatAnalysisResult = serde_json::from_str(json).unwrap();
    assert_eq!(r.energy_levels[0].energy, Energy::Medium);
    assert!(r.contract_violations().is_empty());
}
