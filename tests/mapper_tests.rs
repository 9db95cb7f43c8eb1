// Host-side tests for the parameter mappers.

use audioviz_web::core::constants::*;
use audioviz_web::core::mappers::*;
use glam::Vec3;
use std::f32::consts::FRAC_PI_2;

const EPS: f32 = 1e-5;

#[test]
fn mean_of_empty_is_zero() {
    assert_eq!(mean(&[]), 0.0);
    assert!(!mean(&[]).is_nan());
}

#[test]
fn bar_scale_follows_formula_and_anchors_center() {
    let p = bar_scale(255.0, 3.0);
    assert!((p.scale_y - 4.0).abs() < EPS);
    assert!((p.y_offset - 1.5).abs() < EPS);

    let half = bar_scale(127.5, 3.0);
    assert!((half.scale_y - 2.5).abs() < EPS);
    assert!((half.y_offset - 0.75).abs() < EPS);
}

#[test]
fn bar_scale_rests_on_silence() {
    assert_eq!(bar_scale(0.0, BAR_GAIN), BarParams::REST);
}

#[test]
fn sphere_pulse_uses_mean_and_maps_hue() {
    let freqs = [0.0, 255.0, 127.5, 127.5];
    let p = sphere_pulse(&freqs, 0.3);
    let avg = 127.5;
    assert!((p.scale - (1.0 + avg / 255.0 * 0.3)).abs() < EPS);
    assert!((p.hue_degrees - 180.0).abs() < 1e-3);
}

#[test]
fn sphere_pulse_rests_on_silence_and_empty_input() {
    assert_eq!(sphere_pulse(&[0.0; 128], 1.0), SpherePulse::REST);
    assert_eq!(sphere_pulse(&[], 1.0), SpherePulse::REST);
}

#[test]
fn circular_layout_matches_reference_points() {
    let first = circular_position(0, 64, 8.0);
    assert!((first.x - 8.0).abs() < EPS);
    assert!(first.z.abs() < EPS);
    assert_eq!(first.hue, 0.0);

    let quarter = circular_position(16, 64, 8.0);
    assert!(quarter.x.abs() < 1e-4);
    assert!((quarter.z - 8.0).abs() < 1e-4);
    assert!((quarter.hue - 0.25).abs() < EPS);
}

#[test]
fn circular_layout_with_no_bars_does_not_divide_by_zero() {
    let slot = circular_position(0, 0, 8.0);
    assert!(slot.x.is_finite() && slot.z.is_finite() && slot.hue.is_finite());
}

#[test]
fn waveform_displacement_follows_half_index_rule() {
    let mut wave = WaveformLine::new(8, WaveShape::Line { extent: 20.0 }, 2.0);
    let freqs = [255.0, 0.0, 127.5];
    wave.update(&freqs);
    // point i reads freq[floor(i/2) mod len]
    let expected = [2.0, 2.0, 0.0, 0.0, 1.0, 1.0, 2.0, 2.0];
    for (i, want) in expected.iter().enumerate() {
        let got = wave.displacement(i).unwrap();
        assert!((got - want).abs() < EPS, "point {i}: {got} != {want}");
    }
}

#[test]
fn waveform_line_spans_extent_and_keeps_x_between_updates() {
    let mut wave = WaveformLine::new(WAVEFORM_POINTS, WaveShape::Line { extent: 20.0 }, 2.0);
    let pts = wave.points();
    assert_eq!(pts.len(), WAVEFORM_POINTS);
    assert!((pts[0].x + 10.0).abs() < EPS);
    assert!((pts[WAVEFORM_POINTS - 1].x - 10.0).abs() < EPS);

    let xs_before: Vec<f32> = wave.points().iter().map(|p| p.x).collect();
    let buffer_before = wave.points().as_ptr();
    wave.update(&[200.0; 128]);
    wave.update(&[10.0; 64]);
    let xs_after: Vec<f32> = wave.points().iter().map(|p| p.x).collect();
    assert_eq!(xs_before, xs_after);
    assert_eq!(buffer_before, wave.points().as_ptr());
}

#[test]
fn waveform_ellipse_displaces_along_z_only() {
    let mut wave = WaveformLine::new(16, WaveShape::Ellipse { radius: 10.0 }, 2.0);
    let before: Vec<Vec3> = wave.points().to_vec();
    wave.update(&[255.0; 4]);
    for (a, b) in before.iter().zip(wave.points()) {
        assert_eq!(a.x, b.x);
        assert_eq!(a.y, b.y);
        assert!((b.z - 2.0).abs() < EPS);
    }
}

#[test]
fn waveform_with_empty_frequencies_stays_flat() {
    let mut wave = WaveformLine::new(4, WaveShape::Line { extent: 2.0 }, 2.0);
    wave.update(&[]);
    assert!(wave.points().iter().all(|p| p.y == 0.0));
}

#[test]
fn ring_scale_is_frequency_driven_and_spin_is_time_driven() {
    assert_eq!(ring_scale(&[0.0; 32], RING_GAIN), 1.0);
    assert!((ring_scale(&[255.0; 32], RING_GAIN) - 1.2).abs() < EPS);

    let mut spin = Spin::per_frame(RING_SPIN_PER_FRAME);
    // One second at the reference cadence equals sixty per-frame increments
    let a = spin.advance(1.0);
    assert!((a - RING_SPIN_PER_FRAME * 60.0).abs() < 1e-4);
    // Silence does not stop the spin; zero dt does
    let b = spin.advance(0.0);
    assert_eq!(a, b);
    let c = spin.advance(0.5);
    assert!(c > b);
}

#[test]
fn spin_ignores_non_finite_dt() {
    let mut spin = Spin::new(1.0);
    spin.advance(0.25);
    assert_eq!(spin.advance(f32::NAN), 0.25);
    assert_eq!(spin.advance(-1.0), 0.25);
}

#[test]
fn bass_pulse_uses_first_bins_only() {
    let mut freqs = vec![0.0; 128];
    for f in freqs.iter_mut().take(8) {
        *f = 255.0;
    }
    let p = bass_pulse(&freqs, BASS_BINS, CRYSTAL_GAIN);
    assert!((p.intensity - 1.0).abs() < EPS);
    assert!((p.outer_scale - 1.2).abs() < EPS);
    assert!((p.inner_scale - 1.2 * CRYSTAL_INNER_RATIO).abs() < EPS);
    assert!((p.glow_scale - 1.2 * CRYSTAL_GLOW_RATIO).abs() < EPS);
    assert!((p.glow_intensity - 1.0_f32.tanh() * CRYSTAL_GLOW_MAX).abs() < 1e-4);

    let rest = bass_pulse(&[], BASS_BINS, CRYSTAL_GAIN);
    assert_eq!(rest.outer_scale, 1.0);
    assert_eq!(rest.glow_intensity, 0.0);
}

#[test]
fn nebula_clouds_are_laid_out_and_scaled_by_band() {
    let c = nebula_cloud(0, 8, 128.0, 0.0);
    assert!((c.position.x - (-3.5 * 3.0)).abs() < EPS);
    assert!(c.position.y.abs() < EPS);
    assert!((c.position.z - 2.0).abs() < EPS);
    assert!((c.scale - 2.0).abs() < EPS);
    assert_eq!(c.hue, 0.0);
    // At t = 0 the sway sits at cos(0) on X and sin(0) on Y
    assert!((c.rotation_x - 0.2).abs() < EPS);
    assert!(c.rotation_y.abs() < EPS);

    let last = nebula_cloud(7, 8, 0.0, 0.0);
    assert!((last.position.x - 3.5 * 3.0).abs() < EPS);
    assert!((last.hue - 7.0 / 8.0).abs() < EPS);
    assert_eq!(last.scale, 1.0);
}

#[test]
fn nebula_scale_rejects_nan() {
    assert_eq!(nebula_cloud(0, 8, f32::NAN, 1.0).scale, 1.0);
}

#[test]
fn floating_cube_bobs_and_turns_with_time() {
    let base = Vec3::new(5.0, 5.0, 0.0);
    let m = floating_cube(base, FRAC_PI_2 / 2.0);
    // sin(2t) = 1 at t = pi/4
    assert!((m.position.y - 5.5).abs() < EPS);
    assert_eq!(m.position.x, 5.0);
    assert!((m.rotation.x - FRAC_PI_2 / 4.0).abs() < EPS);
}

#[test]
fn network_time_helpers_follow_formulas() {
    assert!((node_pulse(0.0, 0.0) - 1.0).abs() < EPS);
    assert!((dash_offset(0.0) - 5.0).abs() < EPS);
    assert!((data_flow_t(0.5) - 0.25).abs() < EPS);
    assert!((data_flow_t(2.5) - 0.25).abs() < EPS);
}
