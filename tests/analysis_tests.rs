// Host FFT analyser checked against the browser analyser's byte mapping.

use audioviz_web::core::{FftAnalyser, MagnitudeAnalyser};
use std::f32::consts::TAU;

const SAMPLE_RATE: f32 = 48_000.0;

fn sine(freq: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (TAU * freq * i as f32 / SAMPLE_RATE).sin())
        .collect()
}

#[test]
fn default_analyser_reports_128_bins() {
    let analyser = FftAnalyser::default();
    assert_eq!(analyser.fft_size(), 256);
    assert_eq!(analyser.bin_count(), 128);
}

#[test]
fn silence_maps_to_zero_bytes() {
    let mut analyser = FftAnalyser::default();
    analyser.push_samples(&[0.0; 256]);
    let mut out = [7u8; 128];
    analyser.byte_frequency_data(&mut out);
    assert!(out.iter().all(|&b| b == 0));
}

#[test]
fn full_scale_tone_saturates_its_bin() {
    // 937.5 Hz sits exactly on bin 5 for a 256 point FFT at 48 kHz
    let mut analyser = FftAnalyser::default().with_smoothing(0.0);
    analyser.push_samples(&sine(937.5, 256));
    let mut out = [0u8; 128];
    analyser.byte_frequency_data(&mut out);

    assert_eq!(out[5], 255);
    assert_eq!(out[20], 0);
    assert_eq!(out[100], 0);
}

#[test]
fn quiet_tone_peaks_in_its_bin() {
    let quiet: Vec<f32> = sine(937.5, 256).iter().map(|s| s * 0.01).collect();
    let mut analyser = FftAnalyser::default().with_smoothing(0.0);
    analyser.push_samples(&quiet);
    let mut out = [0u8; 128];
    analyser.byte_frequency_data(&mut out);

    // 0.01 * 0.42 / 2 is about -53.6 dB
    assert!((168..=170).contains(&out[5]), "bin 5 = {}", out[5]);
    assert!(out[4] < out[5] && out[6] < out[5]);
    assert!(out.iter().enumerate().all(|(i, &b)| i == 5 || b < out[5]));
}

#[test]
fn only_the_latest_window_is_analysed() {
    let mut analyser = FftAnalyser::default().with_smoothing(0.0);
    analyser.push_samples(&sine(937.5, 512));
    analyser.push_samples(&[0.0; 256]);
    let mut out = [0u8; 128];
    analyser.byte_frequency_data(&mut out);
    assert!(out.iter().all(|&b| b == 0));
}

#[test]
fn smoothing_holds_energy_after_the_signal_stops() {
    let mut analyser = FftAnalyser::default();
    let mut out = [0u8; 128];
    for _ in 0..20 {
        analyser.push_samples(&sine(937.5, 256));
        analyser.byte_frequency_data(&mut out);
    }
    analyser.push_samples(&[0.0; 256]);
    analyser.byte_frequency_data(&mut out);
    // 0.8 of the previous magnitude is only ~2 dB down
    assert!(out[5] > 200, "bin 5 = {}", out[5]);
}

#[test]
fn invalid_decibel_range_is_ignored() {
    let mut analyser = FftAnalyser::default()
        .with_smoothing(0.0)
        .with_decibel_range(-30.0, -100.0);
    analyser.push_samples(&sine(937.5, 256));
    let mut out = [0u8; 128];
    analyser.byte_frequency_data(&mut out);
    assert_eq!(out[5], 255);
}
