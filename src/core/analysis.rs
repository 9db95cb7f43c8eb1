//! Host-side byte frequency analysis.
//!
//! Mirrors what the browser analyser reports from `getByteFrequencyData`:
//! Blackman window over the latest `fft_size` samples, magnitude / N, temporal
//! smoothing, conversion to decibels and a linear map of the decibel range onto
//! 0..=255. Lets the pipeline run on PCM fed from tests or offline tools.

use super::constants::{FFT_SIZE, MAX_DECIBELS, MAX_MAGNITUDE, MIN_DECIBELS, SMOOTHING_TIME_CONSTANT};
use super::spectrum::MagnitudeAnalyser;
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

pub struct FftAnalyser {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    samples: Vec<f32>,
    write_pos: usize,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    smoothing: f32,
    min_db: f32,
    max_db: f32,
}

impl Default for FftAnalyser {
    fn default() -> Self {
        Self::new(FFT_SIZE)
    }
}

impl FftAnalyser {
    pub fn new(fft_size: usize) -> Self {
        let fft_size = fft_size.max(2);
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        Self {
            fft,
            fft_size,
            samples: vec![0.0; fft_size],
            write_pos: 0,
            window: (0..fft_size).map(|i| blackman_window(i, fft_size)).collect(),
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            smoothed: vec![0.0; fft_size / 2],
            smoothing: SMOOTHING_TIME_CONSTANT,
            min_db: MIN_DECIBELS,
            max_db: MAX_DECIBELS,
        }
    }

    pub fn with_smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = smoothing.clamp(0.0, 1.0);
        self
    }

    pub fn with_decibel_range(mut self, min_db: f32, max_db: f32) -> Self {
        if max_db > min_db {
            self.min_db = min_db;
            self.max_db = max_db;
        }
        self
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Append mono samples; only the latest `fft_size` are kept.
    pub fn push_samples(&mut self, samples: &[f32]) {
        for &s in samples {
            self.samples[self.write_pos] = s;
            self.write_pos = (self.write_pos + 1) % self.fft_size;
        }
    }

    fn analyse(&mut self) {
        let n = self.fft_size;
        for i in 0..n {
            // oldest sample first
            let s = self.samples[(self.write_pos + i) % n];
            self.scratch[i] = Complex::new(s * self.window[i], 0.0);
        }
        self.fft.process(&mut self.scratch);
        let tau = self.smoothing;
        for (k, slot) in self.smoothed.iter_mut().enumerate() {
            let mag = self.scratch[k].norm() / n as f32;
            let v = tau * *slot + (1.0 - tau) * mag;
            *slot = if v.is_finite() { v } else { 0.0 };
        }
    }

    fn to_byte(&self, magnitude: f32) -> u8 {
        if magnitude <= 0.0 {
            return 0;
        }
        let db = 20.0 * magnitude.log10();
        let scaled = (db - self.min_db) * MAX_MAGNITUDE / (self.max_db - self.min_db);
        scaled.floor().clamp(0.0, MAX_MAGNITUDE) as u8
    }
}

impl MagnitudeAnalyser for FftAnalyser {
    fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) {
        self.analyse();
        for (o, &m) in out.iter_mut().zip(self.smoothed.iter()) {
            *o = self.to_byte(m);
        }
    }
}

pub fn blackman_window(index: usize, size: usize) -> f32 {
    let a0 = 0.42;
    let a1 = 0.5;
    let a2 = 0.08;
    let x = index as f32 / size as f32;
    a0 - a1 * (2.0 * PI * x).cos() + a2 * (4.0 * PI * x).cos()
}
