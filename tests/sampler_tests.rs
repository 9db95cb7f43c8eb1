// Host-side tests for the frequency sampler and its reductions.

use audioviz_web::core::sampler::{bucket, reduce};
use audioviz_web::core::{
    BindingState, FrequencySampler, MagnitudeAnalyser, Reduction, SpectrumFrame, SpectrumSource,
    VizError,
};

/// Yields `frames` in order, repeating the last one.
struct Scripted {
    frames: Vec<Vec<u8>>,
    next: usize,
}

impl MagnitudeAnalyser for Scripted {
    fn bin_count(&self) -> usize {
        self.frames[0].len()
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) {
        let i = self.next.min(self.frames.len() - 1);
        out.copy_from_slice(&self.frames[i]);
        self.next += 1;
    }
}

fn ramp(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 2) as u8).collect()
}

#[test]
fn bucket_uses_integer_stride_and_means() {
    let raw: Vec<u8> = (0..16).collect();
    let b = bucket(&raw, 4);
    assert_eq!(b, vec![1.5, 5.5, 9.5, 13.5]);
}

#[test]
fn bucket_of_128_bins_into_8_bands_has_stride_16() {
    let mut raw = vec![0u8; 128];
    for v in raw.iter_mut().skip(16).take(16) {
        *v = 160;
    }
    let b = bucket(&raw, 8);
    assert_eq!(b.len(), 8);
    assert_eq!(b[0], 0.0);
    assert_eq!(b[1], 160.0);
    assert!(b[2..].iter().all(|&x| x == 0.0));
}

#[test]
fn bucket_is_pure() {
    let raw = ramp(128);
    assert_eq!(bucket(&raw, 8), bucket(&raw, 8));
    let frame = SpectrumFrame::from_bins(raw);
    let r = Reduction::Bucketed { buckets: 8 };
    assert_eq!(reduce(&frame, r), reduce(&frame, r));
}

#[test]
fn bucket_degenerate_inputs_never_produce_nan() {
    assert!(bucket(&[1, 2, 3], 0).is_empty());
    // more buckets than bins gives zero-width bands
    let b = bucket(&[10, 20], 4);
    assert_eq!(b.len(), 4);
    assert!(b.iter().all(|x| *x == 0.0));
    // trailing bins past count * stride are ignored
    assert_eq!(bucket(&[4, 4, 4, 100], 3), vec![4.0, 4.0, 4.0]);
}

#[test]
fn raw_reduction_widens_bins() {
    let frame = SpectrumFrame::from_bins(vec![0, 128, 255]);
    assert_eq!(reduce(&frame, Reduction::Raw), vec![0.0, 128.0, 255.0]);
}

#[test]
fn pull_fully_replaces_the_stored_frame() {
    let mut source = SpectrumSource::new(4);
    source
        .bind(Box::new(Scripted {
            frames: vec![vec![9, 9, 9, 9], vec![1, 0, 0, 0]],
            next: 0,
        }))
        .unwrap();
    let mut sampler = FrequencySampler::new(4);
    assert_eq!(sampler.pull(&mut source).bins(), &[9, 9, 9, 9]);
    assert_eq!(sampler.pull(&mut source).bins(), &[1, 0, 0, 0]);
    assert_eq!(sampler.pulls(), 2);
    assert_eq!(sampler.frequencies(Reduction::Raw), vec![1.0, 0.0, 0.0, 0.0]);
}

#[test]
fn unbound_source_yields_silent_frames_of_expected_length() {
    let mut source = SpectrumSource::new(128);
    let mut sampler = FrequencySampler::new(128);
    let frame = sampler.pull(&mut source);
    assert_eq!(frame.len(), 128);
    assert!(frame.is_silent());
    assert_eq!(frame.session(), None);
}

#[test]
fn failed_binding_freezes_on_last_frame() {
    let mut source = SpectrumSource::new(4);
    source
        .bind(Box::new(Scripted {
            frames: vec![vec![7, 7, 7, 7]],
            next: 0,
        }))
        .unwrap();
    let mut sampler = FrequencySampler::new(4);
    sampler.pull(&mut source);

    let err = source
        .bind_with(|| Err(VizError::Binding("denied".into())))
        .unwrap_err();
    assert!(matches!(err, VizError::Binding(_)));

    // The render loop keeps going and keeps showing the last frame
    for _ in 0..3 {
        assert_eq!(sampler.pull(&mut source).bins(), &[7, 7, 7, 7]);
    }
    assert_eq!(sampler.pulls(), 1);
}

#[test]
fn failed_load_keeps_the_last_frame_after_reporting() {
    let mut source = SpectrumSource::new(4);
    let mut sampler = FrequencySampler::new(4);
    source
        .bind(Box::new(Scripted {
            frames: vec![vec![7, 7, 7, 7]],
            next: 0,
        }))
        .unwrap();
    sampler.pull(&mut source);

    // Loading a new file: tear down, fail to connect, then report
    source.unbind();
    let failed = source
        .bind_with(|| Err(VizError::Binding("denied".into())))
        .unwrap_err();
    assert!(matches!(failed, VizError::Binding(_)));
    let session = source.fail();
    assert_eq!(source.state(), BindingState::Failed(session));

    assert_eq!(sampler.pull(&mut source).bins(), &[7, 7, 7, 7]);
    assert_eq!(sampler.pulls(), 1);
}

#[test]
fn media_error_on_a_live_binding_freezes_and_disconnects() {
    let mut source = SpectrumSource::new(4);
    let mut sampler = FrequencySampler::new(4);
    source
        .bind(Box::new(Scripted {
            frames: vec![vec![3, 1, 4, 1], vec![0, 0, 0, 0]],
            next: 0,
        }))
        .unwrap();
    sampler.pull(&mut source);

    let first = source.fail();
    assert_eq!(source.fail(), first, "failing twice keeps the session");
    assert_eq!(source.session(), None);
    assert_eq!(sampler.pull(&mut source).bins(), &[3, 1, 4, 1]);

    // A later load binds normally again
    source
        .bind(Box::new(Scripted {
            frames: vec![vec![9, 9, 9, 9]],
            next: 0,
        }))
        .unwrap();
    assert_eq!(sampler.pull(&mut source).bins(), &[9, 9, 9, 9]);
}
