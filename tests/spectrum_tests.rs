// Host-side tests for spectrum source binding and teardown.

use audioviz_web::core::constants::BIN_COUNT;
use audioviz_web::core::mappers::{bar_scale, sphere_pulse, SpherePulse};
use audioviz_web::core::{
    BindingState, FrequencySampler, MagnitudeAnalyser, Reduction, SpectrumSource, VizError,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Always reports one byte value; records when it is disconnected.
struct Tone {
    value: u8,
    bins: usize,
    disconnected: Rc<RefCell<bool>>,
}

impl Tone {
    fn new(value: u8, bins: usize) -> (Self, Rc<RefCell<bool>>) {
        let flag = Rc::new(RefCell::new(false));
        (
            Self {
                value,
                bins,
                disconnected: flag.clone(),
            },
            flag,
        )
    }
}

impl MagnitudeAnalyser for Tone {
    fn bin_count(&self) -> usize {
        self.bins
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) {
        assert!(!*self.disconnected.borrow(), "read after disconnect");
        out.fill(self.value);
    }

    fn disconnect(&mut self) {
        *self.disconnected.borrow_mut() = true;
    }
}

#[test]
fn rebinding_never_yields_a_frame_from_the_previous_source() {
    let mut source = SpectrumSource::new(BIN_COUNT);
    let mut sampler = FrequencySampler::new(BIN_COUNT);

    let (a, a_gone) = Tone::new(200, BIN_COUNT);
    let session_a = source.bind(Box::new(a)).unwrap();
    let frame_a = sampler.pull(&mut source).clone();
    assert!(frame_a.bins().iter().all(|&b| b == 200));
    assert_eq!(frame_a.session(), Some(session_a));

    let (b, _) = Tone::new(40, BIN_COUNT);
    let session_b = source.bind(Box::new(b)).unwrap();
    assert!(*a_gone.borrow(), "previous analyser torn down before rebinding");
    assert_ne!(session_a, session_b);

    let frame_b = sampler.pull(&mut source);
    assert!(frame_b.bins().iter().all(|&v| v == 40));
    assert_eq!(frame_b.session(), Some(session_b));
    assert_ne!(frame_b, &frame_a);
}

#[test]
fn load_then_connect_scenario() {
    let mut source = SpectrumSource::new(BIN_COUNT);
    let mut sampler = FrequencySampler::new(BIN_COUNT);

    // File chosen, analysis not connected yet
    assert_eq!(source.state(), BindingState::Unbound);
    assert!(sampler.pull(&mut source).is_silent());

    // Connected while paused: the analyser reports silence
    let (paused, _) = Tone::new(0, BIN_COUNT);
    source.bind(Box::new(paused)).unwrap();
    let frame = sampler.pull(&mut source);
    assert_eq!(frame.len(), BIN_COUNT);
    assert!(frame.session().is_some());

    let freqs = sampler.frequencies(Reduction::Raw);
    assert_eq!(sphere_pulse(&freqs, 1.0), SpherePulse::REST);
    assert!(freqs.iter().all(|&f| bar_scale(f, 3.0).scale_y == 1.0));
}

#[test]
fn zero_bin_analyser_is_rejected() {
    let mut source = SpectrumSource::new(BIN_COUNT);
    let (empty, _) = Tone::new(1, 0);
    let err = source.bind(Box::new(empty)).unwrap_err();
    assert_eq!(err, VizError::EmptyAnalyser);
    assert!(matches!(source.state(), BindingState::Failed(_)));
    assert_eq!(source.session(), None);
}

#[test]
fn bin_count_follows_the_bound_analyser() {
    let mut source = SpectrumSource::new(BIN_COUNT);
    let (wide, _) = Tone::new(1, 512);
    source.bind(Box::new(wide)).unwrap();
    assert_eq!(source.bin_count(), 512);
    assert_eq!(source.refresh().len(), 512);

    // Unbinding keeps the last length so silence matches the session's shape
    source.unbind();
    assert_eq!(source.refresh().len(), 512);
}

#[test]
fn unbind_and_drop_disconnect_exactly_once() {
    let (tone, gone) = Tone::new(5, 8);
    let mut source = SpectrumSource::new(8);
    source.bind(Box::new(tone)).unwrap();
    source.unbind();
    assert!(*gone.borrow());
    assert_eq!(source.state(), BindingState::Unbound);
    assert!(source.refresh().is_silent());

    let (tone, gone) = Tone::new(5, 8);
    {
        let mut scoped = SpectrumSource::new(8);
        scoped.bind(Box::new(tone)).unwrap();
    }
    assert!(*gone.borrow());
}
