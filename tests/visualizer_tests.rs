// End-to-end ticks: synthetic frames in, render lists out.

use audioviz_web::core::constants::BIN_COUNT;
use audioviz_web::core::mappers::{BarParams, SpherePulse};
use audioviz_web::core::scene::{Primitive, Shading};
use audioviz_web::core::{SpectrumFrame, VariantKind, Visualizer};
use std::rc::Rc;

fn ramp() -> SpectrumFrame {
    SpectrumFrame::from_bins((0..BIN_COUNT).map(|i| (i * 2) as u8).collect())
}

fn loud() -> SpectrumFrame {
    SpectrumFrame::from_bins(vec![255; BIN_COUNT])
}

fn count(viz: &Visualizer, primitive: Primitive) -> usize {
    viz.render_list()
        .items
        .iter()
        .filter(|i| i.primitive == primitive)
        .count()
}

#[test]
fn every_variant_ticks_without_audio() {
    let silent = SpectrumFrame::silent(BIN_COUNT);
    for kind in VariantKind::ALL {
        let mut viz = Visualizer::new(kind.config());
        for n in 0..3 {
            viz.tick(&silent, n as f64 / 60.0);
        }
        assert_eq!(viz.kind(), kind);
        assert_eq!(viz.parameters().level, 0.0);
        assert!(viz.render_list().items.iter().all(|i| i.model.is_finite()));
    }
}

#[test]
fn silent_frame_rests_the_bars_and_sphere() {
    let mut viz = Visualizer::new(VariantKind::Spectrum.config());
    viz.tick(&loud(), 0.0);
    viz.tick(&SpectrumFrame::silent(BIN_COUNT), 1.0 / 60.0);
    let p = viz.parameters();
    assert!(p.bars.iter().all(|b| *b == BarParams::REST));
    assert_eq!(p.sphere, SpherePulse::REST);
    let wave = p.waveform.as_ref().unwrap();
    assert!((0..wave.points().len()).all(|i| wave.displacement(i) == Some(0.0)));
}

#[test]
fn spectrum_scene_layout() {
    let mut viz = Visualizer::new(VariantKind::Spectrum.config());
    let list = viz.tick(&ramp(), 0.5);
    assert_eq!(list.items.len(), 65);
    assert_eq!(list.lines.len(), 1);
    assert_eq!(list.lines[0].points.len(), 256);
    assert!(list.starfield.is_some());
    assert!(list.bloom().is_some());
    assert_eq!(count(&viz, Primitive::Cube), 64);
    assert_eq!(count(&viz, Primitive::Sphere), 1);
}

#[test]
fn bars_grow_with_their_bin() {
    let mut viz = Visualizer::new(VariantKind::Spectrum.config());
    viz.tick(&ramp(), 0.0);
    let bars = &viz.parameters().bars;
    // bin 10 carries 20 -> 1 + 20/255 * 3
    assert!((bars[10].scale_y - (1.0 + 20.0 / 255.0 * 3.0)).abs() < 1e-5);
    assert!(bars.windows(2).all(|w| w[1].scale_y >= w[0].scale_y));
}

#[test]
fn waveform_base_positions_never_move() {
    let mut viz = Visualizer::new(VariantKind::Spectrum.config());
    viz.tick(&ramp(), 0.0);
    let xs: Vec<f32> = viz.render_list().lines[0].points.iter().map(|p| p.x).collect();
    viz.tick(&loud(), 0.1);
    let after: Vec<f32> = viz.render_list().lines[0].points.iter().map(|p| p.x).collect();
    assert_eq!(xs, after);
    assert!(viz.render_list().lines[0].points.iter().all(|p| (p.y - 2.0).abs() < 1e-6));
}

#[test]
fn orbit_scene_layout() {
    let mut viz = Visualizer::new(VariantKind::Orbit.config());
    viz.tick(&ramp(), 1.0);
    assert_eq!(count(&viz, Primitive::Cube), 64 + 3);
    assert_eq!(count(&viz, Primitive::Ring), 3);
    assert_eq!(count(&viz, Primitive::Sphere), 1);
    assert!(viz.render_list().lines.is_empty());
}

#[test]
fn rings_spin_with_elapsed_time() {
    let mut viz = Visualizer::new(VariantKind::Orbit.config());
    viz.tick(&loud(), 0.0);
    assert_eq!(viz.parameters().rings.angle, 0.0);
    viz.tick(&loud(), 1.0);
    // 0.005 per frame at 60 fps
    assert!((viz.parameters().rings.angle - 0.3).abs() < 1e-5);
    assert!((viz.parameters().rings.scale - 1.2).abs() < 1e-5);
    // time going backwards never unwinds the spin
    viz.tick(&loud(), 0.5);
    assert!((viz.parameters().rings.angle - 0.3).abs() < 1e-5);
}

#[test]
fn nebula_uses_bucketed_bands() {
    let mut viz = Visualizer::new(VariantKind::Nebula.config());
    viz.tick(&ramp(), 0.0);
    assert_eq!(viz.frequencies().len(), 8);
    assert_eq!(count(&viz, Primitive::Cloud), 8);
    assert!(viz
        .render_list()
        .items
        .iter()
        .all(|i| i.material.shading == Shading::Soft));
    assert!(viz.frequencies().iter().all(|f| f.is_finite()));
}

#[test]
fn crystal_has_three_shells() {
    let mut viz = Visualizer::new(VariantKind::Crystal.config());
    viz.tick(&loud(), 0.0);
    assert_eq!(count(&viz, Primitive::Icosphere), 3);
    let crystal = viz.parameters().crystal.unwrap();
    assert!(crystal.pulse.outer_scale > 1.0);
}

#[test]
fn network_scenes_ignore_audio() {
    let mut a = Visualizer::new(VariantKind::Network.config());
    let mut b = Visualizer::new(VariantKind::Network.config());
    a.tick(&loud(), 0.75);
    b.tick(&SpectrumFrame::silent(BIN_COUNT), 0.75);
    assert_eq!(a.render_list().items, b.render_list().items);
    assert_eq!(a.render_list().lines.len(), 150);
    // nodes plus one packet per connection
    assert_eq!(a.render_list().items.len(), 100 + 150);

    let mut synapse = Visualizer::new(VariantKind::Synapse.config());
    synapse.tick(&loud(), 0.75);
    assert_eq!(synapse.render_list().items.len(), 100);
    assert!(synapse.render_list().lines.iter().all(|l| l.dash.is_some()));
}

#[test]
fn composing_the_same_parameters_is_idempotent() {
    for kind in VariantKind::ALL {
        let mut viz = Visualizer::new(kind.config());
        viz.tick(&ramp(), 0.3);
        let first = viz.composer().compose(viz.parameters());
        let second = viz.composer().compose(viz.parameters());
        assert_eq!(first, second);
        assert_eq!(&first, viz.render_list());
    }
}

#[test]
fn starfield_is_shared_not_regenerated() {
    let mut viz = Visualizer::new(VariantKind::Spectrum.config());
    let before = viz.tick(&ramp(), 0.0).starfield.clone().unwrap();
    let after = viz.tick(&ramp(), 0.1).starfield.clone().unwrap();
    assert!(Rc::ptr_eq(&before, &after));
    assert_eq!(before.len(), 5000);
}

#[test]
fn short_frames_do_not_panic() {
    let tiny = SpectrumFrame::from_bins(vec![200, 100]);
    for kind in VariantKind::ALL {
        let mut viz = Visualizer::new(kind.config());
        viz.tick(&tiny, 0.0);
        viz.tick(&SpectrumFrame::from_bins(Vec::new()), 0.1);
        assert_eq!(viz.parameters().level, 0.0);
    }
}
