// Transport state: clamping, readouts and single failure reporting.

use audioviz_web::core::transport::format_time;
use audioviz_web::core::{TransportCommand, TransportState, VizError};

fn loaded(duration: f64) -> TransportState {
    let mut t = TransportState::new();
    t.load("track.mp3");
    t.set_duration(duration);
    t
}

#[test]
fn nothing_to_control_without_a_source() {
    let mut t = TransportState::new();
    assert_eq!(t.toggle_play(), None);
    assert_eq!(t.seek(10.0), None);
    assert!(!t.is_playing());
    assert_eq!(t.time_readout(), "0:00 / 0:00");
}

#[test]
fn toggle_alternates_play_and_pause() {
    let mut t = loaded(30.0);
    assert_eq!(t.toggle_play(), Some(TransportCommand::Play));
    assert!(t.is_playing());
    assert_eq!(t.toggle_play(), Some(TransportCommand::Pause));
    assert!(!t.is_playing());
}

#[test]
fn seek_is_clamped_to_the_track() {
    let mut t = loaded(30.0);
    assert_eq!(t.seek(45.0), Some(TransportCommand::Seek(30.0)));
    assert_eq!(t.seek(-3.0), Some(TransportCommand::Seek(0.0)));
    assert_eq!(t.seek(f64::NAN), None);
    t.seek(12.0);
    assert_eq!(t.seek_by(1.0), Some(TransportCommand::Seek(17.0)));
    assert_eq!(t.seek_by(-5.0), Some(TransportCommand::Seek(0.0)));
}

#[test]
fn volume_is_clamped_and_nan_is_ignored() {
    let mut t = TransportState::new();
    assert_eq!(t.volume(), 1.0);
    assert_eq!(t.set_volume(1.5), TransportCommand::SetVolume(1.0));
    assert_eq!(t.set_volume(-0.5), TransportCommand::SetVolume(0.0));
    t.set_volume(0.5);
    assert_eq!(t.set_volume(f32::NAN), TransportCommand::SetVolume(0.5));
    t.nudge_volume(-2.0);
    assert!((t.volume() - 0.4).abs() < 1e-6);
    assert_eq!(t.volume_percent(), 40);
}

#[test]
fn streaming_duration_counts_as_zero() {
    let mut t = loaded(f64::INFINITY);
    assert_eq!(t.duration(), 0.0);
    t.update_position(12.0);
    assert_eq!(t.position(), 0.0);
}

#[test]
fn load_resets_position_and_bumps_generation() {
    let mut t = loaded(90.0);
    t.update_position(42.0);
    t.toggle_play();
    let before = t.generation();
    let generation = t.load("next.ogg");
    assert_eq!(generation, before + 1);
    assert_eq!(t.track(), Some("next.ogg"));
    assert_eq!(t.position(), 0.0);
    assert_eq!(t.duration(), 0.0);
    assert!(!t.is_playing());
}

#[test]
fn failure_is_reported_once_per_load() {
    let mut t = loaded(10.0);
    t.toggle_play();
    let err = VizError::UnsupportedFormat("song.xyz".into());
    assert!(t.fail(err.clone()));
    assert!(!t.fail(err.clone()));
    assert!(!t.is_playing());
    assert!(!t.has_source());
    assert_eq!(t.toggle_play(), None);
    assert_eq!(t.error(), Some(&err));

    t.load("other.mp3");
    assert_eq!(t.error(), None);
    assert!(t.fail(err));
}

#[test]
fn readout_formats_minutes_and_seconds() {
    assert_eq!(format_time(0.0), "0:00");
    assert_eq!(format_time(59.9), "0:59");
    assert_eq!(format_time(61.0), "1:01");
    assert_eq!(format_time(f64::NAN), "0:00");
    assert_eq!(format_time(-4.0), "0:00");

    let mut t = loaded(185.0);
    t.update_position(65.4);
    assert_eq!(t.time_readout(), "1:05 / 3:05");
}

#[test]
fn a_new_load_waits_paused_for_the_user() {
    let mut t = TransportState::new();
    t.load("first.mp3");
    t.set_duration(12.0);
    assert!(!t.is_playing());
    // the first command for a fresh source is Play
    assert_eq!(t.toggle_play(), Some(TransportCommand::Play));
}
