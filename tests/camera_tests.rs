use audioviz_web::core::{OrbitCamera, VariantKind};
use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, PI};

fn approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-3
}

#[test]
fn variant_cameras_start_at_their_eye() {
    let crystal = OrbitCamera::from_spec(&VariantKind::Crystal.config().ambient.camera);
    assert!(approx(crystal.eye(), Vec3::new(0.0, 0.0, 8.0)));
    assert!((crystal.fovy_radians - 60f32.to_radians()).abs() < 1e-6);

    let orbit = OrbitCamera::from_spec(&VariantKind::Orbit.config().ambient.camera);
    assert!(approx(orbit.eye(), Vec3::new(0.0, 15.0, 25.0)));
}

#[test]
fn pitch_never_flips_over_the_pole() {
    let mut cam = OrbitCamera::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 60.0);
    cam.orbit(0.0, 10.0);
    assert!(cam.pitch < FRAC_PI_2);
    cam.orbit(0.0, -20.0);
    assert!(cam.pitch > -FRAC_PI_2);
    assert!((cam.eye().length() - 10.0).abs() < 1e-3);
}

#[test]
fn zoom_is_clamped_and_can_be_disabled() {
    let mut cam = OrbitCamera::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 60.0);
    cam.zoom(0.5);
    assert!((cam.distance - 5.0).abs() < 1e-5);
    cam.zoom(1e6);
    assert_eq!(cam.distance, cam.max_distance);
    cam.zoom(f32::NAN);
    assert_eq!(cam.distance, cam.max_distance);

    let mut fixed = OrbitCamera::from_spec(&VariantKind::Ribbon.config().ambient.camera);
    let d = fixed.distance;
    fixed.zoom(0.5);
    assert_eq!(fixed.distance, d);
}

#[test]
fn auto_rotate_one_is_a_revolution_per_minute() {
    let mut cam = OrbitCamera::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 60.0);
    cam.auto_rotate_speed = 1.0;
    cam.update(30.0);
    assert!((cam.yaw - PI).abs() < 1e-4);
    cam.update(0.0);
    cam.update(-1.0);
    assert!((cam.yaw - PI).abs() < 1e-4);
}
