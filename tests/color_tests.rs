use audioviz_web::core::color::{hex_to_rgb, hsl_degrees_to_rgb, hsl_to_rgb};

fn close(a: [f32; 3], b: [f32; 3]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5)
}

#[test]
fn primary_hues() {
    assert!(close(hsl_to_rgb(0.0, 1.0, 0.5), [1.0, 0.0, 0.0]));
    assert!(close(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5), [0.0, 1.0, 0.0]));
    assert!(close(hsl_to_rgb(2.0 / 3.0, 1.0, 0.5), [0.0, 0.0, 1.0]));
    // hue wraps
    assert!(close(hsl_to_rgb(1.0, 1.0, 0.5), [1.0, 0.0, 0.0]));
}

#[test]
fn zero_saturation_is_grey() {
    assert!(close(hsl_to_rgb(0.3, 0.0, 0.25), [0.25, 0.25, 0.25]));
}

#[test]
fn degrees_match_unit_hue() {
    assert!(close(hsl_degrees_to_rgb(180.0, 1.0, 0.5), hsl_to_rgb(0.5, 1.0, 0.5)));
    assert!(close(hsl_degrees_to_rgb(180.0, 1.0, 0.5), [0.0, 1.0, 1.0]));
}

#[test]
fn hex_channels() {
    assert!(close(hex_to_rgb(0xff0080), [1.0, 0.0, 128.0 / 255.0]));
    assert!(close(hex_to_rgb(0x000000), [0.0, 0.0, 0.0]));
}
