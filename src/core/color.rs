// HSL helpers with the scene-graph library's conventions: h, s, l all in 0..1.

pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    if s == 0.0 {
        return [l, l, l];
    }
    let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let q = 2.0 * l - p;
    [
        hue_to_rgb(q, p, h + 1.0 / 3.0),
        hue_to_rgb(q, p, h),
        hue_to_rgb(q, p, h - 1.0 / 3.0),
    ]
}

/// `hsl(deg, s, l)` as used by CSS color strings.
pub fn hsl_degrees_to_rgb(hue_degrees: f32, s: f32, l: f32) -> [f32; 3] {
    hsl_to_rgb(hue_degrees / 360.0, s, l)
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}
