//! Color notation conversion
//!
//! Converts normalized (0..1 per channel) colors into hex, functional rgb,
//! hsl and OKLCH strings. Alpha is only written when the color is not fully
//! opaque, except for the `rgba` notation which always carries it.

use crate::directives::ColorFormat;
use crate::types::ColorValue;

// OKLab transform (linear sRGB -> LMS -> Lab)
const LINEAR_SRGB_TO_LMS: [[f64; 3]; 3] = [
    [0.4122214708, 0.5363325363, 0.0514459929],
    [0.2119034982, 0.6806995451, 0.1073969566],
    [0.0883024619, 0.2817188376, 0.6299787005],
];

const LMS_TO_OKLAB: [[f64; 3]; 3] = [
    [0.2104542553, 0.7936177850, -0.0040720468],
    [1.9779984951, -2.4285922050, 0.4505937099],
    [0.0259040371, 0.7827717662, -0.8086757660],
];

// Below this chroma the hue is numerical noise
const ACHROMATIC_CHROMA: f64 = 1e-4;

/// Format `color` in the requested notation
pub fn format(color: &ColorValue, format: ColorFormat) -> String {
    match format {
        ColorFormat::Hex => to_hex(color),
        ColorFormat::Rgb => to_rgb(color),
        ColorFormat::Rgba => to_rgba(color),
        ColorFormat::Hsl => to_hsl(color),
        ColorFormat::Oklch => to_oklch(color),
    }
}

fn channel_to_byte(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn format_alpha(alpha: f64) -> String {
    format!("{:.3}", alpha.clamp(0.0, 1.0))
}

/// `#rrggbb`, or `#rrggbbaa` when alpha < 1
pub fn to_hex(color: &ColorValue) -> String {
    let mut bytes = vec![
        channel_to_byte(color.r),
        channel_to_byte(color.g),
        channel_to_byte(color.b),
    ];
    if !color.is_opaque() {
        bytes.push(channel_to_byte(color.a));
    }
    format!("#{}", hex::encode(bytes))
}

/// `rgb(r, g, b)`, switching to `rgba(r, g, b, a)` when alpha < 1
pub fn to_rgb(color: &ColorValue) -> String {
    if color.is_opaque() {
        format!(
            "rgb({}, {}, {})",
            channel_to_byte(color.r),
            channel_to_byte(color.g),
            channel_to_byte(color.b)
        )
    } else {
        to_rgba(color)
    }
}

/// `rgba(r, g, b, a)` regardless of alpha
pub fn to_rgba(color: &ColorValue) -> String {
    format!(
        "rgba({}, {}, {}, {})",
        channel_to_byte(color.r),
        channel_to_byte(color.g),
        channel_to_byte(color.b),
        format_alpha(color.a)
    )
}

/// Hue in degrees, saturation and lightness in 0..1
pub fn rgb_to_hsl(color: &ColorValue) -> (f64, f64, f64) {
    let r = color.r.clamp(0.0, 1.0);
    let g = color.g.clamp(0.0, 1.0);
    let b = color.b.clamp(0.0, 1.0);

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, lightness);
    }

    let delta = max - min;
    let saturation = if lightness > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let sixths = if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    (sixths * 60.0, saturation, lightness)
}

/// `hsl(h, s%, l%)`, switching to `hsla(...)` when alpha < 1
pub fn to_hsl(color: &ColorValue) -> String {
    let (hue, saturation, lightness) = rgb_to_hsl(color);
    let h = hue.round() as i64;
    let s = (saturation * 100.0).round() as i64;
    let l = (lightness * 100.0).round() as i64;

    if color.is_opaque() {
        format!("hsl({}, {}%, {}%)", h, s, l)
    } else {
        format!("hsla({}, {}%, {}%, {})", h, s, l, format_alpha(color.a))
    }
}

fn srgb_to_linear(channel: f64) -> f64 {
    let channel = channel.clamp(0.0, 1.0);
    if channel <= 0.04045 {
        channel / 12.92
    } else {
        ((channel + 0.055) / 1.055).powf(2.4)
    }
}

fn multiply(matrix: &[[f64; 3]; 3], vector: [f64; 3]) -> [f64; 3] {
    let mut out = [0.0; 3];
    for (row, value) in matrix.iter().zip(out.iter_mut()) {
        *value = row[0] * vector[0] + row[1] * vector[1] + row[2] * vector[2];
    }
    out
}

/// OKLab `(L, a, b)` of an sRGB color
pub fn rgb_to_oklab(color: &ColorValue) -> (f64, f64, f64) {
    let linear = [
        srgb_to_linear(color.r),
        srgb_to_linear(color.g),
        srgb_to_linear(color.b),
    ];
    let lms = multiply(&LINEAR_SRGB_TO_LMS, linear);
    let lms_cbrt = [lms[0].cbrt(), lms[1].cbrt(), lms[2].cbrt()];
    let [l, a, b] = multiply(&LMS_TO_OKLAB, lms_cbrt);
    (l, a, b)
}

/// OKLCH `(L, C, H)` with H normalized to [0, 360)
pub fn rgb_to_oklch(color: &ColorValue) -> (f64, f64, f64) {
    let (lightness, a, b) = rgb_to_oklab(color);
    let chroma = (a * a + b * b).sqrt();

    let hue = if chroma < ACHROMATIC_CHROMA {
        0.0
    } else {
        let degrees = b.atan2(a).to_degrees();
        if degrees < 0.0 {
            degrees + 360.0
        } else {
            degrees
        }
    };

    (lightness, chroma, hue + 0.0)
}

/// `oklch(L% C H)`, with ` / a` before the closing parenthesis when alpha < 1
pub fn to_oklch(color: &ColorValue) -> String {
    let (lightness, chroma, hue) = rgb_to_oklch(color);
    let body = format!("{:.2}% {:.4} {:.2}", lightness * 100.0, chroma, hue);

    if color.is_opaque() {
        format!("oklch({})", body)
    } else {
        format!("oklch({} / {})", body, format_alpha(color.a))
    }
}
