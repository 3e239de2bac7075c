//! Color parsing and lightness shifts for palette mixins.

use vello::peniko::color::{parse_color as parse_css_color, Srgb};
use vello::peniko::Color;

/// Parse any CSS color: hex, `rgb()`/`rgba()`, `hsl()`/`hsla()` or a named color.
pub fn parse_color(text: &str) -> Result<Color, String> {
    let text = text.trim();
    if text.starts_with('#') {
        return parse_hex_color(text);
    }
    parse_css_color(text)
        .map(|color| color.to_alpha_color::<Srgb>())
        .map_err(|e| format!("Invalid color '{}': {}", text, e))
}

/// Parse a hex color string.
///
/// Supports `#rgb`, `#rgba`, `#rrggbb` and `#rrggbbaa`.
pub fn parse_hex_color(hex: &str) -> Result<Color, String> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return Err(format!("Invalid hex color: #{}", hex));
    }
    let expanded: String = match hex.len() {
        3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => hex.to_string(),
        _ => return Err(format!("Hex color must be 3, 4, 6 or 8 characters: {}", hex)),
    };

    let channel = |i: usize| {
        u8::from_str_radix(&expanded[i..i + 2], 16)
            .map_err(|_| format!("Invalid hex color: #{}", hex))
    };

    let r = channel(0)?;
    let g = channel(2)?;
    let b = channel(4)?;
    let a = if expanded.len() == 8 { channel(6)? } else { 255 };
    Ok(Color::from_rgba8(r, g, b, a))
}

/// Format a color as `#rrggbb`, or `#rrggbbaa` when not opaque.
pub fn to_hex(color: Color) -> String {
    let [r, g, b, a] = color.components.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    if a == 255 {
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
    }
}

/// Relative luminance in `[0, 1]`.
pub fn luminance(color: Color) -> f32 {
    let linear = |c: f32| {
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    let [r, g, b, _] = color.components;
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// Black or white, whichever reads on top of `color`.
pub fn readable_on(color: Color) -> &'static str {
    if luminance(color) > 0.5 {
        "#000"
    } else {
        "#fff"
    }
}

/// Raise HSL lightness by `amount` percent. Negative amounts darken.
pub fn lighten(color: Color, amount: f32) -> Color {
    let [r, g, b, a] = color.components;
    let (h, s, l) = rgb_to_hsl(r, g, b);
    let (r, g, b) = hsl_to_rgb(h, s, (l + amount / 100.0).clamp(0.0, 1.0));
    Color::new([r, g, b, a])
}

/// Lower HSL lightness by `amount` percent.
pub fn darken(color: Color, amount: f32) -> Color {
    lighten(color, -amount)
}

fn rgb_to_hsl(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let d = max - min;
    if d == 0.0 {
        return (0.0, 0.0, l);
    }

    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h / 6.0, s, l)
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    if s == 0.0 {
        return (l, l, l);
    }

    let hue = |p: f32, q: f32, mut t: f32| {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    (hue(p, q, h + 1.0 / 3.0), hue(p, q, h), hue(p, q, h - 1.0 / 3.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(to_hex(parse_hex_color("#255BC7").unwrap()), "#255bc7");
        assert_eq!(to_hex(parse_hex_color("#444").unwrap()), "#444444");
        assert_eq!(to_hex(parse_hex_color("#ff000080").unwrap()), "#ff000080");
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("#zzzzzz").is_err());
    }

    #[test]
    fn test_parse_css_colors() {
        assert_eq!(to_hex(parse_color("rgb(255, 255, 255)").unwrap()), "#ffffff");
        assert_eq!(to_hex(parse_color("red").unwrap()), "#ff0000");
        assert_eq!(to_hex(parse_color(" #222 ").unwrap()), "#222222");
        assert!(parse_color("not-a-color").is_err());
        assert!(parse_color("#12345").is_err());
    }

    #[test]
    fn test_readable_on() {
        assert_eq!(readable_on(parse_hex_color("#fff").unwrap()), "#000");
        assert_eq!(readable_on(parse_hex_color("#e4e4e4").unwrap()), "#000");
        assert_eq!(readable_on(parse_hex_color("#222").unwrap()), "#fff");
        assert_eq!(readable_on(parse_hex_color("#255BC7").unwrap()), "#fff");
    }

    #[test]
    fn test_lightness_shifts() {
        let white = parse_hex_color("#ffffff").unwrap();
        assert_eq!(to_hex(darken(white, 20.0)), "#cccccc");
        let black = parse_hex_color("#000000").unwrap();
        assert_eq!(to_hex(lighten(black, 20.0)), "#333333");
        assert_eq!(to_hex(lighten(white, 10.0)), "#ffffff");
    }

    #[test]
    fn test_hue_survives_shift() {
        let red = parse_hex_color("#ff0000").unwrap();
        assert_eq!(to_hex(darken(red, 20.0)), "#990000");
    }
}
