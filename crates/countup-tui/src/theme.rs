use ratatui::style::Color;

/// Page colors (Gruvbox Material dark)
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg0: Color,
    pub bg2: Color,

    pub fg0: Color,
    pub fg1: Color,
    pub grey0: Color,
    pub grey2: Color,
    pub aqua: Color,

    /// Animated stat numbers
    pub number: Color,
    /// Stat suffixes such as `+` or `m²`
    pub suffix: Color,
    pub heading: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            fg1: Color::Rgb(0xdd, 0xc7, 0xa1),
            grey0: Color::Rgb(0x7c, 0x6f, 0x64),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
            aqua: Color::Rgb(0x89, 0xb4, 0x82),
            number: Color::Rgb(0xd8, 0xa6, 0x57),
            suffix: Color::Rgb(0xe7, 0x8a, 0x4e),
            heading: Color::Rgb(0x89, 0xb4, 0x82),
        }
    }
}

/// Mix two colors; `t = 0` is `from`, `t = 1` is `to`
///
/// Only RGB colors blend. Anything else snaps to `to` once `t` passes half.
pub fn blend(from: Color, to: Color, t: f64) -> Color {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    match (from, to) {
        (Color::Rgb(r0, g0, b0), Color::Rgb(r1, g1, b1)) => {
            let mix = |a: u8, b: u8| {
                (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
            };
            Color::Rgb(mix(r0, r1), mix(g0, g1), mix(b0, b1))
        }
        _ if t >= 0.5 => to,
        _ => from,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_endpoints() {
        let a = Color::Rgb(0, 0, 0);
        let b = Color::Rgb(200, 100, 50);
        assert_eq!(blend(a, b, 0.0), a);
        assert_eq!(blend(a, b, 1.0), b);
        assert_eq!(blend(a, b, 0.5), Color::Rgb(100, 50, 25));
    }

    #[test]
    fn test_blend_clamps_and_snaps() {
        let a = Color::Rgb(10, 10, 10);
        let b = Color::Rgb(20, 20, 20);
        assert_eq!(blend(a, b, 7.0), b);
        assert_eq!(blend(a, b, f64::NAN), a);
        assert_eq!(blend(Color::Reset, Color::White, 0.4), Color::Reset);
        assert_eq!(blend(Color::Reset, Color::White, 0.6), Color::White);
    }
}
