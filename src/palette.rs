#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsv {
    /// Degrees, 0..=360.
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { red: 0, green: 0, blue: 0 };
    pub const WHITE: Rgb = Rgb { red: 255, green: 255, blue: 255 };

    /// Packed as `0x00RRGGBB`, the window buffer format.
    pub fn to_u32(self) -> u32 {
        ((self.red as u32) << 16) | ((self.green as u32) << 8) | self.blue as u32
    }

    pub fn from_u32(packed: u32) -> Self {
        Rgb {
            red: (packed >> 16) as u8,
            green: (packed >> 8) as u8,
            blue: packed as u8,
        }
    }
}

/// Hue follows the escape count around the wheel; points that never
/// escaped are painted black.
pub fn assign_hsv(iterations: u32, max_iterations: u32, converges: bool) -> Hsv {
    let hue = if max_iterations == 0 {
        0.0
    } else {
        iterations as f64 * 360.0 / max_iterations as f64
    };
    Hsv {
        hue,
        saturation: 1.0,
        value: if converges { 0.0 } else { 1.0 },
    }
}

pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let chroma = hsv.value * hsv.saturation;
    let sector = hsv.hue / 60.0;
    let x = chroma * (1.0 - ((sector % 2.0) - 1.0).abs());

    // hue 0 lands on black, not red
    let (r, g, b) = if sector == 0.0 || sector.is_nan() {
        (0.0, 0.0, 0.0)
    } else if sector <= 1.0 {
        (chroma, x, 0.0)
    } else if sector <= 2.0 {
        (x, chroma, 0.0)
    } else if sector <= 3.0 {
        (0.0, chroma, x)
    } else if sector <= 4.0 {
        (0.0, x, chroma)
    } else if sector <= 5.0 {
        (x, 0.0, chroma)
    } else {
        (chroma, 0.0, x)
    };

    let m = hsv.value - chroma;
    Rgb {
        red: to_channel(r + m),
        green: to_channel(g + m),
        blue: to_channel(b + m),
    }
}

fn to_channel(unit: f64) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convergent_points_are_black() {
        let hsv = assign_hsv(100, 100, true);
        assert_eq!(hsv, Hsv { hue: 360.0, saturation: 1.0, value: 0.0 });
        assert_eq!(hsv_to_rgb(hsv), Rgb::BLACK);
    }

    #[test]
    fn hue_scales_with_iterations() {
        assert_eq!(assign_hsv(25, 100, false).hue, 90.0);
        assert_eq!(assign_hsv(0, 0, true).hue, 0.0);
    }

    #[test]
    fn primary_hues() {
        let full = |hue| hsv_to_rgb(Hsv { hue, saturation: 1.0, value: 1.0 });
        assert_eq!(full(60.0), Rgb { red: 255, green: 255, blue: 0 });
        assert_eq!(full(120.0), Rgb { red: 0, green: 255, blue: 0 });
        assert_eq!(full(240.0), Rgb { red: 0, green: 0, blue: 255 });
        assert_eq!(full(360.0), Rgb { red: 255, green: 0, blue: 0 });
    }

    #[test]
    fn zero_hue_is_black() {
        let rgb = hsv_to_rgb(Hsv { hue: 0.0, saturation: 1.0, value: 1.0 });
        assert_eq!(rgb, Rgb::BLACK);
    }

    #[test]
    fn packing_round_trips() {
        let rgb = Rgb { red: 0x12, green: 0x34, blue: 0x56 };
        assert_eq!(rgb.to_u32(), 0x123456);
        assert_eq!(Rgb::from_u32(0x123456), rgb);
    }
}
