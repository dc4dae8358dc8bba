//! Chart colours: seaborn's qualitative palettes and the diverging
//! `coolwarm` map used by the correlation heatmap.

use plotters::style::RGBColor;

pub const PASTEL: [RGBColor; 6] = [
    RGBColor(161, 201, 244),
    RGBColor(255, 180, 130),
    RGBColor(141, 229, 161),
    RGBColor(255, 159, 155),
    RGBColor(208, 187, 255),
    RGBColor(222, 187, 155),
];

pub const SET1: [RGBColor; 6] = [
    RGBColor(228, 26, 28),
    RGBColor(55, 126, 184),
    RGBColor(77, 175, 74),
    RGBColor(152, 78, 163),
    RGBColor(255, 127, 0),
    RGBColor(255, 255, 51),
];

pub const SET2: [RGBColor; 6] = [
    RGBColor(102, 194, 165),
    RGBColor(252, 141, 98),
    RGBColor(141, 160, 203),
    RGBColor(231, 138, 195),
    RGBColor(166, 216, 84),
    RGBColor(255, 217, 47),
];

pub const PURPLE: RGBColor = RGBColor(128, 0, 128);

/// Heatmap cell for a NaN correlation
pub const MISSING_CELL: RGBColor = RGBColor(235, 235, 235);

const COOL: (f64, f64, f64) = (59.0, 76.0, 192.0);
const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

/// Named qualitative palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Pastel,
    Set1,
    Set2,
}

impl Palette {
    pub fn colors(self) -> &'static [RGBColor] {
        match self {
            Palette::Pastel => &PASTEL,
            Palette::Set1 => &SET1,
            Palette::Set2 => &SET2,
        }
    }

    /// Colour for the `index`-th bar or series, cycling.
    pub fn color(self, index: usize) -> RGBColor {
        let colors = self.colors();
        colors[index % colors.len()]
    }
}

/// Map a correlation in [-1, 1] onto blue - grey - red.
pub fn coolwarm(value: f64) -> RGBColor {
    if value.is_nan() {
        return MISSING_CELL;
    }
    let t = (value.clamp(-1.0, 1.0) + 1.0) / 2.0;
    let (from, to, frac) = if t < 0.5 {
        (COOL, NEUTRAL, t * 2.0)
    } else {
        (NEUTRAL, WARM, (t - 0.5) * 2.0)
    };
    let lerp = |a: f64, b: f64| (a + (b - a) * frac).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coolwarm_endpoints() {
        assert_eq!(coolwarm(-1.0), RGBColor(59, 76, 192));
        assert_eq!(coolwarm(0.0), RGBColor(221, 221, 221));
        assert_eq!(coolwarm(1.0), RGBColor(180, 4, 38));
        assert_eq!(coolwarm(5.0), coolwarm(1.0));
        assert_eq!(coolwarm(f64::NAN), MISSING_CELL);
    }

    #[test]
    fn palette_cycles() {
        assert_eq!(Palette::Set1.color(0), Palette::Set1.color(6));
        assert_ne!(Palette::Pastel.color(0), Palette::Pastel.color(1));
    }
}
