use serde::{Deserialize, Serialize};

type Stops = &'static [(f32, [u8; 3])];

const VIRIDIS: Stops = &[
    (0.0, [68, 1, 84]),
    (0.111, [72, 40, 120]),
    (0.222, [62, 73, 137]),
    (0.333, [49, 104, 142]),
    (0.444, [38, 130, 142]),
    (0.556, [31, 158, 137]),
    (0.667, [53, 183, 121]),
    (0.778, [110, 206, 88]),
    (0.889, [181, 222, 43]),
    (1.0, [253, 231, 37]),
];

const INFERNO: Stops = &[
    (0.0, [0, 0, 4]),
    (0.111, [27, 12, 65]),
    (0.222, [74, 12, 107]),
    (0.333, [120, 28, 109]),
    (0.444, [165, 44, 96]),
    (0.556, [207, 68, 70]),
    (0.667, [237, 105, 37]),
    (0.778, [251, 155, 6]),
    (0.889, [247, 209, 61]),
    (1.0, [252, 255, 164]),
];

const TWILIGHT: Stops = &[
    (0.0, [226, 217, 226]),
    (0.111, [158, 187, 201]),
    (0.222, [103, 133, 190]),
    (0.333, [94, 67, 165]),
    (0.444, [66, 18, 87]),
    (0.556, [71, 19, 64]),
    (0.667, [142, 44, 80]),
    (0.778, [186, 102, 87]),
    (0.889, [206, 172, 148]),
    (1.0, [226, 217, 226]),
];

const EARTH: Stops = &[
    (0.0, [0, 0, 130]),
    (0.1, [0, 180, 180]),
    (0.2, [40, 210, 40]),
    (0.4, [230, 230, 50]),
    (0.6, [120, 70, 20]),
    (1.0, [255, 255, 255]),
];

const TROPIC: Stops = &[
    (0.0, [0, 155, 158]),
    (0.167, [66, 183, 185]),
    (0.333, [167, 211, 212]),
    (0.5, [241, 241, 241]),
    (0.667, [228, 193, 217]),
    (0.833, [214, 145, 193]),
    (1.0, [199, 93, 171]),
];

const ICEFIRE: Stops = &[
    (0.0, [0, 0, 0]),
    (0.125, [0, 55, 134]),
    (0.25, [33, 126, 184]),
    (0.375, [84, 200, 223]),
    (0.5, [225, 233, 209]),
    (0.625, [231, 176, 0]),
    (0.75, [198, 84, 0]),
    (0.875, [130, 0, 0]),
    (1.0, [0, 0, 0]),
];

const GREYS: Stops = &[(0.0, [0, 0, 0]), (1.0, [255, 255, 255])];

const ELECTRIC: Stops = &[
    (0.0, [0, 0, 0]),
    (0.15, [30, 0, 100]),
    (0.4, [120, 0, 100]),
    (0.6, [160, 90, 0]),
    (0.8, [230, 200, 0]),
    (1.0, [255, 250, 220]),
];

const RAINBOW: Stops = &[
    (0.0, [150, 0, 90]),
    (0.125, [0, 0, 200]),
    (0.25, [0, 25, 255]),
    (0.375, [0, 152, 255]),
    (0.5, [44, 255, 150]),
    (0.625, [151, 255, 0]),
    (0.75, [255, 234, 0]),
    (0.875, [255, 111, 0]),
    (1.0, [255, 0, 0]),
];

const PLASMA: Stops = &[
    (0.0, [13, 8, 135]),
    (0.111, [70, 3, 159]),
    (0.222, [114, 1, 168]),
    (0.333, [156, 23, 158]),
    (0.444, [189, 55, 134]),
    (0.556, [216, 87, 107]),
    (0.667, [237, 121, 83]),
    (0.778, [251, 159, 58]),
    (0.889, [253, 202, 38]),
    (1.0, [240, 249, 33]),
];

const PICNIC: Stops = &[
    (0.0, [0, 0, 255]),
    (0.1, [51, 153, 255]),
    (0.2, [102, 204, 255]),
    (0.3, [153, 204, 255]),
    (0.4, [204, 204, 255]),
    (0.5, [255, 255, 255]),
    (0.6, [255, 204, 255]),
    (0.7, [255, 153, 255]),
    (0.8, [255, 102, 204]),
    (0.9, [255, 102, 102]),
    (1.0, [255, 0, 0]),
];

const SPEED: Stops = &[
    (0.0, [254, 252, 205]),
    (0.111, [239, 225, 156]),
    (0.222, [221, 201, 106]),
    (0.333, [194, 182, 59]),
    (0.444, [157, 167, 21]),
    (0.556, [116, 153, 5]),
    (0.667, [68, 138, 4]),
    (0.778, [22, 120, 25]),
    (0.889, [22, 98, 34]),
    (1.0, [23, 72, 32]),
];

const BALANCE: Stops = &[
    (0.0, [23, 28, 66]),
    (0.091, [41, 58, 143]),
    (0.182, [11, 102, 189]),
    (0.273, [69, 144, 185]),
    (0.364, [142, 181, 194]),
    (0.455, [210, 216, 219]),
    (0.545, [230, 210, 204]),
    (0.636, [213, 157, 137]),
    (0.727, [196, 101, 72]),
    (0.818, [172, 43, 36]),
    (0.909, [120, 14, 40]),
    (1.0, [60, 9, 17]),
];

/// Named continuous color scales for label-colored markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColorPalette {
    #[default]
    Viridis,
    Inferno,
    Twilight,
    Earth,
    Tropic,
    Icefire,
    Greys,
    Electric,
    Rainbow,
    Plasma,
    Picnic,
    Speed,
    Balance,
}

impl ColorPalette {
    pub const ALL: [ColorPalette; 13] = [
        ColorPalette::Viridis,
        ColorPalette::Inferno,
        ColorPalette::Twilight,
        ColorPalette::Earth,
        ColorPalette::Tropic,
        ColorPalette::Icefire,
        ColorPalette::Greys,
        ColorPalette::Electric,
        ColorPalette::Rainbow,
        ColorPalette::Plasma,
        ColorPalette::Picnic,
        ColorPalette::Speed,
        ColorPalette::Balance,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ColorPalette::Viridis => "Viridis",
            ColorPalette::Inferno => "Inferno",
            ColorPalette::Twilight => "Twilight",
            ColorPalette::Earth => "Earth",
            ColorPalette::Tropic => "Tropic",
            ColorPalette::Icefire => "Icefire",
            ColorPalette::Greys => "Greys",
            ColorPalette::Electric => "Electric",
            ColorPalette::Rainbow => "Rainbow",
            ColorPalette::Plasma => "Plasma",
            ColorPalette::Picnic => "Picnic",
            ColorPalette::Speed => "Speed",
            ColorPalette::Balance => "Balance",
        }
    }

    fn stops(&self) -> Stops {
        match self {
            ColorPalette::Viridis => VIRIDIS,
            ColorPalette::Inferno => INFERNO,
            ColorPalette::Twilight => TWILIGHT,
            ColorPalette::Earth => EARTH,
            ColorPalette::Tropic => TROPIC,
            ColorPalette::Icefire => ICEFIRE,
            ColorPalette::Greys => GREYS,
            ColorPalette::Electric => ELECTRIC,
            ColorPalette::Rainbow => RAINBOW,
            ColorPalette::Plasma => PLASMA,
            ColorPalette::Picnic => PICNIC,
            ColorPalette::Speed => SPEED,
            ColorPalette::Balance => BALANCE,
        }
    }

    /// Linearly interpolated RGB at `t` in `[0, 1]` (clamped; NaN reads as 0).
    pub fn sample(&self, t: f32) -> [u8; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let stops = self.stops();
        let upper = stops.iter().position(|&(pos, _)| pos >= t).unwrap_or(stops.len() - 1);
        if upper == 0 {
            return stops[0].1;
        }

        let (p0, c0) = stops[upper - 1];
        let (p1, c1) = stops[upper];
        let f = if p1 > p0 { (t - p0) / (p1 - p0) } else { 0.0 };
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * f).round() as u8;
        [mix(c0[0], c1[0]), mix(c0[1], c1[1]), mix(c0[2], c1[2])]
    }

    /// Sampled color with `opacity` in `[0, 1]` applied as alpha.
    pub fn color32(&self, t: f32, opacity: f32) -> egui::Color32 {
        let [r, g, b] = self.sample(t);
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        egui::Color32::from_rgba_unmultiplied(r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_match_first_and_last_stop() {
        for palette in ColorPalette::ALL {
            let stops = palette.stops();
            assert_eq!(stops.first().unwrap().0, 0.0, "{}", palette.label());
            assert_eq!(stops.last().unwrap().0, 1.0, "{}", palette.label());
            assert_eq!(palette.sample(0.0), stops[0].1);
            assert_eq!(palette.sample(1.0), stops[stops.len() - 1].1);
        }
    }

    #[test]
    fn interpolates_between_stops() {
        assert_eq!(ColorPalette::Greys.sample(0.5), [128, 128, 128]);
        assert_eq!(ColorPalette::Greys.sample(-3.0), [0, 0, 0]);
        assert_eq!(ColorPalette::Greys.sample(f32::NAN), [0, 0, 0]);
        assert_eq!(ColorPalette::Earth.sample(0.3), [135, 220, 45]);
    }

    #[test]
    fn opacity_becomes_alpha() {
        let c = ColorPalette::Greys.color32(1.0, 0.5);
        assert_eq!(c.a(), 128);
    }
}
