use serde::{Deserialize, Serialize};

/// An RGB color with fractional components, nominally in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1. - t) + b * t
}

fn to_u8(c: f32) -> u8 {
    (c.clamp(0., 1.) * 255.).round() as u8
}

impl Color {
    pub const fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Color { red, green, blue }
    }

    pub const fn from_rgb8(rgb: [u8; 3]) -> Self {
        Color {
            red: rgb[0] as f32 / 255.,
            green: rgb[1] as f32 / 255.,
            blue: rgb[2] as f32 / 255.,
        }
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        [to_u8(self.red), to_u8(self.green), to_u8(self.blue)]
    }

    pub fn lerp(start: Self, end: Self, t: f32) -> Self {
        Color {
            red: lerp(start.red, end.red, t),
            green: lerp(start.green, end.green, t),
            blue: lerp(start.blue, end.blue, t),
        }
    }

    pub fn is_normalized(&self) -> bool {
        [self.red, self.green, self.blue]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
    }

    pub fn approx_eq(&self, other: &Self, eps: f32) -> bool {
        (self.red - other.red).abs() <= eps
            && (self.green - other.green).abs() <= eps
            && (self.blue - other.blue).abs() <= eps
    }
}

impl From<[f32; 3]> for Color {
    fn from(c: [f32; 3]) -> Color {
        Color::rgb(c[0], c[1], c[2])
    }
}

impl From<Color> for [f32; 3] {
    fn from(c: Color) -> [f32; 3] {
        [c.red, c.green, c.blue]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lerp_endpoints_are_exact() {
        let a = Color::rgb(0.1, 0.2, 0.3);
        let b = Color::rgb(0.9, 0.5, 0.0);
        assert_eq!(Color::lerp(a, b, 0.), a);
        assert_eq!(Color::lerp(a, b, 1.), b);
        assert!(Color::lerp(a, b, 0.5).approx_eq(&Color::rgb(0.5, 0.35, 0.15), 1e-6));
    }

    #[test]
    fn rgb8_conversion() {
        let c = Color::from_rgb8([68, 1, 84]);
        assert!((c.red - 0.26666667).abs() < 1e-7);
        assert_eq!(c.to_rgb8(), [68, 1, 84]);
        assert_eq!(Color::rgb(-0.5, 2.0, 0.5).to_rgb8(), [0, 255, 128]);
    }

    #[test]
    fn normalized_check() {
        assert!(Color::rgb(0., 1., 0.5).is_normalized());
        assert!(!Color::rgb(0., 1.01, 0.5).is_normalized());
        assert!(!Color::rgb(f32::NAN, 0., 0.).is_normalized());
    }

    #[test]
    fn serializes_as_triple() {
        let c = Color::rgb(1., 0., 0.5);
        assert_eq!(serde_json::to_string(&c).unwrap(), "[1.0,0.0,0.5]");
        let back: Color = serde_json::from_str("[1, 0, 0.5]").unwrap();
        assert_eq!(back, c);
    }
}
