//! Colors and appearances.

/// Linear RGB color with channels in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const GOLD: Color = Color::rgb(1.0, 0.84, 0.0);
    pub const CRIMSON: Color = Color::rgb(0.86, 0.08, 0.24);
    pub const ROYAL_BLUE: Color = Color::rgb(0.25, 0.41, 0.88);
    pub const FOREST_GREEN: Color = Color::rgb(0.13, 0.55, 0.13);
    pub const PURPLE: Color = Color::rgb(0.58, 0.0, 0.83);
    pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);
    pub const DARK_BLUE: Color = Color::rgb(0.0, 0.0, 0.55);
    pub const CORAL: Color = Color::rgb(1.0, 0.5, 0.31);
    pub const LIGHT_BLUE: Color = Color::rgb(0.68, 0.85, 0.9);
    pub const TAN: Color = Color::rgb(0.82, 0.71, 0.55);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Looks up a color by its common name (case-insensitive, `_` and spaces ignored)
    pub fn named(name: &str) -> Option<Color> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, '_' | ' ' | '-'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let color = match key.as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::RED,
            "yellow" => Self::YELLOW,
            "gold" => Self::GOLD,
            "crimson" => Self::CRIMSON,
            "royalblue" => Self::ROYAL_BLUE,
            "forestgreen" => Self::FOREST_GREEN,
            "purple" => Self::PURPLE,
            "gray" | "grey" => Self::GRAY,
            "darkblue" => Self::DARK_BLUE,
            "coral" => Self::CORAL,
            "lightblue" => Self::LIGHT_BLUE,
            "tan" => Self::TAN,
            _ => return None,
        };
        Some(color)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn with_alpha(self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }

    pub fn scaled(self, factor: f32) -> [f32; 3] {
        [self.r * factor, self.g * factor, self.b * factor]
    }
}

impl From<[f32; 3]> for Color {
    fn from(c: [f32; 3]) -> Self {
        Color::rgb(c[0], c[1], c[2])
    }
}

/// Visual material bound to one geometry inside a viewport
///
/// Values are kept exactly as supplied; the renderer clamps them when it
/// packs its uniforms.
#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub color: Color,
    pub opacity: f32,
    pub metallic: f32,
    pub roughness: f32,
    /// Specular intensity, `0` disables highlights
    pub specular: f32,
    pub specular_power: f32,
    pub smooth_shading: bool,
    pub show_edges: bool,
    pub edge_color: Color,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            opacity: 1.0,
            metallic: 0.0,
            roughness: 0.5,
            specular: 0.0,
            specular_power: 1.0,
            smooth_shading: true,
            show_edges: false,
            edge_color: Color::BLACK,
        }
    }
}

impl Appearance {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(Color::rgb(r, g, b))
    }

    /// Metallic/roughness material in the style of a principled BSDF
    pub fn pbr(color: Color, metallic: f32, roughness: f32) -> Self {
        Self::new(color).with_metallic(metallic).with_roughness(roughness)
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic;
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn with_specular(mut self, intensity: f32, power: f32) -> Self {
        self.specular = intensity;
        self.specular_power = power;
        self
    }

    pub fn with_smooth_shading(mut self, smooth: bool) -> Self {
        self.smooth_shading = smooth;
        self
    }

    pub fn with_edges(mut self, color: Color) -> Self {
        self.show_edges = true;
        self.edge_color = color;
        self
    }

    pub fn is_translucent(&self) -> bool {
        self.opacity < 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_ignore_case_and_separators() {
        assert_eq!(Color::named("RoyalBlue"), Some(Color::ROYAL_BLUE));
        assert_eq!(Color::named("forest_green"), Some(Color::FOREST_GREEN));
        assert_eq!(Color::named("grey"), Some(Color::GRAY));
        assert_eq!(Color::named("chartreuse"), None);
    }

    #[test]
    fn values_are_stored_unclamped() {
        let a = Appearance::pbr(Color::GOLD, 1.5, -0.2).with_opacity(2.0);
        assert_eq!(a.metallic, 1.5);
        assert_eq!(a.roughness, -0.2);
        assert_eq!(a.opacity, 2.0);
        assert!(!a.is_translucent());
    }
}
