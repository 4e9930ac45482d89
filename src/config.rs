//! Plot configuration.
//!
//! Everything the binary needs to reproduce a figure: the sequence bound,
//! canvas size, colors, the visible y window and the annotation text.
//! Stored as JSON so a run can be repeated exactly.
//!
//! ```ignore
//! let config = PlotConfig::load_json("heart.json")?;
//! let sequences = chaotic_heart::generate(config.bound)?;
//! ```

use crate::error::ConfigError;
use crate::sequence;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_BOUND: usize = 2_800_000;

/// 24-bit color, serialized as `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// `0x00RRGGBB`, the pixel layout used by the canvas.
    pub fn to_u32(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    pub fn from_u32(pixel: u32) -> Self {
        Rgb::new((pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8)
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigError::Color(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ConfigError::Color(s.to_string()))
        };
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Number of terms generated; also the right edge of the x axis.
    pub bound: usize,

    pub width: usize,
    pub height: usize,

    pub background: Rgb,
    pub point_color: Rgb,
    /// Axes, labels and annotation text.
    pub ink: Rgb,

    /// Opacity of a single point, in `(0, 1]`.
    pub point_alpha: f32,

    pub y_min: i64,
    pub y_max: i64,

    /// Pixel size of one font cell.
    pub text_scale: usize,

    pub title: String,
    pub x_label: String,
    pub y_label: String,

    /// Draw the piecewise definitions of Q and a in the top left corner.
    pub show_formulae: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit: Option<String>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            bound: DEFAULT_BOUND,
            width: 1200,
            height: 1200,
            background: Rgb::new(0xF2, 0xEF, 0xE9),
            point_color: Rgb::new(0xD1, 0x55, 0x7D),
            ink: Rgb::new(0x22, 0x22, 0x22),
            point_alpha: 0.6,
            y_min: -100_000,
            y_max: 180_000,
            text_scale: 2,
            title: "The Hofstadter Chaotic Heart Sequence a(n) - Q(n)".to_string(),
            x_label: "n".to_string(),
            y_label: "a(n) - Q(n)".to_string(),
            show_formulae: true,
            credit: Some("Simone Conradi, 2025 (Reproduction)".to_string()),
        }
    }
}

impl PlotConfig {
    pub fn with_bound(mut self, bound: usize) -> Self {
        self.bound = bound;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        sequence::validate_bound(self.bound)?;

        if self.width < 64 || self.height < 64 {
            return Err(ConfigError::Invalid(format!(
                "canvas must be at least 64x64, got {}x{}",
                self.width, self.height
            )));
        }
        if self.y_min >= self.y_max {
            return Err(ConfigError::Invalid(format!(
                "y_min ({}) must be below y_max ({})",
                self.y_min, self.y_max
            )));
        }
        if !(self.point_alpha > 0.0 && self.point_alpha <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "point_alpha must be in (0, 1], got {}",
                self.point_alpha
            )));
        }
        if self.text_scale == 0 {
            return Err(ConfigError::Invalid("text_scale must be > 0".to_string()));
        }

        Ok(())
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let config: PlotConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PlotConfig::default().validate().is_ok());
    }

    #[test]
    fn test_save_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heart.json");
        let config = PlotConfig::default().with_bound(10_000);

        config.save_json(&path).unwrap();
        let loaded = PlotConfig::load_json(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PlotConfig = serde_json::from_str(r##"{"bound": 500, "point_color": "#102030"}"##).unwrap();
        assert_eq!(config.bound, 500);
        assert_eq!(config.point_color, Rgb::new(0x10, 0x20, 0x30));
        assert_eq!(config.width, PlotConfig::default().width);
    }

    #[test]
    fn test_bad_color_rejected() {
        let result: Result<PlotConfig, _> = serde_json::from_str(r#"{"background": "beige"}"#);
        assert!(result.is_err());
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#GG0000".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_rgb_round_trip() {
        let color: Rgb = "#d1557d".parse().unwrap();
        assert_eq!(color.to_string(), "#D1557D");
        assert_eq!(color.to_u32(), 0xD1557D);
        assert_eq!(Rgb::from_u32(0xD1557D), color);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            PlotConfig::default().with_bound(2).validate(),
            Err(ConfigError::Bound(_))
        ));

        let mut config = PlotConfig::default();
        config.y_min = 10;
        config.y_max = 10;
        assert!(config.validate().is_err());

        let mut config = PlotConfig::default();
        config.point_alpha = 0.0;
        assert!(config.validate().is_err());

        let mut config = PlotConfig::default();
        config.width = 10;
        assert!(config.validate().is_err());

        let mut config = PlotConfig::default();
        config.text_scale = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PlotConfig::load_json(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
