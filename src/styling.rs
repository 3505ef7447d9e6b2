//! Depth and magnitude styling for earthquake markers
//!
//! One parameterized [`QuakeStyler`] carries the depth buckets, the radius
//! scale and the constant marker paint. Its `Default` is the styling the map
//! ships with; [`depth_color`] and [`magnitude_radius`] are shorthands for it.

use crate::core::constants::{
    DEPTH_COLORS, DEPTH_THRESHOLDS_KM, PLATE_LINE_COLOR, RADIUS_PER_MAGNITUDE,
};
use crate::data::quake::Earthquake;
use crate::layers::vector::{LineStyle, MarkerStyle};
use serde::{Deserialize, Serialize};
use std::fmt;

/// RGBA color, serialized as `#RRGGBB` or `#RRGGBBAA`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional, any case)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();

        match hex.len() {
            3 => {
                let mut it = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
                Some(Self::rgb(it.next()??, it.next()??, it.next()??))
            }
            6 => Some(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Same color with alpha scaled by `opacity` (clamped to 0..=1)
    pub fn with_opacity(self, opacity: f32) -> Self {
        let alpha = (self.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a: alpha, ..self }
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid color: {value}"))
    }
}

#[cfg(feature = "egui")]
impl From<Color> for egui::Color32 {
    fn from(color: Color) -> Self {
        egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
    }
}

/// Parses one of the compiled-in hex constants
pub(crate) fn constant_color(hex: &str) -> Color {
    Color::from_hex(hex).unwrap_or(Color::BLACK)
}

/// Depth buckets: `thresholds[i]` is the inclusive upper bound of `colors[i]`,
/// and the last color catches everything deeper (and NaN).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthScale {
    pub thresholds: Vec<f64>,
    pub colors: Vec<Color>,
}

impl DepthScale {
    /// Index of the bucket `depth` falls in; larger means deeper
    pub fn bucket(&self, depth: f64) -> usize {
        self.thresholds
            .iter()
            .position(|limit| depth <= *limit)
            .unwrap_or(self.thresholds.len())
    }

    pub fn color(&self, depth: f64) -> Color {
        let bucket = self.bucket(depth).min(self.colors.len().saturating_sub(1));
        self.colors.get(bucket).copied().unwrap_or(Color::BLACK)
    }
}

impl Default for DepthScale {
    fn default() -> Self {
        Self {
            thresholds: DEPTH_THRESHOLDS_KM.to_vec(),
            colors: DEPTH_COLORS.iter().map(|hex| constant_color(hex)).collect(),
        }
    }
}

/// Maps earthquakes to circle marker styles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuakeStyler {
    pub depth_scale: DepthScale,
    pub radius_per_magnitude: f32,
    pub outline_color: Color,
    pub outline_weight: f32,
    pub outline_opacity: f32,
    pub fill_opacity: f32,
}

impl Default for QuakeStyler {
    fn default() -> Self {
        Self {
            depth_scale: DepthScale::default(),
            radius_per_magnitude: RADIUS_PER_MAGNITUDE,
            outline_color: Color::BLACK,
            outline_weight: 0.5,
            outline_opacity: 0.75,
            fill_opacity: 0.6,
        }
    }
}

impl QuakeStyler {
    pub fn with_radius_per_magnitude(mut self, factor: f32) -> Self {
        self.radius_per_magnitude = factor;
        self
    }

    pub fn color_for_depth(&self, depth: f64) -> Color {
        self.depth_scale.color(depth)
    }

    /// Linear in magnitude; NaN and negative inputs pass straight through
    pub fn radius_for_magnitude(&self, magnitude: f64) -> f32 {
        magnitude as f32 * self.radius_per_magnitude
    }

    /// Full circle marker paint for one event
    pub fn marker_style(&self, quake: &Earthquake) -> MarkerStyle {
        MarkerStyle {
            radius: self.radius_for_magnitude(quake.magnitude),
            fill_color: self.color_for_depth(quake.depth_km),
            fill_opacity: self.fill_opacity,
            stroke_color: self.outline_color,
            stroke_width: self.outline_weight,
            stroke_opacity: self.outline_opacity,
        }
    }
}

/// Paint for tectonic plate boundaries
pub fn plate_line_style() -> LineStyle {
    LineStyle {
        color: constant_color(PLATE_LINE_COLOR),
        width: 2.0,
        opacity: 0.7,
    }
}

/// Fill color for an event at `depth` km
pub fn depth_color(depth: f64) -> Color {
    DepthScale::default().color(depth)
}

/// Marker radius for an event of `magnitude`
pub fn magnitude_radius(magnitude: f64) -> f32 {
    magnitude as f32 * RADIUS_PER_MAGNITUDE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> Color {
        Color::from_hex(s).unwrap()
    }

    #[test]
    fn test_depth_buckets_are_inclusive_on_the_lower_side() {
        assert_eq!(depth_color(-5.0), hex("#66FF33"));
        assert_eq!(depth_color(10.0), hex("#66FF33"));
        assert_eq!(depth_color(10.01), hex("#cadb2b"));
        assert_eq!(depth_color(30.0), hex("#cadb2b"));
        assert_eq!(depth_color(30.5), hex("#FF6600"));
        assert_eq!(depth_color(50.0), hex("#FF6600"));
        assert_eq!(depth_color(50.01), hex("#FF0000"));
        assert_eq!(depth_color(650.0), hex("#FF0000"));
    }

    #[test]
    fn test_depth_severity_never_decreases() {
        let scale = DepthScale::default();
        let mut previous = 0;
        let mut depth = -20.0;
        while depth < 200.0 {
            let bucket = scale.bucket(depth);
            assert!(bucket >= previous, "bucket dropped at depth {depth}");
            assert!(bucket < 4);
            previous = bucket;
            depth += 0.25;
        }
    }

    #[test]
    fn test_nan_depth_falls_into_catch_all() {
        assert_eq!(depth_color(f64::NAN), hex("#FF0000"));
    }

    #[test]
    fn test_radius_is_four_times_magnitude() {
        assert_eq!(magnitude_radius(2.5), 10.0);
        assert_eq!(magnitude_radius(0.0), 0.0);
        for m in [0.1, 1.0, 3.3, 7.8] {
            assert!((magnitude_radius(m) - 4.0 * m as f32).abs() < 1e-5);
        }
        assert!(magnitude_radius(f64::NAN).is_nan());
    }

    #[test]
    fn test_custom_radius_factor() {
        let styler = QuakeStyler::default().with_radius_per_magnitude(2.0);
        assert_eq!(styler.radius_for_magnitude(3.0), 6.0);
    }

    #[test]
    fn test_color_hex_parsing() {
        assert_eq!(hex("#cadb2b"), Color::rgb(0xCA, 0xDB, 0x2B));
        assert_eq!(hex("fff"), Color::WHITE);
        assert_eq!(hex("#00000080").a, 0x80);
        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("#zzzzzz").is_none());
        assert_eq!(Color::rgb(255, 99, 71).to_hex(), "#FF6347");
    }

    #[test]
    fn test_color_serializes_as_hex_string() {
        let json = serde_json::to_string(&hex("#FF6600")).unwrap();
        assert_eq!(json, "\"#FF6600\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hex("#FF6600"));
    }

    #[test]
    fn test_plate_line_style() {
        let style = plate_line_style();
        assert_eq!(style.color, hex("#FF6347"));
        assert_eq!(style.width, 2.0);
        assert_eq!(style.opacity, 0.7);
    }
}
