//! Configuration types for the Trellis engine and its collaborators.
//!
//! All types implement [`serde::Deserialize`] with per-field defaults so a
//! partial TOML file loads cleanly.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and measurement settings.
//! - [`LayoutConfig`] - Spacing and origin parameters for the layout engine.
//! - [`MeasureConfig`] - Font metrics for text-based size estimation. The
//!   engine itself never measures nodes; this section parameterizes the
//!   stand-in measurer used by headless front ends such as the CLI.

use serde::Deserialize;

use trellis_core::geometry::Point;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Measurement configuration section.
    #[serde(default)]
    measure: MeasureConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, measure: MeasureConfig) -> Self {
        Self { layout, measure }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the measurement configuration.
    pub fn measure(&self) -> &MeasureConfig {
        &self.measure
    }
}

/// Spacing and origin parameters for the layout engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// X coordinate of the layout origin (radial center / horizontal left edge).
    origin_x: f32,
    /// Y coordinate of the layout origin.
    origin_y: f32,
    /// Extra ring spacing per hierarchy level in radial mode.
    level_padding: f32,
    /// Column gap between hierarchy levels in horizontal mode.
    horizontal_spacing: f32,
    /// Vertical gap between stacked siblings in horizontal mode.
    vertical_spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            level_padding: 60.0,
            horizontal_spacing: 80.0,
            vertical_spacing: 24.0,
        }
    }
}

impl LayoutConfig {
    /// The layout origin as a point.
    pub fn origin(&self) -> Point {
        Point::new(self.origin_x, self.origin_y)
    }

    /// Extra ring spacing per level (radial mode).
    pub fn level_padding(&self) -> f32 {
        self.level_padding
    }

    /// Column gap between levels (horizontal mode).
    pub fn horizontal_spacing(&self) -> f32 {
        self.horizontal_spacing
    }

    /// Vertical gap between stacked siblings (horizontal mode).
    pub fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing
    }
}

/// Font metrics for the text-based size estimator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    /// Estimated advance width of one character, in canvas units.
    char_width: f32,
    /// Height of one line of text.
    line_height: f32,
    /// Padding added around the text on every side.
    padding: f32,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 20.0,
            padding: 8.0,
        }
    }
}

impl MeasureConfig {
    /// Estimated advance width of one character.
    pub fn char_width(&self) -> f32 {
        self.char_width
    }

    /// Height of one line of text.
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Padding around the text.
    pub fn padding(&self) -> f32 {
        self.padding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_usable() {
        let config = AppConfig::default();
        assert!(config.layout().level_padding() > 0.0);
        assert!(config.measure().char_width() > 0.0);
    }
}
