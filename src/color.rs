use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Position;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: position → Color32
// ---------------------------------------------------------------------------

/// Scatter colours, one per tactical position.
#[derive(Debug, Clone)]
pub struct PositionColors {
    mapping: BTreeMap<Position, Color32>,
    default_color: Color32,
}

impl Default for PositionColors {
    fn default() -> Self {
        let mapping = Position::ALL
            .into_iter()
            .zip(generate_palette(Position::ALL.len()))
            .collect();
        PositionColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }
}

impl PositionColors {
    /// Colour for a record's position; records without one are grey.
    pub fn color_for(&self, position: Option<Position>) -> Color32 {
        position
            .and_then(|p| self.mapping.get(&p).copied())
            .unwrap_or(self.default_color)
    }

    /// Return the legend entries (position label → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping
            .iter()
            .map(|(p, c)| (p.to_string(), *c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        for (i, a) in colors.iter().enumerate() {
            assert!(colors[i + 1..].iter().all(|b| b != a));
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_position_colors() {
        let colors = PositionColors::default();
        assert_eq!(colors.color_for(None), Color32::GRAY);
        assert_ne!(colors.color_for(Some(Position::GK)), colors.color_for(Some(Position::F)));
        let labels: Vec<String> = colors.legend_entries().into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, ["GK", "D", "M", "F"]);
    }
}
