//! Categorical colours for chart series.

use std::collections::{BTreeMap, BTreeSet};

use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

use crate::data::model::CellValue;

pub const GREY: RGBColor = RGBColor(128, 128, 128);

/// The ten-colour categorical cycle most of the figures are drawn with.
pub const TAB10: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// `n` distinct colours: the [`TAB10`] cycle while it lasts, evenly spaced
/// hues beyond that.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n <= TAB10.len() {
        return TAB10[..n].to_vec();
    }
    (0..n).map(|i| hue_color(i as f32 / n as f32 * 360.0)).collect()
}

fn hue_color(hue: f32) -> RGBColor {
    let rgb: Srgb = Hsl::new(hue, 0.75, 0.45).into_color();
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    RGBColor(channel(rgb.red), channel(rgb.green), channel(rgb.blue))
}

/// Category value → colour, for series split by a column such as `region`.
/// Values outside the map fall back to [`GREY`].
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<CellValue, RGBColor>,
}

impl ColorMap {
    /// Assign colours to the column's values in sorted order; nulls get none.
    pub fn new(column: &str, unique_values: &BTreeSet<CellValue>) -> Self {
        let categories: Vec<&CellValue> = unique_values
            .iter()
            .filter(|v| **v != CellValue::Null)
            .collect();
        let mapping = categories
            .iter()
            .map(|v| (*v).clone())
            .zip(generate_palette(categories.len()))
            .collect();

        ColorMap {
            column: column.to_string(),
            mapping,
        }
    }

    pub fn color_for(&self, value: &CellValue) -> RGBColor {
        self.mapping.get(value).copied().unwrap_or(GREY)
    }

    pub fn legend_entries(&self) -> Vec<(String, RGBColor)> {
        self.mapping.iter().map(|(v, c)| (v.to_string(), *c)).collect()
    }
}
