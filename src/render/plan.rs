//! Figure layout decided before any drawing: panel grid, size and legend entries.

use anyhow::{Result, ensure};
use plotters::style::RGBColor;

use crate::aggregate::WeatherSummary;
use crate::categories::{ALLOWED_WEATHER, CollisionCategory, DRIVER_AT_FAULT_VALUES};
use crate::render::palette::{
    INJURY_COLORS, MarkerShape, collision_color, collision_marker, driver_at_fault_color,
};

/// Number of legend columns under the panel row.
pub const LEGEND_COLUMNS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub panel_width: u32,
    pub panel_height: u32,
    pub legend_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            panel_width: 500,
            panel_height: 500,
            legend_height: 130,
        }
    }
}

/// How a legend entry is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendGlyph {
    /// Thick color band, for stacked areas.
    Band(RGBColor),
    /// Line with a circle marker in the middle.
    LineMarker(RGBColor),
    /// Marker alone.
    Marker(MarkerShape, RGBColor),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub label: String,
    pub glyph: LegendGlyph,
}

/// Shared legend: fixed driver-at-fault bands, injury lines, collision markers.
pub fn legend_entries() -> Vec<LegendEntry> {
    let fault = DRIVER_AT_FAULT_VALUES.iter().map(|v| LegendEntry {
        label: format!("Driver At Fault: {v}"),
        glyph: LegendGlyph::Band(driver_at_fault_color(v)),
    });
    let injury = INJURY_COLORS.iter().map(|(group, color)| LegendEntry {
        label: group.to_string(),
        glyph: LegendGlyph::LineMarker(*color),
    });
    let collision = CollisionCategory::ALL.iter().map(|c| LegendEntry {
        label: c.label().to_string(),
        glyph: LegendGlyph::Marker(collision_marker(*c), collision_color(*c)),
    });
    fault.chain(injury).chain(collision).collect()
}

/// Layout of the whole figure, decided before any drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigurePlan {
    /// Panel titles' weather values, left to right.
    pub panels: Vec<String>,
    pub width: u32,
    pub height: u32,
    pub panel_height: u32,
    pub legend: Vec<LegendEntry>,
}

impl FigurePlan {
    /// One panel per summary in a single row, legend strip below.
    ///
    /// # Errors
    ///
    /// Fails when there is nothing to draw or more panels than allowed weather values.
    pub fn new(summaries: &[WeatherSummary], config: &RenderConfig) -> Result<Self> {
        ensure!(
            !summaries.is_empty(),
            "no accident rows left after filtering, nothing to plot"
        );
        ensure!(
            summaries.len() <= ALLOWED_WEATHER.len(),
            "{} weather panels requested, at most {} are supported",
            summaries.len(),
            ALLOWED_WEATHER.len()
        );

        let n = summaries.len() as u32;
        Ok(Self {
            panels: summaries.iter().map(|s| s.weather.clone()).collect(),
            width: config.panel_width * n,
            height: config.panel_height + config.legend_height,
            panel_height: config.panel_height,
            legend: legend_entries(),
        })
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn legend_rows(&self) -> usize {
        self.legend.len().div_ceil(LEGEND_COLUMNS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::YearPivot;

    fn summary(weather: &str) -> WeatherSummary {
        WeatherSummary {
            weather: weather.to_string(),
            totals: vec![(2020, 1)],
            driver_at_fault: YearPivot::default(),
            injury_severity: YearPivot::default(),
            collisions: vec![],
        }
    }

    #[test]
    fn test_plan_one_panel_per_weather() {
        let summaries = vec![summary("Snow"), summary("Clear")];
        let plan = FigurePlan::new(&summaries, &RenderConfig::default()).unwrap();

        assert_eq!(plan.panel_count(), 2);
        assert_eq!(plan.panels, vec!["Snow", "Clear"]);
        assert_eq!(plan.width, 1000);
        assert_eq!(plan.height, 630);
    }

    #[test]
    fn test_plan_rejects_empty() {
        assert!(FigurePlan::new(&[], &RenderConfig::default()).is_err());
    }

    #[test]
    fn test_plan_rejects_more_than_four_panels() {
        let summaries: Vec<_> = ["Clear", "Cloudy", "Raining", "Snow", "Fog"]
            .iter()
            .map(|w| summary(w))
            .collect();
        assert!(FigurePlan::new(&summaries, &RenderConfig::default()).is_err());
    }

    #[test]
    fn test_legend_has_fixed_entries_in_order() {
        let legend = legend_entries();
        let labels: Vec<_> = legend.iter().map(|e| e.label.as_str()).collect();

        assert_eq!(
            labels,
            vec![
                "Driver At Fault: Yes",
                "Driver At Fault: No",
                "Driver At Fault: Unknown",
                "Fatal Injury",
                "No Injury",
                "Injured",
                "Other",
                "Rear-End Collisions",
                "Head-On Collisions",
                "Side-Swipe Collisions",
                "Other / Miscellaneous",
            ]
        );
        assert!(matches!(legend[0].glyph, LegendGlyph::Band(_)));
        assert!(matches!(
            legend[8].glyph,
            LegendGlyph::Marker(MarkerShape::Triangle, _)
        ));
    }

    #[test]
    fn test_legend_rows() {
        let plan = FigurePlan::new(&[summary("Clear")], &RenderConfig::default()).unwrap();
        assert_eq!(plan.legend_rows(), 3);
    }
}
