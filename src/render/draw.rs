//! Paints a [`FigurePlan`] onto a PNG or SVG plotters backend.

use std::path::Path;

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::combinators::{BindKeyPoints, WithKeyPoints};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::FontStyle;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, info};

use crate::aggregate::WeatherSummary;
use crate::render::palette::{
    GRID_COLOR, MarkerShape, collision_color, collision_marker, driver_at_fault_color,
    injury_color, weather_background,
};
use crate::render::plan::{FigurePlan, LEGEND_COLUMNS, LegendEntry, LegendGlyph, RenderConfig};

const AREA_ALPHA: f64 = 0.6;
const SCATTER_ALPHA: f64 = 0.7;
const LINE_WIDTH: u32 = 2;
const LINE_MARKER_SIZE: i32 = 3;
const SCATTER_MARKER_SIZE: i32 = 6;
const GRID_STEPS: usize = 5;

type PanelCoord = Cartesian2d<RangedCoordf64, WithKeyPoints<RangedCoordf64>>;

/// Output image format, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Png,
    Svg,
}

impl ChartKind {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => ChartKind::Svg,
            _ => ChartKind::Png,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderReport {
    pub panels: usize,
    pub legend_entries: usize,
    pub width: u32,
    pub height: u32,
}

/// Renders one panel per weather summary plus the shared legend to `path`.
#[tracing::instrument(skip(summaries, config), fields(path = %path.display(), panels = summaries.len()))]
pub fn render_figure(
    path: &Path,
    summaries: &[WeatherSummary],
    config: &RenderConfig,
) -> Result<RenderReport> {
    let plan = FigurePlan::new(summaries, config)?;
    let size = (plan.width, plan.height);

    let report = match ChartKind::from_path(path) {
        ChartKind::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_figure(root, &plan, summaries)
        }
        ChartKind::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_figure(root, &plan, summaries)
        }
    }
    .with_context(|| format!("failed to render chart to {}", path.display()))?;

    info!(
        panels = report.panels,
        width = report.width,
        height = report.height,
        "Chart written"
    );
    Ok(report)
}

/// Paints a planned figure on any plotters backend.
pub fn draw_figure<DB>(
    root: DrawingArea<DB, Shift>,
    plan: &FigurePlan,
    summaries: &[WeatherSummary],
) -> Result<RenderReport>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let (panel_row, legend_area) = root.split_vertically(plan.panel_height);
    let panels = panel_row.split_evenly((1, plan.panel_count()));

    for (area, summary) in panels.iter().zip(summaries) {
        draw_panel(area, summary)?;
    }
    draw_legend(&legend_area, &plan.legend)?;

    root.present()?;

    Ok(RenderReport {
        panels: panels.len(),
        legend_entries: plan.legend.len(),
        width: plan.width,
        height: plan.height,
    })
}

/// X extent with a quarter-year pad so edge markers stay inside the plot.
fn year_bounds(summary: &WeatherSummary) -> (f64, f64) {
    let first = summary.years().min().unwrap_or(0) as f64;
    let last = summary.years().max().unwrap_or(0) as f64;
    (first - 0.25, last + 0.25)
}

/// Whole-number y ticks from zero up to `y_top`, spaced 1, 2 or 5 times a
/// power of ten so there are at most `GRID_STEPS` intervals.
fn count_ticks(y_top: f64) -> Vec<f64> {
    let raw = (y_top / GRID_STEPS as f64).max(1.0);
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * magnitude);

    (0..)
        .map(|i| i as f64 * step)
        .take_while(|y| *y <= y_top)
        .collect()
}

fn draw_panel<DB>(area: &DrawingArea<DB, Shift>, summary: &WeatherSummary) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let years: Vec<f64> = summary.years().map(f64::from).collect();
    let (x_min, x_max) = year_bounds(summary);
    let y_top = summary.y_max().max(1) as f64 * 1.1;
    let y_ticks = count_ticks(y_top);

    let mut chart = ChartBuilder::on(area)
        .caption(
            format!("Weather: {}", summary.weather),
            ("sans-serif", 18).into_font(),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(x_min..x_max, (0f64..y_top).with_key_points(y_ticks.clone()))?;

    chart
        .plotting_area()
        .fill(&weather_background(&summary.weather))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Year")
        .y_desc("Accident Count")
        .x_labels(years.len().max(2) * 2)
        .x_label_formatter(&|x: &f64| {
            if (x - x.round()).abs() < 1e-6 {
                format!("{:.0}", x)
            } else {
                String::new()
            }
        })
        .y_label_formatter(&|y: &f64| format!("{:.0}", y))
        .draw()?;

    // Grid first so every series sits on top of it.
    let grid_style = GRID_COLOR.mix(0.4).stroke_width(1);
    for x in &years {
        chart.draw_series(DashedLineSeries::new(
            vec![(*x, 0.0), (*x, y_top)],
            4,
            4,
            grid_style,
        ))?;
    }
    for y in y_ticks.iter().copied().filter(|y| *y > 0.0) {
        chart.draw_series(DashedLineSeries::new(
            vec![(x_min, y), (x_max, y)],
            4,
            4,
            grid_style,
        ))?;
    }

    // Driver-at-fault stacked areas, bottom layer first.
    let fault = &summary.driver_at_fault;
    let stacked = fault.stacked();
    let zeros = vec![0usize; fault.years.len()];
    for (i, column) in fault.columns.iter().enumerate() {
        let lower = if i == 0 { &zeros } else { &stacked[i - 1] };
        let upper = &stacked[i];

        let mut outline: Vec<(f64, f64)> = fault
            .years
            .iter()
            .zip(upper)
            .map(|(y, n)| (f64::from(*y), *n as f64))
            .collect();
        outline.extend(
            fault
                .years
                .iter()
                .zip(lower)
                .rev()
                .map(|(y, n)| (f64::from(*y), *n as f64)),
        );

        let color = driver_at_fault_color(&column.label).mix(AREA_ALPHA);
        chart.draw_series(std::iter::once(Polygon::new(outline, color.filled())))?;
    }

    // Injury severity lines with circle markers.
    let injury = &summary.injury_severity;
    for column in &injury.columns {
        let points: Vec<(f64, f64)> = injury
            .years
            .iter()
            .zip(&column.counts)
            .map(|(y, n)| (f64::from(*y), *n as f64))
            .collect();
        let color = injury_color(&column.label);

        chart.draw_series(LineSeries::new(
            points.iter().copied(),
            color.stroke_width(LINE_WIDTH),
        ))?;
        chart.draw_series(
            points
                .iter()
                .map(|p| Circle::new(*p, LINE_MARKER_SIZE, color.filled())),
        )?;
    }

    // One marker per (year, collision category).
    for c in &summary.collisions {
        let point = (f64::from(c.year), c.count as f64);
        let style = collision_color(c.category).mix(SCATTER_ALPHA).filled();
        draw_chart_marker(
            &mut chart,
            collision_marker(c.category),
            point,
            SCATTER_MARKER_SIZE,
            style,
        )?;
    }

    debug!(
        weather = %summary.weather,
        fault_layers = fault.columns.len(),
        injury_lines = injury.columns.len(),
        collision_points = summary.collisions.len(),
        "Panel drawn"
    );
    Ok(())
}

fn draw_chart_marker<DB>(
    chart: &mut ChartContext<'_, DB, PanelCoord>,
    shape: MarkerShape,
    point: (f64, f64),
    size: i32,
    style: ShapeStyle,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    match shape {
        MarkerShape::Circle => {
            chart.draw_series(std::iter::once(Circle::new(point, size, style)))?;
        }
        MarkerShape::Triangle => {
            chart.draw_series(std::iter::once(TriangleMarker::new(point, size, style)))?;
        }
        MarkerShape::Square => {
            chart.draw_series(std::iter::once(
                EmptyElement::at(point) + Rectangle::new([(-size, -size), (size, size)], style),
            ))?;
        }
        MarkerShape::Diamond => {
            chart.draw_series(std::iter::once(
                EmptyElement::at(point)
                    + Polygon::new(vec![(0, -size), (size, 0), (0, size), (-size, 0)], style),
            ))?;
        }
    }
    Ok(())
}

fn draw_pixel_marker<DB>(
    area: &DrawingArea<DB, Shift>,
    shape: MarkerShape,
    (x, y): (i32, i32),
    size: i32,
    style: ShapeStyle,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    match shape {
        MarkerShape::Circle => area.draw(&Circle::new((x, y), size, style))?,
        MarkerShape::Triangle => area.draw(&TriangleMarker::new((x, y), size, style))?,
        MarkerShape::Square => {
            area.draw(&Rectangle::new([(x - size, y - size), (x + size, y + size)], style))?
        }
        MarkerShape::Diamond => area.draw(&Polygon::new(
            vec![(x, y - size), (x + size, y), (x, y + size), (x - size, y)],
            style,
        ))?,
    }
    Ok(())
}

/// Draws the legend title and entries in a grid centered in `area`.
fn draw_legend<DB>(area: &DrawingArea<DB, Shift>, entries: &[LegendEntry]) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    const COLUMN_WIDTH: i32 = 200;
    const ROW_HEIGHT: i32 = 24;
    const GLYPH_WIDTH: i32 = 28;

    let (width, _) = area.dim_in_pixel();
    let columns = LEGEND_COLUMNS.min(entries.len().max(1)) as i32;
    let left = ((width as i32 - columns * COLUMN_WIDTH) / 2).max(0);

    let title_style = TextStyle::from(("sans-serif", 15).into_font().style(FontStyle::Bold))
        .pos(Pos::new(HPos::Center, VPos::Top));
    area.draw(&Text::new("Legend", (width as i32 / 2, 6), title_style))?;

    let label_style = ("sans-serif", 13).into_font();
    for (i, entry) in entries.iter().enumerate() {
        let col = (i % LEGEND_COLUMNS) as i32;
        let row = (i / LEGEND_COLUMNS) as i32;
        let x = left + col * COLUMN_WIDTH;
        let y = 36 + row * ROW_HEIGHT;

        match entry.glyph {
            LegendGlyph::Band(color) => {
                area.draw(&Rectangle::new(
                    [(x, y - 4), (x + GLYPH_WIDTH, y + 4)],
                    color.filled(),
                ))?;
            }
            LegendGlyph::LineMarker(color) => {
                area.draw(&PathElement::new(
                    vec![(x, y), (x + GLYPH_WIDTH, y)],
                    color.stroke_width(LINE_WIDTH),
                ))?;
                area.draw(&Circle::new((x + GLYPH_WIDTH / 2, y), 4, color.filled()))?;
            }
            LegendGlyph::Marker(shape, color) => {
                draw_pixel_marker(area, shape, (x + GLYPH_WIDTH / 2, y), 5, color.filled())?;
            }
        }

        area.draw(&Text::new(
            entry.label.clone(),
            (x + GLYPH_WIDTH + 6, y - 7),
            label_style.clone(),
        ))?;
    }
    Ok(())
}
