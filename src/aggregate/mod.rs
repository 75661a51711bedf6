//! Per-weather aggregation of cleaned crash reports.
//!
//! Each weather condition gets yearly totals, zero-filled pivots for
//! driver-at-fault and injury severity, and long-form collision counts.

pub mod summary;
pub mod types;

pub use summary::{summarize, weather_order};
pub use types::{CollisionCount, PivotColumn, WeatherSummary, YearPivot};
