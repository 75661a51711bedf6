//! Fixed color and marker tables.
//!
//! Every table is keyed by label and paired with a fallback used for any
//! label it does not list.

use plotters::style::RGBColor;

use crate::categories::CollisionCategory;

/// Panel background per weather condition.
pub static WEATHER_BACKGROUNDS: &[(&str, RGBColor)] = &[
    ("Clear", RGBColor(0x87, 0xCE, 0xEB)),
    ("Cloudy", RGBColor(0xD3, 0xD3, 0xD3)),
    ("Raining", RGBColor(0xB0, 0xC4, 0xDE)),
    ("Snow", RGBColor(0xF0, 0xF8, 0xFF)),
];
pub const WEATHER_BACKGROUND_FALLBACK: RGBColor = RGBColor(0xFF, 0xFF, 0xFF);

/// Stacked-area fill per driver-at-fault value.
pub static DRIVER_AT_FAULT_COLORS: &[(&str, RGBColor)] = &[
    ("Yes", RGBColor(0x1f, 0x77, 0xb4)),
    ("No", RGBColor(0xff, 0x7f, 0x0e)),
    ("Unknown", RGBColor(0x2c, 0xa0, 0x2c)),
];
/// Light gray.
pub const DRIVER_AT_FAULT_FALLBACK: RGBColor = RGBColor(0xD3, 0xD3, 0xD3);

/// Line color per injury severity group.
pub static INJURY_COLORS: &[(&str, RGBColor)] = &[
    ("Fatal Injury", RGBColor(0xd6, 0x27, 0x28)),
    ("No Injury", RGBColor(0x94, 0x67, 0xbd)),
    ("Injured", RGBColor(0x8c, 0x56, 0x4b)),
    ("Other", RGBColor(0xe3, 0x77, 0xc2)),
];
/// Gray.
pub const INJURY_FALLBACK: RGBColor = RGBColor(0x80, 0x80, 0x80);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Triangle,
    Square,
    Diamond,
}

pub static COLLISION_MARKERS: &[(&str, MarkerShape)] = &[
    ("Rear-End Collisions", MarkerShape::Circle),
    ("Head-On Collisions", MarkerShape::Triangle),
    ("Side-Swipe Collisions", MarkerShape::Square),
    ("Other / Miscellaneous", MarkerShape::Diamond),
];
pub const COLLISION_MARKER_FALLBACK: MarkerShape = MarkerShape::Diamond;

pub static COLLISION_COLORS: &[(&str, RGBColor)] = &[
    ("Rear-End Collisions", RGBColor(0x1f, 0x77, 0xb4)),
    ("Head-On Collisions", RGBColor(0xd6, 0x27, 0x28)),
    ("Side-Swipe Collisions", RGBColor(0x2c, 0xa0, 0x2c)),
    ("Other / Miscellaneous", RGBColor(0x94, 0x67, 0xbd)),
];
/// Tomato.
pub const COLLISION_COLOR_FALLBACK: RGBColor = RGBColor(0xFF, 0x63, 0x47);

/// Grid lines under the data.
pub const GRID_COLOR: RGBColor = RGBColor(0xD3, 0xD3, 0xD3);

fn lookup<T: Copy>(table: &[(&str, T)], key: &str, fallback: T) -> T {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .unwrap_or(fallback)
}

pub fn weather_background(weather: &str) -> RGBColor {
    lookup(WEATHER_BACKGROUNDS, weather, WEATHER_BACKGROUND_FALLBACK)
}

pub fn driver_at_fault_color(value: &str) -> RGBColor {
    lookup(DRIVER_AT_FAULT_COLORS, value, DRIVER_AT_FAULT_FALLBACK)
}

pub fn injury_color(group: &str) -> RGBColor {
    lookup(INJURY_COLORS, group, INJURY_FALLBACK)
}

pub fn collision_marker(category: CollisionCategory) -> MarkerShape {
    lookup(COLLISION_MARKERS, category.label(), COLLISION_MARKER_FALLBACK)
}

pub fn collision_color(category: CollisionCategory) -> RGBColor {
    lookup(COLLISION_COLORS, category.label(), COLLISION_COLOR_FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_background_fallback_is_white() {
        assert_eq!(weather_background("Clear"), RGBColor(0x87, 0xCE, 0xEB));
        assert_eq!(weather_background("Unknown"), RGBColor(0xFF, 0xFF, 0xFF));
    }

    #[test]
    fn test_fault_and_injury_fallbacks() {
        assert_eq!(driver_at_fault_color("No"), RGBColor(0xff, 0x7f, 0x0e));
        assert_eq!(driver_at_fault_color("N"), DRIVER_AT_FAULT_FALLBACK);
        assert_eq!(injury_color("Injured"), RGBColor(0x8c, 0x56, 0x4b));
        assert_eq!(injury_color("Minor"), INJURY_FALLBACK);
    }

    #[test]
    fn test_every_collision_category_has_marker_and_color() {
        for category in CollisionCategory::ALL {
            assert!(COLLISION_MARKERS.iter().any(|(k, _)| *k == category.label()));
            assert!(COLLISION_COLORS.iter().any(|(k, _)| *k == category.label()));
        }
        assert_eq!(collision_marker(CollisionCategory::HeadOn), MarkerShape::Triangle);
        assert_eq!(collision_color(CollisionCategory::SideSwipe), RGBColor(0x2c, 0xa0, 0x2c));
    }
}
