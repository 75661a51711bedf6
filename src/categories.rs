//! Fixed relabeling tables for the categorical crash fields.
//!
//! Each table is declared in the order series and legend entries are drawn.
//! Lookups are total: an unrecognized injury text becomes [`InjuryGroup::Other`],
//! an unrecognized collision type becomes `None`.

use serde::Serialize;
use std::fmt;

/// Weather values kept after title-case normalization, in legend order.
pub static ALLOWED_WEATHER: &[&str] = &["Clear", "Cloudy", "Raining", "Snow"];

/// Value a missing weather cell is replaced with before the allowed-set filter.
pub const UNKNOWN_WEATHER: &str = "Unknown";

/// Driver-at-fault values with a dedicated stacking slot and legend entry.
pub static DRIVER_AT_FAULT_VALUES: &[&str] = &["Yes", "No", "Unknown"];

/// Value recorded when the driver-at-fault cell is missing.
pub const UNKNOWN_FAULT: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum InjuryGroup {
    FatalInjury,
    NoInjury,
    Injured,
    Other,
}

impl InjuryGroup {
    pub const ALL: [InjuryGroup; 4] = [
        InjuryGroup::FatalInjury,
        InjuryGroup::NoInjury,
        InjuryGroup::Injured,
        InjuryGroup::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            InjuryGroup::FatalInjury => "Fatal Injury",
            InjuryGroup::NoInjury => "No Injury",
            InjuryGroup::Injured => "Injured",
            InjuryGroup::Other => "Other",
        }
    }
}

impl fmt::Display for InjuryGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CollisionCategory {
    RearEnd,
    HeadOn,
    SideSwipe,
    OtherMisc,
}

impl CollisionCategory {
    pub const ALL: [CollisionCategory; 4] = [
        CollisionCategory::RearEnd,
        CollisionCategory::HeadOn,
        CollisionCategory::SideSwipe,
        CollisionCategory::OtherMisc,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CollisionCategory::RearEnd => "Rear-End Collisions",
            CollisionCategory::HeadOn => "Head-On Collisions",
            CollisionCategory::SideSwipe => "Side-Swipe Collisions",
            CollisionCategory::OtherMisc => "Other / Miscellaneous",
        }
    }
}

impl fmt::Display for CollisionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lower-cased injury severity text to group.
static INJURY_SEVERITY_GROUPS: &[(&str, InjuryGroup)] = &[
    ("fatal injury", InjuryGroup::FatalInjury),
    ("no apparent injury", InjuryGroup::NoInjury),
    ("possible injury", InjuryGroup::NoInjury),
    ("suspected minor injury", InjuryGroup::Injured),
    ("suspected serious injury", InjuryGroup::Injured),
];

/// Raw collision type text (exact match) to category.
static COLLISION_TYPE_GROUPS: &[(&str, CollisionCategory)] = &[
    ("SAME DIR REAR END", CollisionCategory::RearEnd),
    ("SAME DIR BOTH LEFT TURN", CollisionCategory::RearEnd),
    ("ANGLE MEETS LEFT TURN", CollisionCategory::RearEnd),
    ("HEAD ON", CollisionCategory::HeadOn),
    ("HEAD ON LEFT TURN", CollisionCategory::HeadOn),
    ("ANGLE MEETS RIGHT TURN", CollisionCategory::HeadOn),
    ("SAME DIRECTION SIDESWIPE", CollisionCategory::SideSwipe),
    ("OPPOSITE DIRECTION SIDESWIPE", CollisionCategory::SideSwipe),
    ("SAME DIRECTION LEFT TURN", CollisionCategory::SideSwipe),
    ("SAME DIRECTION RIGHT TURN", CollisionCategory::SideSwipe),
    ("SINGLE VEHICLE", CollisionCategory::OtherMisc),
    ("OTHER", CollisionCategory::OtherMisc),
    ("UNKNOWN", CollisionCategory::OtherMisc),
    ("N/A", CollisionCategory::OtherMisc),
];

/// Groups an injury severity description, case-insensitively.
///
/// Missing or unrecognized text maps to [`InjuryGroup::Other`].
pub fn map_injury_severity(raw: Option<&str>) -> InjuryGroup {
    let Some(raw) = raw else {
        return InjuryGroup::Other;
    };
    let lowered = raw.to_lowercase();
    INJURY_SEVERITY_GROUPS
        .iter()
        .find(|(key, _)| *key == lowered)
        .map(|(_, group)| *group)
        .unwrap_or(InjuryGroup::Other)
}

/// Categorizes a raw collision type. Matching is exact; unknown text yields `None`.
pub fn map_collision_type(raw: Option<&str>) -> Option<CollisionCategory> {
    let raw = raw?;
    COLLISION_TYPE_GROUPS
        .iter()
        .find(|(key, _)| *key == raw)
        .map(|(_, category)| *category)
}

pub fn is_allowed_weather(weather: &str) -> bool {
    ALLOWED_WEATHER.contains(&weather)
}
