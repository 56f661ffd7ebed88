use chrono::{Duration, NaiveDate};
use serde::Serialize;
use thiserror::Error;

/// The range presets a report run covers, in the order their sections appear
/// on the dashboard.
pub const ALL_PRESETS: [RangePreset; 7] = [
    RangePreset::Last30Days,
    RangePreset::Last60Days,
    RangePreset::Last90Days,
    RangePreset::August2025,
    RangePreset::September2025,
    RangePreset::October2025,
    RangePreset::November2025,
];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RangePreset {
    Last30Days,
    Last60Days,
    Last90Days,
    August2025,
    September2025,
    October2025,
    November2025,
}

/// The requested range name is not one of the recognized presets.
///
/// The preset list is fixed, so hitting this from anything other than
/// operator-supplied configuration indicates a configuration mismatch.
#[derive(Debug, Error, Eq, PartialEq)]
#[error("unrecognized date range preset `{0}`")]
pub struct UnknownPresetError(pub String);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeKind {
    Rolling,
    Fixed,
}

/// A half-open `[start, end)` date interval for one preset.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DateRange {
    pub name: &'static str,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub kind: RangeKind,
}

impl RangePreset {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Last30Days => "last_30",
            Self::Last60Days => "last_60",
            Self::Last90Days => "last_90",
            Self::August2025 => "august_2025",
            Self::September2025 => "september_2025",
            Self::October2025 => "october_2025",
            Self::November2025 => "november_2025",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, UnknownPresetError> {
        match name {
            "last_30" => Ok(Self::Last30Days),
            "last_60" => Ok(Self::Last60Days),
            "last_90" => Ok(Self::Last90Days),
            "august_2025" => Ok(Self::August2025),
            "september_2025" => Ok(Self::September2025),
            "october_2025" => Ok(Self::October2025),
            "november_2025" => Ok(Self::November2025),
            _ => Err(UnknownPresetError(name.to_owned())),
        }
    }

    /// Resolve the preset into concrete interval boundaries.
    ///
    /// Rolling presets are computed from `as_of`, which callers snapshot once
    /// per run (in UTC) so every rolling range shares the same notion of
    /// "today". Fixed presets ignore `as_of` entirely and never drift.
    pub fn resolve(self, as_of: NaiveDate) -> DateRange {
        match self {
            Self::Last30Days => rolling(self.name(), as_of, 30),
            Self::Last60Days => rolling(self.name(), as_of, 60),
            Self::Last90Days => rolling(self.name(), as_of, 90),
            Self::August2025 => fixed_month(self.name(), 2025, 8),
            Self::September2025 => fixed_month(self.name(), 2025, 9),
            Self::October2025 => fixed_month(self.name(), 2025, 10),
            Self::November2025 => fixed_month(self.name(), 2025, 11),
        }
    }
}

fn rolling(name: &'static str, as_of: NaiveDate, days: i64) -> DateRange {
    DateRange {
        name,
        start: as_of - Duration::days(days),
        // The interval is half-open, so the bound sits one day past `as_of`
        // to keep today's postings in the window.
        end: as_of + Duration::days(1),
        kind: RangeKind::Rolling,
    }
}

fn fixed_month(name: &'static str, year: i32, month: u32) -> DateRange {
    let end = if month == 12 {
        first_of_month(year + 1, 1)
    } else {
        first_of_month(year, month + 1)
    };

    DateRange {
        name,
        start: first_of_month(year, month),
        end,
        kind: RangeKind::Fixed,
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("preset month boundaries are valid dates")
}

#[cfg(test)]
mod test {
    use super::*;

    fn date(value: &str) -> NaiveDate {
        value.parse().expect("test dates are valid")
    }

    #[test]
    fn rolling_resolve_is_deterministic_for_a_fixed_as_of() {
        let as_of = date("2025-12-05");

        for preset in [
            RangePreset::Last30Days,
            RangePreset::Last60Days,
            RangePreset::Last90Days,
        ] {
            assert_eq!(preset.resolve(as_of), preset.resolve(as_of));
        }
    }

    #[test]
    fn rolling_range_includes_the_as_of_date() {
        let as_of = date("2025-12-05");

        let range = RangePreset::Last30Days.resolve(as_of);

        assert_eq!(date("2025-11-05"), range.start);
        assert_eq!(date("2025-12-06"), range.end);
        assert_eq!(RangeKind::Rolling, range.kind);
        assert!(range.start <= as_of && as_of < range.end);
    }

    #[test]
    fn fixed_month_does_not_drift_between_runs() {
        let first_run = RangePreset::September2025.resolve(date("2025-10-01"));
        let second_run = RangePreset::September2025.resolve(date("2026-03-15"));

        assert_eq!(first_run, second_run);
        assert_eq!(date("2025-09-01"), first_run.start);
        assert_eq!(date("2025-10-01"), first_run.end);
        assert_eq!(RangeKind::Fixed, first_run.kind);
    }

    #[test]
    fn december_fixed_month_would_roll_into_next_year() {
        let range = fixed_month("december_2025", 2025, 12);

        assert_eq!(date("2025-12-01"), range.start);
        assert_eq!(date("2026-01-01"), range.end);
    }

    #[test]
    fn every_preset_resolves_to_a_non_empty_interval() {
        let as_of = date("2026-01-20");

        for preset in ALL_PRESETS {
            let range = preset.resolve(as_of);

            assert!(range.start < range.end, "{} is empty", range.name);
        }
    }

    #[test]
    fn preset_names_round_trip() {
        for preset in ALL_PRESETS {
            assert_eq!(Ok(preset), RangePreset::from_name(preset.name()));
        }
    }

    #[test]
    fn unknown_preset_names_are_rejected() {
        let error = RangePreset::from_name("last_365").expect_err("preset should be unknown");

        assert_eq!(UnknownPresetError("last_365".to_owned()), error);
    }

    #[test]
    fn presets_are_declared_in_dashboard_order() {
        let names = ALL_PRESETS.map(RangePreset::name);

        assert_eq!(
            [
                "last_30",
                "last_60",
                "last_90",
                "august_2025",
                "september_2025",
                "october_2025",
                "november_2025",
            ],
            names
        );
    }
}
