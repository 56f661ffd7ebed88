use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::metrics::RangeMetrics;

/// The outcome of refreshing one preset's range.
///
/// Failed ranges are marked explicitly so the dashboard can display "data
/// unavailable" instead of zeros that could be mistaken for real values.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RangeOutcome {
    Ready { metrics: RangeMetrics },
    Unavailable { message: String },
}

/// The full report artifact: one entry per preset, in preset declaration
/// order. This is the only data handed to the rendering layer.
#[derive(Clone, Debug, Default)]
pub struct ReportPayload {
    entries: Vec<(String, RangeOutcome)>,
}

impl ReportPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, outcome: RangeOutcome) {
        self.entries.push((name.to_owned(), outcome));
    }

    pub fn entries(&self) -> &[(String, RangeOutcome)] {
        &self.entries
    }

    /// Names of the ranges that could not be refreshed this run.
    pub fn degraded_ranges(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, outcome)| matches!(outcome, RangeOutcome::Unavailable { .. }))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Serialize to the canonical JSON injected into the page.
    ///
    /// The payload is serialized directly rather than through an intermediate
    /// [`serde_json::Value`], which would re-sort the keys alphabetically.
    /// Identical inputs therefore produce byte-identical output.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for ReportPayload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, outcome) in &self.entries {
            map.serialize_entry(name, outcome)?;
        }
        map.end()
    }
}
