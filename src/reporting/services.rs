use chrono::NaiveDate;
use tracing::{info, warn};

use super::domain::{
    metrics,
    payload::{RangeOutcome, ReportPayload},
    ranges::RangePreset,
};
use super::queries::DynDepositQueries;

/// A service object providing the report-assembly pipeline.
#[derive(Clone)]
pub struct ReportService {
    deposit_queries: DynDepositQueries,
}

impl ReportService {
    /// Create a new report service.
    ///
    /// # Arguments
    ///
    /// * `deposit_queries` - The row source used to fetch deposit records.
    pub fn new(deposit_queries: DynDepositQueries) -> Self {
        Self { deposit_queries }
    }

    /// Assemble the report payload for one run.
    ///
    /// Presets are processed sequentially in the order given, and that order
    /// is the payload's key order. A failure while fetching one range
    /// degrades that entry to an explicit unavailable marker instead of
    /// aborting the run; the fixed historical ranges should still publish
    /// even when a transient warehouse issue hits a rolling one.
    ///
    /// # Arguments
    ///
    /// * `presets` - The ranges to refresh, in output order.
    /// * `as_of` - The date treated as "today" for every rolling range.
    pub async fn assemble(&self, presets: &[RangePreset], as_of: NaiveDate) -> ReportPayload {
        let mut payload = ReportPayload::new();

        for preset in presets {
            let range = preset.resolve(as_of);
            info!(
                range = range.name,
                start = %range.start,
                end = %range.end,
                "Refreshing range."
            );

            let outcome = match self.deposit_queries.deposits_in_range(&range).await {
                Ok(records) => RangeOutcome::Ready {
                    metrics: metrics::aggregate(&range, &records),
                },
                Err(error) => {
                    warn!(
                        range = range.name,
                        %error,
                        "Range degraded; continuing with the remaining ranges."
                    );

                    RangeOutcome::Unavailable {
                        message: error.to_string(),
                    }
                }
            };

            payload.insert(range.name, outcome);
        }

        payload
    }
}
