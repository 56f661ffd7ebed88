//! Aggregation of deposit records into the per-range report metrics.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::debug;

use super::deposits::DepositRecord;
use super::money::Amount;
use super::ranges::DateRange;

/// Maximum number of institutions listed in each top-institution table.
const TOP_INSTITUTION_LIMIT: usize = 10;

/// One row of the amount histogram configuration.
pub struct BucketBoundary {
    pub label: &'static str,
    pub lower_cents: i64,
    pub upper_cents: Option<i64>,
}

/// Version 1 of the histogram boundaries.
///
/// The boundaries are a versioned constant rather than being derived from the
/// data, so histograms stay comparable across ranges and runs. Intervals are
/// closed-open; the final bucket is unbounded above.
pub const AMOUNT_BUCKETS_V1: &[BucketBoundary] = &[
    BucketBoundary {
        label: "$0-$50",
        lower_cents: 0,
        upper_cents: Some(5_000),
    },
    BucketBoundary {
        label: "$50-$100",
        lower_cents: 5_000,
        upper_cents: Some(10_000),
    },
    BucketBoundary {
        label: "$100-$150",
        lower_cents: 10_000,
        upper_cents: Some(15_000),
    },
    BucketBoundary {
        label: "$150-$250",
        lower_cents: 15_000,
        upper_cents: Some(25_000),
    },
    BucketBoundary {
        label: "$250-$500",
        lower_cents: 25_000,
        upper_cents: Some(50_000),
    },
    BucketBoundary {
        label: "$500-$750",
        lower_cents: 50_000,
        upper_cents: Some(75_000),
    },
    BucketBoundary {
        label: "$750-$1,000",
        lower_cents: 75_000,
        upper_cents: Some(100_000),
    },
    BucketBoundary {
        label: "$1,000-$1,500",
        lower_cents: 100_000,
        upper_cents: Some(150_000),
    },
    BucketBoundary {
        label: "$1,500-$2,500",
        lower_cents: 150_000,
        upper_cents: Some(250_000),
    },
    BucketBoundary {
        label: "$2,500+",
        lower_cents: 250_000,
        upper_cents: None,
    },
];

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BucketCount {
    pub label: &'static str,
    pub count: u64,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct InstitutionCount {
    pub institution: String,
    pub count: u64,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct InstitutionVolume {
    pub institution: String,
    pub volume: Amount,
}

/// The summary metrics for one resolved date range.
#[derive(Clone, Debug, Serialize)]
pub struct RangeMetrics {
    pub range: DateRange,
    pub unique_users: u64,
    pub transaction_count: u64,
    pub total_volume: Amount,
    pub average_amount: Amount,
    /// Records excluded for failing data-quality validation.
    pub invalid_records: u64,
    pub amount_buckets: Vec<BucketCount>,
    pub top_institutions_by_count: Vec<InstitutionCount>,
    pub top_institutions_by_volume: Vec<InstitutionVolume>,
}

/// Aggregate the records fetched for a range into its report metrics.
///
/// The records are assumed to already be filtered to the range and to the
/// deposit transaction code; that is the query's responsibility. Records with
/// a negative amount are excluded from every total and surfaced through the
/// `invalid_records` counter instead.
pub fn aggregate(range: &DateRange, records: &[DepositRecord]) -> RangeMetrics {
    let mut unique_users: HashSet<&str> = HashSet::new();
    let mut transaction_count = 0;
    let mut total_volume = Amount::ZERO;
    let mut invalid_records = 0;
    let mut bucket_counts = vec![0u64; AMOUNT_BUCKETS_V1.len()];
    let mut institutions: BTreeMap<&str, (u64, Amount)> = BTreeMap::new();

    for record in records {
        let amount = match record.validated_amount() {
            Ok(amount) => amount,
            Err(error) => {
                debug!(%error, user_id = %record.user_id, "Excluding invalid deposit record.");

                invalid_records += 1;
                continue;
            }
        };

        unique_users.insert(record.user_id.as_str());
        transaction_count += 1;
        total_volume = total_volume.saturating_add(amount);
        bucket_counts[bucket_index(amount)] += 1;

        let totals = institutions
            .entry(record.institution_label())
            .or_insert((0, Amount::ZERO));
        totals.0 += 1;
        totals.1 = totals.1.saturating_add(amount);
    }

    let amount_buckets = AMOUNT_BUCKETS_V1
        .iter()
        .zip(bucket_counts)
        .map(|(bucket, count)| BucketCount {
            label: bucket.label,
            count,
        })
        .collect();

    let mut top_institutions_by_count = institutions
        .iter()
        .map(|(institution, (count, _))| InstitutionCount {
            institution: (*institution).to_owned(),
            count: *count,
        })
        .collect::<Vec<_>>();
    top_institutions_by_count.sort_by(|left, right| {
        right
            .count
            .cmp(&left.count)
            .then_with(|| left.institution.cmp(&right.institution))
    });
    top_institutions_by_count.truncate(TOP_INSTITUTION_LIMIT);

    let mut top_institutions_by_volume = institutions
        .iter()
        .map(|(institution, (_, volume))| InstitutionVolume {
            institution: (*institution).to_owned(),
            volume: *volume,
        })
        .collect::<Vec<_>>();
    top_institutions_by_volume.sort_by(|left, right| {
        right
            .volume
            .cmp(&left.volume)
            .then_with(|| left.institution.cmp(&right.institution))
    });
    top_institutions_by_volume.truncate(TOP_INSTITUTION_LIMIT);

    RangeMetrics {
        range: range.clone(),
        unique_users: unique_users.len() as u64,
        transaction_count,
        total_volume,
        average_amount: Amount::average(total_volume, transaction_count),
        invalid_records,
        amount_buckets,
        top_institutions_by_count,
        top_institutions_by_volume,
    }
}

/// The histogram bucket an amount falls into.
///
/// The final bucket is unbounded above, so every non-negative amount lands in
/// exactly one bucket.
fn bucket_index(amount: Amount) -> usize {
    AMOUNT_BUCKETS_V1
        .iter()
        .position(|bucket| {
            amount.cents() >= bucket.lower_cents
                && bucket
                    .upper_cents
                    .map_or(true, |upper| amount.cents() < upper)
        })
        .unwrap_or(AMOUNT_BUCKETS_V1.len() - 1)
}
