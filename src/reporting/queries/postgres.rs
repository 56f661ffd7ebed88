use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, trace};

use crate::database::WarehouseConnection;

use super::super::domain::{deposits::DepositRecord, ranges::DateRange};
use super::super::models::DepositRow;
use super::DepositQueries;

/// Transaction code identifying ACH direct-deposit postings. Filtering on it
/// is the query's responsibility, not the aggregator's.
pub const DEPOSIT_TRANSACTION_CODE: &str = "PMOF";

const DEPOSITS_IN_RANGE_SQL: &str = r#"
SELECT
    user_id,
    CAST(ROUND(amount * 100) AS BIGINT) AS amount_cents,
    institution_name,
    posted_date
FROM posted_transactions
WHERE transaction_code = $1
    AND posted_date >= $2
    AND posted_date < $3
ORDER BY posted_date, user_id
"#;

/// A struct to provide queries for the Postgres warehouse backing the
/// dashboard.
pub struct PostgresQueries(pub WarehouseConnection);

#[async_trait]
impl DepositQueries for PostgresQueries {
    async fn deposits_in_range(&self, range: &DateRange) -> Result<Vec<DepositRecord>> {
        trace!(
            range = range.name,
            start = %range.start,
            end = %range.end,
            "Fetching deposit rows for range."
        );

        let rows = sqlx::query_as::<_, DepositRow>(DEPOSITS_IN_RANGE_SQL)
            .bind(DEPOSIT_TRANSACTION_CODE)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&*self.0)
            .await?;

        debug!(range = range.name, rows = rows.len(), "Fetched deposit rows.");

        Ok(rows.into_iter().map(DepositRecord::from).collect())
    }
}
