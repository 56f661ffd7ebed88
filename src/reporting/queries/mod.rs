//! Queries for deposit information.
//!
//! Queries fetch information from whatever storage is backing the warehouse
//! contract. They never modify data.

pub mod postgres;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use super::domain::{deposits::DepositRecord, ranges::DateRange};

/// The row-source capability the report pipeline depends on.
///
/// Any implementation honoring the `[start, end)` bound and the deposit
/// transaction-code filter is substitutable here; tests use an in-memory
/// fixture in place of the warehouse.
#[async_trait]
pub trait DepositQueries {
    /// Fetch the deposit records posted within a range.
    ///
    /// # Arguments
    ///
    /// * `range` - The half-open `[start, end)` interval to fetch.
    ///
    /// # Returns
    ///
    /// The matching records, already filtered to the ACH deposit transaction
    /// code.
    async fn deposits_in_range(&self, range: &DateRange) -> Result<Vec<DepositRecord>>;
}

pub type DynDepositQueries = Arc<dyn DepositQueries + Send + Sync>;
