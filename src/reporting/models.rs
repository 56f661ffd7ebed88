//! Database models for warehouse result rows.

use chrono::NaiveDate;

use super::domain::{deposits::DepositRecord, money::Amount};

/// A posted-transaction row as returned by the warehouse.
///
/// The amount arrives as whole cents; the query casts it on the warehouse
/// side so no floating point value ever carries a dollar total.
#[derive(Debug, sqlx::FromRow)]
pub struct DepositRow {
    pub user_id: String,
    pub amount_cents: i64,
    pub institution_name: Option<String>,
    pub posted_date: NaiveDate,
}

impl From<DepositRow> for DepositRecord {
    fn from(row: DepositRow) -> Self {
        Self {
            user_id: row.user_id,
            amount: Amount::from_cents(row.amount_cents),
            institution: row.institution_name,
            posted_on: row.posted_date,
        }
    }
}
