use chrono::NaiveDate;
use thiserror::Error;

use super::money::Amount;

/// Label used to group records whose institution name is missing or blank.
///
/// Grouping these under a sentinel keeps them visible in the top-institution
/// tables instead of silently dropping them.
pub const UNKNOWN_INSTITUTION: &str = "Unknown";

/// A single posted ACH direct-deposit transaction, as read from the
/// warehouse. Records are fetched per range and discarded after aggregation.
#[derive(Clone, Debug)]
pub struct DepositRecord {
    pub user_id: String,
    pub amount: Amount,
    pub institution: Option<String>,
    pub posted_on: NaiveDate,
}

/// The record failed basic data-quality validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum InvalidRecordError {
    #[error("deposit amount {0} is negative")]
    NegativeAmount(Amount),
}

impl DepositRecord {
    /// Validate the record's amount before it is counted toward any total.
    pub fn validated_amount(&self) -> Result<Amount, InvalidRecordError> {
        if self.amount.is_negative() {
            return Err(InvalidRecordError::NegativeAmount(self.amount));
        }

        Ok(self.amount)
    }

    /// The institution label the record is grouped under.
    pub fn institution_label(&self) -> &str {
        match self.institution.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => UNKNOWN_INSTITUTION,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn record(amount_cents: i64, institution: Option<&str>) -> DepositRecord {
        DepositRecord {
            user_id: "user_1".to_owned(),
            amount: Amount::from_cents(amount_cents),
            institution: institution.map(str::to_owned),
            posted_on: NaiveDate::from_ymd_opt(2025, 9, 15).expect("valid date"),
        }
    }

    #[test]
    fn negative_amounts_fail_validation() {
        let error = record(-500, Some("Acme Payroll"))
            .validated_amount()
            .expect_err("negative amount should be invalid");

        assert_eq!(
            InvalidRecordError::NegativeAmount(Amount::from_cents(-500)),
            error
        );
    }

    #[test]
    fn non_negative_amounts_pass_validation() {
        assert_eq!(
            Ok(Amount::ZERO),
            record(0, Some("Acme Payroll")).validated_amount()
        );
    }

    #[test]
    fn institution_label_trims_whitespace() {
        assert_eq!(
            "Acme Payroll",
            record(100, Some("  Acme Payroll ")).institution_label()
        );
    }

    #[test]
    fn missing_and_blank_institutions_use_the_sentinel() {
        assert_eq!(UNKNOWN_INSTITUTION, record(100, None).institution_label());
        assert_eq!(
            UNKNOWN_INSTITUTION,
            record(100, Some("   ")).institution_label()
        );
    }
}
