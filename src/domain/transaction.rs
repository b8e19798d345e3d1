//! Transaction domain entity.
//! Framework-agnostic representation of a transfer notification and its lifecycle.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Minor units per major unit (paisa per rupee, cents per dollar).
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Lifecycle of a transaction. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Processing,
    Processed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Processing => "PROCESSING",
            TransactionStatus::Processed => "PROCESSED",
        }
    }

    /// Whether a record currently in `self` may be written with `next`.
    /// Re-writing the same status is allowed; moving backward is not.
    pub fn can_transition_to(&self, next: TransactionStatus) -> bool {
        match (self, next) {
            (TransactionStatus::Processing, _) => true,
            (TransactionStatus::Processed, TransactionStatus::Processed) => true,
            (TransactionStatus::Processed, TransactionStatus::Processing) => false,
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown transaction status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for TransactionStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PROCESSING" => Ok(TransactionStatus::Processing),
            "PROCESSED" => Ok(TransactionStatus::Processed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// An amount held as an integer count of minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MinorUnits(i64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    NotPositive,
    TooSmall,
    TooLarge,
    Malformed,
}

impl fmt::Display for AmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::NotPositive => f.write_str("must be a positive number"),
            AmountError::TooSmall => f.write_str("must be at least one minor currency unit"),
            AmountError::TooLarge => f.write_str("is too large"),
            AmountError::Malformed => f.write_str("must be a number"),
        }
    }
}

impl std::error::Error for AmountError {}

// Anything above this in major units cannot fit in i64 minor units.
const MAX_MAJOR_AMOUNT: f64 = 9.0e16;

impl MinorUnits {
    pub fn new(minor: i64) -> Result<Self, AmountError> {
        if minor <= 0 {
            return Err(AmountError::NotPositive);
        }
        Ok(Self(minor))
    }

    /// Converts a major-unit JSON number into minor units, rounding half away from zero.
    /// The decimal text of the number is used so that `150.1` becomes exactly `15010`.
    pub fn from_major(amount: &serde_json::Number) -> Result<Self, AmountError> {
        let approx = amount.as_f64().ok_or(AmountError::Malformed)?;
        if approx <= 0.0 {
            return Err(AmountError::NotPositive);
        }
        if approx > MAX_MAJOR_AMOUNT {
            return Err(AmountError::TooLarge);
        }

        let major = BigDecimal::from_str(&amount.to_string()).map_err(|_| AmountError::Malformed)?;
        let scaled = major * BigDecimal::from(MINOR_UNITS_PER_MAJOR);
        let whole = scaled.with_scale(0);
        let remainder = &scaled - &whole;

        let mut minor: i64 = whole
            .to_string()
            .parse()
            .map_err(|_| AmountError::TooLarge)?;
        if remainder * BigDecimal::from(2) >= BigDecimal::from(1) {
            minor = minor.checked_add(1).ok_or(AmountError::TooLarge)?;
        }

        if minor < 1 {
            return Err(AmountError::TooSmall);
        }
        Ok(Self(minor))
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Major-unit view, used only when presenting a record.
    pub fn to_major(&self) -> f64 {
        self.0 as f64 / MINOR_UNITS_PER_MAJOR as f64
    }
}

/// Domain entity representing a stored transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub transaction_id: String,
    pub source_account: String,
    pub destination_account: String,
    pub amount: MinorUnits,
    pub currency: String,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// A freshly admitted transaction, still awaiting confirmation.
    pub fn new(
        transaction_id: String,
        source_account: String,
        destination_account: String,
        amount: MinorUnits,
        currency: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            transaction_id,
            source_account,
            destination_account,
            amount,
            currency,
            status: TransactionStatus::Processing,
            created_at: now,
            processed_at: None,
            updated_at: now,
        }
    }

    /// Applies an update in place, refusing backward status moves.
    pub fn apply(&mut self, update: &TransactionUpdate) -> bool {
        if let Some(next) = update.status {
            if !self.status.can_transition_to(next) {
                return false;
            }
            self.status = next;
        }
        if let Some(processed_at) = update.processed_at {
            self.processed_at = Some(processed_at);
        }
        self.updated_at = update.updated_at;
        true
    }
}

/// Field changes written by the completion worker.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionUpdate {
    pub status: Option<TransactionStatus>,
    pub processed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl TransactionUpdate {
    pub fn processed(now: DateTime<Utc>) -> Self {
        Self {
            status: Some(TransactionStatus::Processed),
            processed_at: Some(now),
            updated_at: now,
        }
    }

    /// Only refreshes `updated_at`, leaving the record eligible for a later retry.
    pub fn touch(now: DateTime<Utc>) -> Self {
        Self {
            status: None,
            processed_at: None,
            updated_at: now,
        }
    }
}
